//! Headless host loop for the backdrop fields.
//!
//! Generates the galaxy and starfield once, steps both at a fixed frame rate,
//! and writes PNG previews. Configuration is loaded from `config.ron` and can
//! be overridden via CLI flags, e.g. `backdrop-demo --frames 120 --seed 7`.

mod scene;

use std::path::Path;
use std::time::Instant;

use backdrop_config::{CliArgs, Config, ConfigError};
use backdrop_fields::FieldError;
use clap::Parser;
use scene::{Scene, should_capture};
use tracing::{error, info};

#[derive(Debug, thiserror::Error)]
enum DemoError {
    #[error(transparent)]
    Field(#[from] FieldError),

    #[error("failed to create output directory: {0}")]
    OutputDir(#[source] std::io::Error),
}

fn main() {
    let args = CliArgs::parse();

    let config_dir = args.config.clone().unwrap_or_else(Config::default_dir);

    let mut config = match load_config(&config_dir) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load config: {e}");
            std::process::exit(2);
        }
    };
    config.apply_cli_overrides(&args);

    let log_dir = config_dir.join("logs");
    backdrop_log::init_logging(Some(&log_dir), cfg!(debug_assertions), Some(&config));

    if let Err(e) = config.validate() {
        error!("Invalid configuration: {e}");
        std::process::exit(2);
    }

    if let Err(e) = run(&config) {
        error!("Run failed: {e}");
        std::process::exit(1);
    }
}

/// Load `config.ron` from `config_dir`. A default config that cannot be
/// written out is still used; an existing file that cannot be read or parsed
/// is an error.
fn load_config(config_dir: &Path) -> Result<Config, ConfigError> {
    match Config::load_or_create(config_dir) {
        Err(ConfigError::WriteError(e)) => {
            eprintln!("Failed to create default config: {e}, using defaults");
            Ok(Config::default())
        }
        result => result,
    }
}

fn run(config: &Config) -> Result<(), DemoError> {
    let started = Instant::now();
    let mut scene = Scene::new(config)?;
    info!(
        galaxy_points = scene.galaxy().len(),
        star_points = scene.starfield().len(),
        seed = config.run.seed,
        "Generated fields in {:.1} ms",
        started.elapsed().as_secs_f64() * 1000.0
    );

    let preview = &config.preview;
    if preview.enabled {
        std::fs::create_dir_all(&preview.output_dir).map_err(DemoError::OutputDir)?;
    }

    let total = config.run.frames;
    let loop_started = Instant::now();
    for frame in 0..=total {
        if frame > 0 {
            scene.step();
        }
        if preview.enabled && should_capture(frame, total, preview.every_n_frames) {
            capture(&scene, config, &preview.output_dir)?;
        }
    }

    info!(
        frames = total,
        galaxy_rotation = scene.galaxy_state().rotation_angle(),
        starfield_rotation_x = scene.starfield_state().rotation().x,
        starfield_rotation_y = scene.starfield_state().rotation().y,
        "Simulated {:.1} s of animation in {:.1} ms",
        scene.elapsed(),
        loop_started.elapsed().as_secs_f64() * 1000.0
    );
    Ok(())
}

fn capture(scene: &Scene, config: &Config, dir: &Path) -> Result<(), FieldError> {
    let frame = scene.frame();
    scene
        .render_galaxy(&config.preview)?
        .save_png(&dir.join(format!("galaxy_{frame:05}.png")))?;
    scene
        .render_starfield(&config.preview)?
        .save_png(&dir.join(format!("starfield_{frame:05}.png")))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_config_creates_default() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config(dir.path()).unwrap();
        assert_eq!(config, Config::default());
        assert!(dir.path().join("config.ron").exists());
    }

    #[test]
    fn test_load_config_rejects_malformed_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("config.ron"), r#"(galaxy: (count: "oops""#).unwrap();
        assert!(matches!(
            load_config(dir.path()),
            Err(ConfigError::ParseError(_))
        ));
    }

    #[test]
    fn test_load_config_uses_defaults_when_dir_unwritable() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "").unwrap();
        let config = load_config(&blocker.join("backdrop")).unwrap();
        assert_eq!(config, Config::default());
    }
}
