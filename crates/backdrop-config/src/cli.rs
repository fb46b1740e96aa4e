//! Command-line argument parsing.

use std::path::PathBuf;

use clap::Parser;

use crate::Config;

/// Backdrop command-line arguments.
///
/// CLI values override settings loaded from `config.ron`.
#[derive(Parser, Debug, Default)]
#[command(name = "backdrop", about = "Ambient galaxy and starfield generator")]
pub struct CliArgs {
    /// Random seed.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Frames to simulate.
    #[arg(long)]
    pub frames: Option<u32>,

    /// Number of galaxy points.
    #[arg(long)]
    pub galaxy_count: Option<u32>,

    /// Number of starfield points.
    #[arg(long)]
    pub star_count: Option<u32>,

    /// Preview width in pixels.
    #[arg(long)]
    pub width: Option<u32>,

    /// Preview height in pixels.
    #[arg(long)]
    pub height: Option<u32>,

    /// Directory for preview images.
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Skip writing preview images.
    #[arg(long)]
    pub no_preview: bool,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Path to config directory (overrides default location).
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl Config {
    /// Apply CLI overrides to a loaded config.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if let Some(seed) = args.seed {
            self.run.seed = seed;
        }
        if let Some(frames) = args.frames {
            self.run.frames = frames;
        }
        if let Some(n) = args.galaxy_count {
            self.galaxy.count = n;
        }
        if let Some(n) = args.star_count {
            self.starfield.count = n;
        }
        if let Some(w) = args.width {
            self.preview.width = w;
        }
        if let Some(h) = args.height {
            self.preview.height = h;
        }
        if let Some(ref dir) = args.output {
            self.preview.output_dir = dir.clone();
        }
        if args.no_preview {
            self.preview.enabled = false;
        }
        if let Some(ref level) = args.log_level {
            self.debug.log_level = level.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_override() {
        let mut config = Config::default();
        let args = CliArgs {
            seed: Some(99),
            galaxy_count: Some(200),
            output: Some(PathBuf::from("/tmp/out")),
            no_preview: true,
            ..CliArgs::default()
        };
        config.apply_cli_overrides(&args);
        assert_eq!(config.run.seed, 99);
        assert_eq!(config.galaxy.count, 200);
        assert_eq!(config.preview.output_dir, PathBuf::from("/tmp/out"));
        assert!(!config.preview.enabled);
        // Non-overridden fields retain defaults
        assert_eq!(config.starfield.count, 5000);
        assert_eq!(config.run.frames, 600);
    }

    #[test]
    fn test_cli_no_override() {
        let original = Config::default();
        let mut config = Config::default();
        config.apply_cli_overrides(&CliArgs::default());
        assert_eq!(config, original);
    }

    #[test]
    fn test_cli_parses_flags() {
        let args = CliArgs::parse_from([
            "backdrop",
            "--seed",
            "5",
            "--star-count",
            "10",
            "--no-preview",
        ]);
        assert_eq!(args.seed, Some(5));
        assert_eq!(args.star_count, Some(10));
        assert!(args.no_preview);
        assert!(args.frames.is_none());
    }
}
