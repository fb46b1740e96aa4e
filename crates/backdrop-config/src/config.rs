//! Configuration structs with sensible defaults and RON persistence.

use std::path::{Path, PathBuf};

use backdrop_fields::{
    Background, GalaxyParams, MAX_PREVIEW_DIMENSION, PreviewCamera, SpriteShape, SpriteStyle,
    StarfieldParams,
};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

const CONFIG_FILE: &str = "config.ron";
const APP_DIR: &str = "backdrop";

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Spiral galaxy parameters.
    pub galaxy: GalaxyParams,
    /// Starfield parameters.
    pub starfield: StarfieldParams,
    /// Frame loop settings.
    pub run: RunConfig,
    /// Preview image settings.
    pub preview: PreviewConfig,
    /// Debug/development settings.
    pub debug: DebugConfig,
}

/// Frame loop configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RunConfig {
    /// Seed for every random draw.
    pub seed: u64,
    /// Frames to simulate after generation.
    pub frames: u32,
    /// Simulated frames per second.
    pub frame_rate: u32,
}

/// Preview image configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PreviewConfig {
    /// Write preview images at all.
    pub enabled: bool,
    /// Image width in pixels.
    pub width: u32,
    /// Image height in pixels.
    pub height: u32,
    /// Write a frame every N frames (0 = first and last frame only).
    pub every_n_frames: u32,
    /// Directory for PNG output, relative to the working directory.
    pub output_dir: PathBuf,
    pub galaxy_camera: PreviewCamera,
    pub galaxy_background: Background,
    pub galaxy_sprite: SpriteStyle,
    pub starfield_camera: PreviewCamera,
    pub starfield_background: Background,
    pub starfield_sprite: SpriteStyle,
}

/// Debug/development configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DebugConfig {
    /// Log level override (e.g., "debug", "info", "warn").
    pub log_level: String,
}

// --- Default implementations ---

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            frames: 600,
            frame_rate: 60,
        }
    }
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            width: 960,
            height: 540,
            every_n_frames: 0,
            output_dir: PathBuf::from("previews"),
            galaxy_camera: PreviewCamera::galaxy(),
            galaxy_background: Background::default(),
            galaxy_sprite: SpriteStyle::default(),
            starfield_camera: PreviewCamera::starfield(),
            starfield_background: Background::deep_space(),
            // Half the image height: fixed-size points with distance attenuation.
            starfield_sprite: SpriteStyle {
                attenuation: 270.0,
                shape: SpriteShape::Square,
            },
        }
    }
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

// --- Validation ---

impl Config {
    /// Check every section. Field parameters are checked by their generators'
    /// own validators.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.galaxy.validate()?;
        self.starfield.validate()?;

        if self.run.frame_rate == 0 {
            return Err(ConfigError::InvalidSetting {
                name: "run.frame_rate",
                reason: "must be at least 1",
            });
        }
        if self.preview.enabled && (self.preview.width == 0 || self.preview.height == 0) {
            return Err(ConfigError::InvalidSetting {
                name: "preview.width/height",
                reason: "must be non-zero when previews are enabled",
            });
        }
        if self.preview.width > MAX_PREVIEW_DIMENSION || self.preview.height > MAX_PREVIEW_DIMENSION
        {
            return Err(ConfigError::InvalidSetting {
                name: "preview.width/height",
                reason: "must be at most 16384",
            });
        }
        Ok(())
    }

    /// Seconds between simulated frames.
    pub fn frame_interval(&self) -> f32 {
        1.0 / self.run.frame_rate.max(1) as f32
    }
}

// --- Load / Save / Reload ---

impl Config {
    /// Platform config directory for the app, e.g. `~/.config/backdrop`.
    /// Falls back to `./backdrop` when the platform has none.
    pub fn default_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(APP_DIR)
    }

    /// Load config from the given directory, or create a default config file.
    pub fn load_or_create(config_dir: &Path) -> Result<Self, ConfigError> {
        let config_path = config_dir.join(CONFIG_FILE);

        if config_path.exists() {
            let contents = std::fs::read_to_string(&config_path).map_err(ConfigError::ReadError)?;
            let config: Config = ron::from_str(&contents).map_err(ConfigError::ParseError)?;
            log::info!("Loaded config from {}", config_path.display());
            Ok(config)
        } else {
            let config = Config::default();
            config.save(config_dir)?;
            log::info!("Created default config at {}", config_path.display());
            Ok(config)
        }
    }

    /// Save config to the given directory as `config.ron`.
    pub fn save(&self, config_dir: &Path) -> Result<(), ConfigError> {
        std::fs::create_dir_all(config_dir).map_err(ConfigError::WriteError)?;

        let config_path = config_dir.join(CONFIG_FILE);
        let pretty = ron::ser::PrettyConfig::new()
            .depth_limit(3)
            .separate_tuple_members(true)
            .enumerate_arrays(false);

        let serialized =
            ron::ser::to_string_pretty(self, pretty).map_err(ConfigError::SerializeError)?;

        std::fs::write(&config_path, serialized).map_err(ConfigError::WriteError)?;
        Ok(())
    }

    /// Hot-reload: returns `Some(new_config)` if the file changed, `None` otherwise.
    pub fn reload(&self, config_dir: &Path) -> Result<Option<Self>, ConfigError> {
        let config_path = config_dir.join(CONFIG_FILE);
        let contents = std::fs::read_to_string(&config_path).map_err(ConfigError::ReadError)?;
        let new_config: Config = ron::from_str(&contents).map_err(ConfigError::ParseError)?;

        if &new_config != self {
            log::info!("Config reloaded with changes");
            Ok(Some(new_config))
        } else {
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_serializes() {
        let config = Config::default();
        let ron_str =
            ron::ser::to_string_pretty(&config, ron::ser::PrettyConfig::new().depth_limit(3))
                .unwrap();
        assert!(ron_str.contains("count: 5000"));
        assert!(ron_str.contains("seed: 42"));
        assert!(ron_str.contains("\"#ff6a00\""));
    }

    #[test]
    fn test_config_roundtrip() {
        let config = Config::default();
        let ron_str = ron::to_string(&config).unwrap();
        let deserialized: Config = ron::from_str(&ron_str).unwrap();
        assert_eq!(config, deserialized);
    }

    #[test]
    fn test_missing_section_uses_default() {
        let ron_str = "(galaxy: (count: 100), run: ())";
        let config: Config = ron::from_str(ron_str).unwrap();
        assert_eq!(config.galaxy.count, 100);
        assert_eq!(config.galaxy.branch_count, 3);
        assert_eq!(config.starfield, StarfieldParams::default());
    }

    #[test]
    fn test_hex_colors_in_file() {
        let ron_str = r##"(galaxy: (inside_color: "#ffffff", outside_color: "#000"))"##;
        let config: Config = ron::from_str(ron_str).unwrap();
        assert_eq!(config.galaxy.inside_color, [1.0, 1.0, 1.0]);
        assert_eq!(config.galaxy.outside_color, [0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_bad_hex_color_is_parse_error() {
        let result: Result<Config, _> = ron::from_str(r#"(galaxy: (inside_color: "orange"))"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_extra_field_ignored() {
        let ron_str = "(future_setting: true)";
        let result: Result<Config, _> = ron::from_str(ron_str);
        assert!(result.is_ok());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.galaxy.count = 1234;
        config.starfield.spread = 4.0;
        config.run.seed = 7;

        config.save(dir.path()).unwrap();
        let loaded = Config::load_or_create(dir.path()).unwrap();
        assert_eq!(config, loaded);
    }

    #[test]
    fn test_load_creates_default_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_or_create(dir.path()).unwrap();
        assert_eq!(config, Config::default());
        assert!(dir.path().join(CONFIG_FILE).exists());
    }

    #[test]
    fn test_reload_detects_changes() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::default();
        config.save(dir.path()).unwrap();

        let mut modified = config.clone();
        modified.galaxy.branch_count = 5;
        modified.save(dir.path()).unwrap();

        let result = config.reload(dir.path()).unwrap();
        assert!(result.is_some());
        assert_eq!(result.unwrap().galaxy.branch_count, 5);
    }

    #[test]
    fn test_reload_no_changes() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::default();
        config.save(dir.path()).unwrap();

        let result = config.reload(dir.path()).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_invalid_ron_produces_error() {
        let result: Result<Config, _> = ron::from_str("{{not valid}}");
        assert!(result.is_err());
    }

    #[test]
    fn test_validate_defaults() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_fields() {
        let mut config = Config::default();
        config.galaxy.branch_count = 0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidField(_))
        ));

        let mut config = Config::default();
        config.run.frame_rate = 0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidSetting { .. })
        ));
    }

    #[test]
    fn test_zero_sized_preview_allowed_when_disabled() {
        let mut config = Config::default();
        config.preview.width = 0;
        assert!(config.validate().is_err());
        config.preview.enabled = false;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_oversized_preview_rejected() {
        let mut config = Config::default();
        config.preview.width = MAX_PREVIEW_DIMENSION;
        assert!(config.validate().is_ok());

        config.preview.width = 70_000;
        config.preview.height = 70_000;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidSetting {
                name: "preview.width/height",
                ..
            })
        ));
    }

    #[test]
    fn test_default_dir_is_app_specific() {
        assert!(Config::default_dir().ends_with(APP_DIR));
    }

    #[test]
    fn test_frame_interval() {
        let config = Config::default();
        assert!((config.frame_interval() - 1.0 / 60.0).abs() < 1e-9);
    }
}
