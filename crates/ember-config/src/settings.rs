//! Config file model, loading and validation.

use std::fs;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use ember_core::{AnimationSpeed, FieldConfig, MAX_PARTICLES, Rgb};
use ember_text::{DEFAULT_PHRASES, TypewriterTiming};
use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Name of the config file inside the config directory.
const CONFIG_FILE: &str = "config.toml";

/// Headline shown over the field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeadlineConfig {
    pub enabled: bool,
    /// Phrases cycled by the typewriter.
    pub phrases: Vec<String>,
    /// How strongly the headline follows the pointer (0 disables).
    pub magnetic_strength: f32,
    pub timing: TypewriterTiming,
}

impl Default for HeadlineConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            phrases: DEFAULT_PHRASES.iter().map(|p| p.to_string()).collect(),
            magnetic_strength: 0.3,
            timing: TypewriterTiming::default(),
        }
    }
}

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub speed: AnimationSpeed,
    /// Fixed seed for the particle field; random when absent.
    pub seed: Option<u64>,
    /// Keep the field still and the headline static.
    pub reduced_motion: bool,
    /// Virtual pixels per terminal column.
    pub cell_width: f32,
    /// Virtual pixels per terminal row.
    pub cell_height: f32,
    /// Alpha multiplier for terminal rendering.
    pub contrast: f32,
    /// Strength of the light under the pointer (0 disables).
    pub glow: f32,
    /// Color the field is composited over.
    pub background: Rgb,
    pub field: FieldConfig,
    pub headline: HeadlineConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            speed: AnimationSpeed::default(),
            seed: None,
            reduced_motion: false,
            cell_width: 8.0,
            cell_height: 16.0,
            contrast: 2.0,
            glow: 0.12,
            background: Rgb::new(12, 10, 14),
            field: FieldConfig::default(),
            headline: HeadlineConfig::default(),
        }
    }
}

impl Config {
    /// Default location of the config file.
    pub fn default_path() -> Result<PathBuf, ConfigError> {
        ProjectDirs::from("", "", "ember")
            .map(|dirs| dirs.config_dir().join(CONFIG_FILE))
            .ok_or(ConfigError::NoConfigDir)
    }

    /// Load from `path`, or from the default location when `None`.
    ///
    /// A missing file yields the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => Self::default_path()?,
        };
        if !path.exists() {
            info!("no config at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        Self::load_from(&path)
    }

    /// Load and validate an existing file.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml(&text)?;
        debug!("loaded config from {}", path.display());
        Ok(config)
    }

    /// Parse and validate TOML text.
    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Render as TOML text.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Write to `path`, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let text = self.to_toml()?;
        let write_err = |source| ConfigError::Write {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(write_err)?;
        }
        fs::write(path, text).map_err(write_err)?;
        info!("saved config to {}", path.display());
        Ok(())
    }

    /// Reject values the animation cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let f = &self.field;

        for (field, value) in [
            ("field.compact_ratio", f.compact_ratio),
            ("field.compact_breakpoint", f.compact_breakpoint),
            ("field.min_size", f.min_size),
            ("field.max_size", f.max_size),
            ("field.min_rise_secs", f.min_rise_secs),
            ("field.max_rise_secs", f.max_rise_secs),
            ("field.frame_rate", f.frame_rate),
            ("field.drift_spread", f.drift_spread),
            ("field.margin", f.margin),
            ("field.link_distance", f.link_distance),
            ("field.link_max_opacity", f.link_max_opacity),
            ("field.link_width", f.link_width),
            ("field.particle_opacity", f.particle_opacity),
            ("cell_width", self.cell_width),
            ("cell_height", self.cell_height),
            ("contrast", self.contrast),
            ("glow", self.glow),
            ("headline.magnetic_strength", self.headline.magnetic_strength),
        ] {
            if !value.is_finite() {
                return Err(ConfigError::invalid(field, "must be a finite number"));
            }
        }
        if f.count > MAX_PARTICLES {
            return Err(ConfigError::invalid(
                "field.count",
                format!("at most {MAX_PARTICLES} particles"),
            ));
        }
        if !(f.margin >= 0.0) {
            return Err(ConfigError::invalid("field.margin", "must be zero or more"));
        }
        if !(f.link_distance > 0.0) {
            return Err(ConfigError::invalid(
                "field.link_distance",
                "must be positive",
            ));
        }
        for (field, value) in [
            ("field.link_max_opacity", f.link_max_opacity),
            ("field.particle_opacity", f.particle_opacity),
            ("glow", self.glow),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::invalid(field, "must be between 0 and 1"));
            }
        }
        if !(f.compact_ratio > 0.0 && f.compact_ratio <= 1.0) {
            return Err(ConfigError::invalid(
                "field.compact_ratio",
                "must be in (0, 1]",
            ));
        }
        if !(f.min_size > 0.0 && f.min_size <= f.max_size) {
            return Err(ConfigError::invalid(
                "field.min_size",
                format!("{} .. {} is not a valid size range", f.min_size, f.max_size),
            ));
        }
        if !(f.min_rise_secs > 0.0 && f.min_rise_secs <= f.max_rise_secs) {
            return Err(ConfigError::invalid(
                "field.min_rise_secs",
                format!(
                    "{} .. {} is not a valid rise range",
                    f.min_rise_secs, f.max_rise_secs
                ),
            ));
        }
        if !(f.frame_rate > 0.0) {
            return Err(ConfigError::invalid("field.frame_rate", "must be positive"));
        }
        if !(f.drift_spread >= 0.0) {
            return Err(ConfigError::invalid(
                "field.drift_spread",
                "must be zero or more",
            ));
        }
        if f.palette.entries().is_empty() {
            return Err(ConfigError::invalid("field.palette", "needs at least one color"));
        }
        if !(f.link_width >= 0.0) {
            return Err(ConfigError::invalid("field.link_width", "must be zero or more"));
        }
        if f.palette.entries().iter().any(|e| !(e.weight >= 0.0 && e.weight.is_finite())) {
            return Err(ConfigError::invalid(
                "field.palette",
                "weights must be finite and zero or more",
            ));
        }
        if !(self.cell_width > 0.0 && self.cell_height > 0.0) {
            return Err(ConfigError::invalid(
                "cell_width",
                "cell metrics must be positive",
            ));
        }
        if !(self.contrast > 0.0) {
            return Err(ConfigError::invalid("contrast", "must be positive"));
        }
        if !(self.headline.magnetic_strength >= 0.0) {
            return Err(ConfigError::invalid(
                "headline.magnetic_strength",
                "must be zero or more",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use ember_core::FieldVariant;

    use super::*;

    #[test]
    fn test_defaults_validate() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config = Config::from_toml(
            r#"
speed = "fast"
seed = 42

[field]
variant = "embers"
count = 80
"#,
        )
        .unwrap();
        assert_eq!(config.speed, AnimationSpeed::Fast);
        assert_eq!(config.seed, Some(42));
        assert_eq!(config.field.variant, FieldVariant::Embers);
        assert_eq!(config.field.count, 80);
        assert_eq!(config.field.margin, 20.0);
        assert_eq!(config.headline, HeadlineConfig::default());
    }

    #[test]
    fn test_palette_from_toml() {
        let config = Config::from_toml(
            r#"
[[field.palette]]
color = { r = 255, g = 0, b = 0 }
weight = 1.0
"#,
        )
        .unwrap();
        assert_eq!(config.field.palette.entries().len(), 1);
        assert_eq!(config.field.palette.pick(0.5), Rgb::new(255, 0, 0));
    }

    #[test]
    fn test_invalid_values_rejected() {
        let err = Config::from_toml("[field]\nlink_distance = 0.0\n").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                field: "field.link_distance",
                ..
            }
        ));

        let err = Config::from_toml("[field]\nmin_size = 5.0\nmax_size = 1.0\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "field.min_size", .. }));

        let err = Config::from_toml("[field]\nlink_max_opacity = 1.5\n").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                field: "field.link_max_opacity",
                ..
            }
        ));

        let err = Config::from_toml("[field]\npalette = []\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "field.palette", .. }));
    }

    #[test]
    fn test_particle_count_ceiling() {
        let err = Config::from_toml("[field]\ncount = 20000\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "field.count", .. }));

        let config = Config::from_toml(&format!("[field]\ncount = {MAX_PARTICLES}\n")).unwrap();
        assert_eq!(config.field.count, MAX_PARTICLES);

        let mut config = Config::default();
        config.field.count = MAX_PARTICLES + 1;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_non_finite_values_rejected() {
        for (text, name) in [
            ("[field]\nmax_size = inf\n", "field.max_size"),
            ("[field]\nmax_rise_secs = inf\n", "field.max_rise_secs"),
            ("[field]\nlink_width = nan\n", "field.link_width"),
            ("[field]\ncompact_breakpoint = inf\n", "field.compact_breakpoint"),
            ("glow = nan\n", "glow"),
        ] {
            match Config::from_toml(text) {
                Err(ConfigError::Invalid { field, .. }) => assert_eq!(field, name),
                other => panic!("{text:?} gave {other:?}"),
            }
        }
    }

    #[test]
    fn test_glow_range() {
        let err = Config::from_toml("glow = 1.5\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "glow", .. }));
        assert_eq!(Config::from_toml("glow = 0.0\n").unwrap().glow, 0.0);
    }

    #[test]
    fn test_syntax_error() {
        assert!(matches!(
            Config::from_toml("speed = ["),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load(Some(&dir.path().join("absent.toml"))).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.speed = AnimationSpeed::Slow;
        config.field.variant = FieldVariant::Embers;
        config.headline.phrases = vec!["HELLO".to_string()];
        config.save(&path).unwrap();

        let loaded = Config::load(Some(&path)).unwrap();
        assert_eq!(loaded, config);
    }
}
