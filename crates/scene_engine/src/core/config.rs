//! # Unified Configuration System
//!
//! All configuration structures for the engine live here. Every type is
//! serializable (TOML or RON through [`Config`]) and provides defaults, so a
//! missing or partial file still yields a usable configuration.
//!
//! ## Configuration Categories
//!
//! - **Engine Config**: logging and debug features
//! - **Scene Config**: naming of the root and of unnamed children
//! - **Time Config**: frame clock clamping and fixed stepping

use serde::{Serialize, Deserialize};
use std::cmp::Ordering;

// Re-export from the config module for convenience
pub use crate::config::{Config, ConfigError};

/// # Engine Configuration
///
/// Core engine behavior that affects every subsystem.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Log level for the engine (`RUST_LOG` overrides it)
    pub log_level: String,
    /// Raises the log filter to at least `debug`
    pub debug_mode: bool,
}

impl EngineConfig {
    /// Create a new engine configuration
    pub fn new() -> Self {
        Self {
            log_level: "info".to_string(),
            debug_mode: false,
        }
    }

    /// Set log level
    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = level.into();
        self
    }

    /// Enable debug mode
    pub fn with_debug(mut self, enabled: bool) -> Self {
        self.debug_mode = enabled;
        self
    }

    /// Log filter to install: `log_level`, raised to `debug` in debug mode
    ///
    /// Unparseable levels are returned unchanged for `validate()` to report.
    pub fn effective_log_level(&self) -> &str {
        let raise = self.debug_mode
            && self
                .log_level
                .parse::<log::LevelFilter>()
                .is_ok_and(|level| level < log::LevelFilter::Debug);
        if raise {
            "debug"
        } else {
            &self.log_level
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// # Scene Configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    /// Name given to the scene's root node
    pub root_name: String,
    /// Name given to children created without an explicit name
    pub default_node_name: String,
}

impl SceneConfig {
    /// Create a new scene configuration
    pub fn new() -> Self {
        Self {
            root_name: "Root".to_string(),
            default_node_name: "Nameless".to_string(),
        }
    }

    /// Set the root node name
    pub fn with_root_name(mut self, name: impl Into<String>) -> Self {
        self.root_name = name.into();
        self
    }
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// # Time Configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeConfig {
    /// Upper bound for a single frame step in seconds (guards against stalls)
    pub max_delta_time: f32,
    /// Step used by fixed-step drivers, in seconds
    pub fixed_timestep: f32,
}

impl TimeConfig {
    /// Create a new time configuration
    pub fn new() -> Self {
        Self {
            max_delta_time: 0.25,
            fixed_timestep: 1.0 / 60.0,
        }
    }

    /// Set fixed timestep
    pub fn with_fixed_timestep(mut self, step: f32) -> Self {
        self.fixed_timestep = step;
        self
    }
}

impl Default for TimeConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// # Complete Application Configuration
///
/// Top-level configuration that encompasses all engine subsystems.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApplicationConfig {
    /// Engine core configuration
    pub engine: EngineConfig,
    /// Scene graph configuration
    pub scene: SceneConfig,
    /// Frame clock configuration
    pub time: TimeConfig,
}

impl ApplicationConfig {
    /// Validate the entire configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.scene.root_name.is_empty() {
            return Err(ConfigError::Invalid("Root name cannot be empty".to_string()));
        }

        if !is_positive(self.time.max_delta_time) {
            return Err(ConfigError::Invalid(format!(
                "max_delta_time must be positive, got {}",
                self.time.max_delta_time
            )));
        }

        if !is_positive(self.time.fixed_timestep) || self.time.fixed_timestep > self.time.max_delta_time {
            return Err(ConfigError::Invalid(format!(
                "fixed_timestep must be in (0, {}], got {}",
                self.time.max_delta_time, self.time.fixed_timestep
            )));
        }

        if self.engine.log_level.parse::<log::LevelFilter>().is_err() {
            return Err(ConfigError::Invalid(format!("Unknown log level: {}", self.engine.log_level)));
        }

        Ok(())
    }
}

impl Config for ApplicationConfig {}

/// Strictly greater than zero; NaN is not
fn is_positive(value: f32) -> bool {
    value.partial_cmp(&0.0) == Some(Ordering::Greater)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(file_name: &str) -> String {
        std::env::temp_dir()
            .join(format!("scene_engine_{}_{}", std::process::id(), file_name))
            .to_string_lossy()
            .into_owned()
    }

    #[test]
    fn test_default_config_is_valid() {
        assert!(ApplicationConfig::default().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = ApplicationConfig::default();
        config.scene.root_name.clear();
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        let mut config = ApplicationConfig::default();
        config.time.fixed_timestep = 1.0;
        assert!(config.validate().is_err());

        let mut config = ApplicationConfig::default();
        config.time.max_delta_time = f32::NAN;
        assert!(config.validate().is_err());

        let mut config = ApplicationConfig::default();
        config.time.fixed_timestep = 0.0;
        assert!(config.validate().is_err());

        let config = ApplicationConfig {
            engine: EngineConfig::new().with_log_level("loud"),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_debug_mode_raises_log_level() {
        let quiet = EngineConfig::new().with_log_level("warn");
        assert_eq!(quiet.effective_log_level(), "warn");
        assert_eq!(quiet.with_debug(true).effective_log_level(), "debug");

        let verbose = EngineConfig::new().with_log_level("trace").with_debug(true);
        assert_eq!(verbose.effective_log_level(), "trace");

        let unknown = EngineConfig::new().with_log_level("loud").with_debug(true);
        assert_eq!(unknown.effective_log_level(), "loud");
    }

    #[test]
    fn test_toml_round_trip() {
        let path = temp_path("config.toml");
        let config = ApplicationConfig {
            scene: SceneConfig::new().with_root_name("World"),
            time: TimeConfig::new().with_fixed_timestep(0.02),
            ..Default::default()
        };

        config.save_to_file(&path).unwrap();
        let loaded = ApplicationConfig::load_from_file(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(loaded, config);
    }

    #[test]
    fn test_ron_round_trip() {
        let path = temp_path("config.ron");
        let config = ApplicationConfig {
            engine: EngineConfig::new().with_log_level("debug").with_debug(true),
            ..Default::default()
        };

        config.save_to_file(&path).unwrap();
        let loaded = ApplicationConfig::load_from_file(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(loaded, config);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: ApplicationConfig = toml::from_str("[scene]\nroot_name = \"Stage\"\n").unwrap();
        assert_eq!(config.scene.root_name, "Stage");
        assert_eq!(config.scene.default_node_name, "Nameless");
        assert_eq!(config.time, TimeConfig::default());
    }

    #[test]
    fn test_missing_file_falls_back_to_default() {
        let path = temp_path("does_not_exist.toml");
        let config = ApplicationConfig::load_or_default(&path).unwrap();
        assert_eq!(config, ApplicationConfig::default());
    }

    #[test]
    fn test_unsupported_extension() {
        let result = ApplicationConfig::default().save_to_file("config.json");
        assert!(matches!(result, Err(ConfigError::UnsupportedFormat(_))));
    }
}
