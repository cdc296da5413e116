//! Configuration structures for deserialisation.
//!
//! These structures map directly to the JSON configuration file format.
//! Every section is optional; missing values take the defaults below.

use std::path::PathBuf;

use serde::Deserialize;

use crate::error::ConfigError;

/// Root configuration structure.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Optional JSON schema reference (ignored during parsing).
    #[serde(rename = "$schema", default)]
    _schema: Option<String>,

    /// Optional comment field (ignored during parsing).
    #[serde(rename = "_comment", default)]
    _comment: Option<String>,

    /// Part template new documents are created from.
    #[serde(default)]
    pub template_path: Option<PathBuf>,

    /// Shape session settings.
    #[serde(default)]
    pub session: SessionConfig,

    /// ASCII preview settings.
    #[serde(default)]
    pub render: RenderConfig,

    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any validation checks fail.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |message: String| Err(ConfigError::ValidationError { message });

        if !self.render.scale.is_finite() || self.render.scale <= 0.0 {
            return invalid(format!(
                "render.scale must be greater than 0, got {}",
                self.render.scale
            ));
        }
        if self.render.max_width < MIN_RENDER_WIDTH {
            return invalid(format!(
                "render.max_width must be at least {MIN_RENDER_WIDTH}, got {}",
                self.render.max_width
            ));
        }
        if self.render.max_height < MIN_RENDER_HEIGHT {
            return invalid(format!(
                "render.max_height must be at least {MIN_RENDER_HEIGHT}, got {}",
                self.render.max_height
            ));
        }

        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.logging.level.to_lowercase().as_str()) {
            return invalid(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_levels.join(", ")
            ));
        }
        Ok(())
    }
}

/// Smallest preview canvas width accepted in the configuration.
pub const MIN_RENDER_WIDTH: usize = 10;

/// Smallest preview canvas height accepted in the configuration.
pub const MIN_RENDER_HEIGHT: usize = 5;

/// Shape session configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SessionConfig {
    /// Start in stacking mode, so consecutive solids share one document.
    #[serde(default)]
    pub stack_by_default: bool,
}

/// ASCII preview configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RenderConfig {
    /// Characters per millimeter.
    #[serde(default = "default_scale")]
    pub scale: f64,

    /// Maximum canvas width in characters.
    #[serde(default = "default_max_width")]
    pub max_width: usize,

    /// Maximum canvas height in lines.
    #[serde(default = "default_max_height")]
    pub max_height: usize,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            scale: default_scale(),
            max_width: default_max_width(),
            max_height: default_max_height(),
        }
    }
}

const fn default_scale() -> f64 {
    2.0
}

const fn default_max_width() -> usize {
    80
}

const fn default_max_height() -> usize {
    40
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "warn".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_minimal_config() {
        let config: Config = serde_json::from_str("{}").unwrap();
        assert!(config.validate().is_ok());
        assert!(config.template_path.is_none());
        assert!(!config.session.stack_by_default);
    }

    #[test]
    fn parse_full_config() {
        let json = r#"{
            "$schema": "https://json-schema.org/draft/2020-12/schema",
            "_comment": "Test config",
            "template_path": "C:/templates/Part.prtdot",
            "session": { "stack_by_default": true },
            "render": { "scale": 1.5, "max_width": 120, "max_height": 60 },
            "logging": { "level": "debug" }
        }"#;

        let config: Config = serde_json::from_str(json).unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(
            config.template_path,
            Some(PathBuf::from("C:/templates/Part.prtdot"))
        );
        assert!(config.session.stack_by_default);
        assert!((config.render.scale - 1.5).abs() < f64::EPSILON);
        assert_eq!(config.render.max_width, 120);
        assert_eq!(config.render.max_height, 60);
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn render_config_defaults() {
        let config = RenderConfig::default();
        assert!((config.scale - 2.0).abs() < f64::EPSILON);
        assert_eq!(config.max_width, 80);
        assert_eq!(config.max_height, 40);
    }

    #[test]
    fn logging_config_defaults() {
        assert_eq!(LoggingConfig::default().level, "warn");
    }

    #[test]
    fn reject_bad_render_settings() {
        for json in [
            r#"{ "render": { "scale": 0 } }"#,
            r#"{ "render": { "scale": -2.0 } }"#,
            r#"{ "render": { "max_width": 4 } }"#,
            r#"{ "render": { "max_height": 2 } }"#,
        ] {
            let config: Config = serde_json::from_str(json).unwrap();
            assert!(config.validate().is_err(), "{json} should be rejected");
        }
    }

    #[test]
    fn reject_unknown_log_level() {
        let config: Config = serde_json::from_str(r#"{ "logging": { "level": "loud" } }"#).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn reject_unknown_fields() {
        let result: Result<Config, _> = serde_json::from_str(r#"{ "templates": {} }"#);
        assert!(result.is_err());

        let result: Result<Config, _> =
            serde_json::from_str(r#"{ "session": { "stacking": true } }"#);
        assert!(result.is_err());
    }
}
