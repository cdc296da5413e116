//! Configuration file loading and parsing.
//!
//! # Configuration File Locations
//!
//! 1. Path given as the `CONFIG_FILE` CLI argument
//! 2. Default location:
//!    - **Linux/macOS:** `~/.cad-prompt-mcp/config.json`
//!    - **Windows:** `%USERPROFILE%\.cad-prompt-mcp\config.json`
//!
//! An explicit path must exist. A missing default file is not an error;
//! built-in defaults are used instead.

mod settings;

pub use settings::{
    Config, LoggingConfig, RenderConfig, SessionConfig, MIN_RENDER_HEIGHT, MIN_RENDER_WIDTH,
};

use std::path::{Path, PathBuf};

use crate::error::ConfigError;

/// Returns the default configuration directory.
#[must_use]
pub fn default_config_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|p| p.join(".cad-prompt-mcp"))
}

/// Returns the platform-specific default configuration file path.
#[must_use]
pub fn default_config_path() -> Option<PathBuf> {
    default_config_dir().map(|p| p.join("config.json"))
}

/// Loads and validates the configuration file at `path`, or at the default
/// location when `path` is `None`.
///
/// # Errors
///
/// Returns an error if:
/// - The configuration file cannot be found
/// - The file cannot be read
/// - The JSON is malformed
/// - A value fails validation
pub fn load_config(path: Option<&Path>) -> Result<Config, ConfigError> {
    let config_path = match path {
        Some(p) => p.to_path_buf(),
        None => default_config_path().ok_or_else(|| ConfigError::NotFound {
            path: PathBuf::from("<default config path>"),
        })?,
    };

    if !config_path.exists() {
        return Err(ConfigError::NotFound { path: config_path });
    }

    let contents = std::fs::read_to_string(&config_path).map_err(|e| ConfigError::ReadError {
        path: config_path.clone(),
        source: e,
    })?;

    let config: Config = serde_json::from_str(&contents).map_err(|e| ConfigError::ParseError {
        path: config_path.clone(),
        source: e,
    })?;

    config.validate()?;
    tracing::debug!(path = %config_path.display(), "Loaded configuration");

    Ok(config)
}

/// Like [`load_config`], but a missing file at the default location yields
/// the built-in defaults.
///
/// # Errors
///
/// Returns an error if an explicit path is missing, or if any existing
/// file cannot be read, parsed or validated.
pub fn load_config_or_default(path: Option<&Path>) -> Result<Config, ConfigError> {
    match load_config(path) {
        Err(ConfigError::NotFound { .. }) if path.is_none() => Ok(Config::default()),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_path_is_under_home() {
        let path = default_config_path().unwrap();
        assert!(path.ends_with(".cad-prompt-mcp/config.json"));
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.json");
        assert!(matches!(
            load_config_or_default(Some(&path)),
            Err(ConfigError::NotFound { .. })
        ));
    }

    #[test]
    fn loads_and_validates_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{ "session": { "stack_by_default": true } }"#).unwrap();
        let config = load_config(Some(&path)).unwrap();
        assert!(config.session.stack_by_default);

        std::fs::write(&path, r#"{ "render": { "scale": 0 } }"#).unwrap();
        assert!(matches!(
            load_config(Some(&path)),
            Err(ConfigError::ValidationError { .. })
        ));

        std::fs::write(&path, "{ not json").unwrap();
        assert!(matches!(
            load_config(Some(&path)),
            Err(ConfigError::ParseError { .. })
        ));
    }
}
