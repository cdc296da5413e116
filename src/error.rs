//! Error types for cad-prompt-mcp.
//!
//! Prompt parsing never fails; an unrecognised prompt is `None`. The types
//! here cover loading configuration and driving a shape session.

use std::path::PathBuf;

use thiserror::Error;

use crate::cad::HostError;
use crate::prompt::UNKNOWN_SHAPE_HELP;

/// Errors that can occur during configuration operations.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Configuration file could not be read.
    #[error("failed to read configuration file: {path}")]
    ReadError {
        /// Path to the configuration file.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// Configuration file could not be parsed.
    #[error("failed to parse configuration file: {path}")]
    ParseError {
        /// Path to the configuration file.
        path: PathBuf,
        /// The underlying JSON error.
        #[source]
        source: serde_json::Error,
    },

    /// Configuration file not found.
    #[error("configuration file not found: {path}")]
    NotFound {
        /// Path where the configuration file was expected.
        path: PathBuf,
    },

    /// Configuration validation failed.
    #[error("configuration validation failed: {message}")]
    ValidationError {
        /// Description of the validation failure.
        message: String,
    },
}

/// Errors raised while building shapes in a session.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SessionError {
    /// The prompt named no known shape.
    #[error("{}", UNKNOWN_SHAPE_HELP)]
    UnknownShape,

    /// A plane was requested before any shape exists.
    #[error("Create a shape first, then add a plane")]
    NoDocument,

    /// The stack height was moved to a plane that does not exist.
    #[error("No active plane - create a plane first")]
    NoActivePlane,

    /// A shape parameter is unusable.
    #[error("Invalid {name}: {message}")]
    InvalidDimension {
        /// Parameter name.
        name: String,
        /// Description of what's wrong.
        message: String,
    },

    /// The CAD host rejected an operation.
    #[error(transparent)]
    Host(#[from] HostError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_error_display() {
        let error = ConfigError::NotFound {
            path: PathBuf::from("/path/to/config.json"),
        };
        let msg = error.to_string();
        assert!(msg.contains("not found"));
        assert!(msg.contains("config.json"));
    }

    #[test]
    fn validation_error_display() {
        let error = ConfigError::ValidationError {
            message: "invalid setting".to_string(),
        };
        let msg = error.to_string();
        assert!(msg.contains("invalid setting"));
    }

    #[test]
    fn unknown_shape_shows_help_verbatim() {
        assert_eq!(SessionError::UnknownShape.to_string(), UNKNOWN_SHAPE_HELP);
    }

    #[test]
    fn host_errors_pass_through() {
        let error: SessionError = HostError::NoDocument.into();
        assert_eq!(error.to_string(), "No active document");
    }
}
