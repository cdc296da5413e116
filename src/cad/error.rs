//! Error types for CAD host operations.

use thiserror::Error;

/// Result type for CAD host operations.
pub type HostResult<T> = Result<T, HostError>;

/// Errors raised by a [`super::CadHost`].
#[derive(Debug, Error, Clone, PartialEq)]
pub enum HostError {
    /// An operation needs an open document and there is none.
    #[error("No active document")]
    NoDocument,

    /// A sketch was opened while another one is still being edited.
    #[error("Sketch already open: {sketch}")]
    SketchAlreadyOpen {
        /// Name of the sketch currently open.
        sketch: String,
    },

    /// An entity was added, or a sketch closed, with no sketch open.
    #[error("No sketch is open")]
    SketchNotOpen,

    /// A feature was requested with no closed sketch to consume.
    #[error("No closed sketch profile available for {feature}")]
    NoProfile {
        /// Feature that needed the profile.
        feature: &'static str,
    },

    /// A parameter value the host cannot accept.
    #[error("Invalid parameter '{name}': {message}")]
    InvalidParameter {
        /// Parameter name.
        name: String,
        /// Description of what's wrong.
        message: String,
    },

    /// The named plane does not exist in the active document.
    #[error("Plane not found: {name}")]
    PlaneNotFound {
        /// Plane name that was requested.
        name: String,
    },
}

impl HostError {
    /// Creates an invalid parameter error.
    pub fn invalid_parameter(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name: name.into(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_parameter_display() {
        let error = HostError::invalid_parameter("depth", "must be positive");
        assert_eq!(error.to_string(), "Invalid parameter 'depth': must be positive");
    }

    #[test]
    fn no_profile_names_feature() {
        let error = HostError::NoProfile { feature: "extrude" };
        assert!(error.to_string().contains("extrude"));
    }
}
