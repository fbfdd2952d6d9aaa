//! Error types for the RC filter chip.
//!
//! The tick path never fails: anomalies there are corrected in-band by the
//! filter model. [`RcFilterError`] covers everything around it: chip
//! registration against a host, configuration, engineering-value parsing and
//! the sample stream used by the CLI.

use thiserror::Error;

/// Result type alias using [`RcFilterError`].
pub type Result<T> = std::result::Result<T, RcFilterError>;

/// Unified error type for all chip operations.
#[derive(Error, Debug)]
pub enum RcFilterError {
    // ============ Configuration Errors ============
    /// Invalid filter configuration
    #[error("Invalid filter configuration: {message}")]
    InvalidConfig { message: String },

    /// Component value that could not be parsed
    #[error("Invalid component value '{value}' for {component}")]
    InvalidComponentValue { component: String, value: String },

    // ============ Host Registration Errors ============
    /// Name the host cannot accept (empty or containing NUL)
    #[error("Invalid host name '{name}'")]
    InvalidName { name: String },

    /// Pin registered twice
    #[error("Duplicate pin name '{name}'")]
    DuplicatePin { name: String },

    /// Attribute registered twice
    #[error("Duplicate attribute name '{name}'")]
    DuplicateAttribute { name: String },

    /// Pin not known to the host
    #[error("Pin '{name}' not found")]
    UnknownPin { name: String },

    /// Attribute not known to the host
    #[error("Attribute '{name}' not found")]
    UnknownAttribute { name: String },

    /// Timer request the host rejected
    #[error("Invalid timer: {message}")]
    InvalidTimer { message: String },

    // ============ I/O Errors ============
    /// Error reading input samples
    #[error("Sample input error: {message}")]
    StreamInput { message: String },

    /// Error writing output samples
    #[error("Sample output error: {message}")]
    StreamOutput { message: String },
}

impl RcFilterError {
    /// Create an invalid configuration error
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    /// Create an invalid component value error
    pub fn invalid_component_value(component: impl Into<String>, value: impl Into<String>) -> Self {
        Self::InvalidComponentValue {
            component: component.into(),
            value: value.into(),
        }
    }

    /// Create an invalid timer error
    pub fn invalid_timer(message: impl Into<String>) -> Self {
        Self::InvalidTimer {
            message: message.into(),
        }
    }
}
