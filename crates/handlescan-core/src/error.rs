//! Core error types for Handlescan.
//!
//! Each subsystem crate defines its own error enum; this module holds the
//! errors that belong to shared concerns (validation of inputs, config).

use thiserror::Error;

/// Central error type for shared Handlescan operations.
#[derive(Error, Debug)]
pub enum HandlescanError {
    /// Configuration errors (file loading, parsing, validation)
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Validation errors (invalid handle, bad identifiers)
    #[error("validation error: {0}")]
    Validation(String),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to determine config directory path
    #[error("could not determine config directory (XDG base directories not available)")]
    NoConfigDir,

    /// Config file not found at an explicitly requested path
    #[error("config file not found at {path}")]
    NotFound {
        /// Path where config was expected
        path: String,
    },

    /// Failed to parse TOML
    #[error("failed to parse config TOML: {0}")]
    ParseError(#[from] toml::de::Error),

    /// I/O error reading config
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid configuration value
    #[error("invalid config value for {field}: {reason}")]
    InvalidValue {
        /// Field name
        field: String,
        /// Reason for invalidity
        reason: String,
    },
}

/// Result type alias using `HandlescanError`.
pub type Result<T> = std::result::Result<T, HandlescanError>;

/// Result type alias for configuration operations.
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = HandlescanError::Validation("handle too short".to_string());
        assert_eq!(err.to_string(), "validation error: handle too short");

        let err = ConfigError::InvalidValue {
            field: "probing.timeout_ms".to_string(),
            reason: "must be greater than zero".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "invalid config value for probing.timeout_ms: must be greater than zero"
        );
    }

    #[test]
    fn test_error_from_config() {
        let err: HandlescanError = ConfigError::NoConfigDir.into();
        assert!(matches!(err, HandlescanError::Config(_)));
    }
}
