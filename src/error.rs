//! Custom error types for vaultsmith
//!
//! This module defines the error hierarchy for the library using thiserror
//! for ergonomic error definitions.

use thiserror::Error;

/// The main error type for vaultsmith operations
#[derive(Error, Debug)]
pub enum VaultsmithError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),

    /// Invalid caller input (bad iteration count, missing blueprint field, ...)
    #[error("Validation error: {0}")]
    Validation(String),

    /// The envelope is not an `enc:v1` envelope this codec understands
    #[error("Envelope format error: {0}")]
    Format(String),

    /// GCM tag verification failed.
    ///
    /// Carries no detail on purpose: wrong passphrase and tampered data are
    /// indistinguishable to the caller.
    #[error("Decryption failed: wrong passphrase or tampered envelope")]
    Authentication,

    /// Low-level cipher or key derivation failures
    #[error("Encryption error: {0}")]
    Encryption(String),

    /// Image vault errors (missing markers, empty vault)
    #[error("Vault error: {0}")]
    Vault(String),

    /// Entity not found errors
    #[error("{entity_type} not found: {identifier}")]
    NotFound {
        entity_type: &'static str,
        identifier: String,
    },
}

impl VaultsmithError {
    /// Create a "not found" error for signals
    pub fn signal_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Signal",
            identifier: identifier.into(),
        }
    }

    /// Create a format error
    pub fn format(msg: impl Into<String>) -> Self {
        Self::Format(msg.into())
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this is an envelope format error
    pub fn is_format(&self) -> bool {
        matches!(self, Self::Format(_))
    }

    /// Check if this is an authentication failure
    pub fn is_authentication(&self) -> bool {
        matches!(self, Self::Authentication)
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

// Implement From traits for common error types

impl From<std::io::Error> for VaultsmithError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for VaultsmithError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

/// Result type alias for vaultsmith operations
pub type VaultsmithResult<T> = Result<T, VaultsmithError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = VaultsmithError::Config("test error".into());
        assert_eq!(err.to_string(), "Configuration error: test error");
    }

    #[test]
    fn test_not_found_error() {
        let err = VaultsmithError::signal_not_found("s042");
        assert_eq!(err.to_string(), "Signal not found: s042");
        assert!(err.is_not_found());
    }

    #[test]
    fn test_authentication_error_has_no_detail() {
        let err = VaultsmithError::Authentication;
        assert!(err.is_authentication());
        assert!(!err.is_format());
        assert_eq!(
            err.to_string(),
            "Decryption failed: wrong passphrase or tampered envelope"
        );
    }

    #[test]
    fn test_format_error() {
        let err = VaultsmithError::format("missing enc:v1: prefix");
        assert!(err.is_format());
        assert_eq!(
            err.to_string(),
            "Envelope format error: missing enc:v1: prefix"
        );
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: VaultsmithError = io_err.into();
        assert!(matches!(err, VaultsmithError::Io(_)));
    }

    #[test]
    fn test_from_json_error() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: VaultsmithError = json_err.into();
        assert!(matches!(err, VaultsmithError::Json(_)));
    }
}
