//! Error types for the locker.

use thiserror::Error;

use crate::storage::NameError;

/// Common error type for the locker.
#[derive(Error, Debug)]
pub enum LockerError {
    /// Credentials did not match the configured user.
    ///
    /// Deliberately carries no detail so callers cannot tell a wrong
    /// username from a wrong password.
    #[error("authentication failed")]
    AuthFailure,

    /// No session, or the presented session token is invalid.
    #[error("not authenticated")]
    Unauthenticated,

    /// Caller-supplied file name was rejected by sanitization.
    #[error("invalid file name: {0}")]
    InvalidName(#[from] NameError),

    /// Resource not found.
    #[error("{0} not found")]
    NotFound(String),

    /// Malformed request (missing form field, unreadable upload, ...).
    #[error("bad request: {0}")]
    BadRequest(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Result type alias for locker operations.
pub type Result<T> = std::result::Result<T, LockerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_failure_display_has_no_detail() {
        let err = LockerError::AuthFailure;
        assert_eq!(err.to_string(), "authentication failed");
    }

    #[test]
    fn test_invalid_name_from_name_error() {
        let err: LockerError = NameError::ParentReference.into();
        assert!(matches!(err, LockerError::InvalidName(NameError::ParentReference)));
        assert!(err.to_string().starts_with("invalid file name"));
    }

    #[test]
    fn test_not_found_error_display() {
        let err = LockerError::NotFound("file".to_string());
        assert_eq!(err.to_string(), "file not found");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: LockerError = io_err.into();
        assert!(matches!(err, LockerError::Io(_)));
        assert!(err.to_string().contains("denied"));
    }

    #[test]
    fn test_config_error_display() {
        let err = LockerError::Config("session_secret is not set".to_string());
        assert_eq!(
            err.to_string(),
            "configuration error: session_secret is not set"
        );
    }
}
