//! Error types for SwipeClean

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SwipeCleanError {
    /// The photo library could not be opened; no catalog is built
    #[error("Photo library access denied: {0}")]
    AccessDenied(String),

    /// An operation was called in a session state that does not allow it
    #[error("Invalid session state: {0}")]
    InvalidState(String),

    /// The batch delete failed; carries the collaborator's message unchanged
    #[error("Deletion failed: {0}")]
    Deletion(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, SwipeCleanError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_deletion_message_passes_through() {
        let err = SwipeCleanError::Deletion("Permission denied (os error 13)".to_string());
        assert_eq!(
            err.to_string(),
            "Deletion failed: Permission denied (os error 13)"
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "missing");
        let err: SwipeCleanError = io_err.into();
        assert!(matches!(err, SwipeCleanError::Io(_)));
        assert!(err.to_string().contains("missing"));
    }
}
