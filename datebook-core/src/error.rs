//! Error types for datebook.

use thiserror::Error;

/// Errors that can occur in datebook operations.
///
/// Store mutations never surface these: storage failures are logged and the
/// in-memory state stays authoritative. They are returned from configuration
/// loading, the storage backends themselves and the editor form boundary.
#[derive(Error, Debug)]
pub enum DatebookError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid event form: {0}")]
    InvalidForm(String),

    #[error("Invalid date '{0}'")]
    InvalidDate(String),

    #[error("Unknown calendar view '{0}'")]
    UnknownView(String),
}

impl From<serde_json::Error> for DatebookError {
    fn from(e: serde_json::Error) -> Self {
        DatebookError::Serialization(e.to_string())
    }
}

/// Result type alias for datebook operations.
pub type DatebookResult<T> = Result<T, DatebookError>;
