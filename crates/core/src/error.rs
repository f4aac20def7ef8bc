//! Error types for the hardware channel
//!
//! Every operation on a tag session may fail. We use `thiserror` for
//! automatic `Display` and `Error` trait implementations.

use std::io;
use thiserror::Error;

/// Result type alias for tag session operations
pub type SessionResult<T> = std::result::Result<T, SessionError>;

/// Failure reported by a tag session
///
/// Errors are `Clone` so test doubles can script the same failure for
/// several calls.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    /// I/O failure on the radio link
    #[error("I/O error: {0}")]
    Io(String),

    /// Operation requires an open connection
    #[error("Tag is not connected")]
    NotConnected,

    /// Tag left the field mid-operation
    #[error("Tag was lost")]
    TagLost,

    /// Tag refuses writes
    #[error("Tag is read-only")]
    ReadOnly,

    /// Requested operation is not supported by this technology
    #[error("Unsupported operation: {0}")]
    Unsupported(String),
}

impl SessionError {
    /// Create an I/O error from any message
    pub fn io(msg: impl Into<String>) -> Self {
        SessionError::Io(msg.into())
    }
}

impl From<io::Error> for SessionError {
    fn from(e: io::Error) -> Self {
        SessionError::Io(e.to_string())
    }
}
