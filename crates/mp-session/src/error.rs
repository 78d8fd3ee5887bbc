//! Session store error types.

use thiserror::Error;

/// Errors from session store operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("session already exists: {0}")]
    AlreadyExists(String),

    #[error("session not found: {0}")]
    NotFound(String),
}

/// Convenience alias for session store results.
pub type SessionResult<T> = Result<T, SessionError>;
