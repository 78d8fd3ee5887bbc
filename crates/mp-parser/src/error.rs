//! Parser error types.

use thiserror::Error;

/// Reasons agent text could not be turned into an analysis result.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// The text does not follow the Strict Response Format at all.
    #[error("malformed agent response: {0}")]
    MalformedFormat(String),

    /// Required header values are absent or zero.
    #[error("incomplete analysis: {0}")]
    IncompleteAnalysis(String),
}

/// Convenience alias for parser results.
pub type ParseResult<T> = Result<T, ParseError>;
