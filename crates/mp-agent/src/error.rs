//! Agent error types.

use thiserror::Error;

/// Errors raised while running the conversation agent.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AgentError {
    #[error("agent credential missing: {0}")]
    MissingCredential(String),

    #[error("agent HTTP error: {0}")]
    Http(String),

    #[error("agent authentication failed: {0}")]
    Auth(String),

    #[error("agent API returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("invalid agent API response: {0}")]
    InvalidResponse(String),

    #[error("agent exceeded {0} tool-call rounds without answering")]
    ToolLoopExceeded(usize),

    #[error("agent unavailable: {0}")]
    Unavailable(String),
}

/// Convenience alias for agent results.
pub type AgentResult<T> = Result<T, AgentError>;
