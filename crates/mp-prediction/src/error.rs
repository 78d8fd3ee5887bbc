//! Prediction error types.

use thiserror::Error;

/// Errors from loading or running a prediction model.
#[derive(Debug, Error)]
pub enum PredictionError {
    #[error("model file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid model file: {0}")]
    Format(String),

    #[error("empty scenario input")]
    EmptyInput,

    #[error("input {index} has {got} features, model expects {expected}")]
    DimensionMismatch {
        index: usize,
        expected: usize,
        got: usize,
    },

    #[error("{0}")]
    Other(String),
}

/// Convenience alias for prediction results.
pub type PredictionResult<T> = Result<T, PredictionError>;
