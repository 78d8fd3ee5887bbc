//! Prediction service for daily mining tonnage.
//!
//! Provides the `Predictor` abstraction (numeric feature vectors in, one
//! prediction per vector out), a JSON-serialized linear model loaded at
//! startup, and a `MockPredictor` for tests.

pub mod error;
pub mod linear;
pub mod mock;
pub mod predictor;

pub use error::{PredictionError, PredictionResult};
pub use linear::LinearModel;
pub use mock::MockPredictor;
pub use predictor::{Predictor, predict_scenarios};
