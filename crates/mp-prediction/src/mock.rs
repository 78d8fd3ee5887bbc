//! Mock predictor for testing: deterministic linear response in the truck count.

use std::sync::Mutex;

use crate::error::{PredictionError, PredictionResult};
use crate::predictor::Predictor;

/// A predictor that returns `trucks * per_truck + offset`, or always fails.
pub struct MockPredictor {
    per_truck: f64,
    offset: f64,
    failure: Option<String>,
    calls: Mutex<Vec<Vec<Vec<f64>>>>,
}

impl MockPredictor {
    /// Prediction is `features[0] * per_truck`.
    pub fn trucks_times(per_truck: f64) -> Self {
        Self::linear(per_truck, 0.0)
    }

    pub fn linear(per_truck: f64, offset: f64) -> Self {
        Self {
            per_truck,
            offset,
            failure: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Every call fails with the given message.
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            failure: Some(message.into()),
            ..Self::linear(0.0, 0.0)
        }
    }

    /// Inputs received so far, one entry per `predict` call.
    pub fn calls(&self) -> Vec<Vec<Vec<f64>>> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }
}

impl Predictor for MockPredictor {
    fn predict(&self, features: &[Vec<f64>]) -> PredictionResult<Vec<f64>> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(features.to_vec());
        }
        if let Some(msg) = &self.failure {
            return Err(PredictionError::Other(msg.clone()));
        }
        if features.is_empty() {
            return Err(PredictionError::EmptyInput);
        }
        features
            .iter()
            .enumerate()
            .map(|(index, row)| {
                if row.len() != mp_protocol::FEATURE_COUNT {
                    return Err(PredictionError::DimensionMismatch {
                        index,
                        expected: mp_protocol::FEATURE_COUNT,
                        got: row.len(),
                    });
                }
                Ok(row[0] * self.per_truck + self.offset)
            })
            .collect()
    }

    fn feature_count(&self) -> usize {
        mp_protocol::FEATURE_COUNT
    }

    fn name(&self) -> &str {
        "mock"
    }
}
