//! Linear regression model serialized as JSON.
//!
//! ```json
//! {
//!   "feature_names": ["trucks", "excavators", "operators", "weather"],
//!   "intercept": 12.5,
//!   "coefficients": [3.1, 6.0, 0.4, 2.2]
//! }
//! ```

use std::path::Path;

use mp_protocol::FEATURE_COUNT;
use serde::{Deserialize, Serialize};

use crate::error::{PredictionError, PredictionResult};
use crate::predictor::Predictor;

/// `prediction = intercept + Σ coefficients[i] * features[i]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearModel {
    /// Informational; when present must match `coefficients` in length.
    #[serde(default)]
    pub feature_names: Vec<String>,
    pub intercept: f64,
    pub coefficients: Vec<f64>,
}

impl LinearModel {
    pub fn new(intercept: f64, coefficients: Vec<f64>) -> PredictionResult<Self> {
        let model = Self {
            feature_names: Vec::new(),
            intercept,
            coefficients,
        };
        model.validate()?;
        Ok(model)
    }

    /// Load and validate a model from a JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> PredictionResult<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        let model = Self::from_json(&contents)?;
        tracing::info!(
            path = %path.display(),
            features = model.coefficients.len(),
            "prediction model loaded"
        );
        Ok(model)
    }

    pub fn from_json(json: &str) -> PredictionResult<Self> {
        let model: Self =
            serde_json::from_str(json).map_err(|e| PredictionError::Format(e.to_string()))?;
        model.validate()?;
        Ok(model)
    }

    fn validate(&self) -> PredictionResult<()> {
        if self.coefficients.len() != FEATURE_COUNT {
            return Err(PredictionError::Format(format!(
                "model has {} coefficients, scenarios have {FEATURE_COUNT} features",
                self.coefficients.len()
            )));
        }
        if !self.feature_names.is_empty() && self.feature_names.len() != self.coefficients.len() {
            return Err(PredictionError::Format(format!(
                "{} feature names for {} coefficients",
                self.feature_names.len(),
                self.coefficients.len()
            )));
        }
        if !self.intercept.is_finite() || self.coefficients.iter().any(|c| !c.is_finite()) {
            return Err(PredictionError::Format("non-finite model parameter".into()));
        }
        Ok(())
    }
}

impl Predictor for LinearModel {
    fn predict(&self, features: &[Vec<f64>]) -> PredictionResult<Vec<f64>> {
        if features.is_empty() {
            return Err(PredictionError::EmptyInput);
        }
        features
            .iter()
            .enumerate()
            .map(|(index, row)| {
                if row.len() != self.coefficients.len() {
                    return Err(PredictionError::DimensionMismatch {
                        index,
                        expected: self.coefficients.len(),
                        got: row.len(),
                    });
                }
                Ok(self.intercept
                    + row
                        .iter()
                        .zip(&self.coefficients)
                        .map(|(x, w)| x * w)
                        .sum::<f64>())
            })
            .collect()
    }

    fn feature_count(&self) -> usize {
        self.coefficients.len()
    }

    fn name(&self) -> &str {
        "linear"
    }
}
