//! The `Predictor` trait and scenario helpers.

use mp_protocol::{PredictionRecord, Scenario};

use crate::error::PredictionResult;

/// A loaded tonnage model. Stateless and synchronous.
pub trait Predictor: Send + Sync {
    /// One prediction per input feature vector, in input order.
    fn predict(&self, features: &[Vec<f64>]) -> PredictionResult<Vec<f64>>;

    /// Number of features each input vector must have.
    fn feature_count(&self) -> usize;

    /// Short identifier for logs.
    fn name(&self) -> &str;
}

/// Run typed scenarios through a predictor.
pub fn predict_scenarios(
    predictor: &dyn Predictor,
    scenarios: &[Scenario],
) -> PredictionResult<Vec<PredictionRecord>> {
    let features: Vec<Vec<f64>> = scenarios.iter().map(Scenario::features).collect();
    let predictions = predictor.predict(&features)?;
    Ok(scenarios
        .iter()
        .zip(predictions)
        .map(|(scenario, predicted_tonnage)| PredictionRecord {
            scenario: *scenario,
            predicted_tonnage,
        })
        .collect())
}
