//! `predict_mining_target`: the tool the agent calls to get tonnage predictions.
//!
//! Failures are reported as `ERROR: ...` text in the tool result so the model
//! can explain them in prose; they never abort the agent run.

use std::sync::Arc;

use serde::Deserialize;
use serde_json::{Value, json};

use mp_prediction::{Predictor, predict_scenarios};
use mp_protocol::{FEATURE_COUNT, Scenario};

/// Tool name as exposed to the model.
pub const PREDICTION_TOOL_NAME: &str = "predict_mining_target";

/// Prefix of a successful tool result.
pub const RESULTS_PREFIX: &str = "PREDICTION_RESULTS:";

#[derive(Debug, Deserialize)]
struct ToolArgs {
    scenarios: Vec<Vec<f64>>,
}

/// Wraps the prediction model as an agent tool.
#[derive(Clone)]
pub struct PredictionTool {
    predictor: Option<Arc<dyn Predictor>>,
}

impl PredictionTool {
    /// `None` means the model failed to load; every call then reports an error.
    pub fn new(predictor: Option<Arc<dyn Predictor>>) -> Self {
        Self { predictor }
    }

    pub fn name(&self) -> &'static str {
        PREDICTION_TOOL_NAME
    }

    pub fn description(&self) -> &'static str {
        "Predict daily mining tonnage for one or more scenarios. Each scenario is \
         [trucks, excavators, operators, weather] where weather is 0=Light Rain, \
         1=Cloudy, 2=Sunny."
    }

    /// JSON Schema for the tool arguments.
    pub fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "scenarios": {
                    "type": "array",
                    "description": "Scenarios as [trucks, excavators, operators, weather].",
                    "items": {
                        "type": "array",
                        "items": { "type": "number" },
                        "minItems": 4,
                        "maxItems": 4
                    }
                }
            },
            "required": ["scenarios"]
        })
    }

    /// Execute with raw JSON-encoded arguments (as sent by the model).
    pub fn execute_raw(&self, arguments: &str) -> String {
        match serde_json::from_str::<Value>(arguments) {
            Ok(args) => self.execute(&args),
            Err(e) => format!("ERROR: tool arguments are not valid JSON: {e}"),
        }
    }

    /// Execute with parsed arguments `{"scenarios": [[t, e, o, w], ...]}`.
    pub fn execute(&self, args: &Value) -> String {
        let Some(predictor) = &self.predictor else {
            tracing::warn!("prediction tool called without a loaded model");
            return "ERROR: prediction model is not loaded.".into();
        };

        let rows = match ToolArgs::deserialize(args) {
            Ok(a) => a.scenarios,
            Err(e) => return format!("ERROR: invalid tool arguments: {e}"),
        };
        if rows.is_empty() {
            return "ERROR: empty scenario input.".into();
        }
        if predictor.feature_count() != FEATURE_COUNT {
            tracing::warn!(
                model = predictor.name(),
                features = predictor.feature_count(),
                "model does not take scenario features"
            );
            return format!(
                "ERROR: prediction model expects {} features, scenarios have {FEATURE_COUNT}.",
                predictor.feature_count()
            );
        }

        let mut scenarios = Vec::with_capacity(rows.len());
        for (i, row) in rows.iter().enumerate() {
            match Scenario::from_features(row) {
                Ok(scenario) => scenarios.push(scenario),
                Err(e) => return format!("ERROR: invalid scenario {}: {e}.", i + 1),
            }
        }

        let records = match predict_scenarios(&**predictor, &scenarios) {
            Ok(r) => r,
            Err(e) => {
                tracing::warn!(error = %e, model = predictor.name(), "prediction failed");
                return format!("ERROR: prediction failed: {e}.");
            }
        };

        let results: Vec<Value> = records
            .iter()
            .enumerate()
            .map(|(i, record)| {
                let scenario = &record.scenario;
                json!({
                    "id": i + 1,
                    "trucks": scenario.trucks,
                    "excavators": scenario.excavators,
                    "operators": scenario.operators,
                    "weather": scenario.weather.code(),
                    "predicted_tonnage": round2(record.predicted_tonnage),
                })
            })
            .collect();

        tracing::debug!(scenarios = results.len(), "prediction tool executed");
        format!("{RESULTS_PREFIX} {}", Value::Array(results))
    }
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}
