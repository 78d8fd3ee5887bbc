use serde::{Deserialize, Serialize};

use crate::scenario::Scenario;

/// A numeric field lifted from agent text.
///
/// Coercion is best-effort: when the text does not parse as a number the
/// cleaned raw text is kept so callers can tell malformed values apart.
/// Serialized untagged, i.e. as a bare number or a bare string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NumericField<T> {
    Parsed(T),
    Unparsed(String),
}

impl<T: Copy> NumericField<T> {
    pub fn parsed(&self) -> Option<T> {
        match self {
            NumericField::Parsed(v) => Some(*v),
            NumericField::Unparsed(_) => None,
        }
    }
}

/// One ranked configuration suggested by the agent.
///
/// Fields the agent left out of its block are `None` rather than defaulted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trucks: Option<NumericField<i64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub excavators: Option<NumericField<i64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operators: Option<NumericField<i64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weather: Option<NumericField<i64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub predicted_tonnage: Option<NumericField<f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub difference_from_target: Option<NumericField<f64>>,
    pub rationale: String,
}

impl Recommendation {
    /// Build a fully-parsed recommendation from typed values.
    pub fn from_scenario(
        title: impl Into<String>,
        scenario: Scenario,
        predicted_tonnage: f64,
        difference_from_target: f64,
        rationale: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            trucks: Some(NumericField::Parsed(i64::from(scenario.trucks))),
            excavators: Some(NumericField::Parsed(i64::from(scenario.excavators))),
            operators: Some(NumericField::Parsed(i64::from(scenario.operators))),
            weather: Some(NumericField::Parsed(i64::from(scenario.weather.code()))),
            predicted_tonnage: Some(NumericField::Parsed(predicted_tonnage)),
            difference_from_target: Some(NumericField::Parsed(difference_from_target)),
            rationale: rationale.into(),
        }
    }

    pub fn predicted(&self) -> Option<f64> {
        self.predicted_tonnage.as_ref().and_then(NumericField::parsed)
    }

    pub fn difference(&self) -> Option<f64> {
        self.difference_from_target
            .as_ref()
            .and_then(NumericField::parsed)
    }

    /// Checks `difference_from_target == |predicted_tonnage - target|` within
    /// `tolerance`. `None` when either value is missing or unparsed.
    ///
    /// The agent rounds its numbers, so callers should pass a tolerance of
    /// at least the rounding step.
    pub fn difference_matches(&self, target_tonnage: f64, tolerance: f64) -> Option<bool> {
        let predicted = self.predicted()?;
        let difference = self.difference()?;
        Some(((predicted - target_tonnage).abs() - difference).abs() <= tolerance)
    }
}

/// Structured form of one agent answer: control analysis plus ranked recommendations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub target_tonnage: i64,
    pub initial_analysis_text: String,
    pub initial_prediction: f64,
    pub initial_difference: f64,
    /// Ranked by closeness to target; the control scenario may appear.
    pub recommendations: Vec<Recommendation>,
}
