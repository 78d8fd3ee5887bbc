//! HTTP request and response bodies.

use serde::{Deserialize, Serialize};

use crate::analysis::{AnalysisResult, Recommendation};

/// Prefix of the session id derived from a user id.
pub const SESSION_ID_PREFIX: &str = "session_";

/// Derive the session id for a user (`"session_" + user_id`).
pub fn session_id_for(user_id: &str) -> String {
    format!("{SESSION_ID_PREFIX}{user_id}")
}

/// Body of `POST /predict_and_recommend`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictRequest {
    /// Stable user identifier; keys the conversation session.
    pub user_id: String,
    /// Free-form text with the production target and current equipment.
    pub query: String,
}

impl PredictRequest {
    pub fn session_id(&self) -> String {
        session_id_for(&self.user_id)
    }
}

/// Success body of `POST /predict_and_recommend`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictResponse {
    /// Always `"success"`.
    pub status: String,
    pub target_tonnage: i64,
    pub initial_analysis_text: String,
    pub initial_prediction: f64,
    pub initial_difference: f64,
    pub recommendations: Vec<Recommendation>,
}

impl From<AnalysisResult> for PredictResponse {
    fn from(result: AnalysisResult) -> Self {
        Self {
            status: "success".into(),
            target_tonnage: result.target_tonnage,
            initial_analysis_text: result.initial_analysis_text,
            initial_prediction: result.initial_prediction,
            initial_difference: result.initial_difference,
            recommendations: result.recommendations,
        }
    }
}

/// Outcome reported by `DELETE /end_session/{user_id}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionEndStatus {
    /// A session existed and was removed.
    Success,
    /// Nothing to remove; informational, not an error.
    Info,
}

/// Body of `DELETE /end_session/{user_id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionEndResponse {
    pub status: SessionEndStatus,
    pub message: String,
}

impl SessionEndResponse {
    pub fn ended(user_id: &str) -> Self {
        Self {
            status: SessionEndStatus::Success,
            message: format!("session for user_id '{user_id}' ended"),
        }
    }

    pub fn not_found(user_id: &str) -> Self {
        Self {
            status: SessionEndStatus::Info,
            message: format!("no active session for user_id '{user_id}'"),
        }
    }
}

/// Body of `GET /ready`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadinessReport {
    /// Conversation agent (and its credential) initialized.
    pub agent_ready: bool,
    /// Prediction model loaded at startup.
    pub model_ready: bool,
}

impl ReadinessReport {
    pub fn is_ready(&self) -> bool {
        self.agent_ready && self.model_ready
    }
}
