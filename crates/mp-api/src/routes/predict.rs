//! Prediction endpoint.

use axum::Json;
use axum::extract::State;

use mp_protocol::{PredictRequest, PredictResponse};

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// POST /predict_and_recommend: run the agent on a free-text query and
/// return the parsed analysis.
pub async fn predict_and_recommend(
    State(state): State<AppState>,
    Json(request): Json<PredictRequest>,
) -> ApiResult<Json<PredictResponse>> {
    if request.user_id.trim().is_empty() {
        return Err(ApiError::BadRequest("user_id must not be empty".into()));
    }

    let Some(agent) = state.agent.clone() else {
        return Err(ApiError::ServiceUnavailable(
            "conversation agent is not initialized (check GEMINI_API_KEY)".into(),
        ));
    };
    if state.predictor.is_none() {
        return Err(ApiError::ServiceUnavailable(
            "prediction model is not loaded".into(),
        ));
    }

    tracing::info!(user_id = %request.user_id, "prediction request received");
    let response = state
        .orchestrator()
        .process(agent.as_ref(), &request)
        .await?;
    Ok(Json(response))
}
