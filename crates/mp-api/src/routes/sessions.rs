//! Session lifecycle endpoint.

use axum::Json;
use axum::extract::{Path, State};

use mp_protocol::SessionEndResponse;

use crate::state::AppState;

/// DELETE /end_session/{user_id}: always 200; `status` is `info` when there
/// was no session to end.
pub async fn end_session(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Json<SessionEndResponse> {
    Json(state.orchestrator().end_session(&user_id).await)
}
