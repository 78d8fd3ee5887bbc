//! Shared test harness for E2E integration tests.
//!
//! Wires the real router, orchestrator, parser and in-memory session store
//! to a scripted (or wiremock-backed) conversation agent.

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use tower::ServiceExt;

use mp_agent::{ConversationAgent, ScriptedAgent};
use mp_api::routes::build_router;
use mp_api::state::AppState;
use mp_prediction::{MockPredictor, Predictor};
use mp_protocol::format::render;
use mp_protocol::{AnalysisResult, Recommendation, Scenario, Weather};
use mp_session::SessionStore;

/// End-to-end test harness around the API router.
pub struct TestHarness {
    /// Application state (in-memory sessions).
    pub state: AppState,
    /// Axum router for HTTP requests via `tower::oneshot`.
    pub router: Router,
    /// The scripted agent, when one is wired in.
    pub agent: Option<Arc<ScriptedAgent>>,
}

impl TestHarness {
    /// Fully ready service whose agent answers with `replies` in order.
    pub fn scripted<S: Into<String>>(replies: impl IntoIterator<Item = S>) -> Self {
        Self::with_scripted_agent(ScriptedAgent::replying(replies))
    }

    pub fn with_scripted_agent(agent: ScriptedAgent) -> Self {
        let agent = Arc::new(agent);
        let predictor: Arc<dyn Predictor> = Arc::new(MockPredictor::trucks_times(5.7));
        let dyn_agent: Arc<dyn ConversationAgent> = agent.clone();
        let mut harness = Self::with_state(AppState::new(Some(dyn_agent), Some(predictor)));
        harness.agent = Some(agent);
        harness
    }

    /// Service with the given collaborators missing.
    pub fn degraded(agent_ready: bool, model_ready: bool) -> Self {
        let agent: Option<Arc<dyn ConversationAgent>> = agent_ready.then(|| {
            Arc::new(ScriptedAgent::replying([sample_answer()])) as Arc<dyn ConversationAgent>
        });
        let predictor: Option<Arc<dyn Predictor>> =
            model_ready.then(|| Arc::new(MockPredictor::trucks_times(5.7)) as Arc<dyn Predictor>);
        Self::with_state(AppState::new(agent, predictor))
    }

    pub fn with_state(state: AppState) -> Self {
        let router = build_router(state.clone());
        Self {
            state,
            router,
            agent: None,
        }
    }

    /// POST /predict_and_recommend. Returns (HTTP status, JSON body).
    pub async fn predict(&self, user_id: &str, query: &str) -> (StatusCode, serde_json::Value) {
        let body = serde_json::json!({ "user_id": user_id, "query": query });
        self.send(
            Request::post("/predict_and_recommend")
                .header("content-type", "application/json")
                .body(Body::from(serde_json::to_vec(&body).unwrap()))
                .unwrap(),
        )
        .await
    }

    /// DELETE /end_session/{user_id}.
    pub async fn end_session(&self, user_id: &str) -> (StatusCode, serde_json::Value) {
        self.send(
            Request::delete(format!("/end_session/{user_id}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
    }

    /// GET /ready.
    pub async fn ready(&self) -> (StatusCode, serde_json::Value) {
        self.send(Request::get("/ready").body(Body::empty()).unwrap())
            .await
    }

    async fn send(&self, request: Request<Body>) -> (StatusCode, serde_json::Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        (status, json)
    }

    /// Turns stored for `user_id`'s session (empty if there is none).
    pub async fn history(&self, user_id: &str) -> Vec<mp_session::Turn> {
        self.state
            .sessions
            .get(&mp_protocol::session_id_for(user_id))
            .await
            .unwrap()
            .map(|s| s.history)
            .unwrap_or_default()
    }

    /// Requests seen by the scripted agent.
    pub fn agent_requests(&self) -> Vec<mp_agent::AgentRequest> {
        self.agent.as_ref().map(|a| a.requests()).unwrap_or_default()
    }
}

/// Three-recommendation result for an 80 ton target.
pub fn sample_result() -> AnalysisResult {
    AnalysisResult {
        target_tonnage: 80,
        initial_analysis_text: "Konfigurasi kontrol menghasilkan 75.5 ton, kurang 4.5 ton dari target.".into(),
        initial_prediction: 75.5,
        initial_difference: 4.5,
        recommendations: vec![
            Recommendation::from_scenario(
                "Tambah Truk",
                Scenario::new(14, 3, 18, Weather::Cloudy),
                79.8,
                0.2,
                "Penambahan dua truk hampir tepat mencapai target.",
            ),
            Recommendation::from_scenario(
                "Tambah Ekskavator",
                Scenario::new(12, 4, 18, Weather::Cloudy),
                81.25,
                1.25,
                "Ekskavator tambahan mempercepat pemuatan.",
            ),
            Recommendation::from_scenario(
                "Kontrol",
                Scenario::new(12, 3, 18, Weather::Cloudy),
                75.5,
                4.5,
                "Tanpa perubahan, produksi masih di bawah target.",
            ),
        ],
    }
}

/// `sample_result()` rendered in the Strict Response Format.
pub fn sample_answer() -> String {
    render(&sample_result())
}
