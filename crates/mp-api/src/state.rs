//! Shared application state for the Axum server.
//!
//! The conversation agent and the prediction model are optional: either may
//! fail to initialize at startup, in which case the server still starts and
//! prediction requests are refused as unavailable.

use std::sync::Arc;

use mp_agent::{ChatAgent, ConversationAgent, PredictionTool};
use mp_prediction::{LinearModel, Predictor};
use mp_protocol::ReadinessReport;
use mp_session::{InMemorySessionStore, SessionLocks, SessionStore};

use crate::config::ApiConfig;
use crate::orchestrator::Orchestrator;

/// Shared application state, cloned into every handler.
#[derive(Clone)]
pub struct AppState {
    /// Conversation sessions keyed by session id.
    pub sessions: Arc<dyn SessionStore>,
    /// Per-session serialization.
    pub locks: Arc<SessionLocks>,
    /// None when the agent or its credential could not be initialized.
    pub agent: Option<Arc<dyn ConversationAgent>>,
    /// None when the model failed to load.
    pub predictor: Option<Arc<dyn Predictor>>,
}

impl AppState {
    /// In-memory sessions with the given collaborators.
    pub fn new(
        agent: Option<Arc<dyn ConversationAgent>>,
        predictor: Option<Arc<dyn Predictor>>,
    ) -> Self {
        Self::with_store(Arc::new(InMemorySessionStore::new()), agent, predictor)
    }

    pub fn with_store(
        sessions: Arc<dyn SessionStore>,
        agent: Option<Arc<dyn ConversationAgent>>,
        predictor: Option<Arc<dyn Predictor>>,
    ) -> Self {
        Self {
            sessions,
            locks: Arc::new(SessionLocks::new()),
            agent,
            predictor,
        }
    }

    /// Load the model and build the chat agent from config.
    ///
    /// Failures are logged and leave the corresponding collaborator unset.
    pub fn from_config(config: &ApiConfig) -> Self {
        let predictor: Option<Arc<dyn Predictor>> = match LinearModel::from_file(&config.model_path)
        {
            Ok(model) => Some(Arc::new(model)),
            Err(e) => {
                tracing::error!(
                    path = %config.model_path.display(),
                    error = %e,
                    "failed to load prediction model"
                );
                None
            }
        };

        let tool = PredictionTool::new(predictor.clone());
        let agent: Option<Arc<dyn ConversationAgent>> =
            match ChatAgent::new(config.agent.clone(), tool) {
                Ok(agent) => {
                    tracing::info!(
                        model = %config.agent.model,
                        base_url = %config.agent.base_url,
                        "conversation agent initialized"
                    );
                    Some(Arc::new(agent))
                }
                Err(e) => {
                    tracing::error!(error = %e, "failed to initialize conversation agent");
                    None
                }
            };

        Self::new(agent, predictor)
    }

    pub fn readiness(&self) -> ReadinessReport {
        ReadinessReport {
            agent_ready: self.agent.is_some(),
            model_ready: self.predictor.is_some(),
        }
    }

    pub fn orchestrator(&self) -> Orchestrator {
        Orchestrator::new(self.sessions.clone(), self.locks.clone())
    }
}
