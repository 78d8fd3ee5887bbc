//! Request orchestrator: one linear run per prediction request.
//!
//! ```text
//! SessionEnsure → AgentInvoke → Parse → Respond
//!       └──────────────┴──────────┴──→ Failed(reason)
//! ```
//!
//! The whole run holds the session's lock, so concurrent requests for the
//! same user are applied one after another and their history never
//! interleaves. Session deletion takes the same lock.

use std::sync::Arc;

use futures::StreamExt;
use thiserror::Error;

use mp_agent::{AgentRequest, ConversationAgent};
use mp_parser::ParseError;
use mp_protocol::{PredictRequest, PredictResponse, SessionEndResponse, session_id_for};
use mp_session::{SessionError, SessionLocks, SessionStore, Turn};

/// Orchestrator failure reasons.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OrchestratorError {
    #[error("agent produced no final text response")]
    EmptyAgentResponse,

    #[error("failed to parse agent response: {0}")]
    AgentOutputInvalid(#[from] ParseError),

    #[error("agent error: {0}")]
    Agent(String),

    #[error("session store error: {0}")]
    Session(#[from] SessionError),
}

/// Convenience alias for orchestrator results.
pub type OrchestratorResult<T> = Result<T, OrchestratorError>;

/// Processing stage, for logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    SessionEnsure,
    AgentInvoke,
    Parse,
    Respond,
}

/// Coordinates session lookup, agent invocation and parsing.
#[derive(Clone)]
pub struct Orchestrator {
    sessions: Arc<dyn SessionStore>,
    locks: Arc<SessionLocks>,
}

impl Orchestrator {
    pub fn new(sessions: Arc<dyn SessionStore>, locks: Arc<SessionLocks>) -> Self {
        Self { sessions, locks }
    }

    /// Run one prediction request to completion.
    pub async fn process(
        &self,
        agent: &dyn ConversationAgent,
        request: &PredictRequest,
    ) -> OrchestratorResult<PredictResponse> {
        let session_id = request.session_id();
        let _guard = self.locks.acquire(&session_id).await;

        let mut stage = Stage::SessionEnsure;
        let result = self.run_stages(agent, request, &session_id, &mut stage).await;
        if let Err(e) = &result {
            tracing::warn!(
                user_id = %request.user_id,
                session_id = %session_id,
                stage = ?stage,
                error = %e,
                "prediction request failed"
            );
        }
        result
    }

    async fn run_stages(
        &self,
        agent: &dyn ConversationAgent,
        request: &PredictRequest,
        session_id: &str,
        stage: &mut Stage,
    ) -> OrchestratorResult<PredictResponse> {
        let history = self.ensure_session(&request.user_id, session_id).await?;

        *stage = Stage::AgentInvoke;
        tracing::debug!(
            session_id,
            history = history.len(),
            agent = agent.name(),
            "invoking agent"
        );
        let text = self
            .invoke_agent(
                agent,
                AgentRequest {
                    user_id: request.user_id.clone(),
                    session_id: session_id.to_string(),
                    message: request.query.clone(),
                    history,
                },
            )
            .await?;

        // Follow-up requests resolve against this exchange even if it fails to parse.
        self.sessions
            .append(
                session_id,
                vec![Turn::user(request.query.clone()), Turn::assistant(text.clone())],
            )
            .await?;

        *stage = Stage::Parse;
        let result = mp_parser::parse(&text)?;

        *stage = Stage::Respond;
        tracing::info!(
            session_id,
            target_tonnage = result.target_tonnage,
            recommendations = result.recommendations.len(),
            "prediction request completed"
        );
        Ok(PredictResponse::from(result))
    }

    /// Look up the session, creating it when absent. Returns its history.
    async fn ensure_session(
        &self,
        user_id: &str,
        session_id: &str,
    ) -> OrchestratorResult<Vec<Turn>> {
        if let Some(session) = self.sessions.get(session_id).await? {
            return Ok(session.history);
        }
        match self.sessions.create(user_id).await {
            Ok(session) => {
                tracing::info!(user_id, session_id, "session created");
                Ok(session.history)
            }
            Err(e) => {
                tracing::debug!(
                    session_id,
                    error = %e,
                    "session create failed, assuming it exists"
                );
                Ok(self
                    .sessions
                    .get(session_id)
                    .await?
                    .map(|s| s.history)
                    .unwrap_or_default())
            }
        }
    }

    /// Consume agent events up to the first final one and return its text.
    async fn invoke_agent(
        &self,
        agent: &dyn ConversationAgent,
        request: AgentRequest,
    ) -> OrchestratorResult<String> {
        let mut events = agent
            .run(request)
            .await
            .map_err(|e| OrchestratorError::Agent(e.to_string()))?;

        while let Some(event) = events.next().await {
            let event = event.map_err(|e| OrchestratorError::Agent(e.to_string()))?;
            if !event.is_final {
                tracing::trace!(parts = event.parts.len(), "intermediate agent event");
                continue;
            }
            let text = event.text();
            if text.trim().is_empty() {
                return Err(OrchestratorError::EmptyAgentResponse);
            }
            return Ok(text);
        }
        Err(OrchestratorError::EmptyAgentResponse)
    }

    /// Remove a user's session. A missing session is reported, not an error.
    pub async fn end_session(&self, user_id: &str) -> SessionEndResponse {
        let session_id = session_id_for(user_id);
        let guard = self.locks.acquire(&session_id).await;
        let outcome = self.sessions.delete(&session_id).await;
        drop(guard);
        self.locks.prune(&session_id);

        match outcome {
            Ok(session) => {
                tracing::info!(
                    user_id,
                    session_id = %session_id,
                    turns = session.history.len(),
                    "session ended"
                );
                SessionEndResponse::ended(user_id)
            }
            Err(e) => {
                tracing::debug!(user_id, error = %e, "no session to end");
                SessionEndResponse::not_found(user_id)
            }
        }
    }
}
