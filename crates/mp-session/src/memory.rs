//! In-memory session store backed by `RwLock<HashMap>`.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::error::{SessionError, SessionResult};
use crate::store::SessionStore;
use crate::types::{Session, Turn};

/// Process-local session store. Sessions never expire on their own.
#[derive(Default)]
pub struct InMemorySessionStore {
    sessions: RwLock<HashMap<String, Session>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn get(&self, session_id: &str) -> SessionResult<Option<Session>> {
        Ok(self.sessions.read().await.get(session_id).cloned())
    }

    async fn create(&self, user_id: &str) -> SessionResult<Session> {
        let session = Session::new(user_id);
        let mut sessions = self.sessions.write().await;
        if sessions.contains_key(&session.session_id) {
            return Err(SessionError::AlreadyExists(session.session_id));
        }
        sessions.insert(session.session_id.clone(), session.clone());
        tracing::debug!(session_id = %session.session_id, "session created");
        Ok(session)
    }

    async fn append(&self, session_id: &str, turns: Vec<Turn>) -> SessionResult<()> {
        let mut sessions = self.sessions.write().await;
        let session = sessions
            .get_mut(session_id)
            .ok_or_else(|| SessionError::NotFound(session_id.to_string()))?;
        session.history.extend(turns);
        session.updated_at = Utc::now();
        Ok(())
    }

    async fn delete(&self, session_id: &str) -> SessionResult<Session> {
        let removed = self
            .sessions
            .write()
            .await
            .remove(session_id)
            .ok_or_else(|| SessionError::NotFound(session_id.to_string()))?;
        tracing::debug!(session_id, turns = removed.history.len(), "session deleted");
        Ok(removed)
    }

    async fn count(&self) -> usize {
        self.sessions.read().await.len()
    }
}
