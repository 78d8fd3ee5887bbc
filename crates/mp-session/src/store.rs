//! Session store abstraction.

use async_trait::async_trait;

use crate::error::SessionResult;
use crate::types::{Session, Turn};

/// Storage for per-user conversation sessions, keyed by session id.
///
/// Implementations only guarantee atomicity of single calls; callers that
/// need read-modify-write ordering per session use [`crate::SessionLocks`].
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Look up a session. `Ok(None)` when it does not exist.
    async fn get(&self, session_id: &str) -> SessionResult<Option<Session>>;

    /// Create an empty session for `user_id`.
    /// Fails with `AlreadyExists` if the derived session id is taken.
    async fn create(&self, user_id: &str) -> SessionResult<Session>;

    /// Append turns to the end of a session's history.
    async fn append(&self, session_id: &str, turns: Vec<Turn>) -> SessionResult<()>;

    /// Remove a session, returning it. Fails with `NotFound` if absent.
    async fn delete(&self, session_id: &str) -> SessionResult<Session>;

    /// Number of live sessions.
    async fn count(&self) -> usize;
}
