//! Conversation session storage.
//!
//! A session holds one user's ordered conversation turns so follow-up
//! requests ("tambah 2 truk") can resolve against earlier answers.
//! The `SessionStore` trait is injected into the service; `InMemorySessionStore`
//! is the default backend. `SessionLocks` serializes work per session.

pub mod error;
pub mod locks;
pub mod memory;
pub mod store;
pub mod types;

pub use error::{SessionError, SessionResult};
pub use locks::SessionLocks;
pub use memory::InMemorySessionStore;
pub use store::SessionStore;
pub use types::{Session, Turn, TurnRole};
