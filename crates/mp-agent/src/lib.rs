//! Conversation agent for the mining prediction service.
//!
//! The agent receives a user message plus the session's prior turns, calls
//! the `predict_mining_target` tool as often as it needs, and answers in the
//! Strict Response Format. Progress is reported as a stream of
//! [`AgentEvent`]s; the last one is marked final.
//!
//! Two implementations:
//! - [`ChatAgent`]: OpenAI-compatible chat completions API (Gemini by default).
//! - [`ScriptedAgent`]: replays canned answers, for tests.

pub mod agent;
pub mod chat;
pub mod error;
pub mod event;
pub mod mock;
pub mod prompt;
pub mod tool;

pub use agent::ConversationAgent;
pub use chat::{ChatAgent, ChatAgentConfig};
pub use error::{AgentError, AgentResult};
pub use event::{AgentEvent, AgentRequest, EventPart, EventStream};
pub use mock::ScriptedAgent;
pub use tool::{PREDICTION_TOOL_NAME, PredictionTool};
