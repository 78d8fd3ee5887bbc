//! The conversation agent abstraction.

use async_trait::async_trait;

use crate::error::AgentResult;
use crate::event::{AgentRequest, EventStream};

/// Turns a user message plus session context into a stream of events,
/// ending with a final event whose text follows the Strict Response Format.
#[async_trait]
pub trait ConversationAgent: Send + Sync {
    /// Start a run. Errors returned here mean the run never started;
    /// errors inside the stream mean it failed midway.
    async fn run(&self, request: AgentRequest) -> AgentResult<EventStream>;

    /// Name of this agent (for logging).
    fn name(&self) -> &str;
}
