//! Scripted agent for testing: replays canned event sequences.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::agent::ConversationAgent;
use crate::error::{AgentError, AgentResult};
use crate::event::{AgentEvent, AgentRequest, EventPart, EventStream};

enum Script {
    Events(Vec<AgentResult<AgentEvent>>),
    Fail(AgentError),
}

/// Replays one script per run, in order; the last script repeats once the
/// queue is down to it. Every request is recorded.
pub struct ScriptedAgent {
    scripts: Mutex<VecDeque<Script>>,
    requests: Mutex<Vec<AgentRequest>>,
}

impl ScriptedAgent {
    fn from_scripts(scripts: Vec<Script>) -> Self {
        Self {
            scripts: Mutex::new(scripts.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Each run answers with the next reply as a single final text event.
    pub fn replying<S: Into<String>>(replies: impl IntoIterator<Item = S>) -> Self {
        Self::from_scripts(
            replies
                .into_iter()
                .map(|r| Script::Events(vec![Ok(AgentEvent::final_text("scripted", r))]))
                .collect(),
        )
    }

    /// A single run producing exactly these events.
    pub fn with_events(events: Vec<AgentResult<AgentEvent>>) -> Self {
        Self::from_scripts(vec![Script::Events(events)])
    }

    /// Every run fails to start.
    pub fn failing(message: impl Into<String>) -> Self {
        Self::from_scripts(vec![Script::Fail(AgentError::Unavailable(message.into()))])
    }

    /// Runs that emit tool activity but never a final answer.
    pub fn silent() -> Self {
        Self::with_events(vec![Ok(AgentEvent::intermediate(
            "scripted",
            vec![EventPart::ToolResult {
                id: "call_0".into(),
                name: crate::tool::PREDICTION_TOOL_NAME.into(),
                output: "PREDICTION_RESULTS: []".into(),
            }],
        ))])
    }

    /// Requests received so far.
    pub fn requests(&self) -> Vec<AgentRequest> {
        self.requests.lock().map(|r| r.clone()).unwrap_or_default()
    }

    fn next_script(&self) -> AgentResult<Vec<AgentResult<AgentEvent>>> {
        let mut scripts = self
            .scripts
            .lock()
            .map_err(|_| AgentError::Unavailable("script lock poisoned".into()))?;
        let script = if scripts.len() > 1 {
            scripts.pop_front()
        } else {
            scripts.front().map(|s| match s {
                Script::Events(events) => Script::Events(events.clone()),
                Script::Fail(e) => Script::Fail(e.clone()),
            })
        };
        match script {
            Some(Script::Events(events)) => Ok(events),
            Some(Script::Fail(e)) => Err(e),
            None => Ok(Vec::new()),
        }
    }
}

#[async_trait]
impl ConversationAgent for ScriptedAgent {
    async fn run(&self, request: AgentRequest) -> AgentResult<EventStream> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(request);
        }
        let events = self.next_script()?;
        Ok(Box::pin(futures::stream::iter(events)))
    }

    fn name(&self) -> &str {
        "scripted"
    }
}
