//! Agent run requests and streamed events.

use std::pin::Pin;

use futures::Stream;
use serde::{Deserialize, Serialize};

use mp_session::Turn;

use crate::error::AgentResult;

/// Stream of events produced by one agent run.
pub type EventStream = Pin<Box<dyn Stream<Item = AgentResult<AgentEvent>> + Send>>;

/// Input for one agent run.
#[derive(Debug, Clone, PartialEq)]
pub struct AgentRequest {
    pub user_id: String,
    pub session_id: String,
    /// The new user message.
    pub message: String,
    /// Prior turns of this session, oldest first.
    pub history: Vec<Turn>,
}

/// One piece of an event's content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EventPart {
    /// Model-generated text.
    Text { text: String },

    /// The model is invoking a tool.
    ToolCall {
        id: String,
        name: String,
        arguments: serde_json::Value,
    },

    /// Output of a tool invocation, fed back to the model.
    ToolResult {
        id: String,
        name: String,
        output: String,
    },
}

/// An event emitted during an agent run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentEvent {
    /// Agent name that produced the event.
    pub author: String,
    pub parts: Vec<EventPart>,
    /// Set on the event that carries the agent's answer.
    pub is_final: bool,
}

impl AgentEvent {
    /// Final answer event carrying a single text part.
    pub fn final_text(author: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            author: author.into(),
            parts: vec![EventPart::Text { text: text.into() }],
            is_final: true,
        }
    }

    pub fn intermediate(author: impl Into<String>, parts: Vec<EventPart>) -> Self {
        Self {
            author: author.into(),
            parts,
            is_final: false,
        }
    }

    /// Concatenation of all text parts, in order.
    pub fn text(&self) -> String {
        self.parts
            .iter()
            .filter_map(|p| match p {
                EventPart::Text { text } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }
}
