//! Chat-completions agent with tool calling.
//!
//! Talks to any OpenAI-compatible `/chat/completions` endpoint (Gemini's
//! OpenAI endpoint by default). Each run sends the instruction, the session
//! history and the new message, executes `predict_mining_target` whenever the
//! model asks for it, and finishes when the model answers with plain text.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use futures::channel::mpsc;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use mp_session::{Turn, TurnRole};

use crate::agent::ConversationAgent;
use crate::error::{AgentError, AgentResult};
use crate::event::{AgentEvent, AgentRequest, EventPart, EventStream};
use crate::prompt;
use crate::tool::PredictionTool;

/// Agent name, used as the event author.
pub const AGENT_NAME: &str = "mining_optimization_agent";

/// Configuration for the chat-completions endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatAgentConfig {
    /// API base URL; `/chat/completions` is appended.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_model")]
    pub model: String,
    /// Bearer credential. The agent refuses to start without one.
    #[serde(default)]
    pub api_key: Option<String>,
    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Completions that may request tools before the run is aborted.
    #[serde(default = "default_max_tool_rounds")]
    pub max_tool_rounds: usize,
}

fn default_base_url() -> String {
    "https://generativelanguage.googleapis.com/v1beta/openai".into()
}
fn default_model() -> String {
    "gemini-2.5-flash".into()
}
fn default_timeout_secs() -> u64 {
    60
}
fn default_max_tool_rounds() -> usize {
    4
}

impl Default for ChatAgentConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            model: default_model(),
            api_key: None,
            timeout_secs: default_timeout_secs(),
            max_tool_rounds: default_max_tool_rounds(),
        }
    }
}

/// Wire message (request and response).
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ApiMessage {
    role: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    tool_calls: Option<Vec<ApiToolCall>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    tool_call_id: Option<String>,
}

impl ApiMessage {
    fn text(role: &str, content: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            content: Some(content.into()),
            tool_calls: None,
            tool_call_id: None,
        }
    }

    fn tool_result(call_id: &str, output: impl Into<String>) -> Self {
        Self {
            role: "tool".into(),
            content: Some(output.into()),
            tool_calls: None,
            tool_call_id: Some(call_id.into()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ApiToolCall {
    #[serde(default)]
    id: String,
    #[serde(rename = "type", default = "function_type")]
    kind: String,
    function: ApiFunction,
}

fn function_type() -> String {
    "function".into()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ApiFunction {
    name: String,
    /// JSON-encoded arguments.
    #[serde(default)]
    arguments: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ApiMessage,
}

struct Inner {
    client: reqwest::Client,
    config: ChatAgentConfig,
    api_key: String,
    tool: PredictionTool,
    instruction: String,
}

/// Conversation agent backed by a chat-completions API.
#[derive(Clone)]
pub struct ChatAgent {
    inner: Arc<Inner>,
}

impl ChatAgent {
    /// Build the agent. Fails when no credential is configured.
    pub fn new(config: ChatAgentConfig, tool: PredictionTool) -> AgentResult<Self> {
        let api_key = config
            .api_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| AgentError::MissingCredential("GEMINI_API_KEY is not set".into()))?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| AgentError::Http(e.to_string()))?;

        Ok(Self {
            inner: Arc::new(Inner {
                client,
                api_key,
                tool,
                instruction: prompt::agent_instruction(),
                config: ChatAgentConfig {
                    base_url: config.base_url.trim_end_matches('/').to_string(),
                    ..config
                },
            }),
        })
    }
}

#[async_trait]
impl ConversationAgent for ChatAgent {
    async fn run(&self, request: AgentRequest) -> AgentResult<EventStream> {
        let messages = self.inner.initial_messages(&request);
        let (tx, rx) = mpsc::unbounded();
        let inner = Arc::clone(&self.inner);

        tokio::spawn(async move {
            let session_id = request.session_id.clone();
            if let Err(e) = inner.drive(messages, &tx).await {
                tracing::warn!(session_id = %session_id, error = %e, "agent run failed");
                if tx.unbounded_send(Err(e)).is_err() {
                    tracing::debug!(
                        session_id = %session_id,
                        "agent error not delivered, stream dropped"
                    );
                }
            }
        });

        Ok(Box::pin(rx))
    }

    fn name(&self) -> &str {
        AGENT_NAME
    }
}

type EventSender = mpsc::UnboundedSender<AgentResult<AgentEvent>>;

impl Inner {
    fn initial_messages(&self, request: &AgentRequest) -> Vec<ApiMessage> {
        let mut messages = Vec::with_capacity(request.history.len() + 2);
        messages.push(ApiMessage::text("system", self.instruction.clone()));
        messages.extend(request.history.iter().map(history_message));
        messages.push(ApiMessage::text("user", request.message.clone()));
        messages
    }

    /// Run completions until the model answers with text. Stops early once
    /// the caller has dropped the event stream.
    async fn drive(&self, mut messages: Vec<ApiMessage>, tx: &EventSender) -> AgentResult<()> {
        let mut rounds = 0usize;
        loop {
            if tx.is_closed() {
                tracing::debug!(rounds, "event stream dropped, stopping agent run");
                return Ok(());
            }
            let reply = self.complete(&messages).await?;
            let calls = reply.tool_calls.clone().unwrap_or_default();

            if calls.is_empty() {
                let text = reply.content.unwrap_or_default();
                tracing::debug!(rounds, chars = text.len(), "agent produced final answer");
                emit(tx, AgentEvent::final_text(AGENT_NAME, text));
                return Ok(());
            }

            if rounds >= self.config.max_tool_rounds {
                return Err(AgentError::ToolLoopExceeded(self.config.max_tool_rounds));
            }
            rounds += 1;

            let calls: Vec<ApiToolCall> = calls
                .into_iter()
                .enumerate()
                .map(|(i, mut call)| {
                    if call.id.is_empty() {
                        call.id = format!("call_{rounds}_{i}");
                    }
                    call
                })
                .collect();

            let call_parts = calls
                .iter()
                .map(|c| EventPart::ToolCall {
                    id: c.id.clone(),
                    name: c.function.name.clone(),
                    arguments: serde_json::from_str(&c.function.arguments)
                        .unwrap_or_else(|_| Value::String(c.function.arguments.clone())),
                })
                .collect();
            if !emit(tx, AgentEvent::intermediate(AGENT_NAME, call_parts)) {
                tracing::debug!(rounds, "event stream dropped before tool execution");
                return Ok(());
            }

            messages.push(ApiMessage {
                tool_calls: Some(calls.clone()),
                ..reply
            });

            let mut result_parts = Vec::with_capacity(calls.len());
            for call in &calls {
                let output = self.execute_tool(call);
                messages.push(ApiMessage::tool_result(&call.id, output.clone()));
                result_parts.push(EventPart::ToolResult {
                    id: call.id.clone(),
                    name: call.function.name.clone(),
                    output,
                });
            }
            emit(tx, AgentEvent::intermediate(AGENT_NAME, result_parts));
        }
    }

    fn execute_tool(&self, call: &ApiToolCall) -> String {
        if call.function.name != self.tool.name() {
            tracing::warn!(tool = %call.function.name, "model requested unknown tool");
            return format!("ERROR: unknown tool '{}'", call.function.name);
        }
        tracing::info!(tool = %call.function.name, call_id = %call.id, "executing tool");
        self.tool.execute_raw(&call.function.arguments)
    }

    async fn complete(&self, messages: &[ApiMessage]) -> AgentResult<ApiMessage> {
        let url = format!("{}/chat/completions", self.config.base_url);
        let body = json!({
            "model": self.config.model,
            "messages": messages,
            "tools": [{
                "type": "function",
                "function": {
                    "name": self.tool.name(),
                    "description": self.tool.description(),
                    "parameters": self.tool.parameters_schema(),
                }
            }],
            "stream": false,
        });

        tracing::debug!(
            model = %self.config.model,
            messages = messages.len(),
            "sending completion request"
        );

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| AgentError::Http(e.to_string()))?;

        let status = response.status().as_u16();
        if status == 401 || status == 403 {
            return Err(AgentError::Auth(
                "invalid API key or insufficient permissions".into(),
            ));
        }
        if !response.status().is_success() {
            let message = response.text().await.unwrap_or_default();
            tracing::warn!(status, body = %message, "agent API returned error");
            return Err(AgentError::Api { status, message });
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| AgentError::InvalidResponse(e.to_string()))?;

        parsed
            .choices
            .into_iter()
            .next()
            .map(|c| c.message)
            .ok_or_else(|| AgentError::InvalidResponse("no choices in response".into()))
    }
}

/// Send one event. `false` when the receiver is gone.
fn emit(tx: &EventSender, event: AgentEvent) -> bool {
    tx.unbounded_send(Ok(event)).is_ok()
}

fn history_message(turn: &Turn) -> ApiMessage {
    let role = match turn.role {
        TurnRole::User => "user",
        TurnRole::Assistant => "assistant",
    };
    ApiMessage::text(role, turn.content.clone())
}
