//! API server configuration.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::Context;
use serde::Deserialize;

use mp_agent::ChatAgentConfig;

/// Top-level API server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    /// Listen address (e.g., "0.0.0.0").
    #[serde(default = "default_host")]
    pub host: String,
    /// Listen port.
    #[serde(default = "default_port")]
    pub port: u16,
    /// JSON linear model loaded at startup.
    #[serde(default = "default_model_path")]
    pub model_path: PathBuf,
    /// Conversation agent endpoint and credential.
    #[serde(default)]
    pub agent: ChatAgentConfig,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_model_path() -> PathBuf {
    PathBuf::from("model.json")
}

impl ApiConfig {
    /// Load config from environment variables over defaults.
    pub fn from_env() -> Self {
        Self::default().with_overrides(|key| std::env::var(key).ok())
    }

    /// Load config from a TOML file; environment variables still take precedence.
    pub fn from_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        let config: Self = toml::from_str(&contents)
            .with_context(|| format!("parsing config file {}", path.display()))?;
        Ok(config.with_overrides(|key| std::env::var(key).ok()))
    }

    /// Apply `MP_*` / `GEMINI_API_KEY` overrides from `lookup`.
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(host) = lookup("MP_HOST") {
            self.host = host;
        }
        if let Some(port) = parsed(&lookup, "MP_PORT") {
            self.port = port;
        }
        if let Some(path) = lookup("MP_MODEL_PATH") {
            self.model_path = PathBuf::from(path);
        }
        if let Some(url) = lookup("MP_AGENT_BASE_URL") {
            self.agent.base_url = url;
        }
        if let Some(model) = lookup("MP_AGENT_MODEL") {
            self.agent.model = model;
        }
        if let Some(key) = lookup("GEMINI_API_KEY") {
            self.agent.api_key = Some(key);
        }
        if let Some(secs) = parsed(&lookup, "MP_AGENT_TIMEOUT_SECS") {
            self.agent.timeout_secs = secs;
        }
        if let Some(rounds) = parsed(&lookup, "MP_AGENT_MAX_TOOL_ROUNDS") {
            self.agent.max_tool_rounds = rounds;
        }
        self
    }

    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parsed<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T> {
    let raw = lookup(key)?;
    match raw.trim().parse() {
        Ok(v) => Some(v),
        Err(_) => {
            tracing::warn!(key, value = %raw, "ignoring unparseable config override");
            None
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            model_path: default_model_path(),
            agent: ChatAgentConfig::default(),
        }
    }
}
