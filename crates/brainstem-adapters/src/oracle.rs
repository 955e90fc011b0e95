//! Reference oracle adapter: an HTTP client speaking the Anthropic Messages
//! API shape, following the same request/response layout as
//! `llm::remote::ClaudeClient`.
//!
//! The oracle's model internals are out of scope (§1); this adapter only
//! implements the `decide(messages, observation, registry_summary) ->
//! raw_text` contract (§6) over HTTP, leaving parsing/fallback to
//! `brainstem_react::oracle_parse`.

use std::time::Duration;

use async_trait::async_trait;
use brainstem_core::state::{Message as BrainMessage, Observation};
use brainstem_react::ports::{OracleClient, PortError};
use reqwest::Client;
use serde::{Deserialize, Serialize};

const ANTHROPIC_VERSION: &str = "2023-06-01";
const DEFAULT_TIMEOUT_S: u64 = 30;

/// Configuration for [`HttpOracleClient`].
#[derive(Debug, Clone)]
pub struct OracleConfig {
    /// API key for the oracle endpoint.
    pub api_key: String,
    /// Base URL, e.g. `"https://api.anthropic.com"`.
    pub base_url: String,
    /// Model identifier to request.
    pub model: String,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl OracleConfig {
    /// Build a config from the minimum required fields, defaulting the timeout.
    pub fn new(api_key: impl Into<String>, base_url: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: base_url.into(),
            model: model.into(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_S),
        }
    }
}

/// An [`OracleClient`] backed by an HTTP call to a Claude-shaped Messages API.
pub struct HttpOracleClient {
    config: OracleConfig,
    http: Client,
}

impl HttpOracleClient {
    /// Build a client from `config`.
    pub fn new(config: OracleConfig) -> Self {
        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .expect("failed to build oracle HTTP client");
        Self { config, http }
    }

    fn system_prompt(&self, registry_summary: &str) -> String {
        format!(
            "You are the ReAct planning oracle for a mobile-robot decision core. \
             You must reply with a single JSON object matching the Decision schema: \
             {{\"type\": one of CONTINUE|REPLAN|RETRY|SWITCH_TASK|ASK_HUMAN|FINISH|ABORT, \
             \"reason\": string, \"ops\": [{{\"skill_name\": string, \"params\": object}}]}}. \
             Available skills:\n{registry_summary}"
        )
    }
}

#[async_trait]
impl OracleClient for HttpOracleClient {
    async fn decide(
        &self,
        messages: &[BrainMessage],
        observation: &Observation,
        registry_summary: &str,
    ) -> Result<String, PortError> {
        let mut api_messages: Vec<AnthropicMessage> = messages
            .iter()
            .map(|m| AnthropicMessage {
                role: anthropic_role(&m.role),
                content: m.content.clone(),
            })
            .collect();
        api_messages.push(AnthropicMessage {
            role: "user".to_string(),
            content: serde_json::to_string(observation)
                .map_err(|e| PortError::Transport(e.to_string()))?,
        });

        let request = AnthropicRequest {
            model: self.config.model.clone(),
            system: self.system_prompt(registry_summary),
            messages: api_messages,
            max_tokens: 1024,
        };

        let response = self
            .http
            .post(format!("{}/v1/messages", self.config.base_url))
            .header("x-api-key", &self.config.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&request)
            .send()
            .await
            .map_err(|e| PortError::Transport(e.to_string()))?
            .error_for_status()
            .map_err(|e| PortError::Transport(e.to_string()))?
            .json::<AnthropicResponse>()
            .await
            .map_err(|e| PortError::Transport(e.to_string()))?;

        let text = response
            .content
            .into_iter()
            .filter_map(|block| block.text)
            .collect::<Vec<_>>()
            .join("");
        Ok(text)
    }
}

fn anthropic_role(role: &str) -> String {
    match role {
        "assistant" => "assistant".to_string(),
        _ => "user".to_string(),
    }
}

#[derive(Serialize)]
struct AnthropicRequest {
    model: String,
    system: String,
    messages: Vec<AnthropicMessage>,
    max_tokens: u32,
}

#[derive(Serialize, Deserialize)]
struct AnthropicMessage {
    role: String,
    content: String,
}

#[derive(Deserialize)]
struct AnthropicResponse {
    content: Vec<AnthropicContentBlock>,
}

#[derive(Deserialize)]
struct AnthropicContentBlock {
    #[serde(rename = "type")]
    #[allow(dead_code)]
    content_type: String,
    text: Option<String>,
}
