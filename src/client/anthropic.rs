//! Anthropic Messages API backend.

use std::time::Duration;

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{ChatModel, CompletionRequest};
use crate::config::Settings;
use crate::types::{ContentBlock, Message, Role, ToolDefinition, ToolUseBlock};
use crate::{Error, Result};

pub const DEFAULT_BASE_URL: &str = "https://api.anthropic.com";
pub const DEFAULT_MODEL: &str = "claude-sonnet-4-5-20250929";
pub const DEFAULT_MAX_TOKENS: u32 = 8192;
const API_VERSION: &str = "2023-06-01";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(600);

pub struct AnthropicModel {
    http: reqwest::Client,
    base_url: String,
    api_key: SecretString,
    api_version: String,
    model: String,
    max_tokens: u32,
    timeout: Duration,
}

impl std::fmt::Debug for AnthropicModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnthropicModel")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("max_tokens", &self.max_tokens)
            .finish()
    }
}

impl AnthropicModel {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: DEFAULT_BASE_URL.into(),
            api_key: SecretString::from(api_key.into()),
            api_version: API_VERSION.into(),
            model: model.into(),
            max_tokens: DEFAULT_MAX_TOKENS,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Reads `ANTHROPIC_API_KEY` (required), `ANTHROPIC_BASE_URL` and `ANTHROPIC_MODEL`.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("ANTHROPIC_API_KEY")
            .map_err(|_| Error::config("ANTHROPIC_API_KEY is not set"))?;
        let model = std::env::var("ANTHROPIC_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.into());
        let mut adapter = Self::new(api_key, model);
        if let Ok(url) = std::env::var("ANTHROPIC_BASE_URL") {
            adapter = adapter.with_base_url(url);
        }
        Ok(adapter)
    }

    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let api_key = match &settings.api_key {
            Some(key) => key.expose_secret().to_string(),
            None => std::env::var("ANTHROPIC_API_KEY")
                .map_err(|_| Error::config("no api key in settings or ANTHROPIC_API_KEY"))?,
        };
        Ok(Self::new(api_key, &settings.model)
            .with_base_url(&settings.base_url)
            .with_max_tokens(settings.max_tokens)
            .with_timeout(settings.request_timeout))
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_max_tokens(mut self, tokens: u32) -> Self {
        self.max_tokens = tokens;
        self
    }

    pub fn with_api_version(mut self, version: impl Into<String>) -> Self {
        self.api_version = version.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_http_client(mut self, http: reqwest::Client) -> Self {
        self.http = http;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn build_body<'a>(&'a self, request: &'a CompletionRequest) -> MessagesRequest<'a> {
        MessagesRequest {
            model: &self.model,
            max_tokens: self.max_tokens,
            system: request.system.as_deref(),
            messages: to_api_messages(&request.messages),
            tools: &request.tools,
        }
    }

    fn map_send_error(&self, err: reqwest::Error) -> Error {
        if err.is_timeout() {
            Error::Timeout(self.timeout)
        } else {
            Error::Network(err)
        }
    }
}

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<&'a str>,
    messages: Vec<ApiMessage<'a>>,
    #[serde(skip_serializing_if = "no_tools")]
    tools: &'a [ToolDefinition],
}

fn no_tools(tools: &&[ToolDefinition]) -> bool {
    tools.is_empty()
}

#[derive(Debug, Serialize)]
struct ApiMessage<'a> {
    role: &'static str,
    content: Vec<&'a ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<serde_json::Value>,
    #[serde(default)]
    stop_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    #[serde(rename = "type")]
    error_type: String,
    message: String,
}

/// The API only knows user and assistant turns and requires them to
/// alternate, so tool results ride on user turns and adjacent turns with the
/// same API role are folded together.
fn to_api_messages(messages: &[Message]) -> Vec<ApiMessage<'_>> {
    let mut out: Vec<ApiMessage<'_>> = Vec::with_capacity(messages.len());
    for message in messages {
        let role = match message.role {
            Role::Assistant => "assistant",
            Role::User | Role::Tool => "user",
        };
        match out.last_mut() {
            Some(last) if last.role == role => last.content.extend(message.content.iter()),
            _ => out.push(ApiMessage {
                role,
                content: message.content.iter().collect(),
            }),
        }
    }
    out
}

fn parse_content(blocks: Vec<serde_json::Value>) -> Result<Vec<ContentBlock>> {
    let mut content = Vec::with_capacity(blocks.len());
    for block in blocks {
        match block.get("type").and_then(|t| t.as_str()) {
            Some("text") => {
                let text = block
                    .get("text")
                    .and_then(|t| t.as_str())
                    .ok_or_else(|| Error::Parse("text block without text".into()))?;
                content.push(ContentBlock::text(text));
            }
            Some("tool_use") => {
                let tool_use: ToolUseBlock = serde_json::from_value(block)?;
                content.push(ContentBlock::ToolUse(tool_use));
            }
            Some(other) => debug!(block_type = other, "Skipping unsupported content block"),
            None => return Err(Error::Parse("content block without type".into())),
        }
    }
    Ok(content)
}

fn parse_retry_after(headers: &reqwest::header::HeaderMap) -> Option<Duration> {
    headers
        .get("retry-after")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<u64>().ok())
        .map(Duration::from_secs)
}

#[async_trait]
impl ChatModel for AnthropicModel {
    fn name(&self) -> &str {
        "anthropic"
    }

    async fn complete(&self, request: CompletionRequest) -> Result<Message> {
        let url = format!("{}/v1/messages", self.base_url);
        let body = self.build_body(&request);
        debug!(
            model = %self.model,
            messages = body.messages.len(),
            tools = request.tools.len(),
            "Sending completion request"
        );

        let response = self
            .http
            .post(&url)
            .timeout(self.timeout)
            .header("x-api-key", self.api_key.expose_secret())
            .header("anthropic-version", &self.api_version)
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;

        let status = response.status();
        if status.as_u16() == 429 {
            return Err(Error::RateLimit {
                retry_after: parse_retry_after(response.headers()),
            });
        }
        if !status.is_success() {
            let text = response.text().await.map_err(|e| self.map_send_error(e))?;
            return Err(match serde_json::from_str::<ErrorResponse>(&text) {
                Ok(error) => Error::Api {
                    message: error.error.message,
                    status: Some(status.as_u16()),
                    error_type: Some(error.error.error_type),
                },
                Err(_) => Error::Api {
                    message: text,
                    status: Some(status.as_u16()),
                    error_type: None,
                },
            });
        }

        let parsed: MessagesResponse = response.json().await.map_err(|e| self.map_send_error(e))?;
        debug!(stop_reason = ?parsed.stop_reason, "Completion received");
        Ok(Message::assistant_with_content(parse_content(parsed.content)?))
    }
}
