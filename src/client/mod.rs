//! Language-model client abstraction.
//!
//! Orchestrators only ever ask a model for the next assistant message given
//! a system prompt, the history, and the tools it may call. Everything else
//! about the provider lives behind [`ChatModel`].

mod anthropic;

use std::sync::Arc;

use async_trait::async_trait;

pub use anthropic::{AnthropicModel, DEFAULT_BASE_URL, DEFAULT_MAX_TOKENS, DEFAULT_MODEL};

use crate::Result;
use crate::types::{Message, ToolDefinition};

/// One completion request.
#[derive(Debug, Clone, Default)]
pub struct CompletionRequest {
    pub system: Option<String>,
    pub messages: Vec<Message>,
    pub tools: Vec<ToolDefinition>,
}

impl CompletionRequest {
    pub fn new(messages: Vec<Message>) -> Self {
        Self {
            system: None,
            messages,
            tools: Vec::new(),
        }
    }

    pub fn with_system(mut self, system: impl Into<String>) -> Self {
        let system = system.into();
        self.system = (!system.is_empty()).then_some(system);
        self
    }

    pub fn with_tools(mut self, tools: Vec<ToolDefinition>) -> Self {
        self.tools = tools;
        self
    }
}

/// A chat-completion backend. Implementations return exactly one assistant
/// message, which may contain tool-use requests when tools were bound.
#[async_trait]
pub trait ChatModel: Send + Sync {
    fn name(&self) -> &str;

    async fn complete(&self, request: CompletionRequest) -> Result<Message>;
}

#[async_trait]
impl<M: ChatModel + ?Sized> ChatModel for Arc<M> {
    fn name(&self) -> &str {
        (**self).name()
    }

    async fn complete(&self, request: CompletionRequest) -> Result<Message> {
        (**self).complete(request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_system_is_dropped() {
        let request = CompletionRequest::new(vec![Message::user("hi")]).with_system("");
        assert!(request.system.is_none());

        let request = request.with_system("be brief");
        assert_eq!(request.system.as_deref(), Some("be brief"));
    }
}
