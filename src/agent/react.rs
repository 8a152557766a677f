//! Generic tool-using agent.

use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use tracing::{debug, info, instrument, warn};

use super::{AgentGraph, AgentState, ExecutionConfig, ReactNode};
use crate::client::{ChatModel, CompletionRequest};
use crate::tools::{Tool, ToolContext, ToolRegistry};
use crate::types::{ToolResultBlock, ToolUseBlock};
use crate::{Error, Message, Result};

/// A model bound to a tool registry, alternating between model turns and
/// tool execution until the model stops asking for tools.
#[derive(Clone)]
pub struct ReactAgent {
    model: Arc<dyn ChatModel>,
    prompt: String,
    tools: ToolRegistry,
    config: ExecutionConfig,
}

impl std::fmt::Debug for ReactAgent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReactAgent")
            .field("model", &self.model.name())
            .field("tools", &self.tools)
            .field("config", &self.config)
            .finish()
    }
}

impl ReactAgent {
    pub fn builder() -> ReactAgentBuilder {
        ReactAgentBuilder::default()
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn tools(&self) -> &ToolRegistry {
        &self.tools
    }

    pub fn config(&self) -> &ExecutionConfig {
        &self.config
    }

    /// Run a single user prompt to completion.
    pub async fn run(&self, prompt: impl Into<String>) -> Result<AgentState> {
        self.invoke(AgentState::from_prompt(prompt)).await
    }

    async fn call_model(&self, state: &mut AgentState) -> Result<()> {
        let request = CompletionRequest::new(state.messages.clone())
            .with_system(self.prompt.as_str())
            .with_tools(self.tools.definitions());

        let start = Instant::now();
        let response = self.model.complete(request).await?;
        debug!(
            model = self.model.name(),
            api_time_ms = start.elapsed().as_millis() as u64,
            tool_calls = response.tool_uses().len(),
            "Model call completed"
        );

        state.push(response);
        Ok(())
    }

    async fn call_tools(&self, state: &mut AgentState) -> Result<()> {
        let tool_uses: Vec<ToolUseBlock> = state
            .last_message()
            .map(|m| m.tool_uses().into_iter().cloned().collect())
            .unwrap_or_default();

        for tool_use in tool_uses {
            let start = Instant::now();
            let result = {
                let context = ToolContext::new(&tool_use.id, state);
                self.tools
                    .execute(&tool_use.name, tool_use.input.clone(), &context)
                    .await?
            };
            debug!(
                tool = %tool_use.name,
                duration_ms = start.elapsed().as_millis() as u64,
                is_error = result.is_error(),
                "Tool execution completed"
            );

            let block = ToolResultBlock::from_tool_result(&tool_use.id, &result);
            if let Some(files) = result.files {
                state.merge_files(files);
            }
            state.push(Message::tool_result(block));
        }
        Ok(())
    }
}

#[async_trait]
impl AgentGraph for ReactAgent {
    #[instrument(skip(self, state), fields(run_id = %uuid::Uuid::new_v4()))]
    async fn invoke(&self, mut state: AgentState) -> Result<AgentState> {
        if state.remaining_steps.is_none() {
            state.remaining_steps = Some(self.config.max_steps);
        }
        info!(
            messages = state.messages.len(),
            tools = self.tools.len(),
            "Starting agent run"
        );

        let mut node = ReactNode::Model;
        let mut model_calls = 0usize;
        loop {
            match node {
                ReactNode::Model => {
                    if !state.take_step() {
                        warn!(max_steps = self.config.max_steps, "Step budget exhausted");
                        break;
                    }
                    model_calls += 1;
                    debug!(iteration = model_calls, "Calling model");
                    self.call_model(&mut state).await?;
                }
                ReactNode::Tools => {
                    state.take_step();
                    self.call_tools(&mut state).await?;
                }
                ReactNode::End => break,
            }
            node = node.next(&state);
        }

        info!(
            model_calls,
            messages = state.messages.len(),
            files = state.files.len(),
            "Agent run finished"
        );
        Ok(state)
    }
}

/// Builder for [`ReactAgent`].
#[derive(Default)]
pub struct ReactAgentBuilder {
    model: Option<Arc<dyn ChatModel>>,
    prompt: String,
    tools: ToolRegistry,
    config: ExecutionConfig,
}

impl ReactAgentBuilder {
    pub fn model(self, model: impl ChatModel + 'static) -> Self {
        self.shared_model(Arc::new(model))
    }

    pub fn shared_model(mut self, model: Arc<dyn ChatModel>) -> Self {
        self.model = Some(model);
        self
    }

    pub fn prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = prompt.into();
        self
    }

    pub fn tools(mut self, tools: ToolRegistry) -> Self {
        self.tools = tools;
        self
    }

    pub fn tool(mut self, tool: impl Tool + 'static) -> Self {
        self.tools.register(Arc::new(tool));
        self
    }

    pub fn config(mut self, config: ExecutionConfig) -> Self {
        self.config = config;
        self
    }

    pub fn max_steps(mut self, steps: usize) -> Self {
        self.config.max_steps = steps;
        self
    }

    pub fn build(self) -> Result<ReactAgent> {
        let model = self
            .model
            .ok_or_else(|| Error::config("ReactAgent requires a model"))?;
        Ok(ReactAgent {
            model,
            prompt: self.prompt,
            tools: self.tools,
            config: self.config,
        })
    }
}
