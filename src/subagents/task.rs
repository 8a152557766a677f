//! TaskTool - runs a named sub-agent on a delegated task.

use std::sync::Arc;

use async_trait::async_trait;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::builtin::{GENERAL_PURPOSE, general_purpose_agent};
use super::SubAgent;
use crate::agent::{AgentGraph, AgentState, ExecutionConfig, ReactAgent};
use crate::client::ChatModel;
use crate::prompts::{GENERAL_PURPOSE_DESCRIPTION, task_description};
use crate::tools::{Tool, ToolContext, ToolRegistry, schema_for};
use crate::types::{ToolError, ToolOutput, ToolResult};
use crate::{Error, Result};

/// Input parameters for the `task` tool
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct TaskInput {
    /// Detailed description of the task for the sub-agent to perform
    pub description: String,
    /// Which registered sub-agent to run
    pub subagent_type: String,
}

struct RegisteredAgent {
    name: String,
    description: String,
    graph: Arc<dyn AgentGraph>,
}

/// Tool named `task` that dispatches to registered sub-agents.
pub struct TaskTool {
    agents: Vec<RegisteredAgent>,
    description: String,
}

impl std::fmt::Debug for TaskTool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaskTool")
            .field("agents", &self.agent_names())
            .finish()
    }
}

impl TaskTool {
    pub const NAME: &'static str = "task";

    /// Start building a dispatcher. `instructions` becomes the prompt of the
    /// general-purpose sub-agent.
    pub fn builder(model: Arc<dyn ChatModel>, instructions: impl Into<String>) -> TaskToolBuilder {
        TaskToolBuilder::new(model, instructions)
    }

    /// Registered identities, general-purpose first.
    pub fn agent_names(&self) -> Vec<&str> {
        self.agents.iter().map(|a| a.name.as_str()).collect()
    }

    fn resolve(&self, subagent_type: &str) -> std::result::Result<&Arc<dyn AgentGraph>, ToolError> {
        self.agents
            .iter()
            .find(|a| a.name == subagent_type)
            .map(|a| &a.graph)
            .ok_or_else(|| ToolError::unknown_subagent(subagent_type, self.agent_names()))
    }

    /// Run one delegated task against the caller's state.
    ///
    /// The result carries the sub-agent's final text and its files as an
    /// update for the caller. A sub-agent that runs out of steps yields an
    /// error result without files.
    pub async fn dispatch(&self, input: TaskInput, caller: &AgentState) -> Result<ToolResult> {
        let graph = match self.resolve(&input.subagent_type) {
            Ok(graph) => graph,
            Err(e) => {
                warn!(subagent = %input.subagent_type, "Unknown sub-agent requested");
                return Ok(e.into());
            }
        };

        info!(subagent = %input.subagent_type, "Dispatching task");
        let result = graph.invoke(caller.derived(input.description)).await?;
        debug!(
            subagent = %input.subagent_type,
            messages = result.messages.len(),
            files = result.files.len(),
            "Sub-agent finished"
        );

        if result.budget_exhausted() {
            warn!(subagent = %input.subagent_type, "Sub-agent ran out of steps");
            return Ok(ToolError::subagent_incomplete(&input.subagent_type).into());
        }

        let text = result.last_text();
        Ok(ToolResult::success(text).with_files(result.files))
    }
}

#[async_trait]
impl Tool for TaskTool {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn input_schema(&self) -> serde_json::Value {
        schema_for::<TaskInput>()
    }

    async fn execute(
        &self,
        input: serde_json::Value,
        context: &ToolContext<'_>,
    ) -> Result<ToolResult> {
        let input: TaskInput = match serde_json::from_value(input) {
            Ok(input) => input,
            Err(e) => return Ok(ToolOutput::invalid_input(e.to_string()).into()),
        };
        self.dispatch(input, context.state()).await
    }
}

/// Builder for [`TaskTool`].
pub struct TaskToolBuilder {
    model: Arc<dyn ChatModel>,
    instructions: String,
    tools: ToolRegistry,
    subagents: Vec<SubAgent>,
    config: ExecutionConfig,
}

impl TaskToolBuilder {
    pub fn new(model: Arc<dyn ChatModel>, instructions: impl Into<String>) -> Self {
        Self {
            model,
            instructions: instructions.into(),
            tools: ToolRegistry::new(),
            subagents: Vec::new(),
            config: ExecutionConfig::default(),
        }
    }

    /// Tools available to generated sub-agents.
    pub fn tools(mut self, tools: ToolRegistry) -> Self {
        self.tools = tools;
        self
    }

    pub fn subagent(mut self, subagent: SubAgent) -> Self {
        self.subagents.push(subagent);
        self
    }

    pub fn subagents(mut self, subagents: impl IntoIterator<Item = SubAgent>) -> Self {
        self.subagents.extend(subagents);
        self
    }

    /// Execution settings for generated sub-agents.
    pub fn config(mut self, config: ExecutionConfig) -> Self {
        self.config = config;
        self
    }

    /// Build the dispatcher, failing when a descriptor names an unknown tool.
    pub fn build(self) -> Result<TaskTool> {
        let mut agents = vec![RegisteredAgent {
            name: GENERAL_PURPOSE.to_string(),
            description: GENERAL_PURPOSE_DESCRIPTION.to_string(),
            graph: Arc::new(general_purpose_agent(
                Arc::clone(&self.model),
                &self.instructions,
                self.tools.clone(),
                self.config.clone(),
            )?),
        }];

        for subagent in self.subagents {
            let tools = match &subagent.tools {
                Some(names) => {
                    if let Some(unknown) = names.iter().find(|n| !self.tools.contains(n.as_str())) {
                        return Err(Error::config(format!(
                            "sub-agent '{}' names unknown tool '{}'",
                            subagent.name, unknown
                        )));
                    }
                    self.tools.subset(names.as_slice())?
                }
                None => self.tools.clone(),
            };

            let graph = match subagent.graph {
                Some(graph) => graph,
                None => {
                    let agent = ReactAgent::builder()
                        .shared_model(Arc::clone(&self.model))
                        .prompt(subagent.prompt)
                        .tools(tools)
                        .config(self.config.clone())
                        .build()?;
                    Arc::new(agent) as Arc<dyn AgentGraph>
                }
            };

            let entry = RegisteredAgent {
                name: subagent.name,
                description: subagent.description,
                graph,
            };
            match agents.iter_mut().find(|a| a.name == entry.name) {
                Some(existing) => *existing = entry,
                None => agents.push(entry),
            }
        }

        let description =
            task_description(agents.iter().map(|a| (a.name.as_str(), a.description.as_str())));
        debug!(agents = agents.len(), "Built task tool");

        Ok(TaskTool {
            agents,
            description,
        })
    }
}
