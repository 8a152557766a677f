//! Built-in sub-agents.

use std::sync::Arc;

use crate::Result;
use crate::agent::{ExecutionConfig, ReactAgent};
use crate::client::ChatModel;
use crate::tools::ToolRegistry;

/// Identity of the sub-agent that is always available.
pub const GENERAL_PURPOSE: &str = "general-purpose";

/// The general-purpose agent: the caller's instructions over every tool.
pub(crate) fn general_purpose_agent(
    model: Arc<dyn ChatModel>,
    instructions: &str,
    tools: ToolRegistry,
    config: ExecutionConfig,
) -> Result<ReactAgent> {
    ReactAgent::builder()
        .shared_model(model)
        .prompt(instructions)
        .tools(tools)
        .config(config)
        .build()
}
