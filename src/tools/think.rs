//! Think tool - a scratchpad the model can write reasoning into.

use async_trait::async_trait;
use schemars::JsonSchema;
use serde::Deserialize;

use super::{SchemaTool, ToolContext};
use crate::types::ToolResult;

#[derive(Debug, Deserialize, JsonSchema)]
pub struct ThinkInput {
    /// Your thoughts
    pub thought: String,
}

/// Records a thought without side effects. Useful for letting the model
/// reason between tool calls.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThinkTool;

#[async_trait]
impl SchemaTool for ThinkTool {
    type Input = ThinkInput;
    const NAME: &'static str = "think";
    const DESCRIPTION: &'static str = "Use it for thinking.";

    async fn handle(&self, input: ThinkInput, _context: &ToolContext<'_>) -> ToolResult {
        tracing::trace!(thought = %input.thought, "think");
        ToolResult::success(input.thought)
    }
}
