//! What a tool can see of the call that invoked it.

use crate::agent::AgentState;
use crate::types::Files;

/// Per-call context: the correlation id of the request and a read-only view
/// of the caller's state. Tools never mutate the state directly; file
/// changes travel back through [`ToolResult::with_files`](crate::ToolResult::with_files).
#[derive(Debug, Clone, Copy)]
pub struct ToolContext<'a> {
    tool_use_id: &'a str,
    state: &'a AgentState,
}

impl<'a> ToolContext<'a> {
    pub fn new(tool_use_id: &'a str, state: &'a AgentState) -> Self {
        Self { tool_use_id, state }
    }

    pub fn tool_use_id(&self) -> &'a str {
        self.tool_use_id
    }

    pub fn state(&self) -> &'a AgentState {
        self.state
    }

    pub fn files(&self) -> &'a Files {
        &self.state.files
    }
}
