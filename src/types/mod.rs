//! Core types shared by the orchestrators.

use std::collections::BTreeMap;

pub mod content;
pub mod execution;
mod message;
mod tool;

pub use content::{ContentBlock, ToolResultBlock, ToolUseBlock};
pub use execution::{Chart, Execution, ExecutionArtifact, ExecutionError, Logs};
pub use message::{Message, MessageMetadata, Role};
pub use tool::{ToolDefinition, ToolError, ToolOutput, ToolResult};

/// Artifacts passed between an agent and its sub-agents, keyed by file name.
/// Contents are opaque to the orchestrators.
pub type Files = BTreeMap<String, String>;
