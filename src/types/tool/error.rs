//! Tool error types.

use thiserror::Error;

/// Recoverable tool failures. These are reported back to the model as
/// error tool results, never raised out of the agent loop.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ToolError {
    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    #[error("{message}")]
    ExecutionFailed { message: String },

    #[error("Unknown tool: {name}")]
    UnknownTool { name: String },

    #[error("Error: invoked agent of type {name}, the only allowed types are {allowed}")]
    UnknownSubagent { name: String, allowed: String },

    #[error("Error: agent of type {name} ran out of steps before finishing the task")]
    SubagentIncomplete { name: String },
}

impl ToolError {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    pub fn execution_failed(message: impl Into<String>) -> Self {
        Self::ExecutionFailed {
            message: message.into(),
        }
    }

    pub fn unknown_tool(name: impl Into<String>) -> Self {
        Self::UnknownTool { name: name.into() }
    }

    pub fn subagent_incomplete(name: impl Into<String>) -> Self {
        Self::SubagentIncomplete { name: name.into() }
    }

    pub fn unknown_subagent<'a>(
        name: impl Into<String>,
        allowed: impl IntoIterator<Item = &'a str>,
    ) -> Self {
        Self::UnknownSubagent {
            name: name.into(),
            allowed: allowed
                .into_iter()
                .map(|n| format!("`{}`", n))
                .collect::<Vec<_>>()
                .join(", "),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_subagent_lists_allowed_types() {
        let err = ToolError::unknown_subagent("xyz", ["general-purpose", "researcher"]);
        assert_eq!(
            err.to_string(),
            "Error: invoked agent of type xyz, the only allowed types are `general-purpose`, `researcher`"
        );
    }

    #[test]
    fn test_unknown_tool_message() {
        assert_eq!(ToolError::unknown_tool("nope").to_string(), "Unknown tool: nope");
    }
}
