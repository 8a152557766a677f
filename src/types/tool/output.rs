//! What a tool hands back to the tools node.

use super::error::ToolError;
use crate::types::Files;

/// Text for the model, or a recoverable failure rendered as an error result.
#[derive(Debug, Clone, PartialEq)]
pub enum ToolOutput {
    Success(String),
    Error(ToolError),
}

impl ToolOutput {
    pub fn success(content: impl Into<String>) -> Self {
        Self::Success(content.into())
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::Error(ToolError::execution_failed(message))
    }

    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::Error(ToolError::invalid_input(message))
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }

    pub fn text(&self) -> String {
        match self {
            Self::Success(content) => content.clone(),
            Self::Error(e) => e.to_string(),
        }
    }
}

impl From<ToolError> for ToolOutput {
    fn from(error: ToolError) -> Self {
        Self::Error(error)
    }
}

/// Outcome of one tool call. `files` is merged into the caller's state
/// right after the call, before the next call in the same turn runs.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolResult {
    pub output: ToolOutput,
    pub files: Option<Files>,
}

impl ToolResult {
    pub fn success(content: impl Into<String>) -> Self {
        ToolOutput::success(content).into()
    }

    pub fn error(message: impl Into<String>) -> Self {
        ToolOutput::error(message).into()
    }

    pub fn with_files(mut self, files: Files) -> Self {
        self.files = Some(files);
        self
    }

    pub fn is_error(&self) -> bool {
        self.output.is_error()
    }

    pub fn text(&self) -> String {
        self.output.text()
    }

    pub fn as_error(&self) -> Option<&ToolError> {
        match &self.output {
            ToolOutput::Error(e) => Some(e),
            ToolOutput::Success(_) => None,
        }
    }
}

impl From<ToolOutput> for ToolResult {
    fn from(output: ToolOutput) -> Self {
        Self {
            output,
            files: None,
        }
    }
}

impl From<ToolError> for ToolResult {
    fn from(error: ToolError) -> Self {
        ToolOutput::Error(error).into()
    }
}
