//! Conversation message types.

use serde::{Deserialize, Serialize};

use super::ContentBlock;
use super::content::{ToolResultBlock, ToolUseBlock};
use super::execution::Execution;

/// Role of a message participant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Human input, including REPL execution reports
    User,
    /// Model output
    Assistant,
    /// Result of a tool call
    Tool,
}

/// Structured data attached to a message and never shown to the model.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MessageMetadata {
    /// Raw sandbox records behind a REPL execution report.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub executions: Vec<Execution>,
}

/// A message in a conversation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: Vec<ContentBlock>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<MessageMetadata>,
}

impl Message {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: vec![ContentBlock::text(text)],
            metadata: None,
        }
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: vec![ContentBlock::text(text)],
            metadata: None,
        }
    }

    pub fn assistant_with_content(content: Vec<ContentBlock>) -> Self {
        Self {
            role: Role::Assistant,
            content,
            metadata: None,
        }
    }

    pub fn tool_result(result: ToolResultBlock) -> Self {
        Self {
            role: Role::Tool,
            content: vec![ContentBlock::ToolResult(result)],
            metadata: None,
        }
    }

    /// User message reporting sandbox output, with the raw records attached.
    pub fn execution_report(text: impl Into<String>, executions: Vec<Execution>) -> Self {
        Self {
            role: Role::User,
            content: vec![ContentBlock::text(text)],
            metadata: Some(MessageMetadata { executions }),
        }
    }

    pub fn text(&self) -> String {
        self.content
            .iter()
            .filter_map(|block| block.as_text())
            .collect::<Vec<_>>()
            .join("")
    }

    pub fn has_tool_use(&self) -> bool {
        self.content
            .iter()
            .any(|block| matches!(block, ContentBlock::ToolUse(_)))
    }

    pub fn tool_uses(&self) -> Vec<&ToolUseBlock> {
        self.content
            .iter()
            .filter_map(|block| block.as_tool_use())
            .collect()
    }

    pub fn executions(&self) -> Option<&[Execution]> {
        self.metadata.as_ref().map(|m| m.executions.as_slice())
    }

    /// True for REPL execution reports, which carry execution metadata.
    pub fn has_executions(&self) -> bool {
        self.metadata.is_some()
    }

    pub fn is_user(&self) -> bool {
        self.role == Role::User
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_message() {
        let msg = Message::user("Hello");
        assert_eq!(msg.role, Role::User);
        assert_eq!(msg.text(), "Hello");
        assert!(!msg.has_executions());
    }

    #[test]
    fn test_assistant_message() {
        let msg = Message::assistant("Hi there!");
        assert_eq!(msg.role, Role::Assistant);
        assert_eq!(msg.text(), "Hi there!");
    }

    #[test]
    fn test_tool_uses_in_order() {
        let msg = Message::assistant_with_content(vec![
            ContentBlock::text("let me check"),
            ContentBlock::ToolUse(ToolUseBlock::new("a", "think", serde_json::json!({}))),
            ContentBlock::ToolUse(ToolUseBlock::new("b", "task", serde_json::json!({}))),
        ]);
        assert!(msg.has_tool_use());
        let ids: Vec<&str> = msg.tool_uses().iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
        assert_eq!(msg.text(), "let me check");
    }

    #[test]
    fn test_execution_report_carries_metadata() {
        let msg = Message::execution_report("Result of block 0", vec![Execution::default()]);
        assert!(msg.is_user());
        assert!(msg.has_executions());
        assert_eq!(msg.executions().map(<[Execution]>::len), Some(1));
    }

    #[test]
    fn test_metadata_not_serialized_when_absent() {
        let json = serde_json::to_value(Message::user("q")).unwrap();
        assert!(json.get("metadata").is_none());
        assert_eq!(json["role"], "user");
    }
}
