//! Conversation state threaded through every orchestrator.

use serde::{Deserialize, Serialize};

use crate::types::{Files, Message, Role};

/// Messages, files and an optional step countdown, owned by one invocation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AgentState {
    pub messages: Vec<Message>,
    #[serde(default)]
    pub files: Files,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remaining_steps: Option<usize>,
}

impl AgentState {
    pub fn new(messages: Vec<Message>) -> Self {
        Self {
            messages,
            ..Default::default()
        }
    }

    /// State holding a single user message.
    pub fn from_prompt(prompt: impl Into<String>) -> Self {
        Self::new(vec![Message::user(prompt)])
    }

    pub fn with_files(mut self, files: Files) -> Self {
        self.files = files;
        self
    }

    pub fn with_remaining_steps(mut self, steps: usize) -> Self {
        self.remaining_steps = Some(steps);
        self
    }

    pub fn push(&mut self, message: Message) {
        self.messages.push(message);
    }

    pub fn last_message(&self) -> Option<&Message> {
        self.messages.last()
    }

    /// Text of the latest message, empty when there is none.
    pub fn last_text(&self) -> String {
        self.last_message().map(Message::text).unwrap_or_default()
    }

    /// Merge a file update. Keys in `update` overwrite existing entries.
    pub fn merge_files(&mut self, update: Files) {
        self.files.extend(update);
    }

    /// Fresh state for a delegated task: the description as the only
    /// message and a copy of this state's files.
    pub fn derived(&self, description: impl Into<String>) -> Self {
        Self {
            messages: vec![Message::user(description)],
            files: self.files.clone(),
            remaining_steps: None,
        }
    }

    /// Whether the step budget ran out before the model gave a final reply.
    pub fn budget_exhausted(&self) -> bool {
        let finished = self
            .last_message()
            .is_some_and(|m| m.role == Role::Assistant && !m.has_tool_use());
        self.remaining_steps == Some(0) && !finished
    }

    /// Consume one step. Returns `false` when the budget was already spent.
    pub(crate) fn take_step(&mut self) -> bool {
        match self.remaining_steps.as_mut() {
            Some(0) => false,
            Some(n) => {
                *n -= 1;
                true
            }
            None => true,
        }
    }
}
