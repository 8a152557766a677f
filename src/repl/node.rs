//! REPL state machine.

use super::CodeFence;
use crate::agent::AgentState;
use crate::types::Message;

/// Nodes of the code REPL loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplNode {
    /// Ask the model for the next step
    Agent,
    /// Run the fenced blocks of the latest message
    Code,
    /// Ask once more for an answer to the original question
    FinalAnswer,
    Done,
}

impl ReplNode {
    /// Where to go after this node, given the state it produced.
    pub fn next(self, state: &AgentState, fence: &CodeFence) -> Self {
        match self {
            Self::Agent => {
                let latest = state.last_text();
                if fence.contains_code(&latest) {
                    Self::Code
                } else {
                    Self::FinalAnswer
                }
            }
            Self::Code => Self::Agent,
            Self::FinalAnswer | Self::Done => Self::Done,
        }
    }
}

/// Most recent user message that is not an execution report.
pub fn recover_question(messages: &[Message]) -> Option<String> {
    messages
        .iter()
        .rev()
        .find(|m| m.is_user() && !m.has_executions())
        .map(Message::text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Execution;

    fn state_ending_with(text: &str) -> AgentState {
        let mut state = AgentState::from_prompt("q");
        state.push(Message::assistant(text));
        state
    }

    #[test]
    fn test_agent_without_code_goes_to_final_answer() {
        let fence = CodeFence::default();
        let state = state_ending_with("The answer is 4, no code needed.");
        assert_eq!(ReplNode::Agent.next(&state, &fence), ReplNode::FinalAnswer);
    }

    #[test]
    fn test_agent_with_code_goes_to_code() {
        let fence = CodeFence::default();
        let state = state_ending_with("```python-execute\nprint(1)\n```");
        assert_eq!(ReplNode::Agent.next(&state, &fence), ReplNode::Code);
    }

    #[test]
    fn test_fixed_edges() {
        let fence = CodeFence::default();
        let state = AgentState::default();
        assert_eq!(ReplNode::Code.next(&state, &fence), ReplNode::Agent);
        assert_eq!(ReplNode::FinalAnswer.next(&state, &fence), ReplNode::Done);
        assert_eq!(ReplNode::Done.next(&state, &fence), ReplNode::Done);
    }

    #[test]
    fn test_recover_question_skips_execution_reports() {
        let messages = vec![
            Message::user("Q"),
            Message::assistant("```python-execute\n1\n```"),
            Message::execution_report("Result of block 0", vec![Execution::default()]),
            Message::assistant("```python-execute\n2\n```"),
            Message::execution_report("Result of block 0", vec![Execution::default()]),
        ];
        assert_eq!(recover_question(&messages).as_deref(), Some("Q"));
    }

    #[test]
    fn test_recover_question_prefers_latest() {
        let messages = vec![
            Message::user("first"),
            Message::assistant("done"),
            Message::user("second"),
        ];
        assert_eq!(recover_question(&messages).as_deref(), Some("second"));
        assert_eq!(recover_question(&[]), None);
    }
}
