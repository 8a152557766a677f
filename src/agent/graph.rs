//! The invoke-to-completion seam shared by every orchestrator.

use std::sync::Arc;

use async_trait::async_trait;

use super::AgentState;
use crate::Result;

/// Something that runs a conversation state to completion.
///
/// Implemented by [`ReactAgent`](super::ReactAgent) and
/// [`ReplAgent`](crate::ReplAgent), so either can serve as a sub-agent.
#[async_trait]
pub trait AgentGraph: Send + Sync {
    async fn invoke(&self, state: AgentState) -> Result<AgentState>;
}

#[async_trait]
impl<G: AgentGraph + ?Sized> AgentGraph for Arc<G> {
    async fn invoke(&self, state: AgentState) -> Result<AgentState> {
        (**self).invoke(state).await
    }
}

/// Nodes of the generic tool-using loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReactNode {
    Model,
    Tools,
    End,
}

impl ReactNode {
    /// Where to go after this node, given the state it produced.
    pub fn next(self, state: &AgentState) -> Self {
        match self {
            Self::Model => {
                if state.last_message().is_some_and(|m| m.has_tool_use()) {
                    Self::Tools
                } else {
                    Self::End
                }
            }
            Self::Tools => Self::Model,
            Self::End => Self::End,
        }
    }
}
