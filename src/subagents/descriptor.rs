//! Sub-agent descriptors.

use std::sync::Arc;

use crate::agent::AgentGraph;

/// A named sub-agent the `task` tool can dispatch to.
///
/// Without a graph the dispatcher builds a [`ReactAgent`](crate::ReactAgent)
/// from `prompt` and either the named tool subset or every tool.
#[derive(Clone)]
pub struct SubAgent {
    /// Identity the model passes as `subagent_type`
    pub name: String,
    /// Shown to the model in the `task` tool description
    pub description: String,
    /// System prompt of the generated agent
    pub prompt: String,
    /// Restricts the generated agent to these tools
    pub tools: Option<Vec<String>>,
    /// Pre-built graph used instead of a generated agent
    pub graph: Option<Arc<dyn AgentGraph>>,
}

impl std::fmt::Debug for SubAgent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SubAgent")
            .field("name", &self.name)
            .field("description", &self.description)
            .field("tools", &self.tools)
            .field("graph", &self.graph.is_some())
            .finish()
    }
}

impl SubAgent {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        prompt: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            prompt: prompt.into(),
            tools: None,
            graph: None,
        }
    }

    pub fn with_tools(mut self, tools: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.tools = Some(tools.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_graph(mut self, graph: impl AgentGraph + 'static) -> Self {
        self.graph = Some(Arc::new(graph));
        self
    }

    pub fn with_shared_graph(mut self, graph: Arc<dyn AgentGraph>) -> Self {
        self.graph = Some(graph);
        self
    }
}
