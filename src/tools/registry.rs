//! Name-addressed tool registry.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use super::context::ToolContext;
use super::traits::Tool;
use crate::types::{ToolDefinition, ToolError, ToolResult};
use crate::{Error, Result};

/// Tools keyed by name, listed in registration order.
#[derive(Clone, Default)]
pub struct ToolRegistry {
    tools: HashMap<String, Arc<dyn Tool>>,
    order: Vec<String>,
}

impl std::fmt::Debug for ToolRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolRegistry")
            .field("tools", &self.order)
            .finish()
    }
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tool. A tool with the same name replaces the earlier one
    /// and keeps its position.
    pub fn register(&mut self, tool: Arc<dyn Tool>) {
        let name = tool.name().to_string();
        if self.tools.insert(name.clone(), tool).is_none() {
            self.order.push(name);
        }
    }

    pub fn with(mut self, tool: Arc<dyn Tool>) -> Self {
        self.register(tool);
        self
    }

    pub fn get(&self, name: &str) -> Option<&Arc<dyn Tool>> {
        self.tools.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    pub fn names(&self) -> Vec<&str> {
        self.order.iter().map(String::as_str).collect()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.order
            .iter()
            .filter_map(|name| self.tools.get(name))
            .map(|t| t.definition())
            .collect()
    }

    /// Registry restricted to `names`, in the order given. Every name must
    /// already be registered.
    pub fn subset<S: AsRef<str>>(&self, names: &[S]) -> Result<Self> {
        let mut subset = Self::new();
        for name in names {
            let name = name.as_ref();
            let tool = self
                .tools
                .get(name)
                .ok_or_else(|| Error::config(format!("unknown tool '{}'", name)))?;
            subset.register(Arc::clone(tool));
        }
        Ok(subset)
    }

    /// Execute a tool by name. Unknown names yield an error result for the model.
    pub async fn execute(
        &self,
        name: &str,
        input: serde_json::Value,
        context: &ToolContext<'_>,
    ) -> Result<ToolResult> {
        match self.tools.get(name) {
            Some(tool) => tool.execute(input, context).await,
            None => {
                debug!(tool = name, "Model requested an unknown tool");
                Ok(ToolError::unknown_tool(name).into())
            }
        }
    }
}
