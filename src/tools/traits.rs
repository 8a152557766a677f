//! Tool trait definitions.

use async_trait::async_trait;
use schemars::JsonSchema;
use serde::de::DeserializeOwned;

use super::context::ToolContext;
use crate::Result;
use crate::types::{ToolDefinition, ToolResult};

/// Core tool trait for all tool implementations.
///
/// `Ok` results, including error outputs, go back to the model. `Err` ends
/// the agent's turn and is reserved for transport failures.
#[async_trait]
pub trait Tool: Send + Sync {
    fn name(&self) -> &str;
    fn description(&self) -> &str;
    fn input_schema(&self) -> serde_json::Value;
    async fn execute(&self, input: serde_json::Value, context: &ToolContext<'_>)
    -> Result<ToolResult>;

    fn definition(&self) -> ToolDefinition {
        ToolDefinition::new(self.name(), self.description(), self.input_schema())
    }
}

/// Schema-based tool trait with automatic JSON schema generation.
///
/// Provides a higher-level abstraction over `Tool` with typed inputs
/// and automatic schema derivation via schemars.
#[async_trait]
pub trait SchemaTool: Send + Sync {
    type Input: JsonSchema + DeserializeOwned + Send;
    const NAME: &'static str;
    const DESCRIPTION: &'static str;

    async fn handle(&self, input: Self::Input, context: &ToolContext<'_>) -> ToolResult;

    fn input_schema() -> serde_json::Value {
        schema_for::<Self::Input>()
    }
}

/// JSON schema for a tool input type, normalized to always carry `properties`.
pub fn schema_for<T: JsonSchema>() -> serde_json::Value {
    let schema = schemars::schema_for!(T);
    let mut value =
        serde_json::to_value(schema).unwrap_or_else(|_| serde_json::json!({"type": "object"}));

    if let Some(obj) = value.as_object_mut() {
        obj.remove("$schema");
        obj.entry("properties")
            .or_insert_with(|| serde_json::Value::Object(serde_json::Map::new()));
    }

    value
}

#[async_trait]
impl<T: SchemaTool + 'static> Tool for T {
    fn name(&self) -> &str {
        T::NAME
    }

    fn description(&self) -> &str {
        T::DESCRIPTION
    }

    fn input_schema(&self) -> serde_json::Value {
        T::input_schema()
    }

    async fn execute(
        &self,
        input: serde_json::Value,
        context: &ToolContext<'_>,
    ) -> Result<ToolResult> {
        Ok(match serde_json::from_value::<T::Input>(input) {
            Ok(typed) => SchemaTool::handle(self, typed, context).await,
            Err(e) => ToolResult::from(crate::types::ToolOutput::invalid_input(e.to_string())),
        })
    }
}
