//! Tools the generic agent can call.

mod context;
mod registry;
mod think;
mod traits;

pub use context::ToolContext;
pub use registry::ToolRegistry;
pub use think::{ThinkInput, ThinkTool};
pub use traits::{SchemaTool, Tool, schema_for};
