//! Code REPL orchestrator.
//!
//! The model writes fenced code, the sandbox session runs it, and the
//! results go back to the model as a user message until a reply carries no
//! code. A last request then answers the original question using
//! everything learned.

mod agent;
mod fence;
mod format;
mod node;

pub use agent::{ReplAgent, ReplAgentBuilder, ReplOutcome};
pub use fence::{CodeFence, DEFAULT_FENCE_TAG};
pub(crate) use fence::tag_problem;
pub use format::{CHART_PLACEHOLDER, format_execution, format_failure, format_report, format_success};
pub use node::{ReplNode, recover_question};
