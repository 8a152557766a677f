//! Sub-agent delegation.
//!
//! A [`TaskTool`] exposes registered [`SubAgent`]s to a parent agent as a
//! single `task` tool. Each call runs the chosen sub-agent on a fresh
//! conversation seeded with the task description and the parent's files,
//! then returns the sub-agent's final text and merges its files back.

mod builtin;
mod descriptor;
mod task;

pub use builtin::GENERAL_PURPOSE;
pub use descriptor::SubAgent;
pub use task::{TaskInput, TaskTool, TaskToolBuilder};
