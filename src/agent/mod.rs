//! Generic agent loop and the state it runs over.

mod config;
mod graph;
mod react;
mod state;

pub use config::ExecutionConfig;
pub use graph::{AgentGraph, ReactNode};
pub use react::{ReactAgent, ReactAgentBuilder};
pub use state::AgentState;
