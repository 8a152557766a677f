//! # deepagent
//!
//! Orchestration glue between a language model and two agent patterns:
//!
//! - [`ReplAgent`]: the model writes fenced code, a persistent sandbox session
//!   runs it, results are fed back until the model stops writing code, and a
//!   final request answers the original question.
//! - [`ReactAgent`]: a generic model/tools loop. Paired with [`TaskTool`] it
//!   delegates sub-tasks to named sub-agents and merges their files back.
//!
//! The language model, the sandbox, and individual tools sit behind the
//! [`ChatModel`], [`CodeSandbox`] and [`Tool`] traits.
//!
//! ## REPL
//!
//! ```rust,no_run
//! use deepagent::{AnthropicModel, PythonSandbox, ReplAgent};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), deepagent::Error> {
//!     let model = AnthropicModel::from_env()?;
//!     let sandbox = PythonSandbox::spawn("python3").await?;
//!     let repl = ReplAgent::builder().model(model).sandbox(sandbox).build()?;
//!
//!     let outcome = repl.run("What is the 30th Fibonacci number?").await?;
//!     println!("{}", outcome.answer);
//!     Ok(())
//! }
//! ```
//!
//! ## Sub-agents
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use deepagent::{AnthropicModel, ReactAgent, SubAgent, TaskTool, ToolRegistry};
//! use deepagent::tools::ThinkTool;
//!
//! # async fn example() -> Result<(), deepagent::Error> {
//! let model = Arc::new(AnthropicModel::from_env()?);
//! let mut tools = ToolRegistry::new();
//! tools.register(Arc::new(ThinkTool));
//!
//! let researcher = SubAgent::new("researcher", "Digs into one question", "You research.")
//!     .with_tools(["think"]);
//! let task = TaskTool::builder(model.clone(), "You are a helpful assistant.")
//!     .tools(tools.clone())
//!     .subagent(researcher)
//!     .build()?;
//! tools.register(Arc::new(task));
//!
//! let agent = ReactAgent::builder()
//!     .shared_model(model)
//!     .prompt("Delegate research with the task tool.")
//!     .tools(tools)
//!     .build()?;
//! let state = agent.run("Compare two sorting algorithms").await?;
//! println!("{}", state.last_text());
//! # Ok(())
//! # }
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod agent;
pub mod client;
pub mod config;
pub mod prompts;
pub mod repl;
pub mod sandbox;
pub mod subagents;
pub mod testing;
pub mod tools;
pub mod types;

pub use agent::{AgentGraph, AgentState, ExecutionConfig, ReactAgent, ReactAgentBuilder, ReactNode};
pub use client::{AnthropicModel, ChatModel, CompletionRequest};
pub use config::{ConfigError, Settings, SettingsLoader};
pub use repl::{CodeFence, ReplAgent, ReplAgentBuilder, ReplNode, ReplOutcome};
pub use sandbox::{CodeSandbox, PythonSandbox, SandboxSession};
pub use subagents::{GENERAL_PURPOSE, SubAgent, TaskInput, TaskTool, TaskToolBuilder};
pub use tools::{SchemaTool, Tool, ToolContext, ToolRegistry};
pub use types::{
    Chart, ContentBlock, Execution, ExecutionArtifact, ExecutionError, Files, Logs, Message, Role,
    ToolDefinition, ToolError, ToolOutput, ToolResult, ToolResultBlock, ToolUseBlock,
};

/// Error type for deepagent operations.
///
/// Only failures that end a turn are errors. Code that fails in the sandbox,
/// unknown tools, and unknown sub-agents are reported back to the model instead.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// Model API returned an error response.
    #[error("API error (HTTP {status}): {message}", status = status.map(|s| s.to_string()).unwrap_or_else(|| "unknown".into()))]
    Api {
        message: String,
        status: Option<u16>,
        error_type: Option<String>,
    },

    /// Network connectivity or request failed.
    #[error("Network request failed: {0}")]
    Network(#[from] reqwest::Error),

    /// JSON serialization or deserialization failed.
    #[error("JSON parsing failed: {0}")]
    Json(#[from] serde_json::Error),

    /// Failed to parse a response or protocol frame.
    #[error("Parse error: {0}")]
    Parse(String),

    /// Invalid or missing configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Sandbox process failed outside of user code.
    #[error("Sandbox error: {0}")]
    Sandbox(String),

    /// File system or process I/O failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// API rate limit exceeded.
    #[error("Rate limit exceeded{}", match retry_after {
        Some(d) => format!(", retry in {:.0}s", d.as_secs_f64()),
        None => String::new(),
    })]
    RateLimit {
        retry_after: Option<std::time::Duration>,
    },

    /// Operation exceeded timeout.
    #[error("Operation timed out after {:.1}s", .0.as_secs_f64())]
    Timeout(std::time::Duration),
}

/// Error category for unified error handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Configuration, parsing, or setup errors
    Configuration,
    /// Network, rate limit, or transient errors that may succeed on retry
    Transient,
    /// Internal errors (IO, JSON, sandbox process)
    Internal,
    /// Resource limits (timeouts)
    ResourceLimit,
}

impl Error {
    pub fn config(message: impl Into<String>) -> Self {
        Error::Config(message.into())
    }

    pub fn sandbox(message: impl Into<String>) -> Self {
        Error::Sandbox(message.into())
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Error::Config(_) | Error::Parse(_) => ErrorCategory::Configuration,
            Error::Api {
                status: Some(401 | 403 | 400 | 404),
                ..
            } => ErrorCategory::Configuration,

            Error::Network(_) | Error::RateLimit { .. } => ErrorCategory::Transient,
            Error::Api {
                status: Some(500..=599),
                ..
            } => ErrorCategory::Transient,

            Error::Timeout(_) => ErrorCategory::ResourceLimit,

            Error::Io(_) | Error::Json(_) | Error::Sandbox(_) | Error::Api { .. } => {
                ErrorCategory::Internal
            }
        }
    }

    pub fn is_configuration_error(&self) -> bool {
        self.category() == ErrorCategory::Configuration
    }

    pub fn is_retryable(&self) -> bool {
        self.category() == ErrorCategory::Transient
    }

    pub fn status_code(&self) -> Option<u16> {
        match self {
            Error::Api { status, .. } => *status,
            _ => None,
        }
    }

    pub fn retry_after(&self) -> Option<std::time::Duration> {
        match self {
            Error::RateLimit { retry_after } => *retry_after,
            _ => None,
        }
    }
}

impl From<config::ConfigError> for Error {
    fn from(err: config::ConfigError) -> Self {
        match err {
            config::ConfigError::Io(e) => Error::Io(e),
            config::ConfigError::Serialization(e) => Error::Json(e),
            other => Error::Config(other.to_string()),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::Api {
            message: "Invalid API key".to_string(),
            status: Some(401),
            error_type: None,
        };
        assert!(err.to_string().contains("Invalid API key"));
        assert!(err.to_string().contains("401"));
    }

    #[test]
    fn test_error_is_retryable() {
        let rate_limit = Error::RateLimit { retry_after: None };
        assert!(rate_limit.is_retryable());

        let server_error = Error::Api {
            message: "Internal error".to_string(),
            status: Some(500),
            error_type: None,
        };
        assert!(server_error.is_retryable());

        assert!(!Error::config("missing key").is_retryable());
        assert!(!Error::sandbox("broken pipe").is_retryable());
    }

    #[test]
    fn test_config_error_conversion() {
        let config_err = config::ConfigError::InvalidValue {
            key: "repl.max_code_rounds".to_string(),
            message: "must be positive".to_string(),
        };
        let err: Error = config_err.into();
        assert!(err.is_configuration_error());
    }
}
