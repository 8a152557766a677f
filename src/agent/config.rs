//! Agent execution configuration.

use crate::config::{DEFAULT_MAX_STEPS, Settings};

/// Execution behavior of the generic agent loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionConfig {
    /// Node visits allowed when the incoming state carries no budget of its own
    pub max_steps: usize,
}

impl Default for ExecutionConfig {
    fn default() -> Self {
        Self {
            max_steps: DEFAULT_MAX_STEPS,
        }
    }
}

impl ExecutionConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            max_steps: settings.max_steps,
        }
    }

    pub fn with_max_steps(mut self, steps: usize) -> Self {
        self.max_steps = steps;
        self
    }
}
