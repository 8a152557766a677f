//! Code execution sandboxes.
//!
//! A [`CodeSandbox`] runs one code block at a time against interpreter state
//! that persists between calls. [`SandboxSession`] is the handle a REPL
//! agent owns; it serializes access so blocks never interleave.

mod python;

pub use python::{DEFAULT_SANDBOX_TIMEOUT, PythonSandbox};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::Result;
use crate::types::Execution;

/// An interpreter that runs code blocks against persistent state.
///
/// Failures inside the executed code are reported in
/// [`Execution::error`]; `Err` means the sandbox itself broke.
#[async_trait]
pub trait CodeSandbox: Send {
    async fn run_code(&mut self, code: &str) -> Result<Execution>;
}

#[async_trait]
impl<S: CodeSandbox + ?Sized> CodeSandbox for Box<S> {
    async fn run_code(&mut self, code: &str) -> Result<Execution> {
        (**self).run_code(code).await
    }
}

/// Exclusive handle to one sandbox for the lifetime of its owner.
pub struct SandboxSession {
    sandbox: Mutex<Box<dyn CodeSandbox>>,
}

impl std::fmt::Debug for SandboxSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SandboxSession").finish_non_exhaustive()
    }
}

impl SandboxSession {
    pub fn new(sandbox: impl CodeSandbox + 'static) -> Self {
        Self {
            sandbox: Mutex::new(Box::new(sandbox)),
        }
    }

    pub fn from_boxed(sandbox: Box<dyn CodeSandbox>) -> Self {
        Self {
            sandbox: Mutex::new(sandbox),
        }
    }

    /// Run one block. Concurrent callers wait for the previous block to finish.
    pub async fn run_code(&self, code: &str) -> Result<Execution> {
        self.sandbox.lock().await.run_code(code).await
    }
}
