//! Deterministic stand-ins for the model and the sandbox.
//!
//! Both record what they were asked so tests can assert on the exact
//! requests and code an orchestrator produced.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;

use crate::client::{ChatModel, CompletionRequest};
use crate::sandbox::CodeSandbox;
use crate::types::{Execution, Message};
use crate::{Error, Result};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Model that replays queued responses in order.
///
/// Running out of responses is an error, so a test notices when an
/// orchestrator makes more calls than expected.
#[derive(Debug, Default)]
pub struct ScriptedModel {
    responses: Mutex<VecDeque<Message>>,
    requests: Mutex<Vec<CompletionRequest>>,
}

impl ScriptedModel {
    pub fn new(responses: impl IntoIterator<Item = Message>) -> Arc<Self> {
        Arc::new(Self {
            responses: Mutex::new(responses.into_iter().collect()),
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn push_response(&self, response: Message) {
        lock(&self.responses).push_back(response);
    }

    /// Every request received so far, oldest first.
    pub fn requests(&self) -> Vec<CompletionRequest> {
        lock(&self.requests).clone()
    }

    pub fn remaining(&self) -> usize {
        lock(&self.responses).len()
    }
}

#[async_trait]
impl ChatModel for ScriptedModel {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn complete(&self, request: CompletionRequest) -> Result<Message> {
        lock(&self.requests).push(request);
        lock(&self.responses)
            .pop_front()
            .ok_or_else(|| Error::config("ScriptedModel has no responses left"))
    }
}

#[derive(Debug, Default)]
struct MockSandboxState {
    executions: VecDeque<Execution>,
    executed: Vec<String>,
}

/// Sandbox that returns queued execution records and remembers the code it got.
///
/// Clones share state, so keep one to inspect after handing the other to an
/// agent. Once the queue is empty every block succeeds with no output.
#[derive(Debug, Clone, Default)]
pub struct MockSandbox {
    state: Arc<Mutex<MockSandboxState>>,
}

impl MockSandbox {
    pub fn new(executions: impl IntoIterator<Item = Execution>) -> Self {
        Self {
            state: Arc::new(Mutex::new(MockSandboxState {
                executions: executions.into_iter().collect(),
                executed: Vec::new(),
            })),
        }
    }

    /// Code blocks run so far, in order.
    pub fn executed(&self) -> Vec<String> {
        lock(&self.state).executed.clone()
    }
}

#[async_trait]
impl CodeSandbox for MockSandbox {
    async fn run_code(&mut self, code: &str) -> Result<Execution> {
        let mut state = lock(&self.state);
        state.executed.push(code.to_string());
        Ok(state.executions.pop_front().unwrap_or_default())
    }
}
