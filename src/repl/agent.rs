//! ReplAgent - drives a model and a sandbox session through the REPL loop.

use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use tracing::{debug, info, instrument, warn};

use super::{CodeFence, ReplNode, format_report, recover_question};
use crate::agent::{AgentGraph, AgentState};
use crate::client::{ChatModel, CompletionRequest};
use crate::config::Settings;
use crate::prompts::{final_answer_instruction, repl_system_prompt};
use crate::sandbox::{CodeSandbox, SandboxSession};
use crate::{Error, Message, Result};

/// Final answer plus the full transcript of a REPL run.
#[derive(Debug, Clone, PartialEq)]
pub struct ReplOutcome {
    pub answer: String,
    pub messages: Vec<Message>,
}

/// Code-executing agent with one persistent sandbox session.
pub struct ReplAgent {
    model: Arc<dyn ChatModel>,
    session: SandboxSession,
    prompt: String,
    fence: CodeFence,
    max_code_rounds: Option<usize>,
}

impl std::fmt::Debug for ReplAgent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReplAgent")
            .field("model", &self.model.name())
            .field("fence", &self.fence.tag())
            .field("max_code_rounds", &self.max_code_rounds)
            .finish()
    }
}

impl ReplAgent {
    pub fn builder() -> ReplAgentBuilder {
        ReplAgentBuilder::default()
    }

    pub fn fence(&self) -> &CodeFence {
        &self.fence
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    /// Answer one question, running as much code as the model asks for.
    pub async fn run(&self, question: impl Into<String>) -> Result<ReplOutcome> {
        let state = self.invoke(AgentState::from_prompt(question)).await?;
        Ok(ReplOutcome {
            answer: state.last_text(),
            messages: state.messages,
        })
    }

    async fn call_model(&self, messages: Vec<Message>) -> Result<Message> {
        let request = CompletionRequest::new(messages).with_system(self.prompt.as_str());
        let start = Instant::now();
        let response = self.model.complete(request).await?;
        debug!(
            model = self.model.name(),
            api_time_ms = start.elapsed().as_millis() as u64,
            "Model call completed"
        );
        Ok(response)
    }

    async fn agent_step(&self, state: &mut AgentState) -> Result<()> {
        let response = self.call_model(state.messages.clone()).await?;
        state.push(response);
        Ok(())
    }

    /// Run the latest message's blocks in order, stopping after the first failure.
    async fn code_step(&self, state: &mut AgentState) -> Result<()> {
        let latest = state.last_text();
        let blocks = self.fence.extract(&latest);

        let mut executions = Vec::with_capacity(blocks.len());
        for (index, block) in blocks.iter().enumerate() {
            let execution = self.session.run_code(block).await?;
            let failed = execution.is_error();
            executions.push(execution);
            if failed {
                debug!(
                    block = index,
                    skipped = blocks.len() - index - 1,
                    "Block raised, skipping the rest"
                );
                break;
            }
        }

        debug!(
            blocks = blocks.len(),
            executed = executions.len(),
            "Code step finished"
        );
        state.push(Message::execution_report(
            format_report(&executions),
            executions,
        ));
        Ok(())
    }

    async fn final_answer_step(&self, state: &mut AgentState) -> Result<()> {
        let question = recover_question(&state.messages).unwrap_or_default();
        let mut messages = state.messages.clone();
        messages.push(Message::user(final_answer_instruction(&question)));

        let response = self.call_model(messages).await?;
        state.push(response);
        Ok(())
    }
}

#[async_trait]
impl AgentGraph for ReplAgent {
    #[instrument(skip(self, state), fields(run_id = %uuid::Uuid::new_v4()))]
    async fn invoke(&self, mut state: AgentState) -> Result<AgentState> {
        info!(messages = state.messages.len(), "Starting REPL run");

        let mut node = ReplNode::Agent;
        let mut code_rounds = 0usize;
        loop {
            match node {
                ReplNode::Agent => self.agent_step(&mut state).await?,
                ReplNode::Code => {
                    code_rounds += 1;
                    self.code_step(&mut state).await?;
                }
                ReplNode::FinalAnswer => self.final_answer_step(&mut state).await?,
                ReplNode::Done => break,
            }

            node = node.next(&state, &self.fence);
            if node == ReplNode::Code
                && let Some(cap) = self.max_code_rounds
                && code_rounds >= cap
            {
                warn!(max_code_rounds = cap, "Code round limit reached");
                node = ReplNode::FinalAnswer;
            }
        }

        info!(
            code_rounds,
            messages = state.messages.len(),
            "REPL run finished"
        );
        Ok(state)
    }
}

/// Builder for [`ReplAgent`].
#[derive(Default)]
pub struct ReplAgentBuilder {
    model: Option<Arc<dyn ChatModel>>,
    session: Option<SandboxSession>,
    prompt: Option<String>,
    fence_tag: Option<String>,
    max_code_rounds: Option<usize>,
}

impl ReplAgentBuilder {
    pub fn model(self, model: impl ChatModel + 'static) -> Self {
        self.shared_model(Arc::new(model))
    }

    pub fn shared_model(mut self, model: Arc<dyn ChatModel>) -> Self {
        self.model = Some(model);
        self
    }

    pub fn sandbox(self, sandbox: impl CodeSandbox + 'static) -> Self {
        self.session(SandboxSession::new(sandbox))
    }

    pub fn session(mut self, session: SandboxSession) -> Self {
        self.session = Some(session);
        self
    }

    /// Replace the default system prompt.
    pub fn prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = Some(prompt.into());
        self
    }

    pub fn fence_tag(mut self, tag: impl Into<String>) -> Self {
        self.fence_tag = Some(tag.into());
        self
    }

    /// Stop executing code after this many rounds and go straight to the final answer.
    pub fn max_code_rounds(mut self, rounds: usize) -> Self {
        self.max_code_rounds = Some(rounds);
        self
    }

    /// Apply the fence tag and round limit from loaded settings.
    pub fn settings(mut self, settings: &Settings) -> Self {
        self.fence_tag = Some(settings.fence_tag.clone());
        self.max_code_rounds = settings.max_code_rounds;
        self
    }

    pub fn build(self) -> Result<ReplAgent> {
        let model = self
            .model
            .ok_or_else(|| Error::config("ReplAgent requires a model"))?;
        let session = self
            .session
            .ok_or_else(|| Error::config("ReplAgent requires a sandbox"))?;
        let fence = match self.fence_tag {
            Some(tag) => CodeFence::new(tag)?,
            None => CodeFence::default(),
        };
        let prompt = self
            .prompt
            .unwrap_or_else(|| repl_system_prompt(fence.tag()));

        Ok(ReplAgent {
            model,
            session,
            prompt,
            fence,
            max_code_rounds: self.max_code_rounds,
        })
    }
}
