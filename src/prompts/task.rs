//! Prompts for the sub-agent dispatch tool.

/// Description of the built-in general-purpose sub-agent.
pub const GENERAL_PURPOSE_DESCRIPTION: &str = "General-purpose agent for researching complex questions, searching for information, and executing multi-step tasks. It has access to every tool the main agent has.";

/// Opening of the `task` tool description, followed by the agent list.
pub const TASK_DESCRIPTION_PREFIX: &str = r#"Launch a new agent to handle complex, multi-step tasks autonomously.

Available agent types and the tools they have access to:
"#;

/// Closing usage notes of the `task` tool description.
pub const TASK_DESCRIPTION_SUFFIX: &str = r#"
When using the task tool, you must specify a subagent_type parameter to select which agent type to use.

Usage notes:
1. Launch multiple agents concurrently whenever possible to maximize performance.
2. When the agent is done, it will return a single message back to you. The result returned by the agent is not visible to the user. To show the user the result, send a text message with a concise summary.
3. Each agent invocation is stateless. You will not be able to send additional messages to the agent, nor will the agent be able to communicate with you outside of its final report. Your prompt should contain a highly detailed task description for the agent to perform autonomously, and you should specify exactly what information the agent should return in its final and only message.
4. The agent's outputs should generally be trusted.
5. Clearly tell the agent whether you expect it to create content, perform analysis, or just do research, since it is not aware of the user's intent.
6. Files the agent writes are merged back into your files when it finishes.
"#;

/// Full `task` tool description for the given `(name, description)` pairs.
pub fn task_description<'a>(agents: impl IntoIterator<Item = (&'a str, &'a str)>) -> String {
    let listing = agents
        .into_iter()
        .map(|(name, description)| format!("- {}: {}", name, description))
        .collect::<Vec<_>>()
        .join("\n");
    format!(
        "{}{}\n{}",
        TASK_DESCRIPTION_PREFIX, listing, TASK_DESCRIPTION_SUFFIX
    )
}
