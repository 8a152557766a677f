//! Generic tool-using agent loop tests.

use async_trait::async_trait;
use deepagent::testing::ScriptedModel;
use deepagent::tools::ThinkTool;
use deepagent::{
    AgentGraph, AgentState, ContentBlock, ExecutionConfig, Files, Message, ReactAgent, Role,
    SchemaTool, ToolContext, ToolResult, ToolUseBlock,
};
use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::json;

#[derive(Debug, Deserialize, JsonSchema)]
struct WriteFileInput {
    /// File name
    path: String,
    /// New contents
    content: String,
}

/// Writes into the agent's in-memory files.
struct WriteFileTool;

#[async_trait]
impl SchemaTool for WriteFileTool {
    type Input = WriteFileInput;
    const NAME: &'static str = "write_file";
    const DESCRIPTION: &'static str = "Write a file.";

    async fn handle(&self, input: WriteFileInput, context: &ToolContext<'_>) -> ToolResult {
        let existed = context.files().contains_key(&input.path);
        let mut update = Files::new();
        update.insert(input.path.clone(), input.content);
        let verb = if existed { "Updated" } else { "Created" };
        ToolResult::success(format!("{} {}", verb, input.path)).with_files(update)
    }
}

fn calls(calls: &[(&str, &str, serde_json::Value)]) -> Message {
    Message::assistant_with_content(
        calls
            .iter()
            .map(|(id, name, input)| {
                ContentBlock::ToolUse(ToolUseBlock::new(*id, *name, input.clone()))
            })
            .collect(),
    )
}

#[tokio::test]
async fn test_tool_file_updates_merge_after_each_call() {
    let model = ScriptedModel::new([
        calls(&[
            ("a", "write_file", json!({"path": "x.txt", "content": "1"})),
            ("b", "write_file", json!({"path": "x.txt", "content": "2"})),
        ]),
        Message::assistant("written"),
    ]);
    let agent = ReactAgent::builder()
        .shared_model(model)
        .tool(WriteFileTool)
        .build()
        .unwrap();

    let state = agent.run("write twice").await.unwrap();

    assert_eq!(state.files.get("x.txt").map(String::as_str), Some("2"));
    assert_eq!(state.messages[2].text(), "Created x.txt");
    assert_eq!(state.messages[3].text(), "Updated x.txt");
}

#[tokio::test]
async fn test_invalid_input_is_error_result() {
    let model = ScriptedModel::new([
        calls(&[("a", "write_file", json!({"path": 7}))]),
        Message::assistant("oops"),
    ]);
    let agent = ReactAgent::builder()
        .shared_model(model.clone())
        .tool(WriteFileTool)
        .build()
        .unwrap();

    let state = agent.run("write").await.unwrap();
    let result = state.messages[2].content[0].as_tool_result().unwrap();
    assert!(result.is_error());
    assert!(result.content.starts_with("Invalid input: "));
    assert!(state.files.is_empty());

    // The model sees the failed call and its result on the next turn.
    let requests = model.requests();
    let second = &requests[1];
    assert_eq!(second.messages.len(), 3);
    assert_eq!(second.messages[2].role, Role::Tool);
}

#[tokio::test]
async fn test_tool_definitions_sent_in_registration_order() {
    let model = ScriptedModel::new([Message::assistant("hi")]);
    let agent = ReactAgent::builder()
        .shared_model(model.clone())
        .tool(ThinkTool)
        .tool(WriteFileTool)
        .build()
        .unwrap();

    agent.run("hello").await.unwrap();

    let requests = model.requests();
    let tools = &requests[0].tools;
    let names: Vec<&str> = tools.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names, vec!["think", "write_file"]);
    assert_eq!(tools[1].description, "Write a file.");
    assert!(tools[1].input_schema["properties"]["content"].is_object());
}

#[tokio::test]
async fn test_incoming_step_budget_is_respected() {
    let model = ScriptedModel::new([
        calls(&[("a", "think", json!({"thought": "hmm"}))]),
        Message::assistant("unreachable"),
    ]);
    let agent = ReactAgent::builder()
        .shared_model(model.clone())
        .tool(ThinkTool)
        .config(ExecutionConfig::default().with_max_steps(100))
        .build()
        .unwrap();

    let state = agent
        .invoke(AgentState::from_prompt("think").with_remaining_steps(2))
        .await
        .unwrap();

    assert_eq!(model.requests().len(), 1);
    assert_eq!(state.remaining_steps, Some(0));
    assert_eq!(state.last_message().unwrap().role, Role::Tool);
}
