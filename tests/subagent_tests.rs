//! Sub-agent dispatch through a parent agent's `task` tool.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use deepagent::testing::ScriptedModel;
use deepagent::tools::ThinkTool;
use deepagent::{
    AgentGraph, AgentState, ContentBlock, Files, GENERAL_PURPOSE, Message, ReactAgent, Role,
    SubAgent, TaskTool, ToolRegistry, ToolUseBlock,
};
use serde_json::json;

fn files(pairs: &[(&str, &str)]) -> Files {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

fn task_call(id: &str, subagent_type: &str, description: &str) -> Message {
    Message::assistant_with_content(vec![ContentBlock::ToolUse(ToolUseBlock::new(
        id,
        "task",
        json!({"description": description, "subagent_type": subagent_type}),
    ))])
}

/// Graph that records what it was given and writes one file.
#[derive(Default)]
struct FileWriter {
    seen: Mutex<Vec<AgentState>>,
}

#[async_trait]
impl AgentGraph for FileWriter {
    async fn invoke(&self, mut state: AgentState) -> deepagent::Result<AgentState> {
        self.seen.lock().unwrap().push(state.clone());
        state.files.insert("report.md".into(), "# Findings".into());
        state.files.insert("shared.txt".into(), "from child".into());
        state.push(Message::assistant("wrote the report"));
        Ok(state)
    }
}

#[tokio::test]
async fn test_files_merge_back_into_parent() {
    let writer = Arc::new(FileWriter::default());
    let model = ScriptedModel::new([
        task_call("call_1", "writer", "Write the report"),
        Message::assistant("All done."),
    ]);

    let task = TaskTool::builder(model.clone(), "help")
        .subagent(SubAgent::new("writer", "Writes reports", "").with_shared_graph(writer.clone()))
        .build()
        .unwrap();
    let agent = ReactAgent::builder()
        .shared_model(model.clone())
        .tool(task)
        .build()
        .unwrap();

    let parent = AgentState::from_prompt("Research and report")
        .with_files(files(&[("notes.txt", "keep me"), ("shared.txt", "from parent")]));
    let state = agent.invoke(parent).await.unwrap();

    assert_eq!(
        state.files,
        files(&[
            ("notes.txt", "keep me"),
            ("report.md", "# Findings"),
            ("shared.txt", "from child"),
        ])
    );

    let tool_message = &state.messages[2];
    assert_eq!(tool_message.role, Role::Tool);
    let result = tool_message.content[0].as_tool_result().unwrap();
    assert_eq!(result.tool_use_id, "call_1");
    assert_eq!(result.content, "wrote the report");
    assert_eq!(state.last_text(), "All done.");

    let seen = writer.seen.lock().unwrap();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].messages.len(), 1);
    assert_eq!(seen[0].messages[0].text(), "Write the report");
    assert_eq!(seen[0].files.get("notes.txt").map(String::as_str), Some("keep me"));
}

#[tokio::test]
async fn test_unknown_subagent_reported_to_model() {
    let model = ScriptedModel::new([
        task_call("call_1", "xyz", "Do something"),
        Message::assistant("Sorry."),
    ]);
    let task = TaskTool::builder(model.clone(), "help")
        .subagent(SubAgent::new("critic", "Reviews drafts", "Be critical."))
        .build()
        .unwrap();
    let agent = ReactAgent::builder()
        .shared_model(model.clone())
        .tool(task)
        .build()
        .unwrap();

    let original = files(&[("draft.md", "v1")]);
    let state = agent
        .invoke(AgentState::from_prompt("review").with_files(original.clone()))
        .await
        .unwrap();

    let result = state.messages[2].content[0].as_tool_result().unwrap();
    assert!(result.is_error());
    assert_eq!(
        result.content,
        "Error: invoked agent of type xyz, the only allowed types are `general-purpose`, `critic`"
    );
    assert_eq!(state.files, original);
    assert_eq!(model.requests().len(), 2);
}

#[tokio::test]
async fn test_general_purpose_always_available() {
    let model = ScriptedModel::new([
        task_call("call_1", GENERAL_PURPOSE, "Summarize the topic"),
        Message::assistant("Summary from the sub-agent"),
        Message::assistant("Here is the summary."),
    ]);
    let tools = ToolRegistry::new().with(Arc::new(ThinkTool));
    let task = TaskTool::builder(model.clone(), "You are a helpful researcher.")
        .tools(tools.clone())
        .build()
        .unwrap();
    let agent = ReactAgent::builder()
        .shared_model(model.clone())
        .prompt("Delegate.")
        .tools(tools.with(Arc::new(task)))
        .build()
        .unwrap();

    let state = agent.run("Summarize").await.unwrap();
    assert_eq!(state.last_text(), "Here is the summary.");

    let requests = model.requests();
    assert_eq!(requests.len(), 3);

    // The sub-agent runs with the caller's instructions and the full tool set,
    // which does not include the task tool itself.
    let sub_request = &requests[1];
    assert_eq!(sub_request.system.as_deref(), Some("You are a helpful researcher."));
    let names: Vec<&str> = sub_request.tools.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names, vec!["think"]);
    assert_eq!(sub_request.messages.len(), 1);

    let parent_tools: Vec<&str> = requests[0].tools.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(parent_tools, vec!["think", "task"]);
}

#[tokio::test]
async fn test_restricted_tool_subset() {
    let model = ScriptedModel::new([
        task_call("call_1", "thinker", "Think hard"),
        Message::assistant("thought about it"),
        Message::assistant("ok"),
    ]);

    let tools = ToolRegistry::new().with(Arc::new(ThinkTool));
    let task = TaskTool::builder(model.clone(), "help")
        .tools(tools)
        .subagent(SubAgent::new("thinker", "Only thinks", "Think.").with_tools(["think"]))
        .subagent(SubAgent::new("talker", "No tools", "Talk.").with_tools(Vec::<String>::new()))
        .build()
        .unwrap();
    let agent = ReactAgent::builder()
        .shared_model(model.clone())
        .tool(task)
        .build()
        .unwrap();

    agent.run("go").await.unwrap();

    let requests = model.requests();
    let sub_request = &requests[1];
    assert_eq!(sub_request.system.as_deref(), Some("Think."));
    assert_eq!(sub_request.tools.len(), 1);
    assert_eq!(sub_request.tools[0].name, "think");
}

#[test]
fn test_unknown_tool_in_subset_fails_construction() {
    let model = ScriptedModel::new([]);
    let err = TaskTool::builder(model, "help")
        .tools(ToolRegistry::new().with(Arc::new(ThinkTool)))
        .subagent(SubAgent::new("searcher", "Searches", "Search.").with_tools(["web_search"]))
        .build()
        .unwrap_err();
    assert!(matches!(err, deepagent::Error::Config(_)));
    assert!(err.to_string().contains("web_search"));
    assert!(err.to_string().contains("searcher"));
}

#[tokio::test]
async fn test_sub_agent_failure_propagates() {
    // The general-purpose sub-agent's model call fails with no scripted response.
    let model = ScriptedModel::new([task_call("call_1", GENERAL_PURPOSE, "do it")]);
    let task = TaskTool::builder(model.clone(), "help").build().unwrap();
    let agent = ReactAgent::builder()
        .shared_model(model)
        .tool(task)
        .build()
        .unwrap();

    assert!(agent.run("go").await.is_err());
}
