//! Anthropic Messages API adapter against a mock HTTP server.

use std::time::Duration;

use deepagent::{
    AnthropicModel, ChatModel, CompletionRequest, ContentBlock, Error, Message, ToolDefinition,
    ToolResultBlock, ToolUseBlock,
};
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn model_for(server: &MockServer) -> AnthropicModel {
    AnthropicModel::new("test-key", "claude-test")
        .with_base_url(server.uri())
        .with_max_tokens(256)
}

#[tokio::test]
async fn test_sends_headers_and_parses_text() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .and(header("x-api-key", "test-key"))
        .and(header("anthropic-version", "2023-06-01"))
        .and(body_partial_json(json!({
            "model": "claude-test",
            "max_tokens": 256,
            "system": "Be brief.",
            "messages": [{"role": "user", "content": [{"type": "text", "text": "Hi"}]}]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "msg_1",
            "type": "message",
            "role": "assistant",
            "content": [{"type": "text", "text": "Hello!"}],
            "stop_reason": "end_turn"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let reply = model_for(&server)
        .complete(CompletionRequest::new(vec![Message::user("Hi")]).with_system("Be brief."))
        .await
        .unwrap();

    assert_eq!(reply.role, deepagent::Role::Assistant);
    assert_eq!(reply.text(), "Hello!");
}

#[tokio::test]
async fn test_tools_and_tool_results_on_the_wire() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "content": [
                {"type": "text", "text": "Delegating."},
                {"type": "tool_use", "id": "toolu_2", "name": "task",
                 "input": {"description": "dig", "subagent_type": "general-purpose"}}
            ],
            "stop_reason": "tool_use"
        })))
        .mount(&server)
        .await;

    let history = vec![
        Message::user("question"),
        Message::assistant_with_content(vec![ContentBlock::ToolUse(ToolUseBlock::new(
            "toolu_1",
            "think",
            json!({"thought": "plan"}),
        ))]),
        Message::tool_result(ToolResultBlock::success("toolu_1", "plan")),
    ];
    let tools = vec![ToolDefinition::new(
        "think",
        "Use it for thinking.",
        json!({"type": "object", "properties": {"thought": {"type": "string"}}}),
    )];

    let reply = model_for(&server)
        .complete(CompletionRequest::new(history).with_tools(tools))
        .await
        .unwrap();

    let tool_uses = reply.tool_uses();
    assert_eq!(tool_uses.len(), 1);
    assert_eq!(tool_uses[0].id, "toolu_2");
    assert_eq!(tool_uses[0].input["subagent_type"], "general-purpose");
    assert_eq!(reply.text(), "Delegating.");

    let requests = server.received_requests().await.unwrap();
    let body: serde_json::Value = requests[0].body_json().unwrap();
    assert!(body.get("system").is_none());
    assert_eq!(body["tools"][0]["name"], "think");
    assert_eq!(body["tools"][0]["input_schema"]["type"], "object");

    let messages = body["messages"].as_array().unwrap();
    assert_eq!(messages.len(), 3);
    assert_eq!(messages[1]["content"][0]["type"], "tool_use");
    assert_eq!(messages[2]["role"], "user");
    assert_eq!(messages[2]["content"][0]["type"], "tool_result");
    assert_eq!(messages[2]["content"][0]["tool_use_id"], "toolu_1");
}

#[tokio::test]
async fn test_api_error_is_mapped() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "type": "error",
            "error": {"type": "authentication_error", "message": "invalid x-api-key"}
        })))
        .mount(&server)
        .await;

    let err = model_for(&server)
        .complete(CompletionRequest::new(vec![Message::user("Hi")]))
        .await
        .unwrap_err();

    match &err {
        Error::Api {
            message,
            status,
            error_type,
        } => {
            assert_eq!(message, "invalid x-api-key");
            assert_eq!(*status, Some(401));
            assert_eq!(error_type.as_deref(), Some("authentication_error"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(err.is_configuration_error());
}

#[tokio::test]
async fn test_unstructured_error_body_kept() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
        .mount(&server)
        .await;

    let err = model_for(&server)
        .complete(CompletionRequest::new(vec![Message::user("Hi")]))
        .await
        .unwrap_err();

    assert_eq!(err.status_code(), Some(502));
    assert!(err.to_string().contains("bad gateway"));
    assert!(err.is_retryable());
}

#[tokio::test]
async fn test_rate_limit_carries_retry_after() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(429).insert_header("retry-after", "7"))
        .mount(&server)
        .await;

    let err = model_for(&server)
        .complete(CompletionRequest::new(vec![Message::user("Hi")]))
        .await
        .unwrap_err();

    assert!(matches!(err, Error::RateLimit { .. }));
    assert_eq!(err.retry_after(), Some(Duration::from_secs(7)));
}

#[tokio::test]
async fn test_slow_response_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"content": []}))
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&server)
        .await;

    let err = model_for(&server)
        .with_timeout(Duration::from_millis(100))
        .complete(CompletionRequest::new(vec![Message::user("Hi")]))
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Timeout(_)));
}
