//! Anthropic adapter contract tests
//!
//! Run the adapter against a local HTTP server and check the wire format in
//! both directions: request headers and body, JSON replies, SSE streams and
//! vendor error bodies.

use dualchat_application::ports::llm_gateway::{
    ChatRequest, GatewayError, LlmBackend, PromptPlacement, StreamHandle,
};
use dualchat_domain::{BackendId, Message, StreamEvent};
use dualchat_infrastructure::{AnthropicBackend, ProviderSettings};
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn backend(server: &MockServer) -> AnthropicBackend {
    AnthropicBackend::new(
        reqwest::Client::new(),
        ProviderSettings {
            api_key: Some("test-key".to_string()),
            base_url: server.uri(),
            ..ProviderSettings::for_backend(BackendId::Claude)
        },
    )
}

fn request() -> ChatRequest {
    ChatRequest::build(
        PromptPlacement::Parameter,
        "You are Companion.",
        &[Message::user("hi")],
    )
}

async fn drain(mut handle: StreamHandle) -> Vec<StreamEvent> {
    let mut events = Vec::new();
    while let Some(event) = handle.next_event().await {
        events.push(event);
    }
    events
}

#[tokio::test]
async fn test_sync_request_format_and_reply() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .and(header("x-api-key", "test-key"))
        .and(header("anthropic-version", "2023-06-01"))
        .and(body_partial_json(json!({
            "model": "claude-3-5-sonnet-20241022",
            "max_tokens": 4096,
            "system": "You are Companion.",
            "messages": [{"role": "user", "content": "hi"}]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "msg_test",
            "type": "message",
            "role": "assistant",
            "content": [{"type": "text", "text": "Hello!"}],
            "stop_reason": "end_turn"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let reply = backend(&server).invoke(request()).await.unwrap();
    assert_eq!(reply, "Hello!");
}

#[tokio::test]
async fn test_stream_deltas_then_completion() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .and(body_partial_json(json!({"stream": true})))
        .respond_with(ResponseTemplate::new(200).set_body_string(concat!(
            "event: message_start\n",
            "data: {\"type\":\"message_start\",\"message\":{\"id\":\"msg_test\",\"content\":[]}}\n\n",
            "event: ping\n",
            "data: {\"type\":\"ping\"}\n\n",
            "event: content_block_delta\n",
            "data: {\"type\":\"content_block_delta\",\"index\":0,\"delta\":{\"type\":\"text_delta\",\"text\":\"Hi \"}}\n\n",
            "event: content_block_delta\n",
            "data: {\"type\":\"content_block_delta\",\"index\":0,\"delta\":{\"type\":\"text_delta\",\"text\":\"there\"}}\n\n",
            "event: message_stop\n",
            "data: {\"type\":\"message_stop\"}\n\n"
        )))
        .expect(1)
        .mount(&server)
        .await;

    let handle = backend(&server).invoke_streaming(request()).await.unwrap();

    assert_eq!(
        drain(handle).await,
        vec![
            StreamEvent::Delta("Hi ".to_string()),
            StreamEvent::Delta("there".to_string()),
            StreamEvent::Completed(String::new()),
        ]
    );
}

#[tokio::test]
async fn test_stream_error_event_ends_stream() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .respond_with(ResponseTemplate::new(200).set_body_string(concat!(
            "event: content_block_delta\n",
            "data: {\"type\":\"content_block_delta\",\"index\":0,\"delta\":{\"type\":\"text_delta\",\"text\":\"Hi \"}}\n\n",
            "event: content_block_delta\n",
            "data: {\"type\":\"content_block_delta\",\"index\":0,\"delta\":{\"type\":\"text_delta\",\"text\":\"there\"}}\n\n",
            "event: error\n",
            "data: {\"type\":\"error\",\"error\":{\"type\":\"overloaded_error\",\"message\":\"Overloaded\"}}\n\n",
            "event: content_block_delta\n",
            "data: {\"type\":\"content_block_delta\",\"index\":0,\"delta\":{\"type\":\"text_delta\",\"text\":\"late\"}}\n\n"
        )))
        .mount(&server)
        .await;

    let handle = backend(&server).invoke_streaming(request()).await.unwrap();

    assert_eq!(
        drain(handle).await,
        vec![
            StreamEvent::Delta("Hi ".to_string()),
            StreamEvent::Delta("there".to_string()),
            StreamEvent::Error("Overloaded".to_string()),
        ]
    );
}

#[tokio::test]
async fn test_http_error_carries_vendor_message() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "type": "error",
            "error": {"type": "authentication_error", "message": "invalid x-api-key"}
        })))
        .mount(&server)
        .await;

    let error = backend(&server).invoke(request()).await.unwrap_err();
    assert_eq!(
        error,
        GatewayError::RequestFailed("HTTP 401: invalid x-api-key".to_string())
    );
}

#[tokio::test]
async fn test_missing_key_fails_before_any_request() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let backend = AnthropicBackend::new(
        reqwest::Client::new(),
        ProviderSettings {
            api_key: None,
            api_key_env: "DUALCHAT_TEST_UNSET_ANTHROPIC_KEY".to_string(),
            base_url: server.uri(),
            ..ProviderSettings::for_backend(BackendId::Claude)
        },
    );

    let error = backend.invoke(request()).await.unwrap_err();
    assert_eq!(
        error,
        GatewayError::MissingCredentials("DUALCHAT_TEST_UNSET_ANTHROPIC_KEY".to_string())
    );
}
