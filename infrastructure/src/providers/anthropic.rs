//! Anthropic Messages API adapter.
//!
//! The persona prompt travels in the top-level `system` field; the message
//! list carries only user/assistant turns.

use super::sse::{self, SseFrame};
use super::{ProviderSettings, connection_error};
use async_trait::async_trait;
use dualchat_application::ports::llm_gateway::{
    ChatRequest, GatewayError, LlmBackend, PromptPlacement, StreamHandle,
};
use dualchat_domain::{BackendId, Message, Role};
use serde::{Deserialize, Serialize};
use tracing::debug;

const ANTHROPIC_VERSION: &str = "2023-06-01";

pub struct AnthropicBackend {
    client: reqwest::Client,
    settings: ProviderSettings,
}

impl AnthropicBackend {
    pub fn new(client: reqwest::Client, settings: ProviderSettings) -> Self {
        Self { client, settings }
    }

    fn body<'a>(&'a self, request: &'a ChatRequest, stream: bool) -> MessagesRequest<'a> {
        MessagesRequest {
            model: &self.settings.model,
            max_tokens: self.settings.max_tokens,
            system: request.system.as_deref(),
            messages: wire_messages(&request.messages),
            stream,
        }
    }

    async fn post(&self, body: &MessagesRequest<'_>) -> Result<reqwest::Response, GatewayError> {
        let api_key = self.settings.resolve_api_key()?;
        debug!(
            model = %self.settings.model,
            messages = body.messages.len(),
            stream = body.stream,
            "Calling Anthropic Messages API"
        );

        let response = self
            .client
            .post(self.settings.endpoint("v1/messages"))
            .header("x-api-key", api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(body)
            .send()
            .await
            .map_err(connection_error)?;

        if !response.status().is_success() {
            return Err(sse::request_failed(response).await);
        }
        Ok(response)
    }
}

#[async_trait]
impl LlmBackend for AnthropicBackend {
    fn id(&self) -> BackendId {
        BackendId::Claude
    }

    fn prompt_placement(&self) -> PromptPlacement {
        PromptPlacement::Parameter
    }

    async fn invoke(&self, request: ChatRequest) -> Result<String, GatewayError> {
        let response = self.post(&self.body(&request, false)).await?;
        let parsed: MessagesResponse = response.json().await.map_err(|e| {
            GatewayError::RequestFailed(format!("Failed to parse Anthropic response: {e}"))
        })?;
        Ok(parsed.text())
    }

    async fn invoke_streaming(&self, request: ChatRequest) -> Result<StreamHandle, GatewayError> {
        let response = self.post(&self.body(&request, true)).await?;
        Ok(sse::spawn_sse_reader(self.id(), response, parse_frame))
    }
}

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<&'a str>,
    messages: Vec<WireMessage<'a>>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    stream: bool,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
struct WireMessage<'a> {
    role: &'static str,
    content: &'a str,
}

fn wire_messages(messages: &[Message]) -> Vec<WireMessage<'_>> {
    messages
        .iter()
        .filter(|m| m.role() != Role::System)
        .map(|m| WireMessage {
            role: m.role().as_str(),
            content: m.content(),
        })
        .collect()
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: Option<String>,
}

impl MessagesResponse {
    fn text(self) -> String {
        self.content
            .into_iter()
            .filter(|block| block.kind == "text")
            .filter_map(|block| block.text)
            .collect()
    }
}

/// Interpret one `data:` payload of the Messages event stream.
fn parse_frame(payload: &str) -> SseFrame {
    let Ok(event) = serde_json::from_str::<serde_json::Value>(payload) else {
        return SseFrame::Skip;
    };

    match event.get("type").and_then(|t| t.as_str()) {
        Some("content_block_delta") => event
            .pointer("/delta/text")
            .and_then(|t| t.as_str())
            .map(|text| SseFrame::Delta(text.to_string()))
            .unwrap_or(SseFrame::Skip),
        Some("message_stop") => SseFrame::Done,
        Some("error") => SseFrame::Error(sse::extract_error_message(payload)),
        _ => SseFrame::Skip,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn backend() -> AnthropicBackend {
        AnthropicBackend::new(
            reqwest::Client::new(),
            ProviderSettings::for_backend(BackendId::Claude),
        )
    }

    #[test]
    fn request_body_carries_system_parameter() {
        let backend = backend();
        let request = ChatRequest::build(
            PromptPlacement::Parameter,
            "be kind",
            &[Message::user("hi"), Message::assistant("hello")],
        );

        let body = serde_json::to_value(backend.body(&request, true)).unwrap();

        assert_eq!(body["model"], "claude-3-5-sonnet-20241022");
        assert_eq!(body["system"], "be kind");
        assert_eq!(body["stream"], true);
        assert_eq!(body["messages"][0]["role"], "user");
        assert_eq!(body["messages"][1]["role"], "assistant");
        assert_eq!(body["messages"][1]["content"], "hello");
    }

    #[test]
    fn non_streaming_body_omits_stream_flag() {
        let backend = backend();
        let request = ChatRequest::build(PromptPlacement::Parameter, "p", &[Message::user("hi")]);
        let body = serde_json::to_value(backend.body(&request, false)).unwrap();
        assert!(body.get("stream").is_none());
    }

    #[test]
    fn system_messages_never_reach_the_message_list() {
        let messages = [Message::system("persona"), Message::user("hi")];
        assert_eq!(
            wire_messages(&messages),
            vec![WireMessage {
                role: "user",
                content: "hi"
            }]
        );
    }

    #[test]
    fn response_text_joins_text_blocks() {
        let parsed: MessagesResponse = serde_json::from_str(
            r#"{"content":[{"type":"text","text":"Hello"},{"type":"tool_use","id":"x"},{"type":"text","text":" there"}]}"#,
        )
        .unwrap();
        assert_eq!(parsed.text(), "Hello there");
    }

    #[test]
    fn stream_frames() {
        assert_eq!(
            parse_frame(
                r#"{"type":"content_block_delta","index":0,"delta":{"type":"text_delta","text":"Hi"}}"#
            ),
            SseFrame::Delta("Hi".to_string())
        );
        assert_eq!(parse_frame(r#"{"type":"message_stop"}"#), SseFrame::Done);
        assert_eq!(parse_frame(r#"{"type":"ping"}"#), SseFrame::Skip);
        assert_eq!(
            parse_frame(r#"{"type":"error","error":{"type":"overloaded_error","message":"Overloaded"}}"#),
            SseFrame::Error("Overloaded".to_string())
        );
    }

    #[test]
    fn placement_is_parameter() {
        assert_eq!(backend().prompt_placement(), PromptPlacement::Parameter);
        assert_eq!(backend().id(), BackendId::Claude);
    }
}
