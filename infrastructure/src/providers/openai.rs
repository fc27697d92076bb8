//! OpenAI Chat Completions adapter.
//!
//! The persona prompt is the leading `system` message of the request.

use super::sse::{self, SseFrame};
use super::{ProviderSettings, connection_error};
use async_trait::async_trait;
use dualchat_application::ports::llm_gateway::{
    ChatRequest, GatewayError, LlmBackend, PromptPlacement, StreamHandle,
};
use dualchat_domain::{BackendId, Message};
use serde::{Deserialize, Serialize};
use tracing::debug;

pub struct OpenAiBackend {
    client: reqwest::Client,
    settings: ProviderSettings,
}

impl OpenAiBackend {
    pub fn new(client: reqwest::Client, settings: ProviderSettings) -> Self {
        Self { client, settings }
    }

    fn body<'a>(&'a self, request: &'a ChatRequest, stream: bool) -> CompletionRequest<'a> {
        CompletionRequest {
            model: &self.settings.model,
            max_tokens: self.settings.max_tokens,
            messages: request.messages.iter().map(WireMessage::from).collect(),
            stream,
        }
    }

    async fn post(&self, body: &CompletionRequest<'_>) -> Result<reqwest::Response, GatewayError> {
        let api_key = self.settings.resolve_api_key()?;
        debug!(
            model = %self.settings.model,
            messages = body.messages.len(),
            stream = body.stream,
            "Calling OpenAI Chat Completions API"
        );

        let response = self
            .client
            .post(self.settings.endpoint("v1/chat/completions"))
            .bearer_auth(api_key)
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
impl LlmBackend for OpenAiBackend {
    fn id(&self) -> BackendId {
        BackendId::OpenAi
    }

    fn prompt_placement(&self) -> PromptPlacement {
        PromptPlacement::Message
    }

    async fn invoke(&self, request: ChatRequest) -> Result<String, GatewayError> {
        let response = self.post(&self.body(&request, false)).await?;
        let parsed: CompletionResponse = response.json().await.map_err(|e| {
            GatewayError::RequestFailed(format!("Failed to parse OpenAI response: {e}"))
        })?;
        parsed.into_text()
    }

    async fn invoke_streaming(&self, request: ChatRequest) -> Result<StreamHandle, GatewayError> {
        let response = self.post(&self.body(&request, true)).await?;
        Ok(sse::spawn_sse_reader(self.id(), response, parse_frame))
    }
}

#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: Vec<WireMessage<'a>>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    stream: bool,
}

#[derive(Debug, Serialize)]
struct WireMessage<'a> {
    role: &'static str,
    content: &'a str,
}

impl<'a> From<&'a Message> for WireMessage<'a> {
    fn from(message: &'a Message) -> Self {
        Self {
            role: message.role().as_str(),
            content: message.content(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

impl CompletionResponse {
    fn into_text(self) -> Result<String, GatewayError> {
        self.choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content.unwrap_or_default())
            .ok_or_else(|| GatewayError::RequestFailed("OpenAI returned no choices".to_string()))
    }
}

/// Interpret one `data:` payload of a chat completion stream.
fn parse_frame(payload: &str) -> SseFrame {
    if payload == "[DONE]" {
        return SseFrame::Done;
    }
    let Ok(chunk) = serde_json::from_str::<serde_json::Value>(payload) else {
        return SseFrame::Skip;
    };
    if chunk.get("error").is_some() {
        return SseFrame::Error(sse::extract_error_message(payload));
    }

    chunk
        .pointer("/choices/0/delta/content")
        .and_then(|c| c.as_str())
        .map(|text| SseFrame::Delta(text.to_string()))
        .unwrap_or(SseFrame::Skip)
}
