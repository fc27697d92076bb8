//! Google Gemini `generateContent` adapter.
//!
//! The persona prompt goes in `systemInstruction` and the assistant role is
//! called `model` on the wire. Streaming uses `streamGenerateContent?alt=sse`,
//! where every event carries a partial response and the body simply ends.

use super::sse::{self, SseFrame};
use super::{ProviderSettings, connection_error};
use async_trait::async_trait;
use dualchat_application::ports::llm_gateway::{
    ChatRequest, GatewayError, LlmBackend, PromptPlacement, StreamHandle,
};
use dualchat_domain::{BackendId, Message, Role};
use serde::{Deserialize, Serialize};
use tracing::debug;

pub struct GeminiBackend {
    client: reqwest::Client,
    settings: ProviderSettings,
}

impl GeminiBackend {
    pub fn new(client: reqwest::Client, settings: ProviderSettings) -> Self {
        Self { client, settings }
    }

    fn body<'a>(&'a self, request: &'a ChatRequest) -> GenerateContentRequest<'a> {
        GenerateContentRequest {
            contents: contents(&request.messages),
            system_instruction: request.system.as_deref().map(|text| SystemInstruction {
                parts: vec![Part { text }],
            }),
            generation_config: GenerationConfig {
                max_output_tokens: self.settings.max_tokens,
            },
        }
    }

    fn url(&self, stream: bool) -> String {
        let method = if stream {
            "streamGenerateContent?alt=sse"
        } else {
            "generateContent"
        };
        self.settings
            .endpoint(&format!("v1beta/models/{}:{method}", self.settings.model))
    }

    async fn post(
        &self,
        body: &GenerateContentRequest<'_>,
        stream: bool,
    ) -> Result<reqwest::Response, GatewayError> {
        let api_key = self.settings.resolve_api_key()?;
        debug!(
            model = %self.settings.model,
            messages = body.contents.len(),
            stream,
            "Calling Gemini generateContent API"
        );

        let response = self
            .client
            .post(self.url(stream))
            .header("x-goog-api-key", api_key)
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
impl LlmBackend for GeminiBackend {
    fn id(&self) -> BackendId {
        BackendId::Gemini
    }

    fn prompt_placement(&self) -> PromptPlacement {
        PromptPlacement::Parameter
    }

    async fn invoke(&self, request: ChatRequest) -> Result<String, GatewayError> {
        let response = self.post(&self.body(&request), false).await?;
        let parsed: GenerateContentResponse = response.json().await.map_err(|e| {
            GatewayError::RequestFailed(format!("Failed to parse Gemini response: {e}"))
        })?;
        parsed.into_text().ok_or_else(|| {
            GatewayError::RequestFailed("Gemini returned no text in the response".to_string())
        })
    }

    async fn invoke_streaming(&self, request: ChatRequest) -> Result<StreamHandle, GatewayError> {
        let response = self.post(&self.body(&request), true).await?;
        Ok(sse::spawn_sse_reader(self.id(), response, parse_frame))
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<SystemInstruction<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    role: &'static str,
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct SystemInstruction<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    max_output_tokens: u32,
}

fn contents(messages: &[Message]) -> Vec<Content<'_>> {
    messages
        .iter()
        .filter_map(|m| {
            let role = match m.role() {
                Role::User => "user",
                Role::Assistant => "model",
                Role::System => return None,
            };
            Some(Content {
                role,
                parts: vec![Part { text: m.content() }],
            })
        })
        .collect()
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: Option<String>,
}

impl GenerateContentResponse {
    /// Text of the first candidate, `None` if it carries no text parts.
    fn into_text(self) -> Option<String> {
        let parts = self.candidates.into_iter().next()?.content?.parts;
        let texts: Vec<String> = parts.into_iter().filter_map(|p| p.text).collect();
        if texts.is_empty() {
            None
        } else {
            Some(texts.concat())
        }
    }
}

/// Interpret one `data:` payload; each is a partial `GenerateContentResponse`.
fn parse_frame(payload: &str) -> SseFrame {
    let Ok(value) = serde_json::from_str::<serde_json::Value>(payload) else {
        return SseFrame::Skip;
    };
    if value.get("error").is_some() {
        return SseFrame::Error(sse::extract_error_message(payload));
    }

    match serde_json::from_value::<GenerateContentResponse>(value)
        .ok()
        .and_then(GenerateContentResponse::into_text)
    {
        Some(text) => SseFrame::Delta(text),
        None => SseFrame::Skip,
    }
}
