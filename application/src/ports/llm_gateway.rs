//! LLM Gateway port
//!
//! Defines the interface for communicating with LLM backends.

use async_trait::async_trait;
use dualchat_domain::{BackendId, Message, StreamEvent};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::mpsc;

/// Errors that can occur during LLM gateway operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GatewayError {
    #[error("Unknown backend: {0}")]
    UnknownBackend(BackendId),

    #[error("Missing API key: set {0}")]
    MissingCredentials(String),

    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Stream error: {0}")]
    StreamError(String),

    #[error("Backend returned an empty reply")]
    EmptyReply,

    #[error("Other error: {0}")]
    Other(String),
}

/// Where a backend expects the persona instruction text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptPlacement {
    /// As a leading `system` message in the message list.
    Message,
    /// As a dedicated request parameter next to the message list.
    Parameter,
}

/// A fully assembled backend call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatRequest {
    /// Conversation context, with a leading system message for
    /// [`PromptPlacement::Message`] backends.
    pub messages: Vec<Message>,
    /// Persona text for [`PromptPlacement::Parameter`] backends.
    pub system: Option<String>,
}

impl ChatRequest {
    /// Assemble a request with the persona placed the way the backend wants it.
    pub fn build(placement: PromptPlacement, system_prompt: &str, history: &[Message]) -> Self {
        match placement {
            PromptPlacement::Message => {
                let mut messages = Vec::with_capacity(history.len() + 1);
                messages.push(Message::system(system_prompt));
                messages.extend_from_slice(history);
                Self {
                    messages,
                    system: None,
                }
            }
            PromptPlacement::Parameter => Self {
                messages: history.to_vec(),
                system: Some(system_prompt.to_string()),
            },
        }
    }

    /// The persona text regardless of placement.
    pub fn effective_system_prompt(&self) -> Option<&str> {
        self.system.as_deref().or_else(|| {
            self.messages
                .first()
                .filter(|m| m.role() == dualchat_domain::Role::System)
                .map(|m| m.content())
        })
    }
}

/// Handle for receiving streaming events from a backend.
///
/// Wraps an `mpsc::Receiver<StreamEvent>`. The sequence ends at the first
/// terminal event, or when the sender side is dropped.
pub struct StreamHandle {
    pub receiver: mpsc::Receiver<StreamEvent>,
}

impl StreamHandle {
    pub fn new(receiver: mpsc::Receiver<StreamEvent>) -> Self {
        Self { receiver }
    }

    /// Build a handle that replays fixed events. Handy for adapters that
    /// only have a complete reply, and for tests.
    pub fn from_events(events: Vec<StreamEvent>) -> Self {
        let (tx, rx) = mpsc::channel(events.len().max(1));
        for event in events {
            // Capacity covers every event, so try_send cannot hit Full
            let _ = tx.try_send(event);
        }
        Self::new(rx)
    }

    /// Next event, or `None` once the backend side has finished.
    pub async fn next_event(&mut self) -> Option<StreamEvent> {
        self.receiver.recv().await
    }

    /// Consume the stream and collect all text into a single string.
    pub async fn collect_text(mut self) -> Result<String, GatewayError> {
        let mut full_text = String::new();
        while let Some(event) = self.receiver.recv().await {
            match event {
                StreamEvent::Delta(chunk) => full_text.push_str(&chunk),
                StreamEvent::Completed(text) => {
                    if full_text.is_empty() {
                        return Ok(text);
                    }
                    return Ok(full_text);
                }
                StreamEvent::Error(e) => {
                    return Err(GatewayError::StreamError(e));
                }
            }
        }
        // Channel closed without Completed, return what we have
        Ok(full_text)
    }
}

/// A single LLM backend capability.
///
/// Implementations are stateless with respect to conversations: every call
/// receives the full context, so one instance is shared by both assistants.
#[async_trait]
pub trait LlmBackend: Send + Sync {
    /// Which backend this adapter serves
    fn id(&self) -> BackendId;

    /// How the persona prompt must be delivered
    fn prompt_placement(&self) -> PromptPlacement;

    /// Request a complete reply
    async fn invoke(&self, request: ChatRequest) -> Result<String, GatewayError>;

    /// Request a streaming reply.
    ///
    /// Default implementation calls `invoke()` and wraps the result in a single
    /// `Completed` event, so adapters without native streaming still work.
    async fn invoke_streaming(&self, request: ChatRequest) -> Result<StreamHandle, GatewayError> {
        let result = self.invoke(request).await?;
        Ok(StreamHandle::from_events(vec![StreamEvent::Completed(result)]))
    }
}

/// Gateway resolving backend ids to their adapters
///
/// This port defines how the application layer reaches LLM backends.
/// Implementations (adapters) live in the infrastructure layer.
pub trait LlmGateway: Send + Sync {
    /// Look up the adapter registered for `id`
    fn resolve(&self, id: BackendId) -> Result<Arc<dyn LlmBackend>, GatewayError>;

    /// Registered backend ids
    fn backends(&self) -> Vec<BackendId>;
}
