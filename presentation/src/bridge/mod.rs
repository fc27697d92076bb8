//! UI boundary
//!
//! [`ChatBridge`] is the surface a front end talks to. Every operation is
//! request/response; the streaming calls also push named [`UiEvent`]s to a
//! [`UiEventSink`] before they return.

use dualchat_application::{ChatEventSink, DualAssistantOrchestrator};
use dualchat_domain::{AssistantSlot, BackendId, SecondaryState};
use std::sync::Arc;
use tracing::debug;

/// What a pushed event reports
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiEventKind {
    Fragment,
    Complete,
    Error,
}

/// A streaming event addressed to one assistant's view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UiEvent<'a> {
    pub slot: AssistantSlot,
    pub kind: UiEventKind,
    /// Fragment text, error text, or empty for completion
    pub payload: &'a str,
}

impl UiEvent<'_> {
    /// Wire name of the event; each assistant has its own set.
    pub fn name(&self) -> &'static str {
        match (self.slot, self.kind) {
            (AssistantSlot::Primary, UiEventKind::Fragment) => "update_streaming_message",
            (AssistantSlot::Primary, UiEventKind::Complete) => "streaming_complete",
            (AssistantSlot::Primary, UiEventKind::Error) => "streaming_error",
            (AssistantSlot::Secondary, UiEventKind::Fragment) => {
                "update_streaming_message_second_assistant"
            }
            (AssistantSlot::Secondary, UiEventKind::Complete) => {
                "streaming_complete_second_assistant"
            }
            (AssistantSlot::Secondary, UiEventKind::Error) => "streaming_error_second_assistant",
        }
    }
}

/// Receiver of pushed UI events (a window, a terminal, a test recorder).
pub trait UiEventSink: Send + Sync {
    fn emit(&self, event: UiEvent<'_>);
}

/// Routes one session's stream callbacks to the UI under that session's names.
struct SlotEventSink<'a> {
    slot: AssistantSlot,
    ui: &'a dyn UiEventSink,
}

impl SlotEventSink<'_> {
    fn push(&self, kind: UiEventKind, payload: &str) {
        self.ui.emit(UiEvent {
            slot: self.slot,
            kind,
            payload,
        });
    }
}

impl ChatEventSink for SlotEventSink<'_> {
    fn on_fragment(&self, fragment: &str) {
        self.push(UiEventKind::Fragment, fragment);
    }

    fn on_complete(&self) {
        self.push(UiEventKind::Complete, "");
    }

    fn on_error(&self, message: &str) {
        self.push(UiEventKind::Error, message);
    }
}

/// Front-end facing operations over the dual-assistant orchestrator.
///
/// Nothing here returns an error: failed turns come back as `"Error: ..."`
/// text and invalid selections as `false`.
pub struct ChatBridge {
    orchestrator: Arc<DualAssistantOrchestrator>,
    ui: Arc<dyn UiEventSink>,
}

impl ChatBridge {
    pub fn new(orchestrator: Arc<DualAssistantOrchestrator>, ui: Arc<dyn UiEventSink>) -> Self {
        Self { orchestrator, ui }
    }

    pub fn orchestrator(&self) -> &Arc<DualAssistantOrchestrator> {
        &self.orchestrator
    }

    /// Primary backend by selector name (`claude`, `gpt`, `gemini`).
    pub async fn set_model(&self, name: &str) -> bool {
        self.select(AssistantSlot::Primary, name).await
    }

    /// Secondary backend by selector name, display label, or alias.
    pub async fn set_model_secondary(&self, name: &str) -> bool {
        self.select(AssistantSlot::Secondary, name).await
    }

    pub async fn model(&self, slot: AssistantSlot) -> BackendId {
        self.orchestrator.backend(slot).await
    }

    /// Complete reply from the primary assistant.
    pub async fn send_message(&self, text: &str) -> String {
        self.orchestrator
            .send_sync(AssistantSlot::Primary, text)
            .await
    }

    /// Complete reply from the secondary assistant.
    pub async fn send_message_secondary(&self, text: &str) -> String {
        self.orchestrator
            .send_sync(AssistantSlot::Secondary, text)
            .await
    }

    /// Streamed reply from the primary assistant.
    pub async fn send_message_stream(&self, text: &str) -> String {
        self.stream(AssistantSlot::Primary, text).await
    }

    /// Streamed reply from the secondary assistant, under its own event names.
    pub async fn send_message_stream_secondary(&self, text: &str) -> String {
        self.stream(AssistantSlot::Secondary, text).await
    }

    pub fn detect_dual_topic(&self, text: &str) -> bool {
        self.orchestrator
            .classify_and_maybe_suggest_activation(text)
    }

    pub fn secondary_state(&self) -> SecondaryState {
        self.orchestrator.secondary_state()
    }

    pub async fn activate_secondary(&self) -> bool {
        self.orchestrator.activate_secondary().await;
        true
    }

    pub async fn deactivate_secondary(&self) -> bool {
        self.orchestrator.deactivate_secondary().await;
        true
    }

    pub async fn clear_conversation(&self) -> bool {
        self.orchestrator.clear(AssistantSlot::Primary).await;
        true
    }

    pub async fn clear_conversation_secondary(&self) -> bool {
        self.orchestrator.clear(AssistantSlot::Secondary).await;
        true
    }

    async fn select(&self, slot: AssistantSlot, name: &str) -> bool {
        match self.orchestrator.set_backend(slot, name).await {
            Ok(_) => true,
            Err(e) => {
                debug!(?slot, name, error = %e, "Backend selection rejected");
                false
            }
        }
    }

    async fn stream(&self, slot: AssistantSlot, text: &str) -> String {
        let sink = SlotEventSink {
            slot,
            ui: self.ui.as_ref(),
        };
        self.orchestrator.send_streaming(slot, text, &sink).await
    }
}
