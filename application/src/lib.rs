//! Application layer for dualchat
//!
//! This crate contains use cases, port definitions, and application configuration.
//! It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::{ChatConfig, DEFAULT_PACING_DELAY};
pub use ports::{
    conversation_logger::{ConversationEvent, ConversationLogger, NoConversationLogger},
    event_sink::ChatEventSink,
    llm_gateway::{
        ChatRequest, GatewayError, LlmBackend, LlmGateway, PromptPlacement, StreamHandle,
    },
};
pub use use_cases::assistant_session::AssistantSession;
pub use use_cases::orchestrator::DualAssistantOrchestrator;
pub use use_cases::stream_pacer::StreamingPacer;

/// User-visible text for a failed turn.
///
/// The string is returned to the caller and shown to the user. It is never
/// appended to the conversation: after a failed turn the history holds the
/// user message and no assistant reply.
pub fn format_error_reply(cause: &str) -> String {
    format!("Error: {cause}")
}
