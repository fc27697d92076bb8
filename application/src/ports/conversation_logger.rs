//! Conversation transcript port.
//!
//! Sessions and the orchestrator report what happened in a chat (messages,
//! replies, backend failures, backend switches, secondary activation) as
//! [`ConversationEvent`]s. Diagnostic output stays on `tracing`; this port is
//! for a machine-readable record of the chat itself.

use serde_json::Value;

/// One transcript entry.
pub struct ConversationEvent {
    /// Snake-case event name, e.g. `user_message` or `secondary_activated`.
    pub event_type: &'static str,
    /// Event fields; sessions always add a `session` field.
    pub payload: Value,
}

impl ConversationEvent {
    pub fn new(event_type: &'static str, payload: Value) -> Self {
        Self {
            event_type,
            payload,
        }
    }
}

/// Sink for transcript entries.
///
/// Infallible from the caller's side: a broken transcript must never fail a
/// chat turn, so implementations handle their own I/O errors.
pub trait ConversationLogger: Send + Sync {
    fn log(&self, event: ConversationEvent);
}

/// Discards every event.
pub struct NoConversationLogger;

impl ConversationLogger for NoConversationLogger {
    fn log(&self, _event: ConversationEvent) {}
}
