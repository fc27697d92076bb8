//! Assistant session.
//!
//! One addressable chat identity: its own conversation, selected backend and
//! persona. A turn appends the user message first, then asks the selected
//! backend for a reply with the whole conversation as context. Only a
//! successful reply is appended; a failed turn keeps the user message so it
//! can be retried.

use crate::format_error_reply;
use crate::ports::conversation_logger::{
    ConversationEvent, ConversationLogger, NoConversationLogger,
};
use crate::ports::event_sink::{ChatEventSink, FormattedErrorSink};
use crate::ports::llm_gateway::{ChatRequest, GatewayError, LlmBackend, LlmGateway};
use crate::use_cases::stream_pacer::StreamingPacer;
use dualchat_domain::{AssistantSlot, BackendId, Conversation, DomainError, Message, Persona};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// A single assistant: conversation + backend selection + persona.
///
/// Turns take `&mut self`; callers that share a session across tasks wrap it
/// in a `tokio::sync::Mutex` so turns on one session run one at a time.
pub struct AssistantSession {
    slot: AssistantSlot,
    persona: Persona,
    backend: BackendId,
    conversation: Conversation,
    gateway: Arc<dyn LlmGateway>,
    pacer: StreamingPacer,
    conversation_logger: Arc<dyn ConversationLogger>,
}

impl AssistantSession {
    pub fn new(
        slot: AssistantSlot,
        persona: Persona,
        backend: BackendId,
        gateway: Arc<dyn LlmGateway>,
    ) -> Self {
        Self {
            slot,
            persona,
            backend,
            conversation: Conversation::new(),
            gateway,
            pacer: StreamingPacer::default(),
            conversation_logger: Arc::new(NoConversationLogger),
        }
    }

    /// Use a specific pacer for streaming turns.
    pub fn with_pacer(mut self, pacer: StreamingPacer) -> Self {
        self.pacer = pacer;
        self
    }

    /// Create with a conversation logger.
    pub fn with_conversation_logger(mut self, logger: Arc<dyn ConversationLogger>) -> Self {
        self.conversation_logger = logger;
        self
    }

    pub fn slot(&self) -> AssistantSlot {
        self.slot
    }

    pub fn persona(&self) -> &Persona {
        &self.persona
    }

    pub fn backend(&self) -> BackendId {
        self.backend
    }

    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    /// Select a backend by name.
    ///
    /// The primary accepts selector names only; the secondary also accepts
    /// display labels, vendor model ids and short aliases. On error the
    /// current selection is left unchanged.
    pub fn set_backend(&mut self, name: &str) -> Result<BackendId, DomainError> {
        let parsed = match self.slot {
            AssistantSlot::Primary => BackendId::from_selector(name),
            AssistantSlot::Secondary => BackendId::from_alias(name),
        };

        match parsed {
            Ok(id) => {
                self.select_backend(id);
                Ok(id)
            }
            Err(e) => {
                debug!(session = %self.slot, "Rejected backend selection: {}", e);
                Err(e)
            }
        }
    }

    /// Select a backend by id.
    pub fn select_backend(&mut self, id: BackendId) {
        if self.backend != id {
            info!(session = %self.slot, from = %self.backend, to = %id, "Backend changed");
        }
        self.backend = id;
        self.log_event(
            "backend_changed",
            serde_json::json!({ "backend": id.as_str() }),
        );
    }

    /// Blocking-style turn: ask for a complete reply.
    ///
    /// Returns the reply, or `"Error: <cause>"` if the backend failed.
    pub async fn send_sync(&mut self, user_message: &str) -> String {
        self.append_user(user_message);

        let result = match self.resolve_backend() {
            Ok(backend) => {
                let request = self.build_request(backend.as_ref());
                backend.invoke(request).await
            }
            Err(e) => Err(e),
        };

        self.finish_turn(result)
    }

    /// Streaming turn: fragments are paced into `sink`.
    ///
    /// Returns the full reply once the stream ends, or `"Error: <cause>"`;
    /// in the error case `sink.on_error` has already received the same text.
    pub async fn send_streaming(&mut self, user_message: &str, sink: &dyn ChatEventSink) -> String {
        self.append_user(user_message);
        let sink = FormattedErrorSink::new(sink);

        let result = match self.resolve_backend() {
            Ok(backend) => {
                let request = self.build_request(backend.as_ref());
                match backend.invoke_streaming(request).await {
                    Ok(handle) => self.pacer.stream(handle, &sink).await,
                    Err(e) => {
                        sink.on_error(&e.to_string());
                        Err(e)
                    }
                }
            }
            Err(e) => {
                sink.on_error(&e.to_string());
                Err(e)
            }
        };

        self.finish_turn(result)
    }

    /// Drop the whole conversation.
    pub fn clear(&mut self) {
        self.conversation.clear();
        info!(session = %self.slot, "Conversation cleared");
        self.log_event("conversation_cleared", serde_json::json!({}));
    }

    /// Replace the conversation with a snapshot taken elsewhere.
    pub(crate) fn seed(&mut self, snapshot: Conversation) {
        self.conversation.replace_with(snapshot);
    }

    fn resolve_backend(&self) -> Result<Arc<dyn LlmBackend>, GatewayError> {
        self.gateway.resolve(self.backend)
    }

    fn build_request(&self, backend: &dyn LlmBackend) -> ChatRequest {
        ChatRequest::build(
            backend.prompt_placement(),
            &self.persona.system_prompt,
            self.conversation.messages(),
        )
    }

    fn append_user(&mut self, user_message: &str) {
        self.conversation.append(Message::user(user_message));
        debug!(
            session = %self.slot,
            backend = %self.backend,
            messages = self.conversation.len(),
            "User message appended"
        );
        self.log_event(
            "user_message",
            serde_json::json!({ "backend": self.backend.as_str(), "content": user_message }),
        );
    }

    fn finish_turn(&mut self, result: Result<String, GatewayError>) -> String {
        // Conversations never hold an empty assistant message
        let result = result.and_then(|reply| {
            if reply.is_empty() {
                Err(GatewayError::EmptyReply)
            } else {
                Ok(reply)
            }
        });

        match result {
            Ok(reply) => {
                self.conversation.append(Message::assistant(reply.clone()));
                info!(
                    session = %self.slot,
                    backend = %self.backend,
                    chars = reply.len(),
                    "Reply received"
                );
                self.log_event(
                    "assistant_reply",
                    serde_json::json!({ "backend": self.backend.as_str(), "content": reply }),
                );
                reply
            }
            Err(e) => {
                warn!(session = %self.slot, backend = %self.backend, "Backend call failed: {}", e);
                self.log_event(
                    "backend_error",
                    serde_json::json!({ "backend": self.backend.as_str(), "error": e.to_string() }),
                );
                format_error_reply(&e.to_string())
            }
        }
    }

    fn log_event(&self, event_type: &'static str, mut payload: serde_json::Value) {
        if let serde_json::Value::Object(ref mut map) = payload {
            map.insert(
                "session".to_string(),
                serde_json::Value::String(self.slot.as_str().to_string()),
            );
        }
        self.conversation_logger
            .log(ConversationEvent::new(event_type, payload));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::llm_gateway::PromptPlacement;
    use crate::use_cases::stream_pacer::tests::{RecordingSink, SinkEvent};
    use crate::use_cases::test_support::{MockBackend, MockGateway, Scripted};
    use dualchat_domain::{Role, StreamEvent};
    use std::time::Duration;

    fn session_with(slot: AssistantSlot, backend: Arc<MockBackend>) -> AssistantSession {
        let id = backend.id();
        let gateway = Arc::new(MockGateway::with_backends(vec![backend]));
        AssistantSession::new(slot, Persona::primary(), id, gateway)
            .with_pacer(StreamingPacer::new(Duration::ZERO))
    }

    #[tokio::test]
    async fn sync_success_appends_user_then_assistant() {
        let backend = MockBackend::new(BackendId::Claude, PromptPlacement::Parameter)
            .script(Scripted::Reply("hello there".to_string()));
        let mut session = session_with(AssistantSlot::Primary, backend);

        let reply = session.send_sync("hi").await;

        assert_eq!(reply, "hello there");
        assert_eq!(
            session.conversation().messages(),
            &[Message::user("hi"), Message::assistant("hello there")]
        );
    }

    #[tokio::test]
    async fn sync_failure_keeps_only_user_message() {
        let backend = MockBackend::new(BackendId::Claude, PromptPlacement::Parameter).script(
            Scripted::Fail(GatewayError::RequestFailed("invalid x-api-key".to_string())),
        );
        let mut session = session_with(AssistantSlot::Primary, backend);

        let reply = session.send_sync("hi").await;

        assert_eq!(reply, "Error: Request failed: invalid x-api-key");
        assert_eq!(session.conversation().messages(), &[Message::user("hi")]);
    }

    #[tokio::test]
    async fn empty_sync_reply_is_not_persisted() {
        let backend = MockBackend::new(BackendId::Claude, PromptPlacement::Parameter)
            .script(Scripted::Reply(String::new()));
        let mut session = session_with(AssistantSlot::Primary, backend);

        let reply = session.send_sync("hi").await;

        assert_eq!(reply, "Error: Backend returned an empty reply");
        assert_eq!(session.conversation().messages(), &[Message::user("hi")]);
    }

    #[tokio::test]
    async fn stream_without_text_is_an_error_and_not_persisted() {
        let backend = MockBackend::new(BackendId::Gemini, PromptPlacement::Parameter)
            .script(Scripted::Stream(vec![StreamEvent::Completed(String::new())]));
        let mut session = session_with(AssistantSlot::Primary, backend);
        let sink = RecordingSink::default();

        let reply = session.send_streaming("hi", &sink).await;

        assert_eq!(reply, "Error: Backend returned an empty reply");
        assert_eq!(
            sink.events(),
            vec![SinkEvent::Error(
                "Error: Backend returned an empty reply".to_string()
            )]
        );
        assert_eq!(session.conversation().messages(), &[Message::user("hi")]);
    }

    #[tokio::test]
    async fn session_stays_usable_after_failure() {
        let backend = MockBackend::new(BackendId::Claude, PromptPlacement::Parameter)
            .script(Scripted::Fail(GatewayError::ConnectionError("reset".to_string())))
            .script(Scripted::Reply("second try".to_string()));
        let mut session = session_with(AssistantSlot::Primary, backend);

        session.send_sync("first").await;
        let reply = session.send_sync("again").await;

        assert_eq!(reply, "second try");
        assert_eq!(session.conversation().len(), 3);
    }

    #[tokio::test]
    async fn error_reply_is_not_sent_back_to_the_backend() {
        let backend = MockBackend::new(BackendId::Claude, PromptPlacement::Parameter)
            .script(Scripted::Fail(GatewayError::RequestFailed("HTTP 529: Overloaded".to_string())))
            .script(Scripted::Reply("ok".to_string()));
        let mut session = session_with(AssistantSlot::Primary, backend.clone());

        let failed = session.send_sync("first").await;
        session.send_sync("again").await;

        let requests = backend.requests();
        let retry = requests.last().unwrap();
        assert_eq!(
            retry.messages,
            vec![Message::user("first"), Message::user("again")]
        );
        assert!(retry.messages.iter().all(|m| m.content() != failed));
    }

    #[tokio::test]
    async fn request_carries_full_conversation_and_persona() {
        let backend = MockBackend::new(BackendId::OpenAi, PromptPlacement::Message)
            .script(Scripted::Reply("one".to_string()))
            .script(Scripted::Reply("two".to_string()));
        let mut session = session_with(AssistantSlot::Primary, backend.clone());

        session.send_sync("a").await;
        session.send_sync("b").await;

        let requests = backend.requests();
        let last = requests.last().unwrap();
        assert_eq!(last.messages.len(), 4);
        assert_eq!(last.messages[0].role(), Role::System);
        assert_eq!(
            last.effective_system_prompt(),
            Some(Persona::primary().system_prompt.as_str())
        );
        assert_eq!(last.messages[3], Message::user("b"));
    }

    #[tokio::test]
    async fn streaming_success_persists_concatenated_fragments() {
        let backend = MockBackend::new(BackendId::Gemini, PromptPlacement::Parameter).script(
            Scripted::Stream(vec![
                StreamEvent::Delta("Zero ".to_string()),
                StreamEvent::Delta("Tech".to_string()),
                StreamEvent::Completed(String::new()),
            ]),
        );
        let mut session = session_with(AssistantSlot::Secondary, backend);
        let sink = RecordingSink::default();

        let reply = session.send_streaming("hey", &sink).await;

        assert_eq!(reply, "Zero Tech");
        assert_eq!(sink.fragments_joined(), "Zero Tech");
        assert_eq!(
            session.conversation().last(),
            Some(&Message::assistant("Zero Tech"))
        );
        assert_eq!(sink.count(&SinkEvent::Complete), 1);
    }

    #[tokio::test]
    async fn streaming_failure_fires_one_error_and_discards_partial() {
        let backend = MockBackend::new(BackendId::Gemini, PromptPlacement::Parameter).script(
            Scripted::Stream(vec![
                StreamEvent::Delta("half a ".to_string()),
                StreamEvent::Error("connection reset".to_string()),
            ]),
        );
        let mut session = session_with(AssistantSlot::Primary, backend);
        let sink = RecordingSink::default();

        let reply = session.send_streaming("hi", &sink).await;

        assert_eq!(reply, "Error: Stream error: connection reset");
        assert_eq!(sink.error_count(), 1);
        assert_eq!(sink.count(&SinkEvent::Complete), 0);
        assert!(sink.events().contains(&SinkEvent::Error(reply.clone())));
        assert_eq!(session.conversation().messages(), &[Message::user("hi")]);
    }

    #[tokio::test]
    async fn streaming_start_failure_reports_error() {
        let backend = MockBackend::new(BackendId::Claude, PromptPlacement::Parameter).script(
            Scripted::Fail(GatewayError::MissingCredentials("ANTHROPIC_API_KEY".to_string())),
        );
        let mut session = session_with(AssistantSlot::Primary, backend);
        let sink = RecordingSink::default();

        let reply = session.send_streaming("hi", &sink).await;

        assert_eq!(reply, "Error: Missing API key: set ANTHROPIC_API_KEY");
        assert_eq!(sink.events(), vec![SinkEvent::Error(reply)]);
    }

    #[tokio::test]
    async fn unregistered_backend_fails_the_call() {
        let backend = MockBackend::new(BackendId::Claude, PromptPlacement::Parameter);
        let mut session = session_with(AssistantSlot::Primary, backend);
        session.select_backend(BackendId::Gemini);

        let reply = session.send_sync("hi").await;

        assert_eq!(reply, "Error: Unknown backend: gemini");
        assert_eq!(session.conversation().len(), 1);
    }

    #[test]
    fn invalid_selection_leaves_backend_unchanged() {
        let backend = MockBackend::new(BackendId::Claude, PromptPlacement::Parameter);
        let mut session = session_with(AssistantSlot::Primary, backend);

        for name in ["llama", "", "GPT-4o", "mistral-large"] {
            assert!(session.set_backend(name).is_err());
            assert_eq!(session.backend(), BackendId::Claude);
        }
    }

    #[test]
    fn secondary_accepts_display_names() {
        let backend = MockBackend::new(BackendId::Claude, PromptPlacement::Parameter);
        let mut session = session_with(AssistantSlot::Secondary, backend);

        assert_eq!(session.set_backend("GPT-4o"), Ok(BackendId::OpenAi));
        assert_eq!(session.set_backend("claude"), Ok(BackendId::Claude));
    }

    #[tokio::test]
    async fn clear_then_send_starts_fresh() {
        let backend = MockBackend::new(BackendId::Claude, PromptPlacement::Parameter)
            .script(Scripted::Reply("r1".to_string()))
            .script(Scripted::Reply("r2".to_string()));
        let mut session = session_with(AssistantSlot::Primary, backend);

        session.send_sync("one").await;
        session.clear();
        assert!(session.conversation().is_empty());

        session.send_sync("two").await;
        assert_eq!(
            session.conversation().messages(),
            &[Message::user("two"), Message::assistant("r2")]
        );
    }
}
