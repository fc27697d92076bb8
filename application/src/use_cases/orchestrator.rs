//! Dual-assistant orchestrator.
//!
//! Owns the primary and secondary [`AssistantSession`]s and the secondary's
//! lifecycle. Topic classification is advisory: it never changes state, the
//! caller decides whether to activate.
//!
//! Each session sits behind its own `tokio::sync::Mutex`. A turn holds that
//! lock until its reply is appended, so turns on the same session are
//! serialized and a `clear` issued mid-stream applies after the stream's
//! append. The two sessions never wait on each other, except briefly during
//! activation while the primary is snapshotted.

use crate::config::ChatConfig;
use crate::ports::conversation_logger::{
    ConversationEvent, ConversationLogger, NoConversationLogger,
};
use crate::ports::event_sink::ChatEventSink;
use crate::ports::llm_gateway::LlmGateway;
use crate::use_cases::assistant_session::AssistantSession;
use crate::use_cases::stream_pacer::StreamingPacer;
use dualchat_domain::{
    AssistantSlot, BackendId, Conversation, DomainError, Persona, SecondaryState, has_dual_topic,
};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::Mutex;
use tracing::{debug, info};

/// Coordinates the primary and the topic-gated secondary assistant.
///
/// # Caller contract
///
/// Secondary operations are accepted while the secondary is
/// [`SecondaryState::Inactive`]; they act on its inert conversation, which
/// the next activation overwrites.
pub struct DualAssistantOrchestrator {
    primary: Mutex<AssistantSession>,
    secondary: Mutex<AssistantSession>,
    secondary_active: AtomicBool,
    conversation_logger: Arc<dyn ConversationLogger>,
}

impl DualAssistantOrchestrator {
    pub fn new(gateway: Arc<dyn LlmGateway>, config: ChatConfig) -> Self {
        Self::with_conversation_logger(gateway, config, Arc::new(NoConversationLogger))
    }

    /// Create with a conversation logger shared by both sessions.
    pub fn with_conversation_logger(
        gateway: Arc<dyn LlmGateway>,
        config: ChatConfig,
        logger: Arc<dyn ConversationLogger>,
    ) -> Self {
        let pacer = StreamingPacer::new(config.pacing_delay);

        let primary = AssistantSession::new(
            AssistantSlot::Primary,
            config.primary_persona,
            config.primary_backend,
            gateway.clone(),
        )
        .with_pacer(pacer)
        .with_conversation_logger(logger.clone());

        let secondary = AssistantSession::new(
            AssistantSlot::Secondary,
            config.secondary_persona,
            config.secondary_backend,
            gateway,
        )
        .with_pacer(pacer)
        .with_conversation_logger(logger.clone());

        Self {
            primary: Mutex::new(primary),
            secondary: Mutex::new(secondary),
            secondary_active: AtomicBool::new(false),
            conversation_logger: logger,
        }
    }

    pub fn secondary_state(&self) -> SecondaryState {
        if self.secondary_active.load(Ordering::SeqCst) {
            SecondaryState::Active
        } else {
            SecondaryState::Inactive
        }
    }

    /// Inactive -> Active; re-seeds the secondary if already active.
    ///
    /// The secondary conversation becomes a snapshot of the primary one at
    /// this instant. Later messages to either side do not propagate.
    pub async fn activate_secondary(&self) {
        let snapshot = self.primary.lock().await.conversation().snapshot();
        let seeded = snapshot.len();

        self.secondary.lock().await.seed(snapshot);
        let was_active = self.secondary_active.swap(true, Ordering::SeqCst);

        info!(seeded, reseed = was_active, "Secondary assistant activated");
        self.conversation_logger.log(ConversationEvent::new(
            "secondary_activated",
            serde_json::json!({ "seeded_messages": seeded, "reseed": was_active }),
        ));
    }

    /// Active -> Inactive. The secondary conversation is left intact.
    pub async fn deactivate_secondary(&self) {
        self.secondary_active.store(false, Ordering::SeqCst);
        info!("Secondary assistant deactivated");
        self.conversation_logger.log(ConversationEvent::new(
            "secondary_deactivated",
            serde_json::json!({}),
        ));
    }

    /// Run the topic detector on `message`. Does not change state.
    pub fn classify_and_maybe_suggest_activation(&self, message: &str) -> bool {
        let dual = has_dual_topic(message);
        debug!(dual, "Topic classification");
        dual
    }

    pub async fn set_backend(
        &self,
        slot: AssistantSlot,
        name: &str,
    ) -> Result<BackendId, DomainError> {
        self.session(slot).lock().await.set_backend(name)
    }

    pub async fn backend(&self, slot: AssistantSlot) -> BackendId {
        self.session(slot).lock().await.backend()
    }

    pub async fn persona(&self, slot: AssistantSlot) -> Persona {
        self.session(slot).lock().await.persona().clone()
    }

    pub async fn send_sync(&self, slot: AssistantSlot, message: &str) -> String {
        self.trace_inactive_use(slot);
        self.session(slot).lock().await.send_sync(message).await
    }

    pub async fn send_streaming(
        &self,
        slot: AssistantSlot,
        message: &str,
        sink: &dyn ChatEventSink,
    ) -> String {
        self.trace_inactive_use(slot);
        self.session(slot)
            .lock()
            .await
            .send_streaming(message, sink)
            .await
    }

    pub async fn clear(&self, slot: AssistantSlot) {
        self.session(slot).lock().await.clear();
    }

    /// Independent copy of a session's conversation.
    pub async fn conversation(&self, slot: AssistantSlot) -> Conversation {
        self.session(slot).lock().await.conversation().snapshot()
    }

    fn session(&self, slot: AssistantSlot) -> &Mutex<AssistantSession> {
        match slot {
            AssistantSlot::Primary => &self.primary,
            AssistantSlot::Secondary => &self.secondary,
        }
    }

    fn trace_inactive_use(&self, slot: AssistantSlot) {
        if slot == AssistantSlot::Secondary && !self.secondary_state().is_active() {
            debug!("Secondary used while inactive");
        }
    }
}
