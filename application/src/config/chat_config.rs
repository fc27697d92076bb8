//! Chat parameters: session and pacing control.
//!
//! [`ChatConfig`] groups the static parameters the orchestrator needs at
//! startup: initial backend per assistant, personas, and the per-fragment
//! pacing delay.

use dualchat_domain::{BackendId, Persona};
use std::time::Duration;

/// Default delay between two streamed fragments.
pub const DEFAULT_PACING_DELAY: Duration = Duration::from_millis(50);

/// Startup parameters for both assistants.
#[derive(Debug, Clone)]
pub struct ChatConfig {
    /// Initial backend of the primary assistant.
    pub primary_backend: BackendId,
    /// Initial backend of the secondary assistant.
    pub secondary_backend: BackendId,
    /// Persona of the primary assistant.
    pub primary_persona: Persona,
    /// Persona of the secondary assistant.
    pub secondary_persona: Persona,
    /// Fixed wait after each streamed fragment.
    pub pacing_delay: Duration,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            primary_backend: BackendId::default(),
            secondary_backend: BackendId::default(),
            primary_persona: Persona::primary(),
            secondary_persona: Persona::secondary(),
            pacing_delay: DEFAULT_PACING_DELAY,
        }
    }
}

impl ChatConfig {
    // ==================== Builder Methods ====================

    pub fn with_primary_backend(mut self, backend: BackendId) -> Self {
        self.primary_backend = backend;
        self
    }

    pub fn with_secondary_backend(mut self, backend: BackendId) -> Self {
        self.secondary_backend = backend;
        self
    }

    pub fn with_primary_persona(mut self, persona: Persona) -> Self {
        self.primary_persona = persona;
        self
    }

    pub fn with_secondary_persona(mut self, persona: Persona) -> Self {
        self.secondary_persona = persona;
        self
    }

    pub fn with_pacing_delay(mut self, delay: Duration) -> Self {
        self.pacing_delay = delay;
        self
    }
}
