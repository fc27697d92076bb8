use dualchat_application::ports::llm_gateway::{GatewayError, LlmBackend, LlmGateway};
use dualchat_domain::BackendId;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::warn;

/// Closed table from backend id to adapter.
///
/// Built once at startup and read-only afterwards, so it is shared between
/// both assistants without locking.
pub struct BackendRegistry {
    backends: BTreeMap<BackendId, Arc<dyn LlmBackend>>,
}

impl BackendRegistry {
    pub fn builder() -> BackendRegistryBuilder {
        BackendRegistryBuilder::default()
    }
}

impl LlmGateway for BackendRegistry {
    fn resolve(&self, id: BackendId) -> Result<Arc<dyn LlmBackend>, GatewayError> {
        self.backends
            .get(&id)
            .cloned()
            .ok_or(GatewayError::UnknownBackend(id))
    }

    /// Registered ids in enum order
    fn backends(&self) -> Vec<BackendId> {
        self.backends.keys().copied().collect()
    }
}

#[derive(Default)]
pub struct BackendRegistryBuilder {
    backends: BTreeMap<BackendId, Arc<dyn LlmBackend>>,
}

impl BackendRegistryBuilder {
    /// Register `backend` under its own id. A later registration for the same
    /// id replaces the earlier one.
    pub fn register(mut self, backend: Arc<dyn LlmBackend>) -> Self {
        let id = backend.id();
        if self.backends.insert(id, backend).is_some() {
            warn!(backend = %id, "Backend registered twice, keeping the latest");
        }
        self
    }

    pub fn build(self) -> BackendRegistry {
        BackendRegistry {
            backends: self.backends,
        }
    }
}
