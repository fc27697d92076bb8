//! Mock ports shared by the use case tests.

use crate::ports::llm_gateway::{
    ChatRequest, GatewayError, LlmBackend, LlmGateway, PromptPlacement, StreamHandle,
};
use async_trait::async_trait;
use dualchat_domain::{BackendId, StreamEvent};
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

/// One scripted backend outcome, consumed in order.
#[derive(Debug, Clone)]
pub(crate) enum Scripted {
    Reply(String),
    Stream(Vec<StreamEvent>),
    Fail(GatewayError),
}

pub(crate) struct MockBackend {
    id: BackendId,
    placement: PromptPlacement,
    script: Mutex<VecDeque<Scripted>>,
    requests: Mutex<Vec<ChatRequest>>,
}

impl MockBackend {
    pub(crate) fn new(id: BackendId, placement: PromptPlacement) -> Arc<Self> {
        Arc::new(Self {
            id,
            placement,
            script: Mutex::new(VecDeque::new()),
            requests: Mutex::new(Vec::new()),
        })
    }

    pub(crate) fn script(self: Arc<Self>, outcome: Scripted) -> Arc<Self> {
        self.script.lock().unwrap().push_back(outcome);
        self
    }

    pub(crate) fn requests(&self) -> Vec<ChatRequest> {
        self.requests.lock().unwrap().clone()
    }

    fn next(&self, request: ChatRequest) -> Scripted {
        self.requests.lock().unwrap().push(request);
        self.script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Scripted::Fail(GatewayError::Other("script exhausted".into())))
    }
}

#[async_trait]
impl LlmBackend for MockBackend {
    fn id(&self) -> BackendId {
        self.id
    }

    fn prompt_placement(&self) -> PromptPlacement {
        self.placement
    }

    async fn invoke(&self, request: ChatRequest) -> Result<String, GatewayError> {
        match self.next(request) {
            Scripted::Reply(text) => Ok(text),
            Scripted::Stream(events) => StreamHandle::from_events(events).collect_text().await,
            Scripted::Fail(e) => Err(e),
        }
    }

    async fn invoke_streaming(&self, request: ChatRequest) -> Result<StreamHandle, GatewayError> {
        match self.next(request) {
            Scripted::Reply(text) => Ok(StreamHandle::from_events(vec![StreamEvent::Completed(
                text,
            )])),
            Scripted::Stream(events) => Ok(StreamHandle::from_events(events)),
            Scripted::Fail(e) => Err(e),
        }
    }
}

pub(crate) struct MockGateway {
    backends: HashMap<BackendId, Arc<MockBackend>>,
}

impl MockGateway {
    pub(crate) fn with_backends(backends: Vec<Arc<MockBackend>>) -> Self {
        Self {
            backends: backends.into_iter().map(|b| (b.id(), b)).collect(),
        }
    }
}

impl LlmGateway for MockGateway {
    fn resolve(&self, id: BackendId) -> Result<Arc<dyn LlmBackend>, GatewayError> {
        self.backends
            .get(&id)
            .map(|b| b.clone() as Arc<dyn LlmBackend>)
            .ok_or(GatewayError::UnknownBackend(id))
    }

    fn backends(&self) -> Vec<BackendId> {
        let mut ids: Vec<_> = self.backends.keys().copied().collect();
        ids.sort();
        ids
    }
}
