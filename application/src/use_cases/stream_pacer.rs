//! Streaming pacer.
//!
//! Drains a [`StreamHandle`] one fragment at a time, forwarding each fragment
//! to a [`ChatEventSink`] and then waiting a fixed delay before pulling the
//! next one. The wait is a `tokio::time::sleep`, so other tasks keep running.

use crate::ports::event_sink::ChatEventSink;
use crate::ports::llm_gateway::{GatewayError, StreamHandle};
use dualchat_domain::StreamEvent;
use std::time::Duration;
use tracing::debug;

/// Emits fragments to a sink at a fixed pace.
///
/// The delay is not adaptive and a stream cannot be aborted once started.
#[derive(Debug, Clone, Copy)]
pub struct StreamingPacer {
    delay: Duration,
}

impl StreamingPacer {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    /// Drive `handle` to its end.
    ///
    /// Returns the concatenation of all emitted fragments on success. On
    /// failure `sink.on_error` fires once, `sink.on_complete` never fires,
    /// and the partial text is dropped. A stream that carries no text at all
    /// fails with [`GatewayError::EmptyReply`].
    pub async fn stream(
        &self,
        mut handle: StreamHandle,
        sink: &dyn ChatEventSink,
    ) -> Result<String, GatewayError> {
        let mut full_text = String::new();
        let mut fragments = 0usize;

        while let Some(event) = handle.next_event().await {
            match event {
                StreamEvent::Delta(fragment) => {
                    if fragment.is_empty() {
                        continue;
                    }
                    self.emit(&fragment, sink).await;
                    full_text.push_str(&fragment);
                    fragments += 1;
                }
                StreamEvent::Completed(text) => {
                    // Non-streaming backends deliver everything here
                    if full_text.is_empty() && !text.is_empty() {
                        self.emit(&text, sink).await;
                        full_text = text;
                        fragments += 1;
                    }
                    break;
                }
                StreamEvent::Error(cause) => {
                    let error = GatewayError::StreamError(cause);
                    debug!(fragments, "Stream failed: {}", error);
                    sink.on_error(&error.to_string());
                    return Err(error);
                }
            }
        }

        if full_text.is_empty() {
            let error = GatewayError::EmptyReply;
            debug!("Stream ended without any text");
            sink.on_error(&error.to_string());
            return Err(error);
        }

        debug!(fragments, chars = full_text.len(), "Stream completed");
        sink.on_complete();
        Ok(full_text)
    }

    async fn emit(&self, fragment: &str, sink: &dyn ChatEventSink) {
        sink.on_fragment(fragment);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
    }
}

impl Default for StreamingPacer {
    fn default() -> Self {
        Self::new(crate::config::DEFAULT_PACING_DELAY)
    }
}
