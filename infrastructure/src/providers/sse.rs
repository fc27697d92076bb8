//! Server-sent events plumbing shared by the HTTP adapters.
//!
//! Response bodies arrive as arbitrary byte chunks. [`LineBuffer`] reassembles
//! them into lines, [`data_payload`] extracts the `data:` field, and each
//! adapter turns a payload into an [`SseFrame`]. [`spawn_sse_reader`] runs that
//! loop in a background task feeding a [`StreamHandle`].

use dualchat_application::ports::llm_gateway::{GatewayError, StreamHandle};
use dualchat_domain::{BackendId, StreamEvent};
use futures_util::StreamExt;
use memchr::memchr;
use tokio::sync::mpsc;
use tracing::{debug, warn};

/// Bounded so a slow consumer applies backpressure to the HTTP read loop.
const STREAM_CHANNEL_CAPACITY: usize = 64;

/// What a single `data:` payload means to the stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum SseFrame {
    /// Keep-alive, metadata, or an event type we do not render
    Skip,
    Delta(String),
    Done,
    Error(String),
}

/// Accumulates body bytes and yields complete lines.
#[derive(Debug, Default)]
pub(crate) struct LineBuffer {
    buffer: Vec<u8>,
}

impl LineBuffer {
    pub(crate) fn extend(&mut self, bytes: &[u8]) {
        self.buffer.extend_from_slice(bytes);
    }

    /// Next complete line with the trailing `\n` / `\r\n` removed.
    ///
    /// Invalid UTF-8 is replaced rather than failing the stream.
    pub(crate) fn next_line(&mut self) -> Option<String> {
        let newline = memchr(b'\n', &self.buffer)?;
        let line: Vec<u8> = self.buffer.drain(..=newline).collect();
        let text = String::from_utf8_lossy(&line);
        Some(text.trim_end_matches(['\r', '\n']).to_string())
    }

    /// Whatever is left after the body ended without a final newline.
    pub(crate) fn take_remainder(&mut self) -> Option<String> {
        if self.buffer.is_empty() {
            return None;
        }
        let rest = std::mem::take(&mut self.buffer);
        Some(String::from_utf8_lossy(&rest).trim().to_string())
    }
}

pub(crate) fn data_payload(line: &str) -> Option<&str> {
    line.strip_prefix("data:").map(str::trim_start)
}

/// Pull a human-readable message out of a vendor error body.
///
/// Understands `{"error": {"message": ..}}`, `{"error": ".."}` and
/// `{"message": ..}`; falls back to the trimmed raw body.
pub(crate) fn extract_error_message(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return "empty response body".to_string();
    }

    let Ok(value) = serde_json::from_str::<serde_json::Value>(trimmed) else {
        return trimmed.to_string();
    };

    let summary = value
        .pointer("/error/message")
        .and_then(|v| v.as_str())
        .or_else(|| value.get("error").and_then(|v| v.as_str()))
        .or_else(|| value.get("message").and_then(|v| v.as_str()));

    match summary {
        Some(text) => text.split_whitespace().collect::<Vec<_>>().join(" "),
        None => trimmed.to_string(),
    }
}

/// Turn a non-2xx response into a [`GatewayError::RequestFailed`].
pub(crate) async fn request_failed(response: reqwest::Response) -> GatewayError {
    let status = response.status();
    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "<no body>".to_string());
    GatewayError::RequestFailed(format!(
        "HTTP {}: {}",
        status.as_u16(),
        extract_error_message(&body)
    ))
}

/// Spawn the read loop for a successful streaming response.
///
/// The task ends at the first `Done` or `Error` frame, when the body ends,
/// or when the receiving side is dropped.
pub(crate) fn spawn_sse_reader(
    backend: BackendId,
    response: reqwest::Response,
    parse: fn(&str) -> SseFrame,
) -> StreamHandle {
    let (tx, rx) = mpsc::channel(STREAM_CHANNEL_CAPACITY);

    tokio::spawn(async move {
        let mut body = response.bytes_stream();
        let mut lines = LineBuffer::default();

        while let Some(chunk) = body.next().await {
            let bytes = match chunk {
                Ok(bytes) => bytes,
                Err(e) => {
                    warn!(%backend, "Stream read failed: {}", e);
                    let _ = tx.send(StreamEvent::Error(e.to_string())).await;
                    return;
                }
            };
            lines.extend(&bytes);

            while let Some(line) = lines.next_line() {
                if !forward_line(&line, parse, &tx).await {
                    return;
                }
            }
        }

        if let Some(line) = lines.take_remainder()
            && !forward_line(&line, parse, &tx).await
        {
            return;
        }

        debug!(%backend, "Stream body ended");
        let _ = tx.send(StreamEvent::Completed(String::new())).await;
    });

    StreamHandle::new(rx)
}

/// Returns `false` once the stream is finished or nobody is listening.
async fn forward_line(
    line: &str,
    parse: fn(&str) -> SseFrame,
    tx: &mpsc::Sender<StreamEvent>,
) -> bool {
    let Some(payload) = data_payload(line) else {
        return true;
    };

    let event = match parse(payload) {
        SseFrame::Skip => return true,
        SseFrame::Delta(text) => StreamEvent::Delta(text),
        SseFrame::Done => StreamEvent::Completed(String::new()),
        SseFrame::Error(message) => StreamEvent::Error(message),
    };
    let terminal = event.is_terminal();
    tx.send(event).await.is_ok() && !terminal
}
