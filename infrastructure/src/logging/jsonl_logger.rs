//! Append-only JSONL transcript of chat events.
//!
//! One line per [`ConversationEvent`]: the event payload plus `type`, an
//! RFC 3339 `timestamp` and a per-file `seq` counter. Restarting the binary
//! with the same path keeps appending to the existing transcript.

use dualchat_application::ports::conversation_logger::{ConversationEvent, ConversationLogger};
use serde_json::{Map, Value};
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::warn;

struct Transcript {
    writer: BufWriter<File>,
    seq: u64,
}

/// [`ConversationLogger`] writing to a JSONL file shared by both assistants.
pub struct JsonlConversationLogger {
    transcript: Mutex<Transcript>,
    path: PathBuf,
}

impl JsonlConversationLogger {
    /// Open `path` for appending, creating it and its parent directories.
    ///
    /// Returns `None` (after a warning) when the file cannot be opened; the
    /// caller then runs without a transcript.
    pub fn new(path: impl AsRef<Path>) -> Option<Self> {
        let path = path.as_ref();

        if let Some(parent) = path.parent()
            && let Err(e) = std::fs::create_dir_all(parent)
        {
            warn!(dir = %parent.display(), "Cannot create transcript directory: {}", e);
            return None;
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .inspect_err(|e| warn!(path = %path.display(), "Cannot open transcript: {}", e))
            .ok()?;

        Some(Self {
            transcript: Mutex::new(Transcript {
                writer: BufWriter::new(file),
                seq: 0,
            }),
            path: path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Flatten an event into one JSON object.
///
/// Object payloads are merged at the top level; anything else goes under
/// `data`.
fn record(event: ConversationEvent, seq: u64) -> Value {
    let mut fields = match event.payload {
        Value::Object(map) => map,
        other => {
            let mut map = Map::new();
            map.insert("data".to_string(), other);
            map
        }
    };
    fields.insert("type".to_string(), Value::from(event.event_type));
    fields.insert("seq".to_string(), Value::from(seq));
    fields.insert(
        "timestamp".to_string(),
        Value::from(chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true)),
    );
    Value::Object(fields)
}

impl ConversationLogger for JsonlConversationLogger {
    fn log(&self, event: ConversationEvent) {
        let Ok(mut transcript) = self.transcript.lock() else {
            return;
        };
        let line = record(event, transcript.seq);
        transcript.seq += 1;

        let written = serde_json::to_writer(&mut transcript.writer, &line)
            .map_err(std::io::Error::from)
            .and_then(|()| writeln!(transcript.writer))
            .and_then(|()| transcript.writer.flush());
        if let Err(e) = written {
            warn!(path = %self.path.display(), "Transcript write failed: {}", e);
        }
    }
}
