//! Logging configuration from TOML (`[logging]` section)

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileLoggingConfig {
    /// JSONL file receiving conversation events
    pub conversation_log: Option<PathBuf>,
    /// Directory for daily rolling tracing output
    pub log_dir: Option<PathBuf>,
}
