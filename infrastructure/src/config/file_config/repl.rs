//! REPL configuration from TOML (`[repl]` section)

use serde::{Deserialize, Serialize};

/// Raw REPL configuration from TOML
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileReplConfig {
    /// Stream replies instead of printing them whole
    pub stream: bool,
    /// Print an activation hint when a message touches both topics
    pub suggest_secondary: bool,
    /// Path to history file
    pub history_file: Option<String>,
}

impl Default for FileReplConfig {
    fn default() -> Self {
        Self {
            stream: true,
            suggest_secondary: true,
            history_file: None,
        }
    }
}
