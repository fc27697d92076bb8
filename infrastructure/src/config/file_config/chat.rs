//! Chat configuration from TOML (`[chat]` section)

use super::{ConfigIssue, Severity};
use dualchat_domain::BackendId;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Raw chat configuration from TOML
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileChatConfig {
    /// Selector name of the primary assistant's backend
    pub primary_backend: String,
    /// Backend name or alias for the secondary assistant
    pub secondary_backend: String,
    /// Delay between streamed fragments in milliseconds
    pub pacing_delay_ms: u64,
    /// Max tokens per reply, applied to every provider
    pub max_tokens: u32,
}

impl Default for FileChatConfig {
    fn default() -> Self {
        Self {
            primary_backend: BackendId::Claude.as_str().to_string(),
            secondary_backend: BackendId::Claude.as_str().to_string(),
            pacing_delay_ms: 50,
            max_tokens: 4096,
        }
    }
}

impl FileChatConfig {
    /// Primary backend; accepts selector names only.
    pub fn parse_primary_backend(&self) -> (Option<BackendId>, Vec<ConfigIssue>) {
        Self::parse_backend(
            "chat.primary_backend",
            &self.primary_backend,
            BackendId::from_selector(&self.primary_backend).ok(),
        )
    }

    /// Secondary backend; accepts any alias.
    pub fn parse_secondary_backend(&self) -> (Option<BackendId>, Vec<ConfigIssue>) {
        Self::parse_backend(
            "chat.secondary_backend",
            &self.secondary_backend,
            BackendId::from_alias(&self.secondary_backend).ok(),
        )
    }

    pub fn pacing_delay(&self) -> Duration {
        Duration::from_millis(self.pacing_delay_ms)
    }

    fn parse_backend(
        field: &str,
        value: &str,
        parsed: Option<BackendId>,
    ) -> (Option<BackendId>, Vec<ConfigIssue>) {
        match parsed {
            Some(id) => (Some(id), vec![]),
            None => (
                None,
                vec![ConfigIssue {
                    severity: Severity::Warning,
                    field: field.to_string(),
                    message: format!(
                        "{field}: unknown backend '{value}', falling back to '{}'",
                        BackendId::default()
                    ),
                }],
            ),
        }
    }
}
