//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and converted to application types by
//! [`FileConfig::to_chat_config`].

mod chat;
mod logging;
mod personas;
mod providers;
mod repl;

pub use chat::FileChatConfig;
pub use logging::FileLoggingConfig;
pub use personas::FilePersonasConfig;
pub use providers::{
    FileAnthropicConfig, FileGeminiConfig, FileOpenAiConfig, FileProvidersConfig,
};
pub use repl::FileReplConfig;

use crate::providers::ProviderSettings;
use dualchat_application::ChatConfig;
use dualchat_domain::BackendId;
use serde::{Deserialize, Serialize};

/// How serious a configuration problem is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// A fallback value was used
    Warning,
    /// The value cannot be used at all
    Error,
}

/// A problem found while validating a [`FileConfig`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigIssue {
    pub severity: Severity,
    /// Dotted TOML path of the offending field
    pub field: String,
    pub message: String,
}

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Backends, pacing and token limits
    pub chat: FileChatConfig,
    /// Persona prompt overrides
    pub personas: FilePersonasConfig,
    /// Vendor API settings
    pub providers: FileProvidersConfig,
    /// REPL settings
    pub repl: FileReplConfig,
    /// Log file locations
    pub logging: FileLoggingConfig,
}

impl FileConfig {
    /// Validate the entire configuration, returning all detected issues.
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();

        issues.extend(self.chat.parse_primary_backend().1);
        issues.extend(self.chat.parse_secondary_backend().1);

        if self.chat.max_tokens == 0 {
            issues.push(ConfigIssue {
                severity: Severity::Error,
                field: "chat.max_tokens".to_string(),
                message: "chat.max_tokens cannot be 0".to_string(),
            });
        }

        for id in BackendId::ALL {
            let settings = self.providers.settings(id, self.max_tokens());
            if settings.model.trim().is_empty() {
                issues.push(ConfigIssue {
                    severity: Severity::Error,
                    field: format!("providers.{}.model", provider_section(id)),
                    message: format!("{} model name cannot be empty", id.display_name()),
                });
            }
        }

        issues
    }

    /// Application configuration, with defaults in place of unusable values.
    pub fn to_chat_config(&self) -> ChatConfig {
        let mut chat = ChatConfig::default()
            .with_primary_persona(self.personas.primary_persona())
            .with_secondary_persona(self.personas.secondary_persona())
            .with_pacing_delay(self.chat.pacing_delay());
        if let (Some(backend), _) = self.chat.parse_primary_backend() {
            chat = chat.with_primary_backend(backend);
        }
        if let (Some(backend), _) = self.chat.parse_secondary_backend() {
            chat = chat.with_secondary_backend(backend);
        }
        chat
    }

    /// Connection settings for `backend`, including the shared token limit.
    pub fn provider_settings(&self, backend: BackendId) -> ProviderSettings {
        self.providers.settings(backend, self.max_tokens())
    }

    fn max_tokens(&self) -> u32 {
        if self.chat.max_tokens == 0 {
            ProviderSettings::DEFAULT_MAX_TOKENS
        } else {
            self.chat.max_tokens
        }
    }
}

fn provider_section(id: BackendId) -> &'static str {
    match id {
        BackendId::Claude => "anthropic",
        BackendId::OpenAi => "openai",
        BackendId::Gemini => "gemini",
    }
}
