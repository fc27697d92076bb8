//! Provider configuration from TOML (`[providers]` section)

use crate::providers::ProviderSettings;
use dualchat_domain::BackendId;
use serde::{Deserialize, Serialize};

/// Anthropic API provider configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileAnthropicConfig {
    /// Environment variable name for the API key (default: "ANTHROPIC_API_KEY").
    pub api_key_env: String,
    /// Direct API key (not recommended, use the env var instead).
    pub api_key: Option<String>,
    /// Base URL for the Anthropic API.
    pub base_url: String,
    /// Vendor model id.
    pub model: String,
}

impl Default for FileAnthropicConfig {
    fn default() -> Self {
        let builtin = ProviderSettings::for_backend(BackendId::Claude);
        Self {
            api_key_env: builtin.api_key_env,
            api_key: None,
            base_url: builtin.base_url,
            model: builtin.model,
        }
    }
}

/// OpenAI API provider configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileOpenAiConfig {
    /// Environment variable name for the API key (default: "OPENAI_API_KEY").
    pub api_key_env: String,
    /// Direct API key (not recommended, use the env var instead).
    pub api_key: Option<String>,
    /// Base URL for the OpenAI API (can point at any compatible server).
    pub base_url: String,
    /// Vendor model id.
    pub model: String,
}

impl Default for FileOpenAiConfig {
    fn default() -> Self {
        let builtin = ProviderSettings::for_backend(BackendId::OpenAi);
        Self {
            api_key_env: builtin.api_key_env,
            api_key: None,
            base_url: builtin.base_url,
            model: builtin.model,
        }
    }
}

/// Google Gemini API provider configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileGeminiConfig {
    /// Environment variable name for the API key (default: "GEMINI_API_KEY").
    pub api_key_env: String,
    /// Direct API key (not recommended, use the env var instead).
    pub api_key: Option<String>,
    /// Base URL for the Generative Language API.
    pub base_url: String,
    /// Vendor model id.
    pub model: String,
}

impl Default for FileGeminiConfig {
    fn default() -> Self {
        let builtin = ProviderSettings::for_backend(BackendId::Gemini);
        Self {
            api_key_env: builtin.api_key_env,
            api_key: None,
            base_url: builtin.base_url,
            model: builtin.model,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileProvidersConfig {
    /// Anthropic API settings.
    pub anthropic: FileAnthropicConfig,
    /// OpenAI API settings.
    pub openai: FileOpenAiConfig,
    /// Gemini API settings.
    pub gemini: FileGeminiConfig,
}

impl FileProvidersConfig {
    /// Connection settings for `backend`.
    pub fn settings(&self, backend: BackendId, max_tokens: u32) -> ProviderSettings {
        let (api_key_env, api_key, base_url, model) = match backend {
            BackendId::Claude => {
                let c = &self.anthropic;
                (&c.api_key_env, &c.api_key, &c.base_url, &c.model)
            }
            BackendId::OpenAi => {
                let c = &self.openai;
                (&c.api_key_env, &c.api_key, &c.base_url, &c.model)
            }
            BackendId::Gemini => {
                let c = &self.gemini;
                (&c.api_key_env, &c.api_key, &c.base_url, &c.model)
            }
        };

        ProviderSettings {
            api_key_env: api_key_env.clone(),
            api_key: api_key.clone(),
            base_url: base_url.clone(),
            model: model.clone(),
            max_tokens,
        }
    }
}
