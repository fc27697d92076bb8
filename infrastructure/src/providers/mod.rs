//! Backend adapters for the vendor HTTP APIs.
//!
//! Each adapter implements [`LlmBackend`] for one [`BackendId`]. They hold no
//! conversation state; every call carries the full context.

pub mod anthropic;
pub mod gemini;
pub mod openai;
pub mod routing;
pub(crate) mod sse;

pub use anthropic::AnthropicBackend;
pub use gemini::GeminiBackend;
pub use openai::OpenAiBackend;
pub use routing::{BackendRegistry, BackendRegistryBuilder};

use dualchat_application::ports::llm_gateway::{GatewayError, LlmBackend};
use dualchat_domain::BackendId;
use std::sync::Arc;

/// Connection settings for one vendor API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderSettings {
    /// Environment variable consulted when `api_key` is unset
    pub api_key_env: String,
    pub api_key: Option<String>,
    pub base_url: String,
    /// Vendor model id sent with every request
    pub model: String,
    pub max_tokens: u32,
}

impl ProviderSettings {
    pub const DEFAULT_MAX_TOKENS: u32 = 4096;

    /// Built-in settings for `backend`.
    pub fn for_backend(backend: BackendId) -> Self {
        let (api_key_env, base_url) = match backend {
            BackendId::Claude => ("ANTHROPIC_API_KEY", "https://api.anthropic.com"),
            BackendId::OpenAi => ("OPENAI_API_KEY", "https://api.openai.com"),
            BackendId::Gemini => (
                "GEMINI_API_KEY",
                "https://generativelanguage.googleapis.com",
            ),
        };
        Self {
            api_key_env: api_key_env.to_string(),
            api_key: None,
            base_url: base_url.to_string(),
            model: backend.default_model().to_string(),
            max_tokens: Self::DEFAULT_MAX_TOKENS,
        }
    }

    /// The configured key, else the environment variable.
    ///
    /// Resolved per call so a key exported after startup is picked up.
    pub fn resolve_api_key(&self) -> Result<String, GatewayError> {
        if let Some(key) = self.api_key.as_ref().filter(|k| !k.trim().is_empty()) {
            return Ok(key.clone());
        }
        std::env::var(&self.api_key_env)
            .ok()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| GatewayError::MissingCredentials(self.api_key_env.clone()))
    }

    /// `base_url` joined with `path`, tolerating a trailing slash.
    pub(crate) fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), path)
    }
}

/// Registry with one HTTP adapter per backend id.
///
/// Backends without credentials are still registered; they fail at call time
/// with [`GatewayError::MissingCredentials`].
pub fn http_registry(
    client: reqwest::Client,
    settings: impl Fn(BackendId) -> ProviderSettings,
) -> BackendRegistry {
    let adapter = |id: BackendId| -> Arc<dyn LlmBackend> {
        let settings = settings(id);
        match id {
            BackendId::Claude => Arc::new(AnthropicBackend::new(client.clone(), settings)),
            BackendId::OpenAi => Arc::new(OpenAiBackend::new(client.clone(), settings)),
            BackendId::Gemini => Arc::new(GeminiBackend::new(client.clone(), settings)),
        }
    };

    BackendId::ALL
        .into_iter()
        .fold(BackendRegistry::builder(), |builder, id| {
            builder.register(adapter(id))
        })
        .build()
}

/// Map a transport failure from `reqwest::RequestBuilder::send`.
pub(crate) fn connection_error(e: reqwest::Error) -> GatewayError {
    GatewayError::ConnectionError(e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use dualchat_application::ports::llm_gateway::LlmGateway;

    #[test]
    fn builtin_settings_follow_backend_defaults() {
        let claude = ProviderSettings::for_backend(BackendId::Claude);
        assert_eq!(claude.api_key_env, "ANTHROPIC_API_KEY");
        assert_eq!(claude.model, "claude-3-5-sonnet-20241022");

        let gemini = ProviderSettings::for_backend(BackendId::Gemini);
        assert_eq!(gemini.model, "gemini-1.5-pro");
        assert_eq!(gemini.max_tokens, ProviderSettings::DEFAULT_MAX_TOKENS);
    }

    #[test]
    fn explicit_key_wins_over_environment() {
        let settings = ProviderSettings {
            api_key: Some("sk-test".to_string()),
            api_key_env: "DUALCHAT_TEST_UNSET_KEY_VAR".to_string(),
            ..ProviderSettings::for_backend(BackendId::OpenAi)
        };
        assert_eq!(settings.resolve_api_key().unwrap(), "sk-test");
    }

    #[test]
    fn missing_key_names_the_variable() {
        let settings = ProviderSettings {
            api_key: Some("   ".to_string()),
            api_key_env: "DUALCHAT_TEST_UNSET_KEY_VAR".to_string(),
            ..ProviderSettings::for_backend(BackendId::Claude)
        };
        assert_eq!(
            settings.resolve_api_key(),
            Err(GatewayError::MissingCredentials(
                "DUALCHAT_TEST_UNSET_KEY_VAR".to_string()
            ))
        );
    }

    #[test]
    fn endpoint_tolerates_trailing_slash() {
        let settings = ProviderSettings {
            base_url: "http://localhost:8080/".to_string(),
            ..ProviderSettings::for_backend(BackendId::OpenAi)
        };
        assert_eq!(
            settings.endpoint("v1/chat/completions"),
            "http://localhost:8080/v1/chat/completions"
        );
    }

    #[test]
    fn http_registry_covers_every_backend() {
        let registry = http_registry(reqwest::Client::new(), ProviderSettings::for_backend);
        assert_eq!(registry.backends(), BackendId::ALL.to_vec());
    }
}
