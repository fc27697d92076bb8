//! Backend identifier value object

use super::error::DomainError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Available LLM backends (Value Object)
///
/// The set is closed per deployment: adding a backend means adding a
/// variant here and registering an adapter for it at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BackendId {
    /// Anthropic Claude
    Claude,
    /// OpenAI GPT
    OpenAi,
    /// Google Gemini
    Gemini,
}

impl BackendId {
    /// All backends in registration order.
    pub const ALL: [BackendId; 3] = [BackendId::Claude, BackendId::OpenAi, BackendId::Gemini];

    /// Selector name sent by the model picker (`"claude"`, `"gpt"`, `"gemini"`).
    pub fn as_str(&self) -> &'static str {
        match self {
            BackendId::Claude => "claude",
            BackendId::OpenAi => "gpt",
            BackendId::Gemini => "gemini",
        }
    }

    /// Human-readable label shown next to replies.
    pub fn display_name(&self) -> &'static str {
        match self {
            BackendId::Claude => "Claude 3.5 Sonnet",
            BackendId::OpenAi => "GPT-4o",
            BackendId::Gemini => "Gemini 1.5 Pro",
        }
    }

    /// Vendor model id used when the configuration does not override it.
    pub fn default_model(&self) -> &'static str {
        match self {
            BackendId::Claude => "claude-3-5-sonnet-20241022",
            BackendId::OpenAi => "gpt-4o",
            BackendId::Gemini => "gemini-1.5-pro",
        }
    }

    /// Parse a selector name. Used for the primary assistant.
    pub fn from_selector(name: &str) -> Result<Self, DomainError> {
        let normalized = name.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|id| id.as_str() == normalized)
            .ok_or_else(|| DomainError::InvalidBackend(name.to_string()))
    }

    /// Parse a selector name, display label, vendor model id or short alias.
    ///
    /// Used for the secondary assistant, whose picker historically sent
    /// display names as well as raw ids.
    pub fn from_alias(name: &str) -> Result<Self, DomainError> {
        if let Ok(id) = Self::from_selector(name) {
            return Ok(id);
        }

        let normalized = name.trim().to_lowercase();
        let matched = Self::ALL.into_iter().find(|id| {
            id.display_name().to_lowercase() == normalized
                || id.default_model() == normalized
                || id.short_aliases().contains(&normalized.as_str())
        });

        matched.ok_or_else(|| DomainError::InvalidBackend(name.to_string()))
    }

    fn short_aliases(&self) -> &'static [&'static str] {
        match self {
            BackendId::Claude => &["anthropic", "claude-3.5-sonnet", "sonnet"],
            BackendId::OpenAi => &["openai", "gpt4o", "chatgpt"],
            BackendId::Gemini => &["google", "gemini-pro"],
        }
    }
}

impl Default for BackendId {
    /// Returns the default backend (Claude)
    fn default() -> Self {
        BackendId::Claude
    }
}

impl std::fmt::Display for BackendId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for BackendId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_alias(s)
    }
}

impl Serialize for BackendId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for BackendId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selector_roundtrip() {
        for id in BackendId::ALL {
            assert_eq!(BackendId::from_selector(id.as_str()).unwrap(), id);
        }
    }

    #[test]
    fn test_selector_is_case_insensitive() {
        assert_eq!(BackendId::from_selector(" Claude ").unwrap(), BackendId::Claude);
        assert_eq!(BackendId::from_selector("GPT").unwrap(), BackendId::OpenAi);
    }

    #[test]
    fn test_selector_rejects_display_names() {
        let err = BackendId::from_selector("GPT-4o").unwrap_err();
        assert!(matches!(err, DomainError::InvalidBackend(name) if name == "GPT-4o"));
    }

    #[test]
    fn test_alias_accepts_display_names_and_model_ids() {
        assert_eq!(BackendId::from_alias("Claude 3.5 Sonnet").unwrap(), BackendId::Claude);
        assert_eq!(BackendId::from_alias("GPT-4o").unwrap(), BackendId::OpenAi);
        assert_eq!(BackendId::from_alias("gemini-1.5-pro").unwrap(), BackendId::Gemini);
        assert_eq!(BackendId::from_alias("openai").unwrap(), BackendId::OpenAi);
        assert_eq!(BackendId::from_alias("gemini").unwrap(), BackendId::Gemini);
    }

    #[test]
    fn test_alias_rejects_unknown() {
        assert!(BackendId::from_alias("llama").is_err());
        assert!(BackendId::from_alias("").is_err());
    }

    #[test]
    fn test_serde_uses_selector_name() {
        let json = serde_json::to_string(&BackendId::OpenAi).unwrap();
        assert_eq!(json, "\"gpt\"");
        let parsed: BackendId = serde_json::from_str("\"GPT-4o\"").unwrap();
        assert_eq!(parsed, BackendId::OpenAi);
    }

    #[test]
    fn test_backend_default() {
        assert_eq!(BackendId::default(), BackendId::Claude);
    }
}
