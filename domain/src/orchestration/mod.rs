//! Dual-assistant orchestration concepts.
//!
//! - [`AssistantSlot`]: which of the two assistants a request targets
//! - [`SecondaryState`]: lifecycle of the secondary assistant

use serde::{Deserialize, Serialize};

/// Addressable assistant identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssistantSlot {
    /// Always-on assistant created at startup.
    Primary,
    /// Topic-gated assistant, inactive until explicitly activated.
    Secondary,
}

impl AssistantSlot {
    pub fn as_str(&self) -> &'static str {
        match self {
            AssistantSlot::Primary => "primary",
            AssistantSlot::Secondary => "secondary",
        }
    }
}

impl std::fmt::Display for AssistantSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Lifecycle of the secondary assistant.
///
/// ```text
/// Inactive --activate--> Active --deactivate--> Inactive
///              Active --activate--> Active (re-seeded from primary)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SecondaryState {
    #[default]
    Inactive,
    Active,
}

impl SecondaryState {
    pub fn is_active(&self) -> bool {
        matches!(self, SecondaryState::Active)
    }
}
