//! Persona overrides from TOML (`[personas]` section)

use dualchat_domain::Persona;
use serde::{Deserialize, Serialize};

/// Optional replacement system prompts for the built-in personas
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilePersonasConfig {
    pub primary: Option<String>,
    pub secondary: Option<String>,
}

impl FilePersonasConfig {
    pub fn primary_persona(&self) -> Persona {
        Self::apply(Persona::primary(), self.primary.as_deref())
    }

    pub fn secondary_persona(&self) -> Persona {
        Self::apply(Persona::secondary(), self.secondary.as_deref())
    }

    fn apply(persona: Persona, prompt: Option<&str>) -> Persona {
        match prompt.map(str::trim).filter(|p| !p.is_empty()) {
            Some(prompt) => persona.with_system_prompt(prompt),
            None => persona,
        }
    }
}
