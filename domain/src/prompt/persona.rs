//! Assistant personas

use serde::{Deserialize, Serialize};

/// A fixed system-level instruction defining an assistant's identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Persona {
    /// Label shown next to the assistant's replies.
    pub name: String,
    /// Instruction text given to the model on every call.
    pub system_prompt: String,
}

impl Persona {
    pub fn new(name: impl Into<String>, system_prompt: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            system_prompt: system_prompt.into(),
        }
    }

    /// Persona of the always-on primary assistant.
    pub fn primary() -> Self {
        Self::new("Companion", PersonaTemplate::primary_system())
    }

    /// Persona of the topic-gated secondary assistant.
    pub fn secondary() -> Self {
        Self::new("Zero Tech", PersonaTemplate::secondary_system())
    }

    /// Same name, different instruction text.
    pub fn with_system_prompt(mut self, system_prompt: impl Into<String>) -> Self {
        self.system_prompt = system_prompt.into();
        self
    }
}

/// Built-in persona instruction texts
pub struct PersonaTemplate;

impl PersonaTemplate {
    /// System prompt for the primary assistant
    pub fn primary_system() -> &'static str {
        r#"You are a warm, attentive companion for everyday conversation.
Listen carefully, acknowledge how the user is feeling, and respond with empathy and practical encouragement.
Keep answers conversational and concise.
When the user brings up a technical or study problem, support them emotionally and keep the focus on how they are doing; a dedicated technical assistant may join to cover the details."#
    }

    /// System prompt for the secondary ("technical concepts") assistant
    pub fn secondary_system() -> &'static str {
        r#"You are Zero Tech, an assistant that explains technical and educational concepts.
You join a conversation that is already in progress; read the earlier messages for context.
Explain the relevant concepts step by step with short examples, check for common misunderstandings, and suggest a concrete next step.
Stay patient and encouraging, but leave emotional support to the primary companion and focus on the technical substance."#
    }
}
