//! Domain layer for dualchat
//!
//! This crate contains the core business logic, entities, and value objects.
//! It has no dependencies on infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! ## Two assistants, one user
//!
//! - **Primary**: always active, general companion persona
//! - **Secondary**: technical-concepts persona, activated on demand and seeded
//!   with a snapshot of the primary conversation
//!
//! ## Topic gating
//!
//! [`topic::has_dual_topic`] flags messages that mix a wellbeing theme with a
//! technical theme. The flag is advisory; activation is a separate decision.

pub mod core;
pub mod orchestration;
pub mod prompt;
pub mod session;
pub mod topic;

// Re-export commonly used types
pub use core::{backend::BackendId, error::DomainError};
pub use orchestration::{AssistantSlot, SecondaryState};
pub use prompt::{Persona, PersonaTemplate};
pub use session::{
    entities::{Conversation, Message, Role},
    stream::StreamEvent,
};
pub use topic::{TopicMatch, classify, has_dual_topic};
