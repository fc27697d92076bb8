//! Conversation domain.
//!
//! - [`entities::Conversation`]: append-only message log of one assistant
//! - [`entities::Message`]: a single message within a conversation
//! - [`stream::StreamEvent`]: events of a streaming backend reply

pub mod entities;
pub mod stream;
