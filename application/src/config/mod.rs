//! Application-level configuration.
//!
//! - [`ChatConfig`]: initial backends, personas and pacing for both assistants

pub mod chat_config;

pub use chat_config::{ChatConfig, DEFAULT_PACING_DELAY};
