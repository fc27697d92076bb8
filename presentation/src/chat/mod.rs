//! Interactive chat module
//!
//! Provides a readline-based interactive chat with the primary and
//! secondary assistants.

mod repl;

pub use repl::{ChatRepl, ReplCommand};
