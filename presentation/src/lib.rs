//! Presentation layer for dualchat
//!
//! This crate contains the CLI definition, the UI event bridge in front of
//! the orchestrator, console output, progress spinners and the interactive
//! chat REPL.

pub mod bridge;
pub mod chat;
pub mod cli;
pub mod output;
pub mod progress;

// Re-export commonly used types
pub use bridge::{ChatBridge, UiEvent, UiEventKind, UiEventSink};
pub use chat::{ChatRepl, ReplCommand};
pub use cli::commands::Cli;
pub use output::console::{ConsoleFormatter, ConsoleSink};
pub use progress::reporter::ReplySpinner;
