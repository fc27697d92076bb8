//! Console rendering for chat turns

use crate::bridge::{UiEvent, UiEventKind, UiEventSink};
use crate::progress::reporter::ReplySpinner;
use colored::Colorize;
use dualchat_domain::{AssistantSlot, BackendId, SecondaryState};
use std::io::Write;

/// Prints streamed fragments to stdout as they arrive.
///
/// A spinner started with [`ConsoleSink::waiting`] is removed by the first
/// event of the reply.
pub struct ConsoleSink {
    spinner: ReplySpinner,
}

impl ConsoleSink {
    pub fn new(show_progress: bool) -> Self {
        Self {
            spinner: ReplySpinner::new(show_progress),
        }
    }

    /// Show a spinner until the reply starts.
    pub fn waiting(&self, message: impl Into<String>) {
        self.spinner.start(message);
    }

    /// Remove the spinner without printing anything.
    pub fn done_waiting(&self) {
        self.spinner.stop();
    }
}

impl UiEventSink for ConsoleSink {
    fn emit(&self, event: UiEvent<'_>) {
        self.spinner.stop();
        let mut stdout = std::io::stdout().lock();
        match event.kind {
            UiEventKind::Fragment => {
                let _ = write!(stdout, "{}", event.payload);
                let _ = stdout.flush();
            }
            UiEventKind::Complete => {
                let _ = writeln!(stdout);
            }
            UiEventKind::Error => {
                let _ = writeln!(stdout);
                drop(stdout);
                eprintln!("{}", event.payload.red());
            }
        }
    }
}

/// Formats chat output for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Reply label, e.g. `Companion (claude) >`
    pub fn reply_label(slot: AssistantSlot, persona: &str, backend: BackendId) -> String {
        let label = format!("{persona} ({backend}) >");
        match slot {
            AssistantSlot::Primary => label.green().bold().to_string(),
            AssistantSlot::Secondary => label.magenta().bold().to_string(),
        }
    }

    /// A complete (non-streamed) reply, error replies in red.
    pub fn reply(text: &str) -> String {
        if Self::is_error_reply(text) {
            text.red().to_string()
        } else {
            text.to_string()
        }
    }

    pub fn is_error_reply(text: &str) -> bool {
        text.starts_with("Error: ")
    }

    pub fn activation_hint(secondary_persona: &str) -> String {
        format!(
            "{} This sounds both personal and technical. Type {} to bring in {}.",
            "hint:".yellow().bold(),
            "/activate".cyan(),
            secondary_persona
        )
    }

    pub fn status(
        primary: BackendId,
        secondary: BackendId,
        secondary_state: SecondaryState,
    ) -> String {
        let state = if secondary_state.is_active() {
            "active".green()
        } else {
            "inactive".dimmed()
        };
        format!(
            "{} {} ({})\n{} {} ({}), {}",
            "primary:  ".cyan().bold(),
            primary,
            primary.display_name(),
            "secondary:".cyan().bold(),
            secondary,
            secondary.display_name(),
            state
        )
    }

    pub fn available_backends() -> String {
        BackendId::ALL
            .iter()
            .map(|id| format!("  {:<8} {}", id.as_str(), id.display_name()))
            .collect::<Vec<_>>()
            .join("\n")
    }
}
