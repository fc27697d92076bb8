//! Waiting indicator shown until a reply starts arriving

use indicatif::{ProgressBar, ProgressStyle};
use std::sync::Mutex;
use std::time::Duration;

/// Spinner shown while a backend call is in flight.
///
/// Disabled spinners accept every call and draw nothing.
pub struct ReplySpinner {
    enabled: bool,
    bar: Mutex<Option<ProgressBar>>,
}

impl ReplySpinner {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            bar: Mutex::new(None),
        }
    }

    fn style() -> ProgressStyle {
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg:.dim}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
    }

    /// Start spinning, replacing any spinner already running.
    pub fn start(&self, message: impl Into<String>) {
        if !self.enabled {
            return;
        }
        let bar = ProgressBar::new_spinner();
        bar.set_style(Self::style());
        bar.set_message(message.into());
        bar.enable_steady_tick(Duration::from_millis(80));

        if let Ok(mut slot) = self.bar.lock()
            && let Some(previous) = slot.replace(bar)
        {
            previous.finish_and_clear();
        }
    }

    /// Remove the spinner from the terminal. No-op if none is running.
    pub fn stop(&self) {
        if let Ok(mut slot) = self.bar.lock()
            && let Some(bar) = slot.take()
        {
            bar.finish_and_clear();
        }
    }

    pub fn is_running(&self) -> bool {
        self.bar.lock().map(|b| b.is_some()).unwrap_or(false)
    }
}
