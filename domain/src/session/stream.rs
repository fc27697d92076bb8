//! Events of a streaming backend reply.

/// One item of a backend reply stream.
///
/// A stream is zero or more `Delta`s followed by at most one terminal event.
/// A stream that simply stops without a terminal event ended normally.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamEvent {
    /// Next piece of reply text
    Delta(String),
    /// End of reply. Carries the whole text when the backend did not stream,
    /// empty otherwise.
    Completed(String),
    /// The backend failed mid-reply
    Error(String),
}

impl StreamEvent {
    /// Whether nothing may follow this event.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, StreamEvent::Delta(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_deltas_continue_a_stream() {
        assert!(!StreamEvent::Delta(String::new()).is_terminal());
        assert!(StreamEvent::Completed("whole reply".to_string()).is_terminal());
        assert!(StreamEvent::Error("quota".to_string()).is_terminal());
    }
}
