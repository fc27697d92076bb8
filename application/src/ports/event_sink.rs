//! Streaming event sink port
//!
//! The presentation layer implements [`ChatEventSink`] to receive paced
//! reply fragments and the terminal completion/error signal of a turn.

/// Receiver of a streaming reply.
///
/// For every turn exactly one of `on_complete` / `on_error` fires, after all
/// `on_fragment` calls for that turn.
pub trait ChatEventSink: Send + Sync {
    /// A fragment of the reply, in order
    fn on_fragment(&self, fragment: &str);

    /// The reply finished normally
    fn on_complete(&self);

    /// The reply failed; `message` is user-visible text
    fn on_error(&self, message: &str);
}

/// Adapter: prefixes error messages with the user-visible `Error:` marker
/// before forwarding them to the wrapped sink.
pub(crate) struct FormattedErrorSink<'a> {
    inner: &'a dyn ChatEventSink,
}

impl<'a> FormattedErrorSink<'a> {
    pub(crate) fn new(inner: &'a dyn ChatEventSink) -> Self {
        Self { inner }
    }
}

impl ChatEventSink for FormattedErrorSink<'_> {
    fn on_fragment(&self, fragment: &str) {
        self.inner.on_fragment(fragment);
    }

    fn on_complete(&self) {
        self.inner.on_complete();
    }

    fn on_error(&self, message: &str) {
        self.inner.on_error(&crate::format_error_reply(message));
    }
}
