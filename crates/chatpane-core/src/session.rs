//! Input submission and the scroll-follow signal.
//!
//! [`ChatSession`] owns the submission flow: validate, append one user
//! message to shared state, raise a scroll request, hand the text to the
//! message parser. The parser is invoked synchronously; any state changes it
//! triggers (typically the action provider appending a bot reply) flow
//! through the same shared handle and show up on the next render pass.

use std::cell::Cell;
use std::rc::Rc;

use crate::message::Message;
use crate::state::SharedConversation;

/// External collaborator that converts submitted text into triggered
/// actions. Out of band from this layer's perspective: side effects happen
/// through the shared conversation handle.
pub trait MessageParser {
    /// Parse one submitted message.
    fn parse(&mut self, text: &str);
}

/// Parser that does nothing. Useful for transcript viewers and tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullParser;

impl MessageParser for NullParser {
    fn parse(&mut self, _text: &str) {}
}

/// Scroll-to-newest request signal.
///
/// Raised after every submission and by anything (custom renderers, widget
/// contexts) that wants the viewport pinned back to the newest message. The
/// host rendering layer drains it once per frame with [`ScrollHandle::take`]
/// and picks its own scheduling; requests are idempotent, so raising one
/// several times between frames is harmless.
#[derive(Debug, Clone, Default)]
pub struct ScrollHandle(Rc<Cell<bool>>);

impl ScrollHandle {
    /// Create a new handle with no pending request.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request a scroll to the newest message.
    pub fn request(&self) {
        self.0.set(true);
    }

    /// Check for a pending request without consuming it.
    pub fn is_requested(&self) -> bool {
        self.0.get()
    }

    /// Consume the pending request, if any.
    pub fn take(&self) -> bool {
        self.0.replace(false)
    }
}

/// Outcome of a submission attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The message was appended and handed to the parser. The caller should
    /// reset its input box.
    Submitted,
    /// The validator rejected the input. No state change, no parser call,
    /// and the input box keeps its content. No user-facing feedback is
    /// produced by this layer.
    Rejected,
}

/// Validation hook gating submission.
pub type Validator = Box<dyn Fn(&str) -> bool>;

/// The input-submission loop around a shared conversation.
pub struct ChatSession<P> {
    state: SharedConversation,
    parser: P,
    validator: Option<Validator>,
    scroll: ScrollHandle,
}

impl<P: MessageParser> ChatSession<P> {
    /// Create a session over the given shared state and parser.
    pub fn new(state: SharedConversation, parser: P) -> Self {
        Self {
            state,
            parser,
            validator: None,
            scroll: ScrollHandle::new(),
        }
    }

    /// Gate submissions with a validator.
    #[must_use]
    pub fn with_validator(mut self, validator: impl Fn(&str) -> bool + 'static) -> Self {
        self.validator = Some(Box::new(validator));
        self
    }

    /// Share an existing scroll handle, e.g. one already held by the action
    /// provider behind the parser.
    #[must_use]
    pub fn with_scroll_handle(mut self, scroll: ScrollHandle) -> Self {
        self.scroll = scroll;
        self
    }

    /// Get the shared conversation handle.
    pub fn state(&self) -> &SharedConversation {
        &self.state
    }

    /// Get a clone of the scroll-request handle.
    pub fn scroll_handle(&self) -> ScrollHandle {
        self.scroll.clone()
    }

    /// Access the parser, e.g. to reach a host action provider behind it.
    pub fn parser_mut(&mut self) -> &mut P {
        &mut self.parser
    }

    /// Submit the current input value.
    ///
    /// Runs the validator if one is configured; on rejection nothing
    /// happens. Otherwise appends a fresh user message, raises a scroll
    /// request, and invokes the parser with the submitted text.
    pub fn submit(&mut self, text: &str) -> SubmitOutcome {
        if let Some(validator) = &self.validator {
            if !validator(text) {
                tracing::debug!("validator rejected input");
                return SubmitOutcome::Rejected;
            }
        }

        self.state.update(|s| {
            s.push(Message::user(text));
        });
        self.scroll.request();
        self.parser.parse(text);

        SubmitOutcome::Submitted
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::MessageKind;

    /// Parser that records everything it is handed.
    #[derive(Default)]
    struct RecordingParser {
        seen: Vec<String>,
    }

    impl MessageParser for RecordingParser {
        fn parse(&mut self, text: &str) {
            self.seen.push(text.to_string());
        }
    }

    #[test]
    fn test_submit_without_validator() {
        let shared = SharedConversation::default();
        let mut session = ChatSession::new(shared.clone(), RecordingParser::default());

        let outcome = session.submit("hello");
        assert_eq!(outcome, SubmitOutcome::Submitted);

        shared.read(|s| {
            assert_eq!(s.len(), 1);
            assert_eq!(s.messages()[0].kind, MessageKind::User);
            assert_eq!(s.messages()[0].text.as_deref(), Some("hello"));
        });
        assert_eq!(session.parser_mut().seen, vec!["hello"]);
        assert!(session.scroll_handle().is_requested());
    }

    #[test]
    fn test_submit_with_passing_validator() {
        let shared = SharedConversation::default();
        let mut session = ChatSession::new(shared.clone(), RecordingParser::default())
            .with_validator(|input| !input.trim().is_empty());

        assert_eq!(session.submit("hi"), SubmitOutcome::Submitted);
        assert_eq!(shared.len(), 1);
    }

    #[test]
    fn test_rejected_submission_changes_nothing() {
        let shared = SharedConversation::default();
        let mut session = ChatSession::new(shared.clone(), RecordingParser::default())
            .with_validator(|input| !input.trim().is_empty());

        assert_eq!(session.submit("   "), SubmitOutcome::Rejected);
        assert_eq!(shared.len(), 0);
        assert!(session.parser_mut().seen.is_empty());
        assert!(!session.scroll_handle().is_requested());
    }

    #[test]
    fn test_scroll_handle_is_idempotent() {
        let handle = ScrollHandle::new();
        handle.request();
        handle.request();
        assert!(handle.take());
        assert!(!handle.take());
    }

    #[test]
    fn test_parser_sees_every_submission_in_order() {
        let shared = SharedConversation::default();
        let mut session = ChatSession::new(shared, RecordingParser::default());
        session.submit("one");
        session.submit("two");
        assert_eq!(session.parser_mut().seen, vec!["one", "two"]);
    }
}
