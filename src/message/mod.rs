//! The diagnostic sink threaded through every compilation stage.
//!
//! Grounded on the teacher's error-collection philosophy (`error.rs`,
//! `ParseError`/`ImplementationError`): never panic or throw on recoverable
//! input, collect a record and keep going. The teacher collects a single
//! `ParseError` per failed parse; Forge generalizes this to an append-only
//! sequence of `Message`s with a severity ladder, since semantic analysis
//! must keep producing diagnostics after the first one.

mod render;

pub use render::render_message;

use crate::source::SourceRange;
use std::fmt;

/// How serious a [`Message`] is.
///
/// Ordered from least to most severe so that `MessageContext::max_severity`
/// can be computed with a plain `max`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    Suggestion,
    Note,
    Warning,
    Error,
    Internal,
}

impl Severity {
    /// Whether a `MessageContext` containing a message of this severity
    /// represents a failed compilation.
    pub fn is_failure(self) -> bool {
        self >= Severity::Error
    }

    fn label(self) -> &'static str {
        match self {
            Severity::Suggestion => "suggestion",
            Severity::Note => "note",
            Severity::Warning => "warning",
            Severity::Error => "error",
            Severity::Internal => "internal error",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// A stable identifier for a specific kind of diagnostic.
///
/// Not every message carries one (well-formedness checks and internal
/// errors often don't need a stable code), so it is optional on [`Message`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MessageCode(pub &'static str);

impl fmt::Display for MessageCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One diagnostic emitted by some stage of the pipeline.
#[derive(Debug, Clone)]
pub struct Message {
    pub severity: Severity,
    pub source_range: SourceRange,
    pub code: Option<MessageCode>,
    pub text: String,
    pub suggestion: Option<String>,
}

impl Message {
    pub fn new(severity: Severity, source_range: SourceRange, text: impl Into<String>) -> Self {
        Self {
            severity,
            source_range,
            code: None,
            text: text.into(),
            suggestion: None,
        }
    }

    pub fn with_code(mut self, code: MessageCode) -> Self {
        self.code = Some(code);
        self
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }
}

/// The append-only collection of [`Message`]s produced by a compilation.
///
/// This is the single piece of mutable state threaded through every stage
/// described in spec §5: every pass and parser rule takes it by `&mut` and
/// never removes or mutates an existing entry, only appends.
#[derive(Debug, Clone, Default)]
pub struct MessageContext {
    messages: Vec<Message>,
}

impl MessageContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn emit(&mut self, message: Message) {
        self.messages.push(message);
    }

    pub fn note(&mut self, source_range: SourceRange, text: impl Into<String>) {
        self.emit(Message::new(Severity::Note, source_range, text));
    }

    pub fn warning(&mut self, source_range: SourceRange, text: impl Into<String>) {
        self.emit(Message::new(Severity::Warning, source_range, text));
    }

    pub fn error(&mut self, source_range: SourceRange, text: impl Into<String>) {
        self.emit(Message::new(Severity::Error, source_range, text));
    }

    /// Record a violated implementation invariant and keep going.
    ///
    /// Mirrors the teacher's `LT_ASSERT`/`LT_ABORT` use in
    /// `control_flow_validation.cpp`, but collected as a diagnostic instead
    /// of aborting the process — a library should never panic on behalf of
    /// its caller when the same information can be reported as a message.
    pub fn internal(&mut self, source_range: SourceRange, text: impl Into<String>) {
        self.emit(Message::new(Severity::Internal, source_range, text));
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn max_severity(&self) -> Option<Severity> {
        self.messages.iter().map(|m| m.severity).max()
    }

    /// Whether any message reached a severity that fails compilation.
    pub fn has_failed(&self) -> bool {
        self.max_severity().is_some_and(Severity::is_failure)
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Message> {
        self.messages.iter()
    }
}

impl<'a> IntoIterator for &'a MessageContext {
    type Item = &'a Message;
    type IntoIter = std::slice::Iter<'a, Message>;

    fn into_iter(self) -> Self::IntoIter {
        self.messages.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::SourceRange;

    #[test]
    fn severities_order_from_suggestion_to_internal() {
        assert!(Severity::Suggestion < Severity::Note);
        assert!(Severity::Note < Severity::Warning);
        assert!(Severity::Warning < Severity::Error);
        assert!(Severity::Error < Severity::Internal);
    }

    #[test]
    fn max_severity_tracks_the_worst_message() {
        let mut context = MessageContext::new();
        assert_eq!(context.max_severity(), None);

        context.warning(SourceRange::synthetic(), "a warning");
        assert_eq!(context.max_severity(), Some(Severity::Warning));
        assert!(!context.has_failed());

        context.error(SourceRange::synthetic(), "an error");
        assert_eq!(context.max_severity(), Some(Severity::Error));
        assert!(context.has_failed());
    }

    #[test]
    fn warnings_alone_do_not_fail_compilation() {
        let mut context = MessageContext::new();
        context.warning(SourceRange::synthetic(), "truncated literal");
        assert!(!context.has_failed());
    }
}
