//! Human-readable rendering of a [`Message`](super::Message) against its
//! [`Source`].
//!
//! Advisory only — per spec §6 the message sequence itself is the source of
//! truth, this just formats it the way a terminal-facing CLI would. ANSI
//! colorization is feature-gated behind `ansi` so the core stays
//! colorization-agnostic by default (spec §1 places terminal colorization
//! outside the core).

use super::{Message, Severity};
use crate::source::Source;
use std::fmt::Write;

#[cfg(feature = "ansi")]
fn severity_color(severity: Severity) -> &'static str {
    match severity {
        Severity::Suggestion => "\x1b[36m",  // cyan
        Severity::Note => "\x1b[34m",        // blue
        Severity::Warning => "\x1b[33m",     // yellow
        Severity::Error => "\x1b[31m",       // red
        Severity::Internal => "\x1b[35m",    // magenta
    }
}

#[cfg(feature = "ansi")]
const ANSI_RESET: &str = "\x1b[0m";
#[cfg(feature = "ansi")]
const ANSI_BOLD: &str = "\x1b[1m";

/// Render a single message as:
///
/// ```text
/// <source>:<line>:<column>: <severity>[ <code>]: <text>
/// <source line>
///    ^~~~
/// ```
pub fn render_message(source: &Source, message: &Message) -> String {
    let mut out = String::new();

    let (line, column) = message
        .source_range
        .start
        .line
        .zip(message.source_range.start.column)
        .unwrap_or((0, 0));

    #[cfg(feature = "ansi")]
    let _ = write!(out, "{}", ANSI_BOLD);
    let _ = write!(out, "{}:{}:{}: ", source.name(), line, column);
    #[cfg(feature = "ansi")]
    let _ = write!(out, "{}", ANSI_RESET);

    #[cfg(feature = "ansi")]
    let _ = write!(out, "{}", severity_color(message.severity));
    let _ = write!(out, "{}", message.severity);
    #[cfg(feature = "ansi")]
    let _ = write!(out, "{}", ANSI_RESET);

    if let Some(code) = message.code {
        let _ = write!(out, "[{}]", code);
    }

    let _ = writeln!(out, ": {}", message.text);

    if line > 0 {
        let source_line = source.line_text(line);
        let _ = writeln!(out, "{}", source_line);

        let caret_column = column.saturating_sub(1);
        let span_width = span_width(message, source_line, caret_column);
        let _ = writeln!(
            out,
            "{}{}",
            " ".repeat(caret_column),
            "^".repeat(span_width.max(1))
        );
    }

    if let Some(suggestion) = &message.suggestion {
        let _ = writeln!(out, "suggestion: {}", suggestion);
    }

    out
}

fn span_width(message: &Message, source_line: &str, caret_column: usize) -> usize {
    let start_offset = message.source_range.start.offset;
    let end_offset = message.source_range.end.and_then(|e| e.offset);

    match (start_offset, end_offset) {
        (Some(start), Some(end)) if end >= start => (end - start).min(
            source_line
                .len()
                .saturating_sub(caret_column)
                .max(1),
        ),
        _ => 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::SourceRange;
    use pretty_assertions::assert_eq;

    #[test]
    fn renders_location_severity_and_text() {
        let source = Source::in_memory("let x = 5;\nlet y;");
        let range = SourceRange::point(crate::source::SourceLocation::from_offset(&source, 11));
        let message = Message::new(Severity::Error, range, "expected initializer");
        let rendered = render_message(&source, &message);
        assert_eq!(
            rendered,
            "--:2:1: error: expected initializer\nlet y;\n^\n"
        );
    }

    #[test]
    fn renders_synthetic_locations_without_a_caret_line() {
        let source = Source::in_memory("x");
        let message = Message::new(Severity::Internal, SourceRange::synthetic(), "unreachable");
        let rendered = render_message(&source, &message);
        assert_eq!(rendered.lines().count(), 1);
    }
}
