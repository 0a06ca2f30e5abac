//! The in-memory representation of a compiled file and the positions within it.
//!
//! Grounded on the teacher's `util::Code`/`util::Position` pair
//! (`util/code.rs`, `util/position.rs`): a byte buffer plus a lazily built
//! index of line-start offsets, generalized here to operate over grapheme
//! cluster boundaries rather than raw bytes so that `SourceLocation::column`
//! counts user-perceived characters.

use once_cell::unsync::OnceCell;
use unicode_segmentation::UnicodeSegmentation;

/// A source file (or an in-memory snippet) being compiled.
///
/// The name is a logical identifier used only for diagnostics: a file path,
/// or `"--"` for source that did not come from a file.
pub struct Source {
    name: String,
    text: String,
    line_index: LineIndexedUnicodeString,
}

impl Source {
    pub fn new(name: impl Into<String>, text: impl Into<String>) -> Self {
        let text = text.into();
        let line_index = LineIndexedUnicodeString::new(&text);
        Self {
            name: name.into(),
            text,
            line_index,
        }
    }

    /// Convenience constructor for source that was not loaded from a file.
    pub fn in_memory(text: impl Into<String>) -> Self {
        Self::new("--", text)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Resolve a byte offset into `text()` to a 1-indexed line and column.
    ///
    /// The column is a grapheme-cluster count, not a byte or codepoint count.
    pub fn locate(&self, offset: usize) -> (usize, usize) {
        self.line_index.locate(&self.text, offset)
    }

    /// Return the text of a single 1-indexed source line, without its
    /// trailing newline.
    pub fn line_text(&self, line: usize) -> &str {
        self.line_index.line_text(&self.text, line)
    }
}

/// A UTF-8 string paired with a lazily computed index of line-start byte
/// offsets, supporting O(log n) offset-to-line/column lookup.
///
/// This is the Rust-native analogue of the teacher's `Code`: the teacher
/// indexes newline byte positions with a `OnceCell<Vec<usize>>` computed on
/// first use (`obtain_line_breaks`) and binary-searches it in
/// `obtain_position`. The same shape is kept; only the counted unit changes
/// from bytes to grapheme clusters for the column component.
struct LineIndexedUnicodeString {
    line_starts: OnceCell<Vec<usize>>,
}

impl LineIndexedUnicodeString {
    fn new(_text: &str) -> Self {
        Self {
            line_starts: OnceCell::new(),
        }
    }

    fn line_starts<'t>(&self, text: &'t str) -> &Vec<usize> {
        self.line_starts.get_or_init(|| {
            let mut starts = vec![0usize];
            for (offset, ch) in text.char_indices() {
                if ch == '\n' {
                    starts.push(offset + 1);
                }
            }
            starts
        })
    }

    fn locate(&self, text: &str, offset: usize) -> (usize, usize) {
        let starts = self.line_starts(text);
        let line_idx = match starts.binary_search(&offset) {
            Ok(i) => i,
            Err(i) => i.saturating_sub(1),
        };
        let line_start = starts[line_idx];
        let column = text[line_start..offset].graphemes(true).count() + 1;
        (line_idx + 1, column)
    }

    fn line_text<'t>(&self, text: &'t str, line: usize) -> &'t str {
        let starts = self.line_starts(text);
        let start = starts[line - 1];
        let end = starts
            .get(line)
            .map(|&next| next.saturating_sub(1))
            .unwrap_or(text.len());
        text[start..end.max(start)].trim_end_matches('\r')
    }
}

/// A single point in a `Source`.
///
/// All fields are optional so that synthetic nodes (those created by a
/// semantic pass rather than parsed from text, such as a builtin type
/// declaration) can carry a `SourceLocation` with no real position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceLocation {
    pub line: Option<usize>,
    pub column: Option<usize>,
    pub offset: Option<usize>,
}

impl SourceLocation {
    pub fn new(line: usize, column: usize, offset: usize) -> Self {
        Self {
            line: Some(line),
            column: Some(column),
            offset: Some(offset),
        }
    }

    pub fn synthetic() -> Self {
        Self {
            line: None,
            column: None,
            offset: None,
        }
    }

    pub fn from_offset(source: &Source, offset: usize) -> Self {
        let (line, column) = source.locate(offset);
        Self::new(line, column, offset)
    }
}

/// A span of source text, from `start` to an optional `end`.
///
/// `end` is `None` for a zero-width range (e.g. the synthesized range of a
/// missing-token diagnostic that points just past the last real token).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceRange {
    pub start: SourceLocation,
    pub end: Option<SourceLocation>,
}

impl SourceRange {
    pub fn new(start: SourceLocation, end: Option<SourceLocation>) -> Self {
        Self { start, end }
    }

    pub fn point(location: SourceLocation) -> Self {
        Self {
            start: location,
            end: None,
        }
    }

    pub fn synthetic() -> Self {
        Self::point(SourceLocation::synthetic())
    }

    /// Compute the smallest range that encloses both `a` and `b`.
    ///
    /// Offsets are used to decide ordering when both are known; a range
    /// with unknown offsets is left alone rather than guessed at.
    pub fn combine(a: SourceRange, b: SourceRange) -> SourceRange {
        let endpoints = [Some(a.start), a.end, Some(b.start), b.end];
        let mut known: Vec<SourceLocation> = endpoints.into_iter().flatten().collect();
        known.sort_by_key(|loc| loc.offset.unwrap_or(usize::MAX));

        let start = *known.first().unwrap_or(&a.start);
        let end = known.last().copied();
        SourceRange::new(start, end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn locates_first_line_first_column() {
        let source = Source::in_memory("let x = 5;");
        assert_eq!(source.locate(0), (1, 1));
    }

    #[test]
    fn locates_across_newlines() {
        let source = Source::in_memory("let x = 5;\nlet y = 6;\n");
        assert_eq!(source.locate(11), (2, 1));
        assert_eq!(source.locate(15), (2, 5));
    }

    #[test]
    fn counts_grapheme_clusters_not_bytes() {
        // "é" here is a combining e + acute accent: two codepoints, one
        // grapheme cluster.
        let text = "e\u{0301}x;";
        let source = Source::in_memory(text);
        let x_offset = text.find('x').unwrap();
        assert_eq!(source.locate(x_offset), (1, 2));
    }

    #[test]
    fn line_text_excludes_newline() {
        let source = Source::in_memory("first\nsecond\nthird");
        assert_eq!(source.line_text(1), "first");
        assert_eq!(source.line_text(2), "second");
        assert_eq!(source.line_text(3), "third");
    }

    #[test]
    fn combine_encloses_both_ranges() {
        let a = SourceRange::point(SourceLocation::new(1, 1, 0));
        let b = SourceRange::point(SourceLocation::new(1, 5, 4));
        let combined = SourceRange::combine(a, b);
        assert_eq!(combined.start.offset, Some(0));
        assert_eq!(combined.end.unwrap().offset, Some(4));
    }
}
