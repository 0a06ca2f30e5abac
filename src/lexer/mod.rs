//! The Unicode-aware lexer (spec §4.1).
//!
//! Grounded on the teacher's `Tokenizer`/`ITokenization::tokenize`
//! (`tokenization.rs`): a single forward pass over the input that asks a
//! small set of lexeme recognizers, in order, to consume the next token at
//! the current pointer, emitting one token per successful match and
//! advancing past it. The teacher's lexemes are separate `ILexeme` trait
//! objects (`Pattern`, `Punctuations`, `Constants`, …) composed by the
//! caller; Forge's lexer has a fixed, closed alphabet, so the dispatch is
//! inlined as one `match` instead of a `Vec<Rc<dyn ILexeme>>`, but the
//! "ask each recognizer, take the longest/first match, advance" shape and
//! the maximal-munch trie for operators (`field_tree`) are carried over
//! directly.
//!
//! Unlike the teacher, which tokenizes raw bytes, spec §4.1 requires the
//! scan unit to be the Unicode grapheme cluster, so unrecognized input
//! (e.g. a stray emoji) is reported and skipped one user-perceived
//! character at a time rather than one byte at a time.

mod field_tree;

use crate::message::MessageContext;
use crate::source::{Source, SourceLocation, SourceRange};
use crate::token::{Token, TokenKind};
use field_tree::FieldTree;
use once_cell::sync::Lazy;
use unicode_segmentation::UnicodeSegmentation;

static PUNCTUATION_TRIE: Lazy<FieldTree<TokenKind>> = Lazy::new(build_punctuation_trie);

fn build_punctuation_trie() -> FieldTree<TokenKind> {
    use TokenKind::*;

    // Longer operators must be registered too; `FieldTree::find` already
    // returns the longest match regardless of insertion order, but listing
    // the shorter prefix is required so that `+` alone still resolves.
    let entries: &[(&str, TokenKind)] = &[
        ("(", LParen),
        (")", RParen),
        ("{", LBrace),
        ("}", RBrace),
        (",", Comma),
        (";", Semicolon),
        (":", Colon),
        (".", Dot),
        ("->", Arrow),
        ("=", Eq),
        ("==", EqEq),
        ("+", Plus),
        ("+=", PlusEq),
        ("-", Minus),
        ("-=", MinusEq),
        ("*", Star),
        ("**", StarStar),
        ("**=", StarStarEq),
        ("*=", StarEq),
        ("/", Slash),
        ("/=", SlashEq),
        ("%", Percent),
        ("%=", PercentEq),
        ("&", Amp),
        ("&&", AmpAmp),
        ("&=", AmpEq),
        ("|", Pipe),
        ("||", PipePipe),
        ("|=", PipeEq),
        ("^", Caret),
        ("^=", CaretEq),
        ("~", Tilde),
        ("<<", Shl),
        ("<<=", ShlEq),
        (">>", Shr),
        (">>=", ShrEq),
        ("!", Bang),
        ("!=", BangEq),
        ("<", Lt),
        ("<=", Le),
        (">", Gt),
        (">=", Ge),
    ];

    let mut trie = FieldTree::new();
    for (text, kind) in entries {
        trie.insert(text.as_bytes(), *kind)
            .unwrap_or_else(|previous| {
                panic!(
                    "punctuation '{}' collides with already-registered token {:?}",
                    text, previous
                )
            });
    }
    trie
}

/// Scan `source` into a flat vector of classified tokens, always ending in
/// a `TokenKind::Eof` sentinel.
///
/// Never fails: unrecognized input becomes an error message in
/// `message_context` and the offending grapheme cluster is skipped, per
/// spec §4.1 ("The lexer never fails").
pub fn lex(message_context: &mut MessageContext, source: &Source) -> Vec<Token> {
    let text = source.text();
    let graphemes: Vec<(usize, &str)> = text.grapheme_indices(true).collect();
    let mut tokens = Vec::new();
    let mut index = 0usize;

    while index < graphemes.len() {
        let (offset, cluster) = graphemes[index];

        if is_whitespace(cluster) {
            index += 1;
            continue;
        }

        if starts_number(cluster) {
            let (token, next_index) = scan_number(source, text, &graphemes, index);
            tokens.push(token);
            index = next_index;
            continue;
        }

        if starts_identifier(cluster) {
            let (token, next_index) = scan_identifier(source, text, &graphemes, index);
            tokens.push(token);
            index = next_index;
            continue;
        }

        if let Some((kind, byte_len)) = PUNCTUATION_TRIE.find(text[offset..].as_bytes()) {
            let (end_offset, next_index) = advance_by_bytes(&graphemes, index, offset, byte_len);
            let range = range_for(source, offset, end_offset);
            tokens.push(Token::new(kind, range, &text[offset..end_offset]));
            index = next_index;
            continue;
        }

        let end_offset = offset + cluster.len();
        let range = range_for(source, offset, end_offset);
        message_context.error(range, format!("unrecognized character '{}'", cluster));
        index += 1;
    }

    let eof_offset = text.len();
    tokens.push(Token::new(
        TokenKind::Eof,
        SourceRange::point(SourceLocation::from_offset(source, eof_offset)),
        "",
    ));

    tokens
}

fn is_whitespace(cluster: &str) -> bool {
    cluster.chars().all(char::is_whitespace)
}

fn starts_number(cluster: &str) -> bool {
    cluster.chars().next().is_some_and(|c| c.is_ascii_digit())
}

fn starts_identifier(cluster: &str) -> bool {
    cluster
        .chars()
        .next()
        .is_some_and(|c| c == '_' || unicode_ident::is_xid_start(c))
}

fn continues_identifier(cluster: &str) -> bool {
    cluster
        .chars()
        .all(|c| c == '_' || unicode_ident::is_xid_continue(c))
}

/// Digits, an optional single `.` fractional separator, and an alphanumeric
/// type-suffix/base-prefix tail are all part of one lexeme; base and suffix
/// interpretation is left to the parser (spec §4.1, §4.3).
fn continues_number(cluster: &str, seen_dot: &mut bool) -> bool {
    if cluster == "." && !*seen_dot {
        *seen_dot = true;
        return true;
    }
    cluster.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn scan_number(
    source: &Source,
    text: &str,
    graphemes: &[(usize, &str)],
    start_index: usize,
) -> (Token, usize) {
    let start_offset = graphemes[start_index].0;
    let mut index = start_index + 1;
    let mut seen_dot = false;

    while index < graphemes.len() && continues_number(graphemes[index].1, &mut seen_dot) {
        index += 1;
    }

    let end_offset = end_offset_at(text, graphemes, index);
    let value = text[start_offset..end_offset].to_string();
    let range = range_for(source, start_offset, end_offset);
    (Token::new(TokenKind::LiteralNumber, range, value), index)
}

fn scan_identifier(
    source: &Source,
    text: &str,
    graphemes: &[(usize, &str)],
    start_index: usize,
) -> (Token, usize) {
    let start_offset = graphemes[start_index].0;
    let mut index = start_index + 1;

    while index < graphemes.len() && continues_identifier(graphemes[index].1) {
        index += 1;
    }

    let end_offset = end_offset_at(text, graphemes, index);
    let value = &text[start_offset..end_offset];
    let kind = TokenKind::keyword_for(value).unwrap_or(TokenKind::Symbol);
    let range = range_for(source, start_offset, end_offset);

    (Token::new(kind, range, value), index)
}

fn end_offset_at(text: &str, graphemes: &[(usize, &str)], index: usize) -> usize {
    graphemes.get(index).map(|g| g.0).unwrap_or(text.len())
}

/// Advance past a multi-grapheme-but-single-byte-sequence token (operators
/// are always ASCII, so each grapheme in the run is exactly one byte).
fn advance_by_bytes(
    graphemes: &[(usize, &str)],
    start_index: usize,
    start_offset: usize,
    byte_len: usize,
) -> (usize, usize) {
    let end_offset = start_offset + byte_len;
    let mut index = start_index;
    while index < graphemes.len() && graphemes[index].0 < end_offset {
        index += 1;
    }
    (end_offset, index)
}

fn range_for(source: &Source, start_offset: usize, end_offset: usize) -> SourceRange {
    SourceRange::new(
        SourceLocation::from_offset(source, start_offset),
        Some(SourceLocation::from_offset(source, end_offset)),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lex_str(text: &str) -> (Vec<Token>, MessageContext) {
        let source = Source::in_memory(text);
        let mut messages = MessageContext::new();
        let tokens = lex(&mut messages, &source);
        (tokens, messages)
    }

    #[test]
    fn lexes_a_simple_declaration() {
        let (tokens, messages) = lex_str("let x = 5;");
        assert!(messages.is_empty());
        let kinds: Vec<TokenKind> = tokens.iter().map(|t| t.kind).collect();
        assert_eq!(
            kinds,
            vec![
                TokenKind::KwLet,
                TokenKind::Symbol,
                TokenKind::Eq,
                TokenKind::LiteralNumber,
                TokenKind::Semicolon,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn maximal_munch_prefers_the_longest_operator() {
        let (tokens, _) = lex_str("a <<= b");
        assert_eq!(tokens[1].kind, TokenKind::ShlEq);
    }

    #[test]
    fn distinguishes_shift_from_comparison_chains() {
        let (tokens, _) = lex_str("a<b");
        assert_eq!(tokens[1].kind, TokenKind::Lt);
    }

    #[test]
    fn keyword_wins_over_symbol_for_reserved_words() {
        let (tokens, _) = lex_str("func");
        assert_eq!(tokens[0].kind, TokenKind::KwFunc);
    }

    #[test]
    fn reports_and_skips_unrecognized_characters() {
        let (tokens, messages) = lex_str("a $ b");
        assert!(messages.has_failed());
        assert_eq!(messages.len(), 1);
        let kinds: Vec<TokenKind> = tokens.iter().map(|t| t.kind).collect();
        assert_eq!(
            kinds,
            vec![TokenKind::Symbol, TokenKind::Symbol, TokenKind::Eof]
        );
    }

    #[test]
    fn number_literal_captures_base_prefix_and_suffix_as_one_token() {
        let (tokens, _) = lex_str("0x1Fi8");
        assert_eq!(tokens[0].kind, TokenKind::LiteralNumber);
        assert_eq!(tokens[0].value, "0x1Fi8");
    }

    #[test]
    fn number_literal_captures_fractional_part() {
        let (tokens, _) = lex_str("3.14f32");
        assert_eq!(tokens[0].value, "3.14f32");
    }

    #[test]
    fn always_ends_with_eof() {
        let (tokens, _) = lex_str("");
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].kind, TokenKind::Eof);
    }

    #[test]
    fn treats_emoji_as_a_single_unrecognized_grapheme_cluster() {
        let (_, messages) = lex_str("🏳️‍🌈");
        // A single ZWJ emoji sequence is one grapheme cluster: one error,
        // not one per codepoint.
        assert_eq!(messages.len(), 1);
    }
}
