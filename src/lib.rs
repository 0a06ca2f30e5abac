//! Forge is a lexer, parser, and semantic analysis core for the Forge
//! language: a small, statically typed systems language used here as a
//! worked example of a polymorphic-AST compiler frontend.
//!
//! # Overview
//!
//! The pipeline is a straight line from text to an annotated tree plus a
//! diagnostic log:
//!
//! 1. [`source`] wraps the input text with line/column/grapheme-aware
//!    location tracking.
//! 2. [`lexer`] and [`token`] turn it into a flat token stream.
//! 3. [`combinators`] are the small set of generic parsing primitives
//!    (`parse_token_by_kind`, `parse_any_of`, `parse_repeated_bound`, ...)
//!    the recursive-descent grammar in [`forge`] is built from.
//! 4. [`ast`] is the polymorphic tree the grammar produces: types,
//!    values, statements, and declarations, each carrying a stable
//!    [`ast::NodeId`] rather than embedded mutable state.
//! 5. [`pass`] is the enter/leave traversal framework the analyses in
//!    [`handlers`] are written against, threading one [`pass::Annotations`]
//!    side table through well-formedness, symbol resolution, type
//!    resolution, type validation, and control-flow analysis, in that
//!    fixed order.
//! 6. [`message`] is the append-only diagnostic sink every stage reports
//!    into; nothing in this crate panics or returns a Rust `Err` for an
//!    ordinary compile error.
//!
//! [`compile::compile`] ties all of the above into the crate's single
//! entry point: source text in, a parsed (and, if it succeeded, fully
//! annotated) tree plus the full message log out.
//!
//! # License
//! Forge is provided under the MIT license.

pub mod ast;
pub mod combinators;
pub mod compile;
pub mod forge;
pub mod handlers;
pub mod lexer;
pub mod message;
pub mod pass;
pub mod source;
pub mod token;

pub use compile::{compile, CompileResult};
