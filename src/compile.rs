//! The core's single entry point (spec §6, "Input"): source text in,
//! an annotated [`TranslationUnit`] plus a [`MessageContext`] out.
//!
//! Grounded on the teacher's top-level `DefaultParser`/`LexerlessParser`
//! split between tokenizing and parsing (`lib.rs`): one function that
//! owns the whole pipeline so a caller (the CLI, or a test) never has to
//! know the stage order or annotation wiring itself. Forge adds the
//! semantic passes spec §2's data-flow table lists after parsing, each
//! one threading the same [`Annotations`] table through to the next, in
//! the fixed order spec §2 and §5 require: well-formedness, symbol
//! resolution, type resolution, type validation, control-flow analysis.

use crate::ast::TranslationUnit;
use crate::combinators::ParsingContext;
use crate::handlers::{
    analyze_control_flow, check_well_formedness, resolve_symbols, resolve_types, validate_types,
};
use crate::message::MessageContext;
use crate::pass::Annotations;
use crate::source::Source;

/// The result of compiling one [`Source`]: the parsed (and, if
/// compilation succeeded, fully annotated) tree, the side table of
/// semantic annotations written into it, and every diagnostic collected
/// along the way.
///
/// A partial tree is still returned when `messages.has_failed()` is true
/// (spec §6: "or, when errors exist, a partial tree plus the messages"),
/// since a caller that only wants token/AST output (`--emit-tokens`,
/// `--emit-ast`) should not lose that output just because a later stage
/// failed.
pub struct CompileResult {
    pub unit: TranslationUnit,
    pub annotations: Annotations,
    pub messages: MessageContext,
}

impl CompileResult {
    /// Whether the backend contract (spec §6, "Backend contract") is met:
    /// no message reached `error` or `internal` severity.
    pub fn succeeded(&self) -> bool {
        !self.messages.has_failed()
    }
}

/// Run the full pipeline described in spec §2 over `source`: lex, parse,
/// then run the semantic passes in their fixed order.
///
/// Each pass runs even if an earlier one already failed — spec §7's
/// propagation policy collects diagnostics rather than short-circuiting,
/// so a caller sees as much useful output as the pipeline can still
/// produce. The one exception is parsing itself: a pass that walks the
/// tree has nothing to walk if parsing produced no declarations at all,
/// but an empty translation unit is a valid (if diagnostic-laden) tree,
/// so every pass still runs over it.
pub fn compile(source: &Source) -> CompileResult {
    let mut messages = MessageContext::new();
    let mut annotations = Annotations::new();

    let tokens = crate::lexer::lex(&mut messages, source);

    let unit = {
        let mut ctx = ParsingContext::new(&tokens, &mut messages);
        crate::forge::parse_translation_unit(&mut ctx)
    };

    check_well_formedness(&unit, &mut messages);
    resolve_symbols(&unit, &mut messages, &mut annotations);
    resolve_types(&unit, &mut messages, &mut annotations);
    validate_types(&unit, &mut messages, &mut annotations);
    analyze_control_flow(&unit, &mut messages, &mut annotations);

    CompileResult {
        unit,
        annotations,
        messages,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compiles_a_trivial_variable_declaration_cleanly() {
        let source = Source::in_memory("let x = 5;");
        let result = compile(&source);
        assert!(result.succeeded());
        assert_eq!(result.unit.declarations.len(), 1);
    }

    #[test]
    fn reports_an_undeclared_symbol_through_to_the_final_result() {
        let source = Source::in_memory("const x: *const i32 = &y;");
        let result = compile(&source);
        assert!(!result.succeeded());
        assert!(result
            .messages
            .iter()
            .any(|m| m.text.contains("undeclared") || m.text.contains("y")));
    }

    #[test]
    fn reports_a_function_that_does_not_always_return() {
        let source = Source::in_memory("func g() -> i32 { if true { return 1; } }");
        let result = compile(&source);
        assert!(!result.succeeded());
        assert!(result
            .messages
            .iter()
            .any(|m| m.text.contains("always return")));
    }

    #[test]
    fn a_lone_warning_does_not_fail_compilation() {
        // 300 overflows an i8 and is truncated: a warning, not an error.
        let source = Source::in_memory("let x: i8 = 300;");
        let result = compile(&source);
        assert!(result.succeeded());
        assert!(!result.messages.is_empty());
    }

    #[test]
    fn still_returns_a_partial_tree_on_syntax_failure() {
        let source = Source::in_memory("let x = 1; )");
        let result = compile(&source);
        assert!(!result.succeeded());
        assert_eq!(result.unit.declarations.len(), 1);
    }
}
