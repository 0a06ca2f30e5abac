//! Control-flow termination analysis (spec §4.8).
//!
//! A post-order `pass::Handler`: whether a statement "terminates" its
//! enclosing block (no fallthrough to whatever follows it) and whether it
//! "terminates" its enclosing function (every path through it reaches a
//! `return`) both depend only on its children's already-computed flags, so
//! every hook here is an `on_leave`.

use crate::ast::{
    BasicStatementKind, DeclarationFunction, ElseBranch, StatementBasic, StatementBlock,
    StatementDeclaration, StatementIf, StatementWhile, StatementValue, Value, ValueStatementKind,
};
use crate::message::MessageContext;
use crate::pass::{self, Annotations, Handler, Input, Output};

pub fn analyze_control_flow(unit: &crate::ast::TranslationUnit, messages: &mut MessageContext, annotations: &mut Annotations) {
    let mut handler = ControlFlowHandler;
    pass::run_pass(unit, &mut handler, messages, annotations);
}

struct ControlFlowHandler;

fn is_literal_true(value: &Value) -> bool {
    matches!(value, Value::LiteralBool(n) if n.value)
}

impl Handler for ControlFlowHandler {
    fn on_leave_statement_basic(&mut self, input: &mut Input<StatementBasic>) -> Output<StatementBasic> {
        let (terminates_block, terminates_function) = match input.node.kind {
            BasicStatementKind::Continue | BasicStatementKind::Break => (true, false),
            BasicStatementKind::ReturnVoid => (true, true),
        };
        input.annotations.set_terminates_block(input.node.id, terminates_block);
        input.annotations.set_terminates_function(input.node.id, terminates_function);
        Output::Continue
    }

    fn on_leave_statement_value(&mut self, input: &mut Input<StatementValue>) -> Output<StatementValue> {
        let (terminates_block, terminates_function) = match input.node.kind {
            ValueStatementKind::Execute => (false, false),
            ValueStatementKind::Return => (true, true),
        };
        input.annotations.set_terminates_block(input.node.id, terminates_block);
        input.annotations.set_terminates_function(input.node.id, terminates_function);
        Output::Continue
    }

    fn on_leave_statement_declaration(&mut self, input: &mut Input<StatementDeclaration>) -> Output<StatementDeclaration> {
        input.annotations.set_terminates_block(input.node.id, false);
        input.annotations.set_terminates_function(input.node.id, false);
        Output::Continue
    }

    fn on_leave_statement_if(&mut self, input: &mut Input<StatementIf>) -> Output<StatementIf> {
        let then_tb = input.annotations.terminates_block(input.node.then_block.id);
        let then_tf = input.annotations.terminates_function(input.node.then_block.id);
        let (else_tb, else_tf) = match &input.node.else_branch {
            None => (false, false),
            Some(ElseBranch::Block(b)) => (
                input.annotations.terminates_block(b.id),
                input.annotations.terminates_function(b.id),
            ),
            Some(ElseBranch::If(inner)) => (
                input.annotations.terminates_block(inner.id),
                input.annotations.terminates_function(inner.id),
            ),
        };
        input.annotations.set_terminates_block(input.node.id, then_tb && else_tb);
        input.annotations.set_terminates_function(input.node.id, then_tf && else_tf);
        Output::Continue
    }

    fn on_leave_statement_while(&mut self, input: &mut Input<StatementWhile>) -> Output<StatementWhile> {
        let body_tb = input.annotations.terminates_block(input.node.body.id);
        let body_tf = input.annotations.terminates_function(input.node.body.id);
        // `while true` with no internal block-terminator (break/continue/return)
        // never falls through, so it is assumed to terminate the function; a
        // body that *does* terminate its own block (e.g. via `break`) can
        // exit the loop, so that assumption no longer holds.
        let infinite_loop = is_literal_true(&input.node.condition) && !body_tb;
        input.annotations.set_terminates_block(input.node.id, infinite_loop);
        input
            .annotations
            .set_terminates_function(input.node.id, infinite_loop || body_tf);
        Output::Continue
    }

    fn on_leave_statement_block(&mut self, input: &mut Input<StatementBlock>) -> Output<StatementBlock> {
        let mut terminator: Option<(usize, bool)> = None;
        for (index, statement) in input.node.statements.iter().enumerate() {
            if input.annotations.terminates_block(statement.id()) {
                terminator = Some((index, input.annotations.terminates_function(statement.id())));
                break;
            }
        }
        if let Some((index, terminates_function)) = terminator {
            input.annotations.set_terminates_block(input.node.id, true);
            input.annotations.set_terminates_function(input.node.id, terminates_function);
            for statement in &input.node.statements[index + 1..] {
                input.messages.warning(statement.source_range(), "unreachable statement");
            }
        } else {
            input.annotations.set_terminates_block(input.node.id, false);
            input.annotations.set_terminates_function(input.node.id, false);
        }
        Output::Continue
    }

    fn on_leave_declaration_function(&mut self, input: &mut Input<DeclarationFunction>) -> Output<DeclarationFunction> {
        if let Some(body) = &input.node.body {
            if !input.annotations.terminates_function(body.id) {
                input.messages.error(input.node.source_range, "function does not always return");
            }
        }
        Output::Continue
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combinators::ParsingContext;
    use crate::source::Source;

    fn check(text: &str) -> MessageContext {
        let source = Source::in_memory(text);
        let mut messages = MessageContext::new();
        let tokens = crate::lexer::lex(&mut messages, &source);
        let unit = {
            let mut ctx = ParsingContext::new(&tokens, &mut messages);
            crate::forge::parse_translation_unit(&mut ctx)
        };
        let mut annotations = Annotations::new();
        analyze_control_flow(&unit, &mut messages, &mut annotations);
        messages
    }

    #[test]
    fn a_function_ending_in_return_always_returns() {
        assert!(!check("func f() -> i32 { return 1; }").has_failed());
    }

    #[test]
    fn a_function_with_no_return_is_flagged() {
        assert!(check("func f() -> i32 { let x: i32 = 1; }").has_failed());
    }

    #[test]
    fn an_if_without_else_does_not_always_return() {
        assert!(check("func f() -> i32 { if true { return 1; } }").has_failed());
    }

    #[test]
    fn an_if_with_else_returning_on_both_branches_always_returns() {
        assert!(!check("func f() -> i32 { if true { return 1; } else { return 2; } }").has_failed());
    }

    #[test]
    fn an_infinite_loop_with_no_return_satisfies_the_check() {
        assert!(!check("func f() -> i32 { while true { } }").has_failed());
    }

    #[test]
    fn a_void_function_without_an_explicit_return_is_still_flagged() {
        assert!(check("func f() { let x: i32 = 1; }").has_failed());
    }

    #[test]
    fn statements_after_a_return_are_reported_unreachable() {
        let messages = check("func f() -> i32 { return 1; let x: i32 = 2; }");
        assert!(messages.iter().any(|m| m.text.contains("unreachable")));
    }

    #[test]
    fn an_infinite_loop_whose_body_breaks_does_not_satisfy_the_check() {
        // The body terminates its own block via `break`, so the loop can
        // fall through and the "infinite loop never returns" exemption does
        // not apply.
        assert!(check("func f() -> i32 { while true { break; } }").has_failed());
    }

    #[test]
    fn statements_after_a_genuine_infinite_loop_are_reported_unreachable() {
        let messages = check("func f() -> i32 { while true { } let x: i32 = 2; }");
        assert!(messages.iter().any(|m| m.text.contains("unreachable")));
    }
}
