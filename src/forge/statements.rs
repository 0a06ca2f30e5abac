//! The statement grammar (spec §4.3, "Statements"):
//!
//! ```text
//! statement        ::= "continue" ";"
//!                     | "break" ";"
//!                     | "return" value? ";"
//!                     | declaration
//!                     | statement_block
//!                     | statement_if
//!                     | statement_while
//!                     | statement_do_while
//!                     | value ";"
//! statement_block  ::= "{" statement* "}"
//! statement_if     ::= "if" value statement_block
//!                      ("else" (statement_if | statement_block))?
//! statement_while  ::= "while" value statement_block
//! statement_do_while
//!                  ::= "do" statement_block "while" value ";"
//! ```
//!
//! `value ";"` ("execute") is tried last: it is the only alternative that
//! doesn't start with a distinguishing keyword, so every other rule gets a
//! chance first.

use crate::ast::{
    BasicStatementKind, ElseBranch, NodeId, Statement, StatementBasic, StatementBlock,
    StatementDeclaration, StatementIf, StatementValue, StatementWhile, ValueStatementKind,
};
use crate::combinators::{parse_any_of, parse_repeated_bound, parse_token_by_kind, ParsingContext};
use crate::source::SourceRange;
use crate::token::TokenKind;

use super::declarations::parse_declaration;
use super::values::parse_value;

pub fn parse_statement(ctx: &mut ParsingContext) -> Option<Statement> {
    parse_any_of(
        ctx,
        &[
            &parse_statement_continue,
            &parse_statement_break,
            &parse_statement_return,
            &parse_statement_declaration,
            &parse_statement_block_as_statement,
            &parse_statement_if,
            &parse_statement_while,
            &parse_statement_do_while,
            &parse_statement_execute,
        ],
    )
}

fn parse_statement_continue(ctx: &mut ParsingContext) -> Option<Statement> {
    let token = parse_token_by_kind(ctx, TokenKind::KwContinue)?;
    if parse_token_by_kind(ctx, TokenKind::Semicolon).is_none() {
        ctx.error_expected(";");
    }
    Some(Statement::Basic(StatementBasic {
        id: NodeId::fresh(),
        source_range: token.source_range,
        kind: BasicStatementKind::Continue,
    }))
}

fn parse_statement_break(ctx: &mut ParsingContext) -> Option<Statement> {
    let token = parse_token_by_kind(ctx, TokenKind::KwBreak)?;
    if parse_token_by_kind(ctx, TokenKind::Semicolon).is_none() {
        ctx.error_expected(";");
    }
    Some(Statement::Basic(StatementBasic {
        id: NodeId::fresh(),
        source_range: token.source_range,
        kind: BasicStatementKind::Break,
    }))
}

fn parse_statement_return(ctx: &mut ParsingContext) -> Option<Statement> {
    let token = parse_token_by_kind(ctx, TokenKind::KwReturn)?;

    if parse_token_by_kind(ctx, TokenKind::Semicolon).is_some() {
        return Some(Statement::Basic(StatementBasic {
            id: NodeId::fresh(),
            source_range: token.source_range,
            kind: BasicStatementKind::ReturnVoid,
        }));
    }

    let Some(value) = parse_value(ctx) else {
        ctx.error_expected("a value or ;");
        return Some(Statement::Basic(StatementBasic {
            id: NodeId::fresh(),
            source_range: token.source_range,
            kind: BasicStatementKind::ReturnVoid,
        }));
    };

    let source_range = SourceRange::combine(token.source_range, value.source_range());
    if parse_token_by_kind(ctx, TokenKind::Semicolon).is_none() {
        ctx.error_expected(";");
    }

    Some(Statement::Value(StatementValue {
        id: NodeId::fresh(),
        source_range,
        kind: ValueStatementKind::Return,
        value,
    }))
}

fn parse_statement_declaration(ctx: &mut ParsingContext) -> Option<Statement> {
    let decl = parse_declaration(ctx, false)?;
    let source_range = decl.source_range();
    Some(Statement::Declaration(StatementDeclaration {
        id: NodeId::fresh(),
        source_range,
        decl,
    }))
}

pub fn parse_statement_block(ctx: &mut ParsingContext) -> Option<StatementBlock> {
    let left = ctx.peek().clone();
    let statements =
        parse_repeated_bound(ctx, TokenKind::LBrace, parse_statement, TokenKind::RBrace)?;
    let end = statements
        .last()
        .map(|s| s.source_range())
        .unwrap_or(left.source_range);
    Some(StatementBlock {
        id: NodeId::fresh(),
        source_range: SourceRange::combine(left.source_range, end),
        statements,
    })
}

fn parse_statement_block_as_statement(ctx: &mut ParsingContext) -> Option<Statement> {
    parse_statement_block(ctx).map(Statement::Block)
}

fn parse_statement_if_inner(ctx: &mut ParsingContext) -> Option<StatementIf> {
    let left = parse_token_by_kind(ctx, TokenKind::KwIf)?;

    let Some(condition) = parse_value(ctx) else {
        ctx.error_expected("a condition");
        return None;
    };

    let Some(then_block) = parse_statement_block(ctx) else {
        ctx.error_expected("{");
        return None;
    };

    let else_branch = if parse_token_by_kind(ctx, TokenKind::KwElse).is_some() {
        if ctx.peek_kind() == TokenKind::KwIf {
            parse_statement_if_inner(ctx).map(|inner| ElseBranch::If(Box::new(inner)))
        } else {
            let block = parse_statement_block(ctx);
            if block.is_none() {
                ctx.error_expected("{");
            }
            block.map(ElseBranch::Block)
        }
    } else {
        None
    };

    let end = match &else_branch {
        Some(ElseBranch::If(inner)) => inner.source_range,
        Some(ElseBranch::Block(block)) => block.source_range,
        None => then_block.source_range,
    };

    Some(StatementIf {
        id: NodeId::fresh(),
        source_range: SourceRange::combine(left.source_range, end),
        condition,
        then_block,
        else_branch,
    })
}

fn parse_statement_if(ctx: &mut ParsingContext) -> Option<Statement> {
    parse_statement_if_inner(ctx).map(Statement::If)
}

fn parse_statement_while(ctx: &mut ParsingContext) -> Option<Statement> {
    let left = parse_token_by_kind(ctx, TokenKind::KwWhile)?;

    let Some(condition) = parse_value(ctx) else {
        ctx.error_expected("a condition");
        return None;
    };

    let Some(body) = parse_statement_block(ctx) else {
        ctx.error_expected("{");
        return None;
    };

    Some(Statement::While(StatementWhile {
        id: NodeId::fresh(),
        source_range: SourceRange::combine(left.source_range, body.source_range),
        condition,
        body,
        is_do_while: false,
    }))
}

fn parse_statement_do_while(ctx: &mut ParsingContext) -> Option<Statement> {
    let left = parse_token_by_kind(ctx, TokenKind::KwDo)?;

    let Some(body) = parse_statement_block(ctx) else {
        ctx.error_expected("{");
        return None;
    };

    if parse_token_by_kind(ctx, TokenKind::KwWhile).is_none() {
        ctx.error_expected("while");
        return None;
    }

    let Some(condition) = parse_value(ctx) else {
        ctx.error_expected("a condition");
        return None;
    };

    let source_range = SourceRange::combine(left.source_range, condition.source_range());
    if parse_token_by_kind(ctx, TokenKind::Semicolon).is_none() {
        ctx.error_expected(";");
    }

    Some(Statement::While(StatementWhile {
        id: NodeId::fresh(),
        source_range,
        condition,
        body,
        is_do_while: true,
    }))
}

fn parse_statement_execute(ctx: &mut ParsingContext) -> Option<Statement> {
    let value = parse_value(ctx)?;
    let start = value.source_range();
    if parse_token_by_kind(ctx, TokenKind::Semicolon).is_none() {
        ctx.error_expected(";");
    }
    Some(Statement::Value(StatementValue {
        id: NodeId::fresh(),
        source_range: start,
        kind: ValueStatementKind::Execute,
        value,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::MessageContext;
    use crate::source::Source;

    fn parse(text: &str) -> (Option<Statement>, MessageContext) {
        let source = Source::in_memory(text);
        let mut messages = MessageContext::new();
        let tokens = crate::lexer::lex(&mut messages, &source);
        let statement = {
            let mut ctx = ParsingContext::new(&tokens, &mut messages);
            parse_statement(&mut ctx)
        };
        (statement, messages)
    }

    #[test]
    fn parses_continue_and_break() {
        let (s, messages) = parse("continue;");
        assert!(matches!(
            s,
            Some(Statement::Basic(b)) if b.kind == BasicStatementKind::Continue
        ));
        assert!(messages.is_empty());

        let (s, messages) = parse("break;");
        assert!(matches!(
            s,
            Some(Statement::Basic(b)) if b.kind == BasicStatementKind::Break
        ));
        assert!(messages.is_empty());
    }

    #[test]
    fn parses_bare_return() {
        let (s, messages) = parse("return;");
        assert!(matches!(
            s,
            Some(Statement::Basic(b)) if b.kind == BasicStatementKind::ReturnVoid
        ));
        assert!(messages.is_empty());
    }

    #[test]
    fn parses_return_with_a_value() {
        let (s, messages) = parse("return a + b;");
        assert!(matches!(
            s,
            Some(Statement::Value(v)) if v.kind == ValueStatementKind::Return
        ));
        assert!(messages.is_empty());
    }

    #[test]
    fn parses_a_declaration_statement() {
        let (s, messages) = parse("let x = 1;");
        assert!(matches!(s, Some(Statement::Declaration(_))));
        assert!(messages.is_empty());
    }

    #[test]
    fn parses_an_if_else_if_chain() {
        let (s, messages) = parse("if a { return; } else if b { continue; } else { break; }");
        match s {
            Some(Statement::If(i)) => match i.else_branch {
                Some(ElseBranch::If(inner)) => {
                    assert!(matches!(inner.else_branch, Some(ElseBranch::Block(_))))
                }
                other => panic!("expected an else-if chain, got {:?}", other),
            },
            other => panic!("expected an if statement, got {:?}", other),
        }
        assert!(messages.is_empty());
    }

    #[test]
    fn parses_a_while_loop() {
        let (s, messages) = parse("while true { continue; }");
        match s {
            Some(Statement::While(w)) => assert!(!w.is_do_while),
            other => panic!("expected a while loop, got {:?}", other),
        }
        assert!(messages.is_empty());
    }

    #[test]
    fn parses_a_do_while_loop() {
        let (s, messages) = parse("do { continue; } while true;");
        match s {
            Some(Statement::While(w)) => assert!(w.is_do_while),
            other => panic!("expected a do-while loop, got {:?}", other),
        }
        assert!(messages.is_empty());
    }

    #[test]
    fn falls_back_to_an_execute_statement() {
        let (s, messages) = parse("f(x);");
        assert!(matches!(
            s,
            Some(Statement::Value(v)) if v.kind == ValueStatementKind::Execute
        ));
        assert!(messages.is_empty());
    }
}
