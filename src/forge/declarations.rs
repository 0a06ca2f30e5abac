//! The declaration grammar (spec §4.3, "Declarations"):
//!
//! ```text
//! declaration      ::= declaration_variable | declaration_function
//!                    | declaration_type_alias | declaration_structured_type
//!                    | declaration_namespace
//! declaration_variable
//!                  ::= ("let" | "const") symbol (":" type)? ("=" value)? ";"
//! declaration_function
//!                  ::= "func" symbol "(" (param ("," param)*)? ")"
//!                      ("->" type)? (statement_block | ";")
//! param            ::= symbol (":" type)?
//! declaration_type_alias
//!                  ::= "explicit"? "type" symbol "=" type ";"
//! declaration_structured_type
//!                  ::= ("struct" | "interface") symbol
//!                      ("inherits" symbol ("," symbol)*)? "{" declaration* "}"
//! declaration_namespace
//!                  ::= "namespace" symbol "{" declaration* "}"
//! ```
//!
//! Inside a function's parameter list the keyword and trailing `;` are
//! omitted — `parse_declaration`'s `in_param_list` flag dispatches straight
//! to [`parse_declaration_variable_param`] instead of trying all five
//! alternatives, since a parameter can only ever be a variable.

use crate::ast::{
    Declaration, DeclarationFunction, DeclarationNamespace, DeclarationStructuredType,
    DeclarationTypeAlias, DeclarationVariable, NodeId, StructuredTypeKind,
};
use crate::combinators::{
    parse_any_of, parse_repeated_bound, parse_repeated_separated_bound, parse_token_by_kind,
    ParsingContext,
};
use crate::source::SourceRange;
use crate::token::TokenKind;

use super::statements::parse_statement_block;
use super::types::{parse_type, parse_type_symbol};
use super::values::parse_value;

/// `declaration`. `in_param_list` selects the bare `name (: type)?` shape a
/// function's parameter list uses in place of the full five-way
/// alternation.
pub fn parse_declaration(ctx: &mut ParsingContext, in_param_list: bool) -> Option<Declaration> {
    if in_param_list {
        return parse_declaration_variable_param(ctx).map(Declaration::Variable);
    }

    parse_any_of(
        ctx,
        &[
            &parse_declaration_variable,
            &parse_declaration_function,
            &parse_declaration_type_alias,
            &parse_declaration_structured_type,
            &parse_declaration_namespace,
        ],
    )
}

fn parse_declaration_variable(ctx: &mut ParsingContext) -> Option<Declaration> {
    let (is_const, left) = if let Some(token) = parse_token_by_kind(ctx, TokenKind::KwLet) {
        (false, token)
    } else if let Some(token) = parse_token_by_kind(ctx, TokenKind::KwConst) {
        (true, token)
    } else {
        return None;
    };

    let Some(name_token) = parse_token_by_kind(ctx, TokenKind::Symbol) else {
        ctx.error_expected("a name");
        return None;
    };

    let ty = if parse_token_by_kind(ctx, TokenKind::Colon).is_some() {
        let ty = parse_type(ctx);
        if ty.is_none() {
            ctx.error_expected("a type");
        }
        ty
    } else {
        None
    };

    let initial_value = if parse_token_by_kind(ctx, TokenKind::Eq).is_some() {
        let value = parse_value(ctx);
        if value.is_none() {
            ctx.error_expected("a value");
        }
        value
    } else {
        None
    };

    let end = initial_value
        .as_ref()
        .map(|v| v.source_range())
        .or_else(|| ty.as_ref().map(|t| t.source_range()))
        .unwrap_or(name_token.source_range);

    if parse_token_by_kind(ctx, TokenKind::Semicolon).is_none() {
        ctx.error_expected(";");
    }

    Some(Declaration::Variable(DeclarationVariable {
        id: NodeId::fresh(),
        source_range: SourceRange::combine(left.source_range, end),
        name: name_token.value,
        ty,
        initial_value,
        is_const,
    }))
}

/// A function parameter: `symbol (":" type)?`, no initializer, no keyword.
fn parse_declaration_variable_param(ctx: &mut ParsingContext) -> Option<DeclarationVariable> {
    let name_token = parse_token_by_kind(ctx, TokenKind::Symbol)?;

    let ty = if parse_token_by_kind(ctx, TokenKind::Colon).is_some() {
        let ty = parse_type(ctx);
        if ty.is_none() {
            ctx.error_expected("a type");
        }
        ty
    } else {
        None
    };

    let source_range = ty
        .as_ref()
        .map(|t| SourceRange::combine(name_token.source_range, t.source_range()))
        .unwrap_or(name_token.source_range);

    Some(DeclarationVariable {
        id: NodeId::fresh(),
        source_range,
        name: name_token.value,
        ty,
        initial_value: None,
        is_const: false,
    })
}

fn parse_declaration_function(ctx: &mut ParsingContext) -> Option<Declaration> {
    let left = parse_token_by_kind(ctx, TokenKind::KwFunc)?;

    let Some(name_token) = parse_token_by_kind(ctx, TokenKind::Symbol) else {
        ctx.error_expected("a name");
        return None;
    };

    let Some(args) = parse_repeated_separated_bound(
        ctx,
        TokenKind::LParen,
        parse_declaration_variable_param,
        TokenKind::Comma,
        TokenKind::RParen,
    ) else {
        ctx.error_expected("(");
        return None;
    };

    let return_type = if parse_token_by_kind(ctx, TokenKind::Arrow).is_some() {
        let ty = parse_type(ctx);
        if ty.is_none() {
            ctx.error_expected("a return type");
        }
        ty
    } else {
        None
    };

    let (body, body_range) = if ctx.peek_kind() == TokenKind::LBrace {
        let block = parse_statement_block(ctx);
        let range = block.as_ref().map(|b| b.source_range);
        (block, range)
    } else {
        if parse_token_by_kind(ctx, TokenKind::Semicolon).is_none() {
            ctx.error_expected("; or a body");
        }
        (None, None)
    };

    let end = body_range
        .or_else(|| return_type.as_ref().map(|t| t.source_range()))
        .unwrap_or(name_token.source_range);

    Some(Declaration::Function(DeclarationFunction {
        id: NodeId::fresh(),
        source_range: SourceRange::combine(left.source_range, end),
        name: name_token.value,
        args,
        return_type,
        body,
    }))
}

fn parse_declaration_type_alias(ctx: &mut ParsingContext) -> Option<Declaration> {
    let explicit_token = parse_token_by_kind(ctx, TokenKind::KwExplicit);

    let Some(kw_type) = parse_token_by_kind(ctx, TokenKind::KwType) else {
        return None;
    };

    let left = explicit_token
        .as_ref()
        .map(|t| t.source_range)
        .unwrap_or(kw_type.source_range);

    let Some(name_token) = parse_token_by_kind(ctx, TokenKind::Symbol) else {
        ctx.error_expected("a name");
        return None;
    };

    if parse_token_by_kind(ctx, TokenKind::Eq).is_none() {
        ctx.error_expected("=");
        return None;
    }

    let Some(ty) = parse_type(ctx) else {
        ctx.error_expected("a type");
        return None;
    };

    let end = ty.source_range();
    if parse_token_by_kind(ctx, TokenKind::Semicolon).is_none() {
        ctx.error_expected(";");
    }

    Some(Declaration::TypeAlias(DeclarationTypeAlias {
        id: NodeId::fresh(),
        source_range: SourceRange::combine(left, end),
        name: name_token.value,
        ty,
        is_explicit: explicit_token.is_some(),
    }))
}

fn parse_declaration_structured_type(ctx: &mut ParsingContext) -> Option<Declaration> {
    let (kind, left) = if let Some(token) = parse_token_by_kind(ctx, TokenKind::KwStruct) {
        (StructuredTypeKind::Struct, token)
    } else if let Some(token) = parse_token_by_kind(ctx, TokenKind::KwInterface) {
        (StructuredTypeKind::Interface, token)
    } else {
        return None;
    };

    let Some(name_token) = parse_token_by_kind(ctx, TokenKind::Symbol) else {
        ctx.error_expected("a name");
        return None;
    };

    let inherits = if parse_token_by_kind(ctx, TokenKind::KwInherits).is_some() {
        let mut list = Vec::new();
        match parse_type_symbol(ctx) {
            Some(symbol) => list.push(symbol),
            None => ctx.error_expected("a type"),
        }
        while parse_token_by_kind(ctx, TokenKind::Comma).is_some() {
            match parse_type_symbol(ctx) {
                Some(symbol) => list.push(symbol),
                None => {
                    ctx.error_expected("a type");
                    break;
                }
            }
        }
        list
    } else {
        Vec::new()
    };

    let Some(members) = parse_repeated_bound(
        ctx,
        TokenKind::LBrace,
        |ctx| parse_declaration(ctx, false),
        TokenKind::RBrace,
    ) else {
        ctx.error_expected("{");
        return None;
    };

    let end = members
        .last()
        .map(|m| m.source_range())
        .unwrap_or(name_token.source_range);

    Some(Declaration::StructuredType(DeclarationStructuredType {
        id: NodeId::fresh(),
        source_range: SourceRange::combine(left.source_range, end),
        name: name_token.value,
        kind,
        members,
        inherits,
    }))
}

fn parse_declaration_namespace(ctx: &mut ParsingContext) -> Option<Declaration> {
    let left = parse_token_by_kind(ctx, TokenKind::KwNamespace)?;

    let Some(name_token) = parse_token_by_kind(ctx, TokenKind::Symbol) else {
        ctx.error_expected("a name");
        return None;
    };

    let Some(members) = parse_repeated_bound(
        ctx,
        TokenKind::LBrace,
        |ctx| parse_declaration(ctx, false),
        TokenKind::RBrace,
    ) else {
        ctx.error_expected("{");
        return None;
    };

    let end = members
        .last()
        .map(|m| m.source_range())
        .unwrap_or(name_token.source_range);

    Some(Declaration::Namespace(DeclarationNamespace {
        id: NodeId::fresh(),
        source_range: SourceRange::combine(left.source_range, end),
        name: name_token.value,
        members,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::MessageContext;
    use crate::source::Source;

    fn parse(text: &str) -> (Option<Declaration>, MessageContext) {
        let source = Source::in_memory(text);
        let mut messages = MessageContext::new();
        let tokens = crate::lexer::lex(&mut messages, &source);
        let decl = {
            let mut ctx = ParsingContext::new(&tokens, &mut messages);
            parse_declaration(&mut ctx, false)
        };
        (decl, messages)
    }

    #[test]
    fn parses_a_let_with_initializer() {
        let (decl, messages) = parse("let x = 5;");
        match decl {
            Some(Declaration::Variable(v)) => {
                assert_eq!(v.name, "x");
                assert!(!v.is_const);
                assert!(v.initial_value.is_some());
            }
            other => panic!("expected a variable, got {:?}", other),
        }
        assert!(messages.is_empty());
    }

    #[test]
    fn parses_a_const_with_an_explicit_type() {
        let (decl, messages) = parse("const x: i32 = 5;");
        match decl {
            Some(Declaration::Variable(v)) => {
                assert!(v.is_const);
                assert!(v.ty.is_some());
            }
            other => panic!("expected a variable, got {:?}", other),
        }
        assert!(messages.is_empty());
    }

    #[test]
    fn parses_a_function_with_params_and_a_body() {
        let (decl, messages) = parse("func add(a: i32, b: i32) -> i32 { return a + b; }");
        match decl {
            Some(Declaration::Function(f)) => {
                assert_eq!(f.name, "add");
                assert_eq!(f.args.len(), 2);
                assert!(f.return_type.is_some());
                assert!(f.body.is_some());
            }
            other => panic!("expected a function, got {:?}", other),
        }
        assert!(messages.is_empty());
    }

    #[test]
    fn parses_an_external_function_declaration() {
        let (decl, messages) = parse("func add(a: i32, b: i32) -> i32;");
        match decl {
            Some(Declaration::Function(f)) => assert!(f.body.is_none()),
            other => panic!("expected a function, got {:?}", other),
        }
        assert!(messages.is_empty());
    }

    #[test]
    fn parses_an_explicit_type_alias() {
        let (decl, messages) = parse("explicit type meters = i32;");
        match decl {
            Some(Declaration::TypeAlias(a)) => {
                assert_eq!(a.name, "meters");
                assert!(a.is_explicit);
            }
            other => panic!("expected a type alias, got {:?}", other),
        }
        assert!(messages.is_empty());
    }

    #[test]
    fn parses_a_struct_with_inheritance() {
        let (decl, messages) =
            parse("struct point inherits base { let x: i32; let y: i32; }");
        match decl {
            Some(Declaration::StructuredType(s)) => {
                assert_eq!(s.name, "point");
                assert_eq!(s.kind, StructuredTypeKind::Struct);
                assert_eq!(s.inherits.len(), 1);
                assert_eq!(s.members.len(), 2);
            }
            other => panic!("expected a struct, got {:?}", other),
        }
        assert!(messages.is_empty());
    }

    #[test]
    fn parses_an_empty_namespace() {
        let (decl, messages) = parse("namespace math {}");
        match decl {
            Some(Declaration::Namespace(n)) => {
                assert_eq!(n.name, "math");
                assert!(n.members.is_empty());
            }
            other => panic!("expected a namespace, got {:?}", other),
        }
        assert!(messages.is_empty());
    }
}
