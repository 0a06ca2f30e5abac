//! The type grammar (spec §4.3, "Types"):
//!
//! ```text
//! type            ::= type_unary
//! type_unary      ::= ("*" | "**" | "const") type_unary | type_term
//! type_term       ::= type_basic | type_symbol | type_with_bit_width
//!                    | type_function | type_structured
//! type_basic      ::= "bool" | "void" | "isize" | "usize"
//! type_with_bit_width
//!                 ::= "i8" | "i16" | "i32" | "i64"
//!                   | "u8" | "u16" | "u32" | "u64" | "f32" | "f64"
//! type_function   ::= "(" (type ("," type)*)? ")" "->" type
//! type_structured ::= "{" declaration* "}"
//! ```
//!
//! `type_function`'s `(...) -> T` and `type_structured`'s `{ decl* }`
//! surface forms carry no leading keyword; resolved from the forge_parsers
//! grammar rather than spec prose, which leaves the concrete token shape
//! unstated.

use super::declarations::parse_declaration;
use crate::ast::types::{BasicTypeKind, BitWidth, BitWidthTypeKind, Type, TypeUnaryKind};
use crate::ast::{
    with_const, NodeId, TypeBasic, TypeFunction, TypeStructured, TypeSymbol, TypeUnary,
    TypeWithBitWidth,
};
use crate::combinators::{
    parse_any_of, parse_prefixed, parse_repeated_bound, parse_repeated_separated_bound,
    parse_token_by_kind, ParsingContext,
};
use crate::source::SourceRange;
use crate::token::TokenKind;

fn parse_type_basic(ctx: &mut ParsingContext) -> Option<Type> {
    let kind = match ctx.peek_kind() {
        TokenKind::KwBool => BasicTypeKind::Bool,
        TokenKind::KwVoid => BasicTypeKind::Void,
        TokenKind::KwIsize => BasicTypeKind::Isize,
        TokenKind::KwUsize => BasicTypeKind::Usize,
        _ => return None,
    };
    let token = ctx.peek().clone();
    let _ = parse_token_by_kind(ctx, token.kind);
    Some(Type::Basic(TypeBasic {
        id: NodeId::fresh(),
        source_range: token.source_range,
        is_const: false,
        kind,
    }))
}

pub fn parse_type_symbol(ctx: &mut ParsingContext) -> Option<TypeSymbol> {
    let token = parse_token_by_kind(ctx, TokenKind::Symbol)?;
    Some(TypeSymbol {
        id: NodeId::fresh(),
        source_range: token.source_range,
        is_const: false,
        name: token.value,
    })
}

fn parse_type_symbol_as_type(ctx: &mut ParsingContext) -> Option<Type> {
    parse_type_symbol(ctx).map(Type::Symbol)
}

fn parse_type_with_bit_width(ctx: &mut ParsingContext) -> Option<Type> {
    let (kind, bit_width) = match ctx.peek_kind() {
        TokenKind::KwI8 => (BitWidthTypeKind::SignedInt, BitWidth::W8),
        TokenKind::KwI16 => (BitWidthTypeKind::SignedInt, BitWidth::W16),
        TokenKind::KwI32 => (BitWidthTypeKind::SignedInt, BitWidth::W32),
        TokenKind::KwI64 => (BitWidthTypeKind::SignedInt, BitWidth::W64),
        TokenKind::KwU8 => (BitWidthTypeKind::UnsignedInt, BitWidth::W8),
        TokenKind::KwU16 => (BitWidthTypeKind::UnsignedInt, BitWidth::W16),
        TokenKind::KwU32 => (BitWidthTypeKind::UnsignedInt, BitWidth::W32),
        TokenKind::KwU64 => (BitWidthTypeKind::UnsignedInt, BitWidth::W64),
        TokenKind::KwF32 => (BitWidthTypeKind::Float, BitWidth::W32),
        TokenKind::KwF64 => (BitWidthTypeKind::Float, BitWidth::W64),
        _ => return None,
    };
    let token = ctx.peek().clone();
    let _ = parse_token_by_kind(ctx, token.kind);
    Some(Type::WithBitWidth(TypeWithBitWidth {
        id: NodeId::fresh(),
        source_range: token.source_range,
        is_const: false,
        kind,
        bit_width,
    }))
}

fn parse_type_function(ctx: &mut ParsingContext) -> Option<Type> {
    let left = ctx.peek().clone();
    let arg_types = parse_repeated_separated_bound(
        ctx,
        TokenKind::LParen,
        parse_type,
        TokenKind::Comma,
        TokenKind::RParen,
    )?;

    if parse_token_by_kind(ctx, TokenKind::Arrow).is_none() {
        ctx.error_expected("->");
        return None;
    }

    let Some(return_type) = parse_type(ctx) else {
        ctx.error_expected("a return type");
        return None;
    };

    Some(Type::Function(TypeFunction {
        id: NodeId::fresh(),
        source_range: SourceRange::combine(left.source_range, return_type.source_range()),
        is_const: false,
        return_type: Box::new(return_type),
        arg_types,
    }))
}

fn parse_type_structured(ctx: &mut ParsingContext) -> Option<Type> {
    let left = ctx.peek().clone();
    let members = parse_repeated_bound(
        ctx,
        TokenKind::LBrace,
        |ctx| parse_declaration(ctx, false),
        TokenKind::RBrace,
    )?;
    let end = members
        .last()
        .map(|m| m.source_range())
        .unwrap_or(left.source_range);
    Some(Type::Structured(TypeStructured {
        id: NodeId::fresh(),
        source_range: SourceRange::combine(left.source_range, end),
        is_const: false,
        members,
    }))
}

fn parse_type_term(ctx: &mut ParsingContext) -> Option<Type> {
    parse_any_of(
        ctx,
        &[
            &parse_type_basic,
            &parse_type_symbol_as_type,
            &parse_type_with_bit_width,
            &parse_type_function,
            &parse_type_structured,
        ],
    )
}

fn parse_type_unary(ctx: &mut ParsingContext) -> Option<Type> {
    let prefixes = [TokenKind::Star, TokenKind::StarStar, TokenKind::KwConst];
    match parse_prefixed(ctx, &prefixes, parse_type_unary) {
        None => parse_type_term(ctx),
        Some((TokenKind::Star, prefix_token, child)) => {
            let source_range = SourceRange::combine(prefix_token.source_range, child.source_range());
            Some(Type::Unary(TypeUnary {
                id: NodeId::fresh(),
                source_range,
                is_const: false,
                kind: TypeUnaryKind::Pointer,
                operand: Box::new(child),
            }))
        }
        Some((TokenKind::StarStar, prefix_token, child)) => {
            let source_range = SourceRange::combine(prefix_token.source_range, child.source_range());
            let inner = Type::Unary(TypeUnary {
                id: NodeId::fresh(),
                source_range,
                is_const: false,
                kind: TypeUnaryKind::Pointer,
                operand: Box::new(child),
            });
            Some(Type::Unary(TypeUnary {
                id: NodeId::fresh(),
                source_range,
                is_const: false,
                kind: TypeUnaryKind::Pointer,
                operand: Box::new(inner),
            }))
        }
        Some((TokenKind::KwConst, _prefix_token, child)) => Some(with_const(child, true)),
        Some(_) => unreachable!("parse_prefixed only returns a listed prefix kind"),
    }
}

pub fn parse_type(ctx: &mut ParsingContext) -> Option<Type> {
    parse_type_unary(ctx)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::MessageContext;
    use crate::source::Source;

    fn parse(text: &str) -> (Option<Type>, MessageContext) {
        let source = Source::in_memory(text);
        let mut messages = MessageContext::new();
        let tokens = crate::lexer::lex(&mut messages, &source);
        let ty = {
            let mut ctx = ParsingContext::new(&tokens, &mut messages);
            parse_type(&mut ctx)
        };
        (ty, messages)
    }

    #[test]
    fn parses_basic_type() {
        let (ty, messages) = parse("bool");
        assert!(matches!(ty, Some(Type::Basic(_))));
        assert!(messages.is_empty());
    }

    #[test]
    fn parses_bit_width_type() {
        let (ty, _messages) = parse("u32");
        match ty {
            Some(Type::WithBitWidth(n)) => {
                assert_eq!(n.kind, BitWidthTypeKind::UnsignedInt);
                assert_eq!(n.bit_width, BitWidth::W32);
            }
            other => panic!("expected u32, got {:?}", other),
        }
    }

    #[test]
    fn double_star_desugars_to_nested_pointer() {
        let (ty, _messages) = parse("**i32");
        match ty {
            Some(Type::Unary(outer)) => match *outer.operand {
                Type::Unary(inner) => assert!(matches!(*inner.operand, Type::WithBitWidth(_))),
                other => panic!("expected nested pointer, got {:?}", other),
            },
            other => panic!("expected pointer, got {:?}", other),
        }
    }

    #[test]
    fn const_binds_to_the_position_it_appears_at() {
        let (ty, _messages) = parse("const *i32");
        match ty {
            Some(Type::Unary(outer)) => {
                assert!(outer.is_const);
                assert!(!outer.operand.is_const());
            }
            other => panic!("expected const pointer, got {:?}", other),
        }

        let (ty, _messages) = parse("*const i32");
        match ty {
            Some(Type::Unary(outer)) => {
                assert!(!outer.is_const);
                assert!(outer.operand.is_const());
            }
            other => panic!("expected pointer to const, got {:?}", other),
        }
    }

    #[test]
    fn parses_function_type() {
        let (ty, messages) = parse("(i32, bool) -> void");
        match ty {
            Some(Type::Function(f)) => {
                assert_eq!(f.arg_types.len(), 2);
                assert!(matches!(*f.return_type, Type::Basic(_)));
            }
            other => panic!("expected function type, got {:?}", other),
        }
        assert!(messages.is_empty());
    }

    #[test]
    fn parses_structured_type_with_no_members() {
        let (ty, messages) = parse("{}");
        assert!(matches!(ty, Some(Type::Structured(_))));
        assert!(messages.is_empty());
    }
}
