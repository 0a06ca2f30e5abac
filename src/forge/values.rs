//! The value precedence ladder (spec §4.3, "Values"):
//!
//! ```text
//! value                     ::= value_assignments
//! value_assignments         ::= value_cast (("=" | "+=" | ... ) value_assignments)?
//! value_cast                ::= value_boolean_or ("as" type)*
//! value_boolean_or          ::= value_boolean_and ("||" value_boolean_or)?
//! value_boolean_and         ::= value_comparative ("&&" value_boolean_and)?
//! value_comparative         ::= value_binary_disjunctive (("==" | "!=" | "<" | "<=" | ">" | ">=") value_comparative)?
//! value_binary_disjunctive  ::= value_binary_conjunctive ("|" value_binary_disjunctive)?
//! value_binary_conjunctive  ::= value_bit_shifts (("&" | "^") value_binary_conjunctive)?
//! value_bit_shifts          ::= value_additive (("<<" | ">>") value_bit_shifts)?
//! value_additive            ::= value_multiplicative (("+" | "-") value_additive)?
//! value_multiplicative      ::= value_exponentiation (("*" | "/" | "%") value_multiplicative)?
//! value_exponentiation      ::= value_unary ("**" value_exponentiation)?
//! value_unary               ::= ("*" | "&" | "-" | "+" | "~" | "!") value_unary | value_function_call
//! value_function_call       ::= value_member_access ("(" (value ("," value)*)? ")")*
//! value_member_access       ::= value_term ("." symbol)*
//! value_term                ::= literal_bool | literal_number | symbol | "(" value ")"
//! ```
//!
//! Every level right-associates: `parse_binary_operation` is given
//! `Associativity::Right` at every level from `value_assignments` down
//! through `value_exponentiation`, matching `forge_parsers.cpp`'s own
//! grammar (confirmed by its test suite, e.g. `x - y + z` parses as
//! `x - (y + z)`, not `(x - y) + z`). `value_cast`
//! can't be expressed with that combinator directly since its rhs is a
//! `Type`, not a `Value` — it loops by hand instead.

use crate::ast::{
    BinaryRhs, BinaryValueOp, NodeId, UnaryValueOp, Value, ValueBinary, ValueCall, ValueCast,
    ValueLiteralBool, ValueSymbol, ValueUnary,
};
use crate::combinators::{
    parse_any_of, parse_binary_operation, parse_prefixed, parse_repeated_separated_bound,
    parse_token_by_kind, Associativity, ParsingContext,
};
use crate::source::SourceRange;
use crate::token::TokenKind;

use super::numbers::parse_value_literal_number;
use super::types::parse_type;

fn make_binary(op: BinaryValueOp, lhs: Value, rhs: Value) -> Value {
    let source_range = SourceRange::combine(lhs.source_range(), rhs.source_range());
    Value::Binary(ValueBinary {
        id: NodeId::fresh(),
        source_range,
        op,
        lhs: Box::new(lhs),
        rhs: BinaryRhs::Value(Box::new(rhs)),
    })
}

macro_rules! binary_builders {
    ($($name:ident => $op:expr),* $(,)?) => {
        $(
            fn $name(lhs: Value, rhs: Value) -> Value {
                make_binary($op, lhs, rhs)
            }
        )*
    };
}

binary_builders! {
    build_assign => BinaryValueOp::Assign,
    build_add_assign => BinaryValueOp::AddAssign,
    build_sub_assign => BinaryValueOp::SubAssign,
    build_mul_assign => BinaryValueOp::MulAssign,
    build_div_assign => BinaryValueOp::DivAssign,
    build_mod_assign => BinaryValueOp::ModAssign,
    build_exp_assign => BinaryValueOp::ExpAssign,
    build_bit_and_assign => BinaryValueOp::BitAndAssign,
    build_bit_or_assign => BinaryValueOp::BitOrAssign,
    build_bit_xor_assign => BinaryValueOp::BitXorAssign,
    build_shl_assign => BinaryValueOp::ShlAssign,
    build_shr_assign => BinaryValueOp::ShrAssign,
    build_bool_or => BinaryValueOp::BoolOr,
    build_bool_and => BinaryValueOp::BoolAnd,
    build_eq => BinaryValueOp::Eq,
    build_ne => BinaryValueOp::Ne,
    build_lt => BinaryValueOp::Lt,
    build_le => BinaryValueOp::Le,
    build_gt => BinaryValueOp::Gt,
    build_ge => BinaryValueOp::Ge,
    build_bit_or => BinaryValueOp::BitOr,
    build_bit_and => BinaryValueOp::BitAnd,
    build_bit_xor => BinaryValueOp::BitXor,
    build_shl => BinaryValueOp::BitShl,
    build_shr => BinaryValueOp::BitShr,
    build_add => BinaryValueOp::Add,
    build_sub => BinaryValueOp::Sub,
    build_mul => BinaryValueOp::Mul,
    build_div => BinaryValueOp::Div,
    build_mod => BinaryValueOp::Mod,
    build_exp => BinaryValueOp::Exp,
}

fn parse_value_assignments(ctx: &mut ParsingContext) -> Option<Value> {
    parse_binary_operation(
        ctx,
        Associativity::Right,
        parse_value_cast,
        &[
            (TokenKind::Eq, build_assign as fn(Value, Value) -> Value),
            (TokenKind::PlusEq, build_add_assign),
            (TokenKind::MinusEq, build_sub_assign),
            (TokenKind::StarEq, build_mul_assign),
            (TokenKind::SlashEq, build_div_assign),
            (TokenKind::PercentEq, build_mod_assign),
            (TokenKind::StarStarEq, build_exp_assign),
            (TokenKind::AmpEq, build_bit_and_assign),
            (TokenKind::PipeEq, build_bit_or_assign),
            (TokenKind::CaretEq, build_bit_xor_assign),
            (TokenKind::ShlEq, build_shl_assign),
            (TokenKind::ShrEq, build_shr_assign),
        ],
    )
}

/// `E as T`: a loop rather than `parse_binary_operation` since the rhs is a
/// [`Type`], not a `Value` — the two sides of a cast don't share a type, so
/// the generic combinator's single-`T` signature doesn't fit.
fn parse_value_cast(ctx: &mut ParsingContext) -> Option<Value> {
    let mut value = parse_value_boolean_or(ctx)?;
    while parse_token_by_kind(ctx, TokenKind::KwAs).is_some() {
        let Some(ty) = parse_type(ctx) else {
            ctx.error_expected("a type");
            break;
        };
        let source_range = SourceRange::combine(value.source_range(), ty.source_range());
        value = Value::Cast(ValueCast {
            id: NodeId::fresh(),
            source_range,
            value: Box::new(value),
            ty,
        });
    }
    Some(value)
}

fn parse_value_boolean_or(ctx: &mut ParsingContext) -> Option<Value> {
    parse_binary_operation(
        ctx,
        Associativity::Right,
        parse_value_boolean_and,
        &[(TokenKind::PipePipe, build_bool_or as fn(Value, Value) -> Value)],
    )
}

fn parse_value_boolean_and(ctx: &mut ParsingContext) -> Option<Value> {
    parse_binary_operation(
        ctx,
        Associativity::Right,
        parse_value_comparative,
        &[(TokenKind::AmpAmp, build_bool_and as fn(Value, Value) -> Value)],
    )
}

fn parse_value_comparative(ctx: &mut ParsingContext) -> Option<Value> {
    parse_binary_operation(
        ctx,
        Associativity::Right,
        parse_value_binary_disjunctive,
        &[
            (TokenKind::EqEq, build_eq as fn(Value, Value) -> Value),
            (TokenKind::BangEq, build_ne),
            (TokenKind::Lt, build_lt),
            (TokenKind::Le, build_le),
            (TokenKind::Gt, build_gt),
            (TokenKind::Ge, build_ge),
        ],
    )
}

fn parse_value_binary_disjunctive(ctx: &mut ParsingContext) -> Option<Value> {
    parse_binary_operation(
        ctx,
        Associativity::Right,
        parse_value_binary_conjunctive,
        &[(TokenKind::Pipe, build_bit_or as fn(Value, Value) -> Value)],
    )
}

fn parse_value_binary_conjunctive(ctx: &mut ParsingContext) -> Option<Value> {
    parse_binary_operation(
        ctx,
        Associativity::Right,
        parse_value_bit_shifts,
        &[
            (TokenKind::Amp, build_bit_and as fn(Value, Value) -> Value),
            (TokenKind::Caret, build_bit_xor),
        ],
    )
}

fn parse_value_bit_shifts(ctx: &mut ParsingContext) -> Option<Value> {
    parse_binary_operation(
        ctx,
        Associativity::Right,
        parse_value_additive,
        &[
            (TokenKind::Shl, build_shl as fn(Value, Value) -> Value),
            (TokenKind::Shr, build_shr),
        ],
    )
}

fn parse_value_additive(ctx: &mut ParsingContext) -> Option<Value> {
    parse_binary_operation(
        ctx,
        Associativity::Right,
        parse_value_multiplicative,
        &[
            (TokenKind::Plus, build_add as fn(Value, Value) -> Value),
            (TokenKind::Minus, build_sub),
        ],
    )
}

fn parse_value_multiplicative(ctx: &mut ParsingContext) -> Option<Value> {
    parse_binary_operation(
        ctx,
        Associativity::Right,
        parse_value_exponentiation,
        &[
            (TokenKind::Star, build_mul as fn(Value, Value) -> Value),
            (TokenKind::Slash, build_div),
            (TokenKind::Percent, build_mod),
        ],
    )
}

fn parse_value_exponentiation(ctx: &mut ParsingContext) -> Option<Value> {
    parse_binary_operation(
        ctx,
        Associativity::Right,
        parse_value_unary,
        &[(TokenKind::StarStar, build_exp as fn(Value, Value) -> Value)],
    )
}

fn parse_value_unary(ctx: &mut ParsingContext) -> Option<Value> {
    let prefixes = [
        TokenKind::Star,
        TokenKind::Amp,
        TokenKind::Minus,
        TokenKind::Plus,
        TokenKind::Tilde,
        TokenKind::Bang,
    ];
    match parse_prefixed(ctx, &prefixes, parse_value_unary) {
        None => parse_value_function_call(ctx),
        Some((kind, prefix_token, operand)) => {
            let op = match kind {
                TokenKind::Star => UnaryValueOp::Deref,
                TokenKind::Amp => UnaryValueOp::GetAddr,
                TokenKind::Minus => UnaryValueOp::Neg,
                TokenKind::Plus => UnaryValueOp::Pos,
                TokenKind::Tilde => UnaryValueOp::BitNot,
                TokenKind::Bang => UnaryValueOp::BoolNot,
                _ => unreachable!("parse_prefixed only returns a listed prefix kind"),
            };
            let source_range = SourceRange::combine(prefix_token.source_range, operand.source_range());
            Some(Value::Unary(ValueUnary {
                id: NodeId::fresh(),
                source_range,
                op,
                operand: Box::new(operand),
            }))
        }
    }
}

fn parse_value_function_call(ctx: &mut ParsingContext) -> Option<Value> {
    let mut value = parse_value_member_access(ctx)?;
    while ctx.peek_kind() == TokenKind::LParen {
        let left = ctx.peek().clone();
        let Some(args) = parse_repeated_separated_bound(
            ctx,
            TokenKind::LParen,
            parse_value_assignments,
            TokenKind::Comma,
            TokenKind::RParen,
        ) else {
            break;
        };
        let source_range = SourceRange::combine(value.source_range(), left.source_range);
        value = Value::Call(ValueCall {
            id: NodeId::fresh(),
            source_range,
            callee: Box::new(value),
            args,
        });
    }
    Some(value)
}

fn parse_value_member_access(ctx: &mut ParsingContext) -> Option<Value> {
    let mut value = parse_value_term(ctx)?;
    while parse_token_by_kind(ctx, TokenKind::Dot).is_some() {
        let Some(name_token) = parse_token_by_kind(ctx, TokenKind::Symbol) else {
            ctx.error_expected("a member name");
            break;
        };
        let rhs = ValueSymbol {
            id: NodeId::fresh(),
            source_range: name_token.source_range,
            name: name_token.value,
        };
        let source_range = SourceRange::combine(value.source_range(), rhs.source_range);
        value = Value::Binary(ValueBinary {
            id: NodeId::fresh(),
            source_range,
            op: BinaryValueOp::MemberAccess,
            lhs: Box::new(value),
            rhs: BinaryRhs::Symbol(rhs),
        });
    }
    Some(value)
}

fn parse_value_literal_bool(ctx: &mut ParsingContext) -> Option<Value> {
    let value = match ctx.peek_kind() {
        TokenKind::KwTrue => true,
        TokenKind::KwFalse => false,
        _ => return None,
    };
    let token = ctx.peek().clone();
    let _ = parse_token_by_kind(ctx, token.kind);
    Some(Value::LiteralBool(ValueLiteralBool {
        id: NodeId::fresh(),
        source_range: token.source_range,
        value,
    }))
}

fn parse_value_symbol(ctx: &mut ParsingContext) -> Option<Value> {
    let token = parse_token_by_kind(ctx, TokenKind::Symbol)?;
    Some(Value::Symbol(ValueSymbol {
        id: NodeId::fresh(),
        source_range: token.source_range,
        name: token.value,
    }))
}

fn parse_value_parenthesized(ctx: &mut ParsingContext) -> Option<Value> {
    if parse_token_by_kind(ctx, TokenKind::LParen).is_none() {
        return None;
    }
    let Some(value) = parse_value(ctx) else {
        ctx.error_expected("a value");
        return None;
    };
    if parse_token_by_kind(ctx, TokenKind::RParen).is_none() {
        ctx.error_expected(")");
    }
    Some(value)
}

fn parse_value_term(ctx: &mut ParsingContext) -> Option<Value> {
    parse_any_of(
        ctx,
        &[
            &parse_value_literal_bool,
            &parse_value_literal_number,
            &parse_value_symbol,
            &parse_value_parenthesized,
        ],
    )
}

/// Entry point for the whole value grammar: the loosest-binding level.
pub fn parse_value(ctx: &mut ParsingContext) -> Option<Value> {
    parse_value_assignments(ctx)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::MessageContext;
    use crate::source::Source;

    fn parse(text: &str) -> (Option<Value>, MessageContext) {
        let source = Source::in_memory(text);
        let mut messages = MessageContext::new();
        let tokens = crate::lexer::lex(&mut messages, &source);
        let value = {
            let mut ctx = ParsingContext::new(&tokens, &mut messages);
            parse_value(&mut ctx)
        };
        (value, messages)
    }

    #[test]
    fn parses_a_bare_literal() {
        let (value, messages) = parse("42");
        assert!(matches!(value, Some(Value::LiteralNumber(_))));
        assert!(messages.is_empty());
    }

    #[test]
    fn additive_operators_are_right_associative() {
        // a - b - c must parse as a - (b - c), not (a - b) - c.
        let (value, _messages) = parse("a - b - c");
        match value {
            Some(Value::Binary(outer)) => {
                assert_eq!(outer.op, BinaryValueOp::Sub);
                assert!(matches!(&*outer.lhs, Value::Symbol(s) if s.name == "a"));
                match &outer.rhs {
                    BinaryRhs::Value(v) => {
                        assert!(matches!(&**v, Value::Binary(inner) if inner.op == BinaryValueOp::Sub))
                    }
                    other => panic!("expected a value rhs, got {:?}", other),
                }
            }
            other => panic!("expected subtraction, got {:?}", other),
        }
    }

    #[test]
    fn assignment_is_right_associative() {
        let (value, _messages) = parse("a = b = c");
        match value {
            Some(Value::Binary(outer)) => {
                assert_eq!(outer.op, BinaryValueOp::Assign);
                assert!(matches!(&*outer.lhs, Value::Symbol(s) if s.name == "a"));
                match outer.rhs {
                    BinaryRhs::Value(inner) => match *inner {
                        Value::Binary(inner) => assert_eq!(inner.op, BinaryValueOp::Assign),
                        other => panic!("expected nested assignment, got {:?}", other),
                    },
                    other => panic!("expected a value rhs, got {:?}", other),
                }
            }
            other => panic!("expected assignment, got {:?}", other),
        }
    }

    #[test]
    fn member_access_binds_tighter_than_call() {
        let (value, messages) = parse("k.l()");
        match value {
            Some(Value::Call(call)) => {
                assert!(matches!(&*call.callee, Value::Binary(b) if b.op == BinaryValueOp::MemberAccess));
            }
            other => panic!("expected a call wrapping member access, got {:?}", other),
        }
        assert!(messages.is_empty());
    }

    #[test]
    fn cast_has_lower_precedence_than_boolean_or() {
        let (value, _messages) = parse("a || b as i32");
        match value {
            Some(Value::Cast(cast)) => {
                assert!(matches!(&*cast.value, Value::Binary(b) if b.op == BinaryValueOp::BoolOr));
            }
            other => panic!("expected a cast wrapping ||, got {:?}", other),
        }
    }

    #[test]
    fn unary_prefixes_chain() {
        let (value, _messages) = parse("!!a");
        match value {
            Some(Value::Unary(outer)) => {
                assert_eq!(outer.op, UnaryValueOp::BoolNot);
                assert!(matches!(&*outer.operand, Value::Unary(inner) if inner.op == UnaryValueOp::BoolNot));
            }
            other => panic!("expected double negation, got {:?}", other),
        }
    }

    #[test]
    fn parenthesized_value_overrides_precedence() {
        let (value, _messages) = parse("(a + b) * c");
        match value {
            Some(Value::Binary(outer)) => {
                assert_eq!(outer.op, BinaryValueOp::Mul);
                assert!(matches!(&*outer.lhs, Value::Binary(inner) if inner.op == BinaryValueOp::Add));
            }
            other => panic!("expected multiplication, got {:?}", other),
        }
    }

    #[test]
    fn full_precedence_ladder_groups_weakest_to_strongest() {
        // spec.md §8 scenario 6: assign binds weakest, then as, ||, &&, ==,
        // |, &, <<, +, *, **, unary *, call, member access.
        let (value, messages) =
            parse("a = b || c && d == e | f & g << h + i * j ** *k.l() as i32");
        assert!(messages.is_empty());

        let assign = match value {
            Some(Value::Binary(b)) if b.op == BinaryValueOp::Assign => b,
            other => panic!("expected assignment at the top, got {:?}", other),
        };
        assert!(matches!(&*assign.lhs, Value::Symbol(s) if s.name == "a"));

        let cast = match &assign.rhs {
            BinaryRhs::Value(v) => match &**v {
                Value::Cast(c) => c,
                other => panic!("expected a cast as assign's rhs, got {:?}", other),
            },
            other => panic!("expected a value rhs, got {:?}", other),
        };

        let bool_or = match &*cast.value {
            Value::Binary(b) if b.op == BinaryValueOp::BoolOr => b,
            other => panic!("expected || under the cast, got {:?}", other),
        };
        assert!(matches!(&*bool_or.lhs, Value::Symbol(s) if s.name == "b"));

        let bool_and = match &bool_or.rhs {
            BinaryRhs::Value(v) => match &**v {
                Value::Binary(b) if b.op == BinaryValueOp::BoolAnd => b,
                other => panic!("expected && under ||, got {:?}", other),
            },
            other => panic!("expected a value rhs, got {:?}", other),
        };
        assert!(matches!(&*bool_and.lhs, Value::Symbol(s) if s.name == "c"));

        let eq = match &bool_and.rhs {
            BinaryRhs::Value(v) => match &**v {
                Value::Binary(b) if b.op == BinaryValueOp::Eq => b,
                other => panic!("expected == under &&, got {:?}", other),
            },
            other => panic!("expected a value rhs, got {:?}", other),
        };
        assert!(matches!(&*eq.lhs, Value::Symbol(s) if s.name == "d"));

        let bit_or = match &eq.rhs {
            BinaryRhs::Value(v) => match &**v {
                Value::Binary(b) if b.op == BinaryValueOp::BitOr => b,
                other => panic!("expected | under ==, got {:?}", other),
            },
            other => panic!("expected a value rhs, got {:?}", other),
        };
        assert!(matches!(&*bit_or.lhs, Value::Symbol(s) if s.name == "e"));

        let bit_and = match &bit_or.rhs {
            BinaryRhs::Value(v) => match &**v {
                Value::Binary(b) if b.op == BinaryValueOp::BitAnd => b,
                other => panic!("expected & under |, got {:?}", other),
            },
            other => panic!("expected a value rhs, got {:?}", other),
        };
        assert!(matches!(&*bit_and.lhs, Value::Symbol(s) if s.name == "f"));

        let shl = match &bit_and.rhs {
            BinaryRhs::Value(v) => match &**v {
                Value::Binary(b) if b.op == BinaryValueOp::BitShl => b,
                other => panic!("expected << under &, got {:?}", other),
            },
            other => panic!("expected a value rhs, got {:?}", other),
        };
        assert!(matches!(&*shl.lhs, Value::Symbol(s) if s.name == "g"));

        let add = match &shl.rhs {
            BinaryRhs::Value(v) => match &**v {
                Value::Binary(b) if b.op == BinaryValueOp::Add => b,
                other => panic!("expected + under <<, got {:?}", other),
            },
            other => panic!("expected a value rhs, got {:?}", other),
        };
        assert!(matches!(&*add.lhs, Value::Symbol(s) if s.name == "h"));

        let mul = match &add.rhs {
            BinaryRhs::Value(v) => match &**v {
                Value::Binary(b) if b.op == BinaryValueOp::Mul => b,
                other => panic!("expected * under +, got {:?}", other),
            },
            other => panic!("expected a value rhs, got {:?}", other),
        };
        assert!(matches!(&*mul.lhs, Value::Symbol(s) if s.name == "i"));

        let exp = match &mul.rhs {
            BinaryRhs::Value(v) => match &**v {
                Value::Binary(b) if b.op == BinaryValueOp::Exp => b,
                other => panic!("expected ** under *, got {:?}", other),
            },
            other => panic!("expected a value rhs, got {:?}", other),
        };
        assert!(matches!(&*exp.lhs, Value::Symbol(s) if s.name == "j"));

        let deref = match &exp.rhs {
            BinaryRhs::Value(v) => match &**v {
                Value::Unary(u) if u.op == UnaryValueOp::Deref => u,
                other => panic!("expected unary * under **, got {:?}", other),
            },
            other => panic!("expected a value rhs, got {:?}", other),
        };

        let call = match &*deref.operand {
            Value::Call(c) => c,
            other => panic!("expected a call under unary *, got {:?}", other),
        };
        assert!(call.args.is_empty());
        match &*call.callee {
            Value::Binary(b) if b.op == BinaryValueOp::MemberAccess => {
                assert!(matches!(&*b.lhs, Value::Symbol(s) if s.name == "k"));
                match &b.rhs {
                    BinaryRhs::Symbol(s) => assert_eq!(s.name, "l"),
                    other => panic!("expected a symbol rhs for member access, got {:?}", other),
                }
            }
            other => panic!("expected k.l as the call's callee, got {:?}", other),
        }
    }
}
