//! Literal-number parsing (spec §4.3, "Literal numbers"; invariant 8).
//!
//! The lexeme is stripped in four steps — optional leading `-`, a type
//! suffix, a base prefix, then the remaining digits are parsed and
//! truncated to the declared width. Grounded on
//! `_strip_type_suffix_for_literal_number`/`_strip_base_for_literal_number`
//! /`parse_value_literal_number` in forge_parsers.cpp for the stripping
//! order and the default-suffix rule (`i32`, or `f64` if a `.` remains).
//!
//! Truncation differs from the original deliberately: the original's
//! overflow handling only catches `std::out_of_range` from `std::stoll`/
//! `std::stoull` (and its own comment flags this as "not quite accurate").
//! Spec invariant 8 requires the stored value to be the *exact* modular
//! reduction (unsigned) or sign-extended two's-complement truncation
//! (signed) of the mathematical value, with a warning iff that reduction
//! changes the value. Parsing the full magnitude into an `i128` first and
//! then using Rust's `as` truncation between integer widths gives exactly
//! that semantics for free, so this is what's implemented here rather than
//! the original's approximate out-of-range catch.

use crate::ast::types::{BitWidth, BitWidthTypeKind};
use crate::ast::{NodeId, NumberScalar, TypeWithBitWidth, Value, ValueLiteralNumber};
use crate::combinators::{parse_token_by_kind, ParsingContext};
use crate::token::TokenKind;

struct SuffixType {
    kind: BitWidthTypeKind,
    bit_width: BitWidth,
}

fn strip_negative_sign(value: &mut String) -> bool {
    if let Some(rest) = value.strip_prefix('-') {
        *value = rest.to_string();
        true
    } else {
        false
    }
}

fn strip_type_suffix(value: &mut String) -> SuffixType {
    const INT_SUFFIXES: &[(&str, BitWidthTypeKind, BitWidth)] = &[
        ("i8", BitWidthTypeKind::SignedInt, BitWidth::W8),
        ("i16", BitWidthTypeKind::SignedInt, BitWidth::W16),
        ("i32", BitWidthTypeKind::SignedInt, BitWidth::W32),
        ("i64", BitWidthTypeKind::SignedInt, BitWidth::W64),
        ("u8", BitWidthTypeKind::UnsignedInt, BitWidth::W8),
        ("u16", BitWidthTypeKind::UnsignedInt, BitWidth::W16),
        ("u32", BitWidthTypeKind::UnsignedInt, BitWidth::W32),
        ("u64", BitWidthTypeKind::UnsignedInt, BitWidth::W64),
        ("f32", BitWidthTypeKind::Float, BitWidth::W32),
        ("f64", BitWidthTypeKind::Float, BitWidth::W64),
    ];
    for (suffix, kind, bit_width) in INT_SUFFIXES {
        if let Some(stripped) = value.strip_suffix(suffix) {
            *value = stripped.to_string();
            return SuffixType {
                kind: *kind,
                bit_width: *bit_width,
            };
        }
    }
    if value.contains('.') {
        SuffixType {
            kind: BitWidthTypeKind::Float,
            bit_width: BitWidth::W64,
        }
    } else {
        SuffixType {
            kind: BitWidthTypeKind::SignedInt,
            bit_width: BitWidth::W32,
        }
    }
}

fn strip_base_prefix(value: &mut String) -> u32 {
    if let Some(rest) = value.strip_prefix("0x").or_else(|| value.strip_prefix("0X")) {
        *value = rest.to_string();
        16
    } else if let Some(rest) = value.strip_prefix("0b").or_else(|| value.strip_prefix("0B")) {
        *value = rest.to_string();
        2
    } else if let Some(rest) = value.strip_prefix("0o").or_else(|| value.strip_prefix("0O")) {
        *value = rest.to_string();
        8
    } else {
        10
    }
}

fn truncate_signed(magnitude: i128, bit_width: BitWidth) -> (NumberScalar, bool, i128) {
    match bit_width {
        BitWidth::W8 => {
            let truncated = magnitude as i8;
            (NumberScalar::I8(truncated), truncated as i128 != magnitude, truncated as i128)
        }
        BitWidth::W16 => {
            let truncated = magnitude as i16;
            (NumberScalar::I16(truncated), truncated as i128 != magnitude, truncated as i128)
        }
        BitWidth::W32 => {
            let truncated = magnitude as i32;
            (NumberScalar::I32(truncated), truncated as i128 != magnitude, truncated as i128)
        }
        BitWidth::W64 => {
            let truncated = magnitude as i64;
            (NumberScalar::I64(truncated), truncated as i128 != magnitude, truncated as i128)
        }
    }
}

fn truncate_unsigned(magnitude: i128, bit_width: BitWidth) -> (NumberScalar, bool, i128) {
    match bit_width {
        BitWidth::W8 => {
            let truncated = magnitude as u8;
            (NumberScalar::U8(truncated), truncated as i128 != magnitude, truncated as i128)
        }
        BitWidth::W16 => {
            let truncated = magnitude as u16;
            (NumberScalar::U16(truncated), truncated as i128 != magnitude, truncated as i128)
        }
        BitWidth::W32 => {
            let truncated = magnitude as u32;
            (NumberScalar::U32(truncated), truncated as i128 != magnitude, truncated as i128)
        }
        BitWidth::W64 => {
            let truncated = magnitude as u64;
            (NumberScalar::U64(truncated), truncated as i128 != magnitude, truncated as i128)
        }
    }
}

pub fn parse_value_literal_number(ctx: &mut ParsingContext) -> Option<Value> {
    let token = parse_token_by_kind(ctx, TokenKind::LiteralNumber)?;
    let mut remaining = token.value.clone();

    let is_negative = strip_negative_sign(&mut remaining);
    let suffix = strip_type_suffix(&mut remaining);
    let base = strip_base_prefix(&mut remaining);

    match suffix.kind {
        BitWidthTypeKind::Float => {
            let Ok(mut parsed) = remaining.parse::<f64>() else {
                ctx.messages.error(token.source_range, "invalid number literal");
                return None;
            };
            if is_negative {
                parsed = -parsed;
            }
            let scalar = if suffix.bit_width == BitWidth::W32 {
                NumberScalar::F32(parsed as f32)
            } else {
                NumberScalar::F64(parsed)
            };
            Some(Value::LiteralNumber(ValueLiteralNumber {
                id: NodeId::fresh(),
                source_range: token.source_range,
                ty: TypeWithBitWidth {
                    id: NodeId::fresh(),
                    source_range: token.source_range,
                    is_const: false,
                    kind: BitWidthTypeKind::Float,
                    bit_width: suffix.bit_width,
                },
                scalar,
            }))
        }
        BitWidthTypeKind::UnsignedInt => {
            if is_negative {
                ctx.messages
                    .error(token.source_range, "negative value is not valid for an unsigned literal");
                return None;
            }
            let Ok(magnitude) = i128::from_str_radix(&remaining, base) else {
                ctx.messages.error(token.source_range, "invalid number literal");
                return None;
            };
            let (scalar, truncated, new_value) = truncate_unsigned(magnitude, suffix.bit_width);
            if truncated {
                ctx.messages.warning(
                    token.source_range,
                    format!(
                        "number literal {} does not fit in {:?}, truncated to {}",
                        magnitude, suffix.bit_width, new_value
                    ),
                );
            }
            Some(Value::LiteralNumber(ValueLiteralNumber {
                id: NodeId::fresh(),
                source_range: token.source_range,
                ty: TypeWithBitWidth {
                    id: NodeId::fresh(),
                    source_range: token.source_range,
                    is_const: false,
                    kind: BitWidthTypeKind::UnsignedInt,
                    bit_width: suffix.bit_width,
                },
                scalar,
            }))
        }
        BitWidthTypeKind::SignedInt => {
            let Ok(mut magnitude) = i128::from_str_radix(&remaining, base) else {
                ctx.messages.error(token.source_range, "invalid number literal");
                return None;
            };
            if is_negative {
                magnitude = -magnitude;
            }
            let (scalar, truncated, new_value) = truncate_signed(magnitude, suffix.bit_width);
            if truncated {
                ctx.messages.warning(
                    token.source_range,
                    format!(
                        "number literal {} does not fit in {:?}, truncated to {}",
                        magnitude, suffix.bit_width, new_value
                    ),
                );
            }
            Some(Value::LiteralNumber(ValueLiteralNumber {
                id: NodeId::fresh(),
                source_range: token.source_range,
                ty: TypeWithBitWidth {
                    id: NodeId::fresh(),
                    source_range: token.source_range,
                    is_const: false,
                    kind: BitWidthTypeKind::SignedInt,
                    bit_width: suffix.bit_width,
                },
                scalar,
            }))
        }
    }
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
            parse_value_literal_number(&mut ctx)
        };
        (value, messages)
    }

    #[test]
    fn defaults_to_i32_with_no_suffix() {
        let (value, messages) = parse("42");
        match value {
            Some(Value::LiteralNumber(n)) => assert_eq!(n.scalar, NumberScalar::I32(42)),
            other => panic!("expected i32 literal, got {:?}", other),
        }
        assert!(messages.is_empty());
    }

    #[test]
    fn defaults_to_f64_when_it_contains_a_dot() {
        let (value, _messages) = parse("3.5");
        match value {
            Some(Value::LiteralNumber(n)) => assert_eq!(n.scalar, NumberScalar::F64(3.5)),
            other => panic!("expected f64 literal, got {:?}", other),
        }
    }

    #[test]
    fn parses_hex_with_explicit_suffix() {
        let (value, messages) = parse("0xffu8");
        match value {
            Some(Value::LiteralNumber(n)) => assert_eq!(n.scalar, NumberScalar::U8(0xff)),
            other => panic!("expected u8 literal, got {:?}", other),
        }
        assert!(messages.is_empty());
    }

    #[test]
    fn warns_on_truncation_with_the_modular_value() {
        let (value, messages) = parse("300u8");
        match value {
            Some(Value::LiteralNumber(n)) => assert_eq!(n.scalar, NumberScalar::U8(44)),
            other => panic!("expected truncated u8 literal, got {:?}", other),
        }
        assert!(!messages.is_empty());
        assert!(!messages.has_failed());
    }

    #[test]
    fn negative_unsigned_literal_is_an_error() {
        let (value, messages) = parse("-1u8");
        assert!(value.is_none());
        assert!(messages.has_failed());
    }
}
