//! Structural comparison (spec §3's Comparator operation).
//!
//! Compares kind and scalar fields, recurses into child slots, treats
//! `None == None`; never compares `id` or `source_range`, since two ASTs
//! parsed from differently-formatted but semantically identical source
//! should compare equal. Implemented as a standalone `structural_eq`
//! rather than `impl PartialEq`, since a derived or hand-rolled `PartialEq`
//! would be expected to include every field (including `id`), which is
//! exactly the comparison this operation must not do.

use super::declarations::*;
use super::statements::*;
use super::types::*;
use super::values::*;
use super::TranslationUnit;

pub fn translation_units_eq(a: &TranslationUnit, b: &TranslationUnit) -> bool {
    slices_eq(&a.declarations, &b.declarations, declarations_eq)
}

fn slices_eq<T>(a: &[T], b: &[T], eq: impl Fn(&T, &T) -> bool) -> bool {
    a.len() == b.len() && a.iter().zip(b).all(|(x, y)| eq(x, y))
}

fn options_eq<T>(a: &Option<T>, b: &Option<T>, eq: impl Fn(&T, &T) -> bool) -> bool {
    match (a, b) {
        (None, None) => true,
        (Some(x), Some(y)) => eq(x, y),
        _ => false,
    }
}

pub fn types_eq(a: &Type, b: &Type) -> bool {
    match (a, b) {
        (Type::Basic(x), Type::Basic(y)) => x.is_const == y.is_const && x.kind == y.kind,
        (Type::WithBitWidth(x), Type::WithBitWidth(y)) => {
            x.is_const == y.is_const && x.kind == y.kind && x.bit_width == y.bit_width
        }
        (Type::Symbol(x), Type::Symbol(y)) => x.is_const == y.is_const && x.name == y.name,
        (Type::Unary(x), Type::Unary(y)) => {
            x.is_const == y.is_const && x.kind == y.kind && types_eq(&x.operand, &y.operand)
        }
        (Type::Function(x), Type::Function(y)) => {
            x.is_const == y.is_const
                && types_eq(&x.return_type, &y.return_type)
                && slices_eq(&x.arg_types, &y.arg_types, types_eq)
        }
        (Type::Structured(x), Type::Structured(y)) => {
            x.is_const == y.is_const && slices_eq(&x.members, &y.members, declarations_eq)
        }
        _ => false,
    }
}

pub fn values_eq(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::LiteralBool(x), Value::LiteralBool(y)) => x.value == y.value,
        (Value::LiteralNumber(x), Value::LiteralNumber(y)) => {
            x.ty.kind == y.ty.kind && x.ty.bit_width == y.ty.bit_width && x.scalar == y.scalar
        }
        (Value::Symbol(x), Value::Symbol(y)) => x.name == y.name,
        (Value::Unary(x), Value::Unary(y)) => x.op == y.op && values_eq(&x.operand, &y.operand),
        (Value::Binary(x), Value::Binary(y)) => {
            x.op == y.op && values_eq(&x.lhs, &y.lhs) && binary_rhs_eq(&x.rhs, &y.rhs)
        }
        (Value::Call(x), Value::Call(y)) => {
            values_eq(&x.callee, &y.callee) && slices_eq(&x.args, &y.args, values_eq)
        }
        (Value::Cast(x), Value::Cast(y)) => values_eq(&x.value, &y.value) && types_eq(&x.ty, &y.ty),
        _ => false,
    }
}

fn binary_rhs_eq(a: &BinaryRhs, b: &BinaryRhs) -> bool {
    match (a, b) {
        (BinaryRhs::Value(x), BinaryRhs::Value(y)) => values_eq(x, y),
        (BinaryRhs::Symbol(x), BinaryRhs::Symbol(y)) => x.name == y.name,
        _ => false,
    }
}

pub fn statements_eq(a: &Statement, b: &Statement) -> bool {
    match (a, b) {
        (Statement::Basic(x), Statement::Basic(y)) => x.kind == y.kind,
        (Statement::Value(x), Statement::Value(y)) => {
            x.kind == y.kind && values_eq(&x.value, &y.value)
        }
        (Statement::If(x), Statement::If(y)) => statement_ifs_eq(x, y),
        (Statement::While(x), Statement::While(y)) => {
            x.is_do_while == y.is_do_while
                && values_eq(&x.condition, &y.condition)
                && statement_blocks_eq(&x.body, &y.body)
        }
        (Statement::Block(x), Statement::Block(y)) => statement_blocks_eq(x, y),
        (Statement::Declaration(x), Statement::Declaration(y)) => declarations_eq(&x.decl, &y.decl),
        _ => false,
    }
}

fn else_branches_eq(a: &ElseBranch, b: &ElseBranch) -> bool {
    match (a, b) {
        (ElseBranch::If(x), ElseBranch::If(y)) => statement_ifs_eq(x, y),
        (ElseBranch::Block(x), ElseBranch::Block(y)) => statement_blocks_eq(x, y),
        _ => false,
    }
}

fn statement_ifs_eq(a: &StatementIf, b: &StatementIf) -> bool {
    values_eq(&a.condition, &b.condition)
        && statement_blocks_eq(&a.then_block, &b.then_block)
        && options_eq(&a.else_branch, &b.else_branch, else_branches_eq)
}

fn statement_blocks_eq(a: &StatementBlock, b: &StatementBlock) -> bool {
    slices_eq(&a.statements, &b.statements, statements_eq)
}

fn declaration_variables_eq(a: &DeclarationVariable, b: &DeclarationVariable) -> bool {
    a.name == b.name
        && a.is_const == b.is_const
        && options_eq(&a.ty, &b.ty, types_eq)
        && options_eq(&a.initial_value, &b.initial_value, values_eq)
}

pub fn declarations_eq(a: &Declaration, b: &Declaration) -> bool {
    match (a, b) {
        (Declaration::Variable(x), Declaration::Variable(y)) => declaration_variables_eq(x, y),
        (Declaration::Function(x), Declaration::Function(y)) => {
            x.name == y.name
                && slices_eq(&x.args, &y.args, declaration_variables_eq)
                && options_eq(&x.return_type, &y.return_type, types_eq)
                && options_eq(&x.body, &y.body, statement_blocks_eq)
        }
        (Declaration::TypeAlias(x), Declaration::TypeAlias(y)) => {
            x.name == y.name && x.is_explicit == y.is_explicit && types_eq(&x.ty, &y.ty)
        }
        (Declaration::StructuredType(x), Declaration::StructuredType(y)) => {
            x.name == y.name
                && x.kind == y.kind
                && slices_eq(&x.members, &y.members, declarations_eq)
                && slices_eq(&x.inherits, &y.inherits, |p, q| {
                    p.is_const == q.is_const && p.name == q.name
                })
        }
        (Declaration::Namespace(x), Declaration::Namespace(y)) => {
            x.name == y.name && slices_eq(&x.members, &y.members, declarations_eq)
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::SourceRange;

    fn bool_literal(value: bool) -> Value {
        Value::LiteralBool(ValueLiteralBool {
            id: crate::ast::NodeId::fresh(),
            source_range: SourceRange::synthetic(),
            value,
        })
    }

    #[test]
    fn equal_values_ignore_source_range_and_id() {
        let a = bool_literal(true);
        let b = bool_literal(true);
        assert!(values_eq(&a, &b));
    }

    #[test]
    fn differing_scalars_are_unequal() {
        assert!(!values_eq(&bool_literal(true), &bool_literal(false)));
    }

    #[test]
    fn deep_clone_is_structurally_equal_to_original() {
        let original = bool_literal(true);
        let cloned = original.deep_clone();
        assert_ne!(original.id(), cloned.id());
        assert!(values_eq(&original, &cloned));
    }
}
