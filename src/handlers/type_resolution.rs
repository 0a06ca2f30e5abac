//! Type resolution (spec §4.9, first half): assign a `resolved_type` to
//! every value node.
//!
//! Implemented as `on_leave` hooks rather than `on_enter`: an operator's
//! result type is computed from its operands' already-resolved types, which
//! only exist once the operands (the node's children) have themselves been
//! visited — the natural order for that is bottom-up, post-order.

use crate::ast::{
    BinaryRhs, BinaryValueOp, Type, TypeUnary, TypeUnaryKind, UnaryValueOp, ValueBinary,
    ValueCall, ValueCast, ValueLiteralBool, ValueLiteralNumber, ValueSymbol, ValueUnary,
};
use crate::ast::{BasicTypeKind, NodeId, TypeBasic};
use crate::message::MessageContext;
use crate::pass::{self, Annotations, Handler, Input, Output};
use crate::source::SourceRange;

pub fn resolve_types(unit: &crate::ast::TranslationUnit, messages: &mut MessageContext, annotations: &mut Annotations) {
    let mut handler = TypeResolutionHandler;
    pass::run_pass(unit, &mut handler, messages, annotations);
}

struct TypeResolutionHandler;

fn bool_type(source_range: SourceRange) -> Type {
    Type::Basic(TypeBasic {
        id: NodeId::fresh(),
        source_range,
        is_const: false,
        kind: BasicTypeKind::Bool,
    })
}

/// Normalizes a value's resolved type down to the declaration backing a
/// structured-type member list, whether it was named through a `TypeSymbol`
/// or (rarer) written inline as a `TypeStructured` literal.
fn structured_type_decl_id(ty: &Type, annotations: &Annotations) -> Option<NodeId> {
    match ty {
        Type::Symbol(symbol) => annotations.resolved_decl(symbol.id),
        _ => None,
    }
}

fn resolve_member_access(node: &ValueBinary, rhs: &ValueSymbol, messages: &mut MessageContext, annotations: &mut Annotations) {
    let Some(lhs_type) = annotations.resolved_type(node.lhs.id()).cloned() else {
        return;
    };
    let Some(struct_decl_id) = structured_type_decl_id(&lhs_type, annotations) else {
        return;
    };
    let Some(members) = annotations.struct_members(struct_decl_id) else {
        return;
    };
    let Some(&(_, member_id)) = members.iter().find(|(name, _)| name == &rhs.name) else {
        messages.error(rhs.source_range, format!("no member named '{}'", rhs.name));
        return;
    };
    if let Some(summary) = annotations.decl_summary(member_id) {
        if let Some(ty) = summary.ty.clone() {
            annotations.set_resolved_type(node.id, ty);
        }
    }
}

impl Handler for TypeResolutionHandler {
    fn on_leave_value_literal_bool(&mut self, input: &mut Input<ValueLiteralBool>) -> Output<ValueLiteralBool> {
        input.annotations.set_resolved_type(input.node.id, bool_type(input.node.source_range));
        Output::Continue
    }

    fn on_leave_value_literal_number(&mut self, input: &mut Input<ValueLiteralNumber>) -> Output<ValueLiteralNumber> {
        input
            .annotations
            .set_resolved_type(input.node.id, Type::WithBitWidth(input.node.ty.deep_clone()));
        Output::Continue
    }

    fn on_leave_value_symbol(&mut self, input: &mut Input<ValueSymbol>) -> Output<ValueSymbol> {
        if let Some(decl_id) = input.annotations.resolved_decl(input.node.id) {
            if let Some(summary) = input.annotations.decl_summary(decl_id) {
                if let Some(ty) = summary.ty.clone() {
                    input.annotations.set_resolved_type(input.node.id, ty);
                }
            }
        }
        Output::Continue
    }

    fn on_leave_value_unary(&mut self, input: &mut Input<ValueUnary>) -> Output<ValueUnary> {
        let operand_type = input.annotations.resolved_type(input.node.operand.id()).cloned();
        let resolved = match input.node.op {
            UnaryValueOp::Neg | UnaryValueOp::Pos | UnaryValueOp::BitNot => operand_type,
            UnaryValueOp::BoolNot => Some(bool_type(input.node.source_range)),
            UnaryValueOp::Deref => operand_type.and_then(|ty| match ty {
                Type::Unary(TypeUnary { operand, .. }) => Some(*operand),
                _ => None,
            }),
            UnaryValueOp::GetAddr => operand_type.map(|ty| {
                Type::Unary(TypeUnary {
                    id: NodeId::fresh(),
                    source_range: input.node.source_range,
                    is_const: false,
                    kind: TypeUnaryKind::Pointer,
                    operand: Box::new(ty),
                })
            }),
        };
        if let Some(ty) = resolved {
            input.annotations.set_resolved_type(input.node.id, ty);
        }
        Output::Continue
    }

    fn on_leave_value_binary(&mut self, input: &mut Input<ValueBinary>) -> Output<ValueBinary> {
        if input.node.op == BinaryValueOp::MemberAccess {
            if let BinaryRhs::Symbol(rhs) = &input.node.rhs {
                resolve_member_access(input.node, rhs, input.messages, input.annotations);
            }
            return Output::Continue;
        }

        let lhs_type = input.annotations.resolved_type(input.node.lhs.id()).cloned();
        let rhs_type = match &input.node.rhs {
            BinaryRhs::Value(v) => input.annotations.resolved_type(v.id()).cloned(),
            BinaryRhs::Symbol(_) => None,
        };

        let resolved = if matches!(
            input.node.op,
            BinaryValueOp::Eq
                | BinaryValueOp::Ne
                | BinaryValueOp::Lt
                | BinaryValueOp::Le
                | BinaryValueOp::Gt
                | BinaryValueOp::Ge
                | BinaryValueOp::BoolAnd
                | BinaryValueOp::BoolOr
        ) {
            Some(bool_type(input.node.source_range))
        } else if input.node.op.is_assignment() {
            lhs_type
        } else {
            lhs_type.or(rhs_type)
        };

        if let Some(ty) = resolved {
            input.annotations.set_resolved_type(input.node.id, ty);
        }
        Output::Continue
    }

    fn on_leave_value_call(&mut self, input: &mut Input<ValueCall>) -> Output<ValueCall> {
        let callee_type = input.annotations.resolved_type(input.node.callee.id()).cloned();
        if let Some(Type::Function(function)) = callee_type {
            input.annotations.set_resolved_type(input.node.id, function.return_type.deep_clone());
        }
        Output::Continue
    }

    fn on_leave_value_cast(&mut self, input: &mut Input<ValueCast>) -> Output<ValueCast> {
        input.annotations.set_resolved_type(input.node.id, input.node.ty.deep_clone());
        Output::Continue
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{Declaration, Statement};
    use crate::combinators::ParsingContext;
    use crate::handlers::symbols::resolve_symbols;
    use crate::source::Source;

    fn resolve(text: &str) -> (crate::ast::TranslationUnit, Annotations) {
        let source = Source::in_memory(text);
        let mut messages = MessageContext::new();
        let tokens = crate::lexer::lex(&mut messages, &source);
        let unit = {
            let mut ctx = ParsingContext::new(&tokens, &mut messages);
            crate::forge::parse_translation_unit(&mut ctx)
        };
        let mut annotations = Annotations::new();
        resolve_symbols(&unit, &mut messages, &mut annotations);
        resolve_types(&unit, &mut messages, &mut annotations);
        (unit, annotations)
    }

    #[test]
    fn a_bool_literal_resolves_to_bool() {
        let (unit, annotations) = resolve("func f() { true; }");
        let body = match &unit.declarations[0] {
            Declaration::Function(f) => f.body.as_ref().unwrap(),
            _ => unreachable!(),
        };
        let Statement::Value(statement) = &body.statements[0] else { unreachable!() };
        assert!(matches!(
            annotations.resolved_type(statement.value.id()),
            Some(Type::Basic(_))
        ));
    }

    #[test]
    fn a_variable_reference_resolves_to_its_declared_type() {
        let (unit, annotations) = resolve("func f() { let x: i32 = 1; x; }");
        let body = match &unit.declarations[0] {
            Declaration::Function(f) => f.body.as_ref().unwrap(),
            _ => unreachable!(),
        };
        let Statement::Value(statement) = &body.statements[1] else { unreachable!() };
        assert!(matches!(
            annotations.resolved_type(statement.value.id()),
            Some(Type::WithBitWidth(_))
        ));
    }
}
