//! Type validation (spec §4.9, second half): reject operand and argument
//! type mismatches once every value already carries a `resolved_type`.
//!
//! A separate pass from [`crate::handlers::type_resolution`] rather than
//! folded into it: resolution always produces *a* type (or none, if an
//! earlier error already broke the chain), while validation is the one
//! pass allowed to refuse the program outright, and keeping "compute" and
//! "reject" apart means a later pass can still read every resolved type
//! even on an ill-typed program.

use crate::ast::visitor::NodeRef;
use crate::ast::{
    BinaryValueOp, BasicTypeKind, Declaration, StatementIf, StatementValue, StatementWhile, Type,
    TypeUnaryKind, UnaryValueOp, ValueBinary, ValueCall, ValueCast, ValueStatementKind, ValueUnary,
};
use crate::message::MessageContext;
use crate::pass::{self, Annotations, Handler, Input, Output};

pub fn validate_types(unit: &crate::ast::TranslationUnit, messages: &mut MessageContext, annotations: &mut Annotations) {
    let mut handler = TypeValidationHandler;
    pass::run_pass(unit, &mut handler, messages, annotations);
}

struct TypeValidationHandler;

fn is_bool(ty: &Type) -> bool {
    matches!(ty, Type::Basic(n) if n.kind == BasicTypeKind::Bool)
}

fn is_numeric(ty: &Type) -> bool {
    matches!(ty, Type::WithBitWidth(_))
}

fn is_pointer(ty: &Type) -> bool {
    matches!(ty, Type::Unary(n) if n.kind == TypeUnaryKind::Pointer)
}

fn implicit_void(source_range: crate::source::SourceRange) -> Type {
    Type::Basic(crate::ast::TypeBasic {
        id: crate::ast::NodeId::fresh(),
        source_range,
        is_const: false,
        kind: BasicTypeKind::Void,
    })
}

fn enclosing_function<'a>(parent_stack: &[NodeRef<'a>]) -> Option<&'a crate::ast::DeclarationFunction> {
    parent_stack.iter().rev().find_map(|node| match node {
        NodeRef::Declaration(Declaration::Function(f)) => Some(*f),
        _ => None,
    })
}

fn check_condition(condition_type: Option<&Type>, source_range: crate::source::SourceRange, messages: &mut MessageContext) {
    match condition_type {
        Some(ty) if is_bool(ty) => {}
        Some(_) => messages.error(source_range, "condition must be of type bool"),
        None => {}
    }
}

impl Handler for TypeValidationHandler {
    fn on_leave_statement_if(&mut self, input: &mut Input<StatementIf>) -> Output<StatementIf> {
        let ty = input.annotations.resolved_type(input.node.condition.id()).cloned();
        check_condition(ty.as_ref(), input.node.condition.source_range(), input.messages);
        Output::Continue
    }

    fn on_leave_statement_while(&mut self, input: &mut Input<StatementWhile>) -> Output<StatementWhile> {
        let ty = input.annotations.resolved_type(input.node.condition.id()).cloned();
        check_condition(ty.as_ref(), input.node.condition.source_range(), input.messages);
        Output::Continue
    }

    fn on_leave_statement_value(&mut self, input: &mut Input<StatementValue>) -> Output<StatementValue> {
        if input.node.kind != ValueStatementKind::Return {
            return Output::Continue;
        }
        let Some(function) = enclosing_function(input.parent_stack) else {
            return Output::Continue;
        };
        let Some(value_type) = input.annotations.resolved_type(input.node.value.id()).cloned() else {
            return Output::Continue;
        };
        let expected = function.return_type.as_ref().map_or_else(
            || implicit_void(input.node.source_range),
            |ty| ty.deep_clone(),
        );
        if !crate::ast::compare::types_eq(&value_type, &expected) {
            input.messages.error(input.node.source_range, "returned value does not match the function's return type");
        }
        Output::Continue
    }

    fn on_leave_value_binary(&mut self, input: &mut Input<ValueBinary>) -> Output<ValueBinary> {
        use BinaryValueOp::*;
        if input.node.op == MemberAccess {
            return Output::Continue;
        }
        let lhs_type = input.annotations.resolved_type(input.node.lhs.id()).cloned();
        let rhs_type = match &input.node.rhs {
            crate::ast::BinaryRhs::Value(v) => input.annotations.resolved_type(v.id()).cloned(),
            crate::ast::BinaryRhs::Symbol(_) => None,
        };
        let (Some(lhs_type), Some(rhs_type)) = (lhs_type, rhs_type) else {
            return Output::Continue;
        };

        match input.node.op {
            Add | Sub | Mul | Div | Mod | Exp | BitAnd | BitOr | BitXor | BitShl | BitShr => {
                if !is_numeric(&lhs_type) || !is_numeric(&rhs_type) {
                    input.messages.error(input.node.source_range, "arithmetic operands must be numeric");
                } else if !crate::ast::compare::types_eq(&lhs_type, &rhs_type) {
                    input.messages.error(input.node.source_range, "arithmetic operands must be of the same type");
                }
            }
            BoolAnd | BoolOr => {
                if !is_bool(&lhs_type) || !is_bool(&rhs_type) {
                    input.messages.error(input.node.source_range, "boolean operands must be of type bool");
                }
            }
            Eq | Ne | Lt | Le | Gt | Ge => {
                if !crate::ast::compare::types_eq(&lhs_type, &rhs_type) {
                    input.messages.error(input.node.source_range, "comparison operands must be of the same type");
                }
            }
            Assign | AddAssign | SubAssign | MulAssign | DivAssign | ModAssign | ExpAssign
            | BitAndAssign | BitOrAssign | BitXorAssign | ShlAssign | ShrAssign => {
                if !crate::ast::compare::types_eq(&lhs_type, &rhs_type) {
                    input.messages.error(input.node.source_range, "cannot assign a value of a different type");
                }
            }
            MemberAccess => unreachable!(),
        }
        Output::Continue
    }

    fn on_leave_value_unary(&mut self, input: &mut Input<ValueUnary>) -> Output<ValueUnary> {
        let Some(operand_type) = input.annotations.resolved_type(input.node.operand.id()).cloned() else {
            return Output::Continue;
        };
        match input.node.op {
            UnaryValueOp::Neg | UnaryValueOp::Pos | UnaryValueOp::BitNot => {
                if !is_numeric(&operand_type) {
                    input.messages.error(input.node.source_range, "unary operand must be numeric");
                }
            }
            UnaryValueOp::BoolNot => {
                if !is_bool(&operand_type) {
                    input.messages.error(input.node.source_range, "unary ! operand must be of type bool");
                }
            }
            UnaryValueOp::Deref | UnaryValueOp::GetAddr => {}
        }
        Output::Continue
    }

    fn on_leave_value_call(&mut self, input: &mut Input<ValueCall>) -> Output<ValueCall> {
        let Some(Type::Function(function)) = input.annotations.resolved_type(input.node.callee.id()).cloned() else {
            return Output::Continue;
        };
        if input.node.args.len() != function.arg_types.len() {
            input.messages.error(
                input.node.source_range,
                format!(
                    "expected {} argument(s), found {}",
                    function.arg_types.len(),
                    input.node.args.len()
                ),
            );
            return Output::Continue;
        }
        for (arg, expected) in input.node.args.iter().zip(function.arg_types.iter()) {
            if let Some(arg_type) = input.annotations.resolved_type(arg.id()) {
                if !crate::ast::compare::types_eq(arg_type, expected) {
                    input.messages.error(arg.source_range(), "argument type does not match the parameter's type");
                }
            }
        }
        Output::Continue
    }

    fn on_leave_value_cast(&mut self, input: &mut Input<ValueCast>) -> Output<ValueCast> {
        let Some(source_type) = input.annotations.resolved_type(input.node.value.id()) else {
            return Output::Continue;
        };
        let source_ok = is_numeric(source_type) || is_pointer(source_type) || is_bool(source_type);
        let target_ok = is_numeric(&input.node.ty) || is_pointer(&input.node.ty) || is_bool(&input.node.ty);
        if !source_ok || !target_ok {
            input.messages.error(input.node.source_range, "casts are only supported between numeric, pointer, and bool types");
        }
        Output::Continue
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combinators::ParsingContext;
    use crate::handlers::symbols::resolve_symbols;
    use crate::handlers::type_resolution::resolve_types;
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
        resolve_symbols(&unit, &mut messages, &mut annotations);
        resolve_types(&unit, &mut messages, &mut annotations);
        validate_types(&unit, &mut messages, &mut annotations);
        messages
    }

    #[test]
    fn adding_two_matching_integers_is_well_typed() {
        assert!(!check("func f() { let x: i32 = 1; let y: i32 = 2; x + y; }").has_failed());
    }

    #[test]
    fn a_non_bool_while_condition_is_rejected() {
        assert!(check("func f() { let x: i32 = 1; while x { } }").has_failed());
    }

    #[test]
    fn calling_with_the_wrong_argument_count_is_rejected() {
        assert!(check("func f(a: i32) { } func g() { f(); }").has_failed());
    }

    #[test]
    fn returning_a_bool_from_an_i32_function_is_rejected() {
        assert!(check("func f() -> i32 { return true; }").has_failed());
    }

    #[test]
    fn negating_a_bool_is_rejected() {
        assert!(check("func f() { let x: bool = true; -x; }").has_failed());
    }

    #[test]
    fn boolean_notting_an_integer_is_rejected() {
        assert!(check("func f() { let y: i32 = 1; !y; }").has_failed());
    }

    #[test]
    fn negating_an_integer_is_well_typed() {
        assert!(!check("func f() { let x: i32 = 1; -x; }").has_failed());
    }

    #[test]
    fn boolean_notting_a_bool_is_well_typed() {
        assert!(!check("func f() { let x: bool = true; !x; }").has_failed());
    }
}
