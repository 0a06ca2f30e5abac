//! Tree traversal with an on-enter/on-leave protocol, per-kind dispatch, a
//! live parent stack, and a shared diagnostic sink (spec §4.5).
//!
//! Grounded on the teacher's handler dispatch philosophy (closest analogue
//! in the corpus: `iforge_handler.cpp`'s `IForgeHandler`, which routes a
//! generic `visit(node)` to one of ~25 `on_enter_*`/`on_leave_*` methods by
//! a `switch` over the node's runtime kind, aborting the process on an
//! unhandled kind). Forge expresses the same "one method per kind,
//! default no-op, exhaustive dispatch" shape as a Rust trait dispatched by
//! a `match` the compiler checks for exhaustiveness at compile time
//! instead of a runtime `switch`/abort pair.
//!
//! **Read-only traversal.** `Input::node` is a shared reference, and every
//! built-in [`crate::handlers`] analyzer only ever needs to *read* the
//! tree and *write* into [`Annotations`] (a side table, not a tree field).
//! `Output::Replace` is kept in the contract because spec §4.5 names it as
//! part of the framework, but this driver has nowhere to put a structural
//! replacement while a read-only parent stack is live (the teacher's
//! equivalent — swapping a `Rc<dyn IProduction>` in a parent's child slot
//! — works there because its tree is reference-counted, not a plain owned
//! enum with an aliasing-checked parent chain). A handler that returns
//! `Replace` here gets an internal diagnostic instead of a rewrite; a
//! hypothetical future rewriting pass would run its own owning traversal
//! over `&mut Node` rather than extend this one.

mod annotations;

pub use annotations::{Annotations, DeclKind, DeclSummary};

use crate::ast::visitor::NodeRef;
use crate::ast::*;
use crate::message::MessageContext;

pub struct Input<'a, T> {
    pub node: &'a T,
    pub parent_stack: &'a [NodeRef<'a>],
    pub messages: &'a mut MessageContext,
    pub annotations: &'a mut Annotations,
}

pub enum Output<T> {
    Continue,
    Replace(T),
    SkipChildren,
    Halt,
}

macro_rules! handler_methods {
    ($($enter:ident, $leave:ident => $ty:ty);* $(;)?) => {
        /// Overridable per-kind hooks; a handler implements only the
        /// methods it cares about, every other kind falls through to the
        /// default `Output::Continue`.
        pub trait Handler {
            $(
                fn $enter(&mut self, _input: &mut Input<$ty>) -> Output<$ty> { Output::Continue }
                fn $leave(&mut self, _input: &mut Input<$ty>) -> Output<$ty> { Output::Continue }
            )*
        }
    };
}

handler_methods! {
    on_enter_translation_unit, on_leave_translation_unit => TranslationUnit;
    on_enter_type_basic, on_leave_type_basic => TypeBasic;
    on_enter_type_with_bit_width, on_leave_type_with_bit_width => TypeWithBitWidth;
    on_enter_type_symbol, on_leave_type_symbol => TypeSymbol;
    on_enter_type_unary, on_leave_type_unary => TypeUnary;
    on_enter_type_function, on_leave_type_function => TypeFunction;
    on_enter_type_structured, on_leave_type_structured => TypeStructured;
    on_enter_value_literal_bool, on_leave_value_literal_bool => ValueLiteralBool;
    on_enter_value_literal_number, on_leave_value_literal_number => ValueLiteralNumber;
    on_enter_value_symbol, on_leave_value_symbol => ValueSymbol;
    on_enter_value_unary, on_leave_value_unary => ValueUnary;
    on_enter_value_binary, on_leave_value_binary => ValueBinary;
    on_enter_value_call, on_leave_value_call => ValueCall;
    on_enter_value_cast, on_leave_value_cast => ValueCast;
    on_enter_statement_basic, on_leave_statement_basic => StatementBasic;
    on_enter_statement_value, on_leave_statement_value => StatementValue;
    on_enter_statement_if, on_leave_statement_if => StatementIf;
    on_enter_statement_while, on_leave_statement_while => StatementWhile;
    on_enter_statement_block, on_leave_statement_block => StatementBlock;
    on_enter_statement_declaration, on_leave_statement_declaration => StatementDeclaration;
    on_enter_declaration_variable, on_leave_declaration_variable => DeclarationVariable;
    on_enter_declaration_function, on_leave_declaration_function => DeclarationFunction;
    on_enter_declaration_type_alias, on_leave_declaration_type_alias => DeclarationTypeAlias;
    on_enter_declaration_structured_type, on_leave_declaration_structured_type => DeclarationStructuredType;
    on_enter_declaration_namespace, on_leave_declaration_namespace => DeclarationNamespace;
}

/// Run `handler` over `unit` once, depth-first.
///
/// Returns `false` if the handler signalled `Halt`, `true` otherwise. A
/// `Halt` or `Replace` is recorded in `messages` as an internal
/// diagnostic so a caller inspecting `messages.has_failed()` learns about
/// it even if it otherwise ignores the return value.
pub fn run_pass(
    unit: &TranslationUnit,
    handler: &mut dyn Handler,
    messages: &mut MessageContext,
    annotations: &mut Annotations,
) -> bool {
    let mut stack: Vec<NodeRef> = Vec::new();
    visit_translation_unit(unit, handler, messages, annotations, &mut stack)
}

macro_rules! dispatch {
    ($handler:expr, $enter:ident, $leave:ident, $node:expr, $parent_stack:expr, $messages:expr, $annotations:expr, $body:expr) => {{
        let mut input = Input {
            node: $node,
            parent_stack: $parent_stack,
            messages: $messages,
            annotations: $annotations,
        };
        match $handler.$enter(&mut input) {
            Output::Halt => {
                $messages.internal($node.source_range, "pass halted by handler");
                return false;
            }
            Output::Replace(_) => {
                $messages.internal($node.source_range, "structural replacement is not supported by this pass driver");
            }
            Output::SkipChildren => { /* fall through to on_leave without descending */ }
            Output::Continue => {
                if !$body {
                    return false;
                }
            }
        }
        let mut input = Input {
            node: $node,
            parent_stack: $parent_stack,
            messages: $messages,
            annotations: $annotations,
        };
        match $handler.$leave(&mut input) {
            Output::Halt => {
                $messages.internal($node.source_range, "pass halted by handler");
                return false;
            }
            Output::Replace(_) => {
                $messages.internal($node.source_range, "structural replacement is not supported by this pass driver");
            }
            _ => {}
        }
        true
    }};
}

fn visit_translation_unit(
    unit: &TranslationUnit,
    handler: &mut dyn Handler,
    messages: &mut MessageContext,
    annotations: &mut Annotations,
    stack: &mut Vec<NodeRef>,
) -> bool {
    dispatch!(handler, on_enter_translation_unit, on_leave_translation_unit, unit, stack, messages, annotations, {
        stack.push(NodeRef::TranslationUnit(unit));
        let ok = unit
            .declarations
            .iter()
            .all(|decl| visit_declaration(decl, handler, messages, annotations, stack));
        stack.pop();
        ok
    })
}

fn visit_type(
    ty: &Type,
    handler: &mut dyn Handler,
    messages: &mut MessageContext,
    annotations: &mut Annotations,
    stack: &mut Vec<NodeRef>,
) -> bool {
    let ok = match ty {
        Type::Basic(n) => dispatch!(handler, on_enter_type_basic, on_leave_type_basic, n, stack, messages, annotations, true),
        Type::WithBitWidth(n) => dispatch!(handler, on_enter_type_with_bit_width, on_leave_type_with_bit_width, n, stack, messages, annotations, true),
        Type::Symbol(n) => dispatch!(handler, on_enter_type_symbol, on_leave_type_symbol, n, stack, messages, annotations, true),
        Type::Unary(n) => dispatch!(handler, on_enter_type_unary, on_leave_type_unary, n, stack, messages, annotations, {
            stack.push(NodeRef::Type(ty));
            let ok = visit_type(&n.operand, handler, messages, annotations, stack);
            stack.pop();
            ok
        }),
        Type::Function(n) => dispatch!(handler, on_enter_type_function, on_leave_type_function, n, stack, messages, annotations, {
            stack.push(NodeRef::Type(ty));
            let ok = visit_type(&n.return_type, handler, messages, annotations, stack)
                && n.arg_types.iter().all(|arg| visit_type(arg, handler, messages, annotations, stack));
            stack.pop();
            ok
        }),
        Type::Structured(n) => dispatch!(handler, on_enter_type_structured, on_leave_type_structured, n, stack, messages, annotations, {
            stack.push(NodeRef::Type(ty));
            let ok = n.members.iter().all(|m| visit_declaration(m, handler, messages, annotations, stack));
            stack.pop();
            ok
        }),
    };
    ok
}

fn visit_value(
    value: &Value,
    handler: &mut dyn Handler,
    messages: &mut MessageContext,
    annotations: &mut Annotations,
    stack: &mut Vec<NodeRef>,
) -> bool {
    match value {
        Value::LiteralBool(n) => dispatch!(handler, on_enter_value_literal_bool, on_leave_value_literal_bool, n, stack, messages, annotations, true),
        Value::LiteralNumber(n) => dispatch!(handler, on_enter_value_literal_number, on_leave_value_literal_number, n, stack, messages, annotations, true),
        Value::Symbol(n) => dispatch!(handler, on_enter_value_symbol, on_leave_value_symbol, n, stack, messages, annotations, true),
        Value::Unary(n) => dispatch!(handler, on_enter_value_unary, on_leave_value_unary, n, stack, messages, annotations, {
            stack.push(NodeRef::Value(value));
            let ok = visit_value(&n.operand, handler, messages, annotations, stack);
            stack.pop();
            ok
        }),
        Value::Binary(n) => dispatch!(handler, on_enter_value_binary, on_leave_value_binary, n, stack, messages, annotations, {
            stack.push(NodeRef::Value(value));
            let ok = visit_value(&n.lhs, handler, messages, annotations, stack)
                && match &n.rhs {
                    BinaryRhs::Value(v) => visit_value(v, handler, messages, annotations, stack),
                    BinaryRhs::Symbol(_) => true,
                };
            stack.pop();
            ok
        }),
        Value::Call(n) => dispatch!(handler, on_enter_value_call, on_leave_value_call, n, stack, messages, annotations, {
            stack.push(NodeRef::Value(value));
            let ok = visit_value(&n.callee, handler, messages, annotations, stack)
                && n.args.iter().all(|a| visit_value(a, handler, messages, annotations, stack));
            stack.pop();
            ok
        }),
        Value::Cast(n) => dispatch!(handler, on_enter_value_cast, on_leave_value_cast, n, stack, messages, annotations, {
            stack.push(NodeRef::Value(value));
            let ok = visit_value(&n.value, handler, messages, annotations, stack)
                && visit_type(&n.ty, handler, messages, annotations, stack);
            stack.pop();
            ok
        }),
    }
}

fn visit_statement(
    statement: &Statement,
    handler: &mut dyn Handler,
    messages: &mut MessageContext,
    annotations: &mut Annotations,
    stack: &mut Vec<NodeRef>,
) -> bool {
    match statement {
        Statement::Basic(n) => dispatch!(handler, on_enter_statement_basic, on_leave_statement_basic, n, stack, messages, annotations, true),
        Statement::Value(n) => dispatch!(handler, on_enter_statement_value, on_leave_statement_value, n, stack, messages, annotations, {
            stack.push(NodeRef::Statement(statement));
            let ok = visit_value(&n.value, handler, messages, annotations, stack);
            stack.pop();
            ok
        }),
        Statement::If(n) => dispatch!(handler, on_enter_statement_if, on_leave_statement_if, n, stack, messages, annotations, {
            stack.push(NodeRef::Statement(statement));
            let ok = visit_value(&n.condition, handler, messages, annotations, stack)
                && visit_statement_block(&n.then_block, handler, messages, annotations, stack)
                && match &n.else_branch {
                    None => true,
                    Some(ElseBranch::If(inner)) => visit_statement_if(inner, handler, messages, annotations, stack),
                    Some(ElseBranch::Block(block)) => visit_statement_block(block, handler, messages, annotations, stack),
                };
            stack.pop();
            ok
        }),
        Statement::While(n) => dispatch!(handler, on_enter_statement_while, on_leave_statement_while, n, stack, messages, annotations, {
            stack.push(NodeRef::Statement(statement));
            let ok = visit_value(&n.condition, handler, messages, annotations, stack)
                && visit_statement_block(&n.body, handler, messages, annotations, stack);
            stack.pop();
            ok
        }),
        Statement::Block(n) => dispatch!(handler, on_enter_statement_block, on_leave_statement_block, n, stack, messages, annotations, {
            stack.push(NodeRef::Statement(statement));
            let ok = n.statements.iter().all(|s| visit_statement(s, handler, messages, annotations, stack));
            stack.pop();
            ok
        }),
        Statement::Declaration(n) => dispatch!(handler, on_enter_statement_declaration, on_leave_statement_declaration, n, stack, messages, annotations, {
            stack.push(NodeRef::Statement(statement));
            let ok = visit_declaration(&n.decl, handler, messages, annotations, stack);
            stack.pop();
            ok
        }),
    }
}

fn visit_statement_if(
    n: &StatementIf,
    handler: &mut dyn Handler,
    messages: &mut MessageContext,
    annotations: &mut Annotations,
    stack: &mut Vec<NodeRef>,
) -> bool {
    dispatch!(handler, on_enter_statement_if, on_leave_statement_if, n, stack, messages, annotations, {
        stack.push(NodeRef::StatementIf(n));
        let ok = visit_value(&n.condition, handler, messages, annotations, stack)
            && visit_statement_block(&n.then_block, handler, messages, annotations, stack)
            && match &n.else_branch {
                None => true,
                Some(ElseBranch::If(inner)) => visit_statement_if(inner, handler, messages, annotations, stack),
                Some(ElseBranch::Block(block)) => visit_statement_block(block, handler, messages, annotations, stack),
            };
        stack.pop();
        ok
    })
}

fn visit_statement_block(
    block: &StatementBlock,
    handler: &mut dyn Handler,
    messages: &mut MessageContext,
    annotations: &mut Annotations,
    stack: &mut Vec<NodeRef>,
) -> bool {
    dispatch!(handler, on_enter_statement_block, on_leave_statement_block, block, stack, messages, annotations, {
        stack.push(NodeRef::StatementBlock(block));
        let ok = block.statements.iter().all(|s| visit_statement(s, handler, messages, annotations, stack));
        stack.pop();
        ok
    })
}

fn visit_declaration(
    decl: &Declaration,
    handler: &mut dyn Handler,
    messages: &mut MessageContext,
    annotations: &mut Annotations,
    stack: &mut Vec<NodeRef>,
) -> bool {
    match decl {
        Declaration::Variable(n) => dispatch!(handler, on_enter_declaration_variable, on_leave_declaration_variable, n, stack, messages, annotations, {
            stack.push(NodeRef::Declaration(decl));
            let ok = n.ty.as_ref().map_or(true, |ty| visit_type(ty, handler, messages, annotations, stack))
                && n.initial_value.as_ref().map_or(true, |v| visit_value(v, handler, messages, annotations, stack));
            stack.pop();
            ok
        }),
        Declaration::Function(n) => dispatch!(handler, on_enter_declaration_function, on_leave_declaration_function, n, stack, messages, annotations, {
            stack.push(NodeRef::Declaration(decl));
            let ok = n.args.iter().all(|arg| {
                arg.ty.as_ref().map_or(true, |ty| visit_type(ty, handler, messages, annotations, stack))
                    && arg.initial_value.as_ref().map_or(true, |v| visit_value(v, handler, messages, annotations, stack))
            }) && n.return_type.as_ref().map_or(true, |ty| visit_type(ty, handler, messages, annotations, stack))
                && n.body.as_ref().map_or(true, |b| visit_statement_block(b, handler, messages, annotations, stack));
            stack.pop();
            ok
        }),
        Declaration::TypeAlias(n) => dispatch!(handler, on_enter_declaration_type_alias, on_leave_declaration_type_alias, n, stack, messages, annotations, {
            stack.push(NodeRef::Declaration(decl));
            let ok = visit_type(&n.ty, handler, messages, annotations, stack);
            stack.pop();
            ok
        }),
        Declaration::StructuredType(n) => dispatch!(handler, on_enter_declaration_structured_type, on_leave_declaration_structured_type, n, stack, messages, annotations, {
            stack.push(NodeRef::Declaration(decl));
            let ok = n.inherits.iter().all(|t| dispatch!(handler, on_enter_type_symbol, on_leave_type_symbol, t, stack, messages, annotations, true))
                && n.members.iter().all(|m| visit_declaration(m, handler, messages, annotations, stack));
            stack.pop();
            ok
        }),
        Declaration::Namespace(n) => dispatch!(handler, on_enter_declaration_namespace, on_leave_declaration_namespace, n, stack, messages, annotations, {
            stack.push(NodeRef::Declaration(decl));
            let ok = n.members.iter().all(|m| visit_declaration(m, handler, messages, annotations, stack));
            stack.pop();
            ok
        }),
    }
}
