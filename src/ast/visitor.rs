//! The read-only Visitor (spec §4.4): `on_enter` then recurse over child
//! slots, then `on_leave`, depth-first and left-to-right.
//!
//! Grounded on the teacher's `ASTNode::walk_tree` (`ast_node.rs`), which
//! folds an accumulator over every node in the tree in the same order.
//! `walk_tree` there takes a single closure over a homogeneous
//! `Vec<ASTNode>` child list; Forge's tree has typed children instead, so
//! the walk is expressed as a `Visitor` trait with one `on_enter`/
//! `on_leave` pair per borrowed [`NodeRef`], and `find_node`/`list_nodes`
//! are built on top of it exactly as the teacher builds
//! `find_tree`/`list_tree` on top of `walk_tree`.
//!
//! This is the simple, non-mutating traversal used for search utilities
//! and the structural checks in [`crate::handlers::well_formed`]. Semantic
//! analyses that need a parent stack and enter/leave control signals use
//! the heavier [`crate::pass`] framework instead.

use super::declarations::*;
use super::statements::*;
use super::types::*;
use super::values::*;
use super::TranslationUnit;

/// A borrowed reference to whichever node category is current.
///
/// `StatementIf` has its own variant (instead of being folded into
/// `Statement`) because an `else if` chain nests bare `StatementIf`
/// values inside [`ElseBranch::If`], not `Statement::If` values.
#[derive(Clone, Copy)]
pub enum NodeRef<'a> {
    TranslationUnit(&'a TranslationUnit),
    Type(&'a Type),
    Value(&'a Value),
    Statement(&'a Statement),
    StatementIf(&'a StatementIf),
    StatementBlock(&'a StatementBlock),
    Declaration(&'a Declaration),
}

pub trait Visitor<'a> {
    fn on_enter(&mut self, _node: NodeRef<'a>) {}
    fn on_leave(&mut self, _node: NodeRef<'a>) {}
}

pub fn walk_translation_unit<'a>(unit: &'a TranslationUnit, visitor: &mut impl Visitor<'a>) {
    visitor.on_enter(NodeRef::TranslationUnit(unit));
    for decl in &unit.declarations {
        walk_declaration(decl, visitor);
    }
    visitor.on_leave(NodeRef::TranslationUnit(unit));
}

pub fn walk_type<'a>(ty: &'a Type, visitor: &mut impl Visitor<'a>) {
    visitor.on_enter(NodeRef::Type(ty));
    match ty {
        Type::Basic(_) | Type::Symbol(_) | Type::WithBitWidth(_) => {}
        Type::Unary(n) => walk_type(&n.operand, visitor),
        Type::Function(n) => {
            walk_type(&n.return_type, visitor);
            for arg in &n.arg_types {
                walk_type(arg, visitor);
            }
        }
        Type::Structured(n) => {
            for member in &n.members {
                walk_declaration(member, visitor);
            }
        }
    }
    visitor.on_leave(NodeRef::Type(ty));
}

pub fn walk_value<'a>(value: &'a Value, visitor: &mut impl Visitor<'a>) {
    visitor.on_enter(NodeRef::Value(value));
    match value {
        Value::LiteralBool(_) | Value::LiteralNumber(_) | Value::Symbol(_) => {}
        Value::Unary(n) => walk_value(&n.operand, visitor),
        Value::Binary(n) => {
            walk_value(&n.lhs, visitor);
            if let BinaryRhs::Value(v) = &n.rhs {
                walk_value(v, visitor);
            }
        }
        Value::Call(n) => {
            walk_value(&n.callee, visitor);
            for arg in &n.args {
                walk_value(arg, visitor);
            }
        }
        Value::Cast(n) => {
            walk_value(&n.value, visitor);
            walk_type(&n.ty, visitor);
        }
    }
    visitor.on_leave(NodeRef::Value(value));
}

pub fn walk_statement<'a>(statement: &'a Statement, visitor: &mut impl Visitor<'a>) {
    visitor.on_enter(NodeRef::Statement(statement));
    match statement {
        Statement::Basic(_) => {}
        Statement::Value(n) => walk_value(&n.value, visitor),
        Statement::If(n) => walk_statement_if_children(n, visitor),
        Statement::While(n) => {
            walk_value(&n.condition, visitor);
            walk_statement_block(&n.body, visitor);
        }
        Statement::Block(n) => walk_statement_block(n, visitor),
        Statement::Declaration(n) => walk_declaration(&n.decl, visitor),
    }
    visitor.on_leave(NodeRef::Statement(statement));
}

fn walk_statement_if_children<'a>(n: &'a StatementIf, visitor: &mut impl Visitor<'a>) {
    walk_value(&n.condition, visitor);
    walk_statement_block(&n.then_block, visitor);
    match &n.else_branch {
        None => {}
        Some(ElseBranch::If(inner)) => {
            visitor.on_enter(NodeRef::StatementIf(inner));
            walk_statement_if_children(inner, visitor);
            visitor.on_leave(NodeRef::StatementIf(inner));
        }
        Some(ElseBranch::Block(block)) => walk_statement_block(block, visitor),
    }
}

pub fn walk_statement_block<'a>(block: &'a StatementBlock, visitor: &mut impl Visitor<'a>) {
    for statement in &block.statements {
        walk_statement(statement, visitor);
    }
}

pub fn walk_declaration<'a>(decl: &'a Declaration, visitor: &mut impl Visitor<'a>) {
    visitor.on_enter(NodeRef::Declaration(decl));
    match decl {
        Declaration::Variable(n) => {
            if let Some(ty) = &n.ty {
                walk_type(ty, visitor);
            }
            if let Some(value) = &n.initial_value {
                walk_value(value, visitor);
            }
        }
        Declaration::Function(n) => {
            for arg in &n.args {
                if let Some(ty) = &arg.ty {
                    walk_type(ty, visitor);
                }
                if let Some(value) = &arg.initial_value {
                    walk_value(value, visitor);
                }
            }
            if let Some(ty) = &n.return_type {
                walk_type(ty, visitor);
            }
            if let Some(body) = &n.body {
                walk_statement_block(body, visitor);
            }
        }
        Declaration::TypeAlias(n) => walk_type(&n.ty, visitor),
        Declaration::StructuredType(n) => {
            for member in &n.members {
                walk_declaration(member, visitor);
            }
        }
        Declaration::Namespace(n) => {
            for member in &n.members {
                walk_declaration(member, visitor);
            }
        }
    }
    visitor.on_leave(NodeRef::Declaration(decl));
}

/// Find the first node in `unit` matching `predicate`, depth-first.
///
/// Mirrors the teacher's `ASTNode::find_tree`.
pub fn find_node<'a>(
    unit: &'a TranslationUnit,
    predicate: impl Fn(NodeRef<'a>) -> bool,
) -> Option<NodeRef<'a>> {
    list_nodes(unit, predicate).into_iter().next()
}

/// Collect every node in `unit` matching `predicate`, depth-first.
///
/// Mirrors the teacher's `ASTNode::list_tree`.
pub fn list_nodes<'a>(
    unit: &'a TranslationUnit,
    predicate: impl Fn(NodeRef<'a>) -> bool,
) -> Vec<NodeRef<'a>> {
    struct Collector<'a, F> {
        predicate: F,
        matches: Vec<NodeRef<'a>>,
    }

    impl<'a, F: Fn(NodeRef<'a>) -> bool> Visitor<'a> for Collector<'a, F> {
        fn on_enter(&mut self, node: NodeRef<'a>) {
            if (self.predicate)(node) {
                self.matches.push(node);
            }
        }
    }

    let mut collector = Collector {
        predicate,
        matches: Vec::new(),
    };
    walk_translation_unit(unit, &mut collector);
    collector.matches
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::SourceRange;

    #[test]
    fn list_nodes_finds_every_symbol_by_name() {
        let decl = Declaration::Variable(DeclarationVariable {
            id: crate::ast::NodeId::fresh(),
            source_range: SourceRange::synthetic(),
            name: "x".into(),
            ty: None,
            initial_value: Some(Value::Symbol(ValueSymbol {
                id: crate::ast::NodeId::fresh(),
                source_range: SourceRange::synthetic(),
                name: "y".into(),
            })),
            is_const: false,
        });
        let unit = TranslationUnit::new(SourceRange::synthetic(), vec![decl]);

        let symbols = list_nodes(&unit, |node| {
            matches!(node, NodeRef::Value(Value::Symbol(s)) if s.name == "y")
        });
        assert_eq!(symbols.len(), 1);
    }
}
