//! Symbol declaration and reference resolution (spec §4.7).
//!
//! Two full traversals over the same [`crate::pass`] `Handler`, sharing one
//! scope table built by the first pass and consulted (read-only) by the
//! second:
//!
//! - **Declare.** Every declaration is inserted into the scope table of its
//!   nearest enclosing scope carrier (spec §3), keyed by a monotonically
//!   increasing `position` counter. A function's parameters are inserted
//!   directly into its body block's scope (a function body and its
//!   top-level block share one scope, per spec §3's "function body"
//!   carrier), since the pass driver never dispatches a declaration hook for
//!   parameters individually.
//! - **Resolve.** Every `ValueSymbol`/`TypeSymbol` is bound to the nearest
//!   visible declaration of the same name: an unordered scope (translation
//!   unit, namespace, structured type) makes every declaration in it visible
//!   regardless of source position; an ordered scope (block, function body)
//!   only makes visible what was declared at an earlier `position`. The
//!   `position` counter ticks identically in both passes (every declaration
//!   hook increments it, whether or not the Resolve pass actually declares
//!   anything), so a position recorded during Declare is directly
//!   comparable to the counter reached during Resolve.

use std::collections::HashMap;

use crate::ast::visitor::NodeRef;
use crate::ast::{
    BasicTypeKind, Declaration, DeclarationFunction, DeclarationNamespace, DeclarationStructuredType,
    DeclarationTypeAlias, DeclarationVariable, NodeId, Type, TypeBasic, TypeFunction, TypeSymbol,
};
use crate::message::MessageContext;
use crate::pass::{self, Annotations, DeclKind, DeclSummary, Handler, Input, Output};
use crate::source::SourceRange;

pub fn resolve_symbols(unit: &crate::ast::TranslationUnit, messages: &mut MessageContext, annotations: &mut Annotations) {
    let mut handler = SymbolHandler {
        phase: Phase::Declare,
        scopes: HashMap::new(),
        scope_stack: Vec::new(),
        position: 0,
    };
    pass::run_pass(unit, &mut handler, messages, annotations);

    handler.phase = Phase::Resolve;
    handler.scope_stack.clear();
    handler.position = 0;
    pass::run_pass(unit, &mut handler, messages, annotations);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Declare,
    Resolve,
}

struct ScopeEntry {
    name: String,
    decl_id: NodeId,
    position: usize,
}

struct ScopeTable {
    ordering: crate::ast::scope::ScopeOrdering,
    entries: Vec<ScopeEntry>,
}

struct SymbolHandler {
    phase: Phase,
    scopes: HashMap<NodeId, ScopeTable>,
    scope_stack: Vec<NodeId>,
    position: usize,
}

fn void_type(source_range: SourceRange) -> Type {
    Type::Basic(TypeBasic {
        id: NodeId::fresh(),
        source_range,
        is_const: false,
        kind: BasicTypeKind::Void,
    })
}

fn function_decl_summary(n: &DeclarationFunction) -> DeclSummary {
    let ty = if n.args.iter().all(|arg| arg.ty.is_some()) {
        Some(Type::Function(TypeFunction {
            id: NodeId::fresh(),
            source_range: n.source_range,
            is_const: false,
            return_type: Box::new(
                n.return_type
                    .as_ref()
                    .map(Type::deep_clone)
                    .unwrap_or_else(|| void_type(n.source_range)),
            ),
            arg_types: n
                .args
                .iter()
                .map(|arg| arg.ty.as_ref().unwrap().deep_clone())
                .collect(),
        }))
    } else {
        None
    };
    DeclSummary {
        kind: DeclKind::Function,
        ty,
    }
}

impl SymbolHandler {
    fn push_scope(&mut self, id: NodeId, ordering: crate::ast::scope::ScopeOrdering) {
        self.scopes.entry(id).or_insert_with(|| ScopeTable { ordering, entries: Vec::new() });
        self.scope_stack.push(id);
    }

    fn pop_scope(&mut self) {
        self.scope_stack.pop();
    }

    fn declare(
        &mut self,
        name: &str,
        decl_id: NodeId,
        source_range: SourceRange,
        summary: DeclSummary,
        messages: &mut MessageContext,
        annotations: &mut Annotations,
    ) {
        let position = self.position;
        self.position += 1;

        if self.phase != Phase::Declare {
            return;
        }

        annotations.set_decl_summary(decl_id, summary);

        let Some(&scope_id) = self.scope_stack.last() else {
            return;
        };
        let table = self.scopes.entry(scope_id).or_insert_with(|| ScopeTable {
            ordering: crate::ast::scope::ScopeOrdering::Unordered,
            entries: Vec::new(),
        });
        if table.entries.iter().any(|e| e.name == name) {
            messages.error(source_range, format!("'{}' is already declared in this scope", name));
        }
        table.entries.push(ScopeEntry {
            name: name.to_string(),
            decl_id,
            position,
        });
    }

    fn lookup(&self, name: &str) -> Option<NodeId> {
        for &scope_id in self.scope_stack.iter().rev() {
            let Some(table) = self.scopes.get(&scope_id) else { continue };
            let visible = table.entries.iter().filter(|entry| {
                entry.name == name
                    && (table.ordering == crate::ast::scope::ScopeOrdering::Unordered
                        || entry.position < self.position)
            });
            if let Some(entry) = visible.last() {
                return Some(entry.decl_id);
            }
        }
        None
    }

    fn resolve_reference(&mut self, id: NodeId, name: &str, source_range: SourceRange, messages: &mut MessageContext, annotations: &mut Annotations) {
        if self.phase != Phase::Resolve {
            return;
        }
        match self.lookup(name) {
            Some(decl_id) => annotations.set_resolved_decl(id, decl_id),
            None => messages.error(source_range, format!("undeclared symbol '{}'", name)),
        }
    }
}

impl Handler for SymbolHandler {
    fn on_enter_translation_unit(&mut self, input: &mut Input<crate::ast::TranslationUnit>) -> Output<crate::ast::TranslationUnit> {
        self.push_scope(input.node.id, crate::ast::scope::ScopeOrdering::Unordered);
        Output::Continue
    }

    fn on_leave_translation_unit(&mut self, _input: &mut Input<crate::ast::TranslationUnit>) -> Output<crate::ast::TranslationUnit> {
        self.pop_scope();
        Output::Continue
    }

    fn on_enter_declaration_variable(&mut self, input: &mut Input<DeclarationVariable>) -> Output<DeclarationVariable> {
        let summary = DeclSummary {
            kind: DeclKind::Variable,
            ty: input.node.ty.as_ref().map(Type::deep_clone),
        };
        self.declare(&input.node.name, input.node.id, input.node.source_range, summary, input.messages, input.annotations);
        Output::Continue
    }

    fn on_enter_declaration_function(&mut self, input: &mut Input<DeclarationFunction>) -> Output<DeclarationFunction> {
        let summary = function_decl_summary(input.node);
        self.declare(&input.node.name, input.node.id, input.node.source_range, summary, input.messages, input.annotations);

        if let Some(body) = &input.node.body {
            self.scopes.entry(body.id).or_insert_with(|| ScopeTable {
                ordering: crate::ast::scope::ScopeOrdering::Ordered,
                entries: Vec::new(),
            });
            for arg in &input.node.args {
                let position = self.position;
                self.position += 1;
                if self.phase == Phase::Declare {
                    input.annotations.set_decl_summary(
                        arg.id,
                        DeclSummary {
                            kind: DeclKind::Variable,
                            ty: arg.ty.as_ref().map(Type::deep_clone),
                        },
                    );
                    let table = self.scopes.get_mut(&body.id).expect("just inserted above");
                    if table.entries.iter().any(|e| e.name == arg.name) {
                        input
                            .messages
                            .error(arg.source_range, format!("'{}' is already declared in this scope", arg.name));
                    }
                    table.entries.push(ScopeEntry {
                        name: arg.name.clone(),
                        decl_id: arg.id,
                        position,
                    });
                }
            }
        }
        Output::Continue
    }

    fn on_enter_declaration_type_alias(&mut self, input: &mut Input<DeclarationTypeAlias>) -> Output<DeclarationTypeAlias> {
        let summary = DeclSummary {
            kind: DeclKind::TypeAlias,
            ty: Some(input.node.ty.deep_clone()),
        };
        self.declare(&input.node.name, input.node.id, input.node.source_range, summary, input.messages, input.annotations);
        Output::Continue
    }

    fn on_enter_declaration_structured_type(&mut self, input: &mut Input<DeclarationStructuredType>) -> Output<DeclarationStructuredType> {
        let summary = DeclSummary { kind: DeclKind::StructuredType, ty: None };
        self.declare(&input.node.name, input.node.id, input.node.source_range, summary, input.messages, input.annotations);

        if self.phase == Phase::Declare {
            let members = input
                .node
                .members
                .iter()
                .map(|m| (m.name().to_string(), m.id()))
                .collect();
            input.annotations.set_struct_members(input.node.id, members);
        }

        self.push_scope(input.node.id, crate::ast::scope::ScopeOrdering::Unordered);
        Output::Continue
    }

    fn on_leave_declaration_structured_type(&mut self, _input: &mut Input<DeclarationStructuredType>) -> Output<DeclarationStructuredType> {
        self.pop_scope();
        Output::Continue
    }

    fn on_enter_declaration_namespace(&mut self, input: &mut Input<DeclarationNamespace>) -> Output<DeclarationNamespace> {
        let summary = DeclSummary { kind: DeclKind::Namespace, ty: None };
        self.declare(&input.node.name, input.node.id, input.node.source_range, summary, input.messages, input.annotations);
        self.push_scope(input.node.id, crate::ast::scope::ScopeOrdering::Unordered);
        Output::Continue
    }

    fn on_leave_declaration_namespace(&mut self, _input: &mut Input<DeclarationNamespace>) -> Output<DeclarationNamespace> {
        self.pop_scope();
        Output::Continue
    }

    fn on_enter_statement_block(&mut self, input: &mut Input<crate::ast::StatementBlock>) -> Output<crate::ast::StatementBlock> {
        self.push_scope(input.node.id, crate::ast::scope::ScopeOrdering::Ordered);
        Output::Continue
    }

    fn on_leave_statement_block(&mut self, _input: &mut Input<crate::ast::StatementBlock>) -> Output<crate::ast::StatementBlock> {
        self.pop_scope();
        Output::Continue
    }

    fn on_leave_value_symbol(&mut self, input: &mut Input<crate::ast::ValueSymbol>) -> Output<crate::ast::ValueSymbol> {
        self.resolve_reference(input.node.id, &input.node.name, input.node.source_range, input.messages, input.annotations);
        Output::Continue
    }

    fn on_leave_type_symbol(&mut self, input: &mut Input<TypeSymbol>) -> Output<TypeSymbol> {
        self.resolve_reference(input.node.id, &input.node.name, input.node.source_range, input.messages, input.annotations);
        Output::Continue
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combinators::ParsingContext;
    use crate::source::Source;

    fn resolve(text: &str) -> (crate::ast::TranslationUnit, MessageContext, Annotations) {
        let source = Source::in_memory(text);
        let mut messages = MessageContext::new();
        let tokens = crate::lexer::lex(&mut messages, &source);
        let unit = {
            let mut ctx = ParsingContext::new(&tokens, &mut messages);
            crate::forge::parse_translation_unit(&mut ctx)
        };
        let mut annotations = Annotations::new();
        resolve_symbols(&unit, &mut messages, &mut annotations);
        (unit, messages, annotations)
    }

    #[test]
    fn resolves_a_variable_used_after_its_declaration() {
        let (_unit, messages, _annotations) = resolve("func f() { let x = 1; let y = x; }");
        assert!(!messages.has_failed());
    }

    #[test]
    fn rejects_use_before_declaration_within_a_block() {
        let (_unit, messages, _annotations) = resolve("func f() { let y = x; let x = 1; }");
        assert!(messages.has_failed());
    }

    #[test]
    fn allows_forward_reference_at_namespace_scope() {
        let (_unit, messages, _annotations) = resolve("namespace n { func a() { b(); } func b() {} }");
        assert!(!messages.has_failed());
    }

    #[test]
    fn function_parameters_are_visible_in_the_body() {
        let (_unit, messages, _annotations) = resolve("func f(x: i32) { let y = x; }");
        assert!(!messages.has_failed());
    }

    #[test]
    fn duplicate_declarations_in_the_same_scope_are_rejected() {
        let (_unit, messages, _annotations) = resolve("func f() { let x = 1; let x = 2; }");
        assert!(messages.has_failed());
    }

    #[test]
    fn reports_a_truly_undeclared_symbol() {
        let (_unit, messages, _annotations) = resolve("func f() { let x = y; }");
        assert!(messages.has_failed());
    }
}
