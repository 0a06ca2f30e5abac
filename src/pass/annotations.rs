//! The side table every semantic pass reads from and writes into (spec
//! §4.5, "Annotations").
//!
//! Grounded on the teacher's `Cache<TP, TNode>` (`cache.rs`): a process-
//! wide key (there a `(CacheKey, index)` pair, here a [`crate::ast::NodeId`])
//! indexes into a plain `HashMap` rather than the tree node owning the
//! result directly, so a read-only traversal can still accumulate output.
//! One table per annotation kind keeps each semantic pass's writes
//! independent — symbol resolution never has to know the shape of what
//! type resolution stores, and vice versa.

use crate::ast::{NodeId, Type};
use std::collections::HashMap;

/// Which declaration form a resolved name refers to, without re-matching
/// on the `Declaration` enum at every use site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeclKind {
    Variable,
    Function,
    TypeAlias,
    StructuredType,
    Namespace,
}

/// A cached summary of a declaration, keyed by its `NodeId`, so symbol
/// resolution and type resolution don't need to walk back up to the
/// declaration node itself to answer "what kind is this, and what type
/// does using it as a value produce".
#[derive(Debug, Clone)]
pub struct DeclSummary {
    pub kind: DeclKind,
    pub ty: Option<Type>,
}

/// All resolution results produced by the handlers in
/// [`crate::handlers`], collected in one place so [`crate::compile::compile`]
/// can hand a single value to each pass in turn.
#[derive(Debug, Default)]
pub struct Annotations {
    resolved_type: HashMap<NodeId, Type>,
    resolved_decl: HashMap<NodeId, NodeId>,
    decl_summaries: HashMap<NodeId, DeclSummary>,
    terminates_block: HashMap<NodeId, bool>,
    terminates_function: HashMap<NodeId, bool>,
    struct_members: HashMap<NodeId, Vec<(String, NodeId)>>,
}

impl Annotations {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_resolved_type(&mut self, id: NodeId, ty: Type) {
        self.resolved_type.insert(id, ty);
    }

    pub fn resolved_type(&self, id: NodeId) -> Option<&Type> {
        self.resolved_type.get(&id)
    }

    /// Maps a `ValueSymbol` or `TypeSymbol` node id to the `NodeId` of the
    /// declaration it refers to.
    pub fn set_resolved_decl(&mut self, id: NodeId, decl_id: NodeId) {
        self.resolved_decl.insert(id, decl_id);
    }

    pub fn resolved_decl(&self, id: NodeId) -> Option<NodeId> {
        self.resolved_decl.get(&id).copied()
    }

    pub fn set_decl_summary(&mut self, id: NodeId, summary: DeclSummary) {
        self.decl_summaries.insert(id, summary);
    }

    pub fn decl_summary(&self, id: NodeId) -> Option<&DeclSummary> {
        self.decl_summaries.get(&id)
    }

    pub fn set_terminates_block(&mut self, id: NodeId, terminates: bool) {
        self.terminates_block.insert(id, terminates);
    }

    pub fn terminates_block(&self, id: NodeId) -> bool {
        self.terminates_block.get(&id).copied().unwrap_or(false)
    }

    pub fn set_terminates_function(&mut self, id: NodeId, terminates: bool) {
        self.terminates_function.insert(id, terminates);
    }

    pub fn terminates_function(&self, id: NodeId) -> bool {
        self.terminates_function.get(&id).copied().unwrap_or(false)
    }

    /// Records the `(name, declaration id)` pairs carried by a structured
    /// type's member list, keyed by the structured type declaration's own
    /// id, so member-access resolution can answer "what does `.field` name"
    /// without re-walking the tree to find the declaration again.
    pub fn set_struct_members(&mut self, id: NodeId, members: Vec<(String, NodeId)>) {
        self.struct_members.insert(id, members);
    }

    pub fn struct_members(&self, id: NodeId) -> Option<&[(String, NodeId)]> {
        self.struct_members.get(&id).map(Vec::as_slice)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{BasicTypeKind, Type, TypeBasic};
    use crate::source::SourceRange;

    fn dummy_type() -> Type {
        Type::Basic(TypeBasic {
            id: NodeId::fresh(),
            source_range: SourceRange::synthetic(),
            is_const: false,
            kind: BasicTypeKind::Bool,
        })
    }

    #[test]
    fn resolved_type_round_trips_by_node_id() {
        let mut annotations = Annotations::new();
        let id = NodeId::fresh();
        annotations.set_resolved_type(id, dummy_type());
        assert!(matches!(
            annotations.resolved_type(id),
            Some(Type::Basic(_))
        ));
        assert!(annotations.resolved_type(NodeId::fresh()).is_none());
    }

    #[test]
    fn termination_flags_default_to_false() {
        let annotations = Annotations::new();
        assert!(!annotations.terminates_block(NodeId::fresh()));
        assert!(!annotations.terminates_function(NodeId::fresh()));
    }
}
