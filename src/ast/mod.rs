//! The polymorphic AST: types, values, statements, declarations (spec §3).
//!
//! Grounded on the teacher's `ASTNode<TN>` (`ast_node.rs`): a single
//! `source_range` carried by every node, deep clone, structural comparison,
//! and a tree-walk exposed for search helpers. The teacher's tree is
//! homogeneous (one `ASTNode` struct parameterized over a user `NodeImpl`
//! payload enum and a `Vec<ASTNode>` of children); Forge's tree is a sum
//! type over concrete node categories instead, since each category has a
//! fixed, heterogeneous set of typed children (a `StatementIf` has a
//! condition *value* and two *statement* children, not an untyped list) and
//! a closed dispatch table is one of the core invariants (spec §3).
//!
//! Resolution annotations (`resolved_type`, `resolved_decl`, termination
//! flags) are not struct fields here. Embedding them directly would need
//! interior mutability on every node (`RefCell<Option<_>>`) just so a
//! read-only tree walk can still populate them, which turns every access
//! through a `RefCell` borrow for no benefit, since nothing needs the old
//! value once a pass writes it. Instead every node carries a stable
//! [`NodeId`] and passes record annotations in a side table keyed by that
//! id (see [`crate::pass::Annotations`]) — the same "index instead of an
//! embedded back-reference" shape the teacher uses for production nodes
//! registered in its `Cache`. A fresh `NodeId` on clone is exactly
//! "fresh annotation slots" (spec §3's Lifecycle clause): no table has an
//! entry for an id that didn't exist yet.

pub mod clone;
pub mod compare;
pub mod debug_fmt;
pub mod declarations;
pub mod print_tree;
pub mod scope;
pub mod statements;
pub mod types;
pub mod values;
pub mod visitor;

pub use declarations::*;
pub use statements::*;
pub use types::*;
pub use values::*;

use crate::source::SourceRange;
use std::sync::atomic::{AtomicU64, Ordering};

/// A process-wide-unique identifier assigned to every AST node at creation.
///
/// Not meaningful across processes or serialization boundaries; purely a
/// key into annotation side tables for the lifetime of one compilation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u64);

impl NodeId {
    pub fn fresh() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        NodeId(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

/// The root of a compiled program: an unordered scope of declarations
/// allowing forward references (spec §3, "Root").
#[derive(Debug)]
pub struct TranslationUnit {
    pub id: NodeId,
    pub source_range: SourceRange,
    pub declarations: Vec<Declaration>,
}

impl TranslationUnit {
    pub fn new(source_range: SourceRange, declarations: Vec<Declaration>) -> Self {
        Self {
            id: NodeId::fresh(),
            source_range,
            declarations,
        }
    }
}
