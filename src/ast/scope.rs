//! Scope carriers and the ordered/unordered distinction (spec §3,
//! "A scope is attached only to nodes declared as scope carriers").
//!
//! This module only classifies *which* node kinds carry a scope and
//! whether that scope is ordered; the symbol table itself, and the walk
//! that builds and consults it, live in
//! [`crate::handlers::symbols`] since building it requires the live
//! parent stack the pass framework provides.

/// Whether a scope requires declaration-before-use (source order matters)
/// or allows forward references.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeOrdering {
    /// A use must follow its declaration in source order (block scopes).
    Ordered,
    /// Forward references are allowed (translation unit, namespace and
    /// structured-type bodies).
    Unordered,
}

/// The node kinds spec §3 names as scope carriers, with their ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeCarrierKind {
    TranslationUnit,
    Namespace,
    StructuredType,
    FunctionBody,
    Block,
}

impl ScopeCarrierKind {
    pub fn ordering(self) -> ScopeOrdering {
        match self {
            ScopeCarrierKind::TranslationUnit
            | ScopeCarrierKind::Namespace
            | ScopeCarrierKind::StructuredType => ScopeOrdering::Unordered,
            ScopeCarrierKind::FunctionBody | ScopeCarrierKind::Block => ScopeOrdering::Ordered,
        }
    }
}
