//! The semantic-analysis passes (spec §4.6-§4.9), run in order by
//! [`crate::compile::compile`].
//!
//! Each submodule owns one pass and exposes a single entry point; none of
//! them know about each other directly, they only communicate through the
//! [`crate::pass::Annotations`] side table threaded between them.

pub mod control_flow;
pub mod symbols;
pub mod type_resolution;
pub mod type_validation;
pub mod well_formed;

pub use control_flow::analyze_control_flow;
pub use symbols::resolve_symbols;
pub use type_resolution::resolve_types;
pub use type_validation::validate_types;
pub use well_formed::check_well_formedness;
