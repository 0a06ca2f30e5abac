//! Structural well-formedness checking (spec §4.6).
//!
//! A plain read-only walk over [`crate::ast::visitor`] rather than the
//! [`crate::pass`] `Handler` framework: these checks never need the parent
//! stack or the [`crate::pass::Annotations`] side table, only the node
//! currently in hand, so the lighter traversal fits.

use crate::ast::visitor::{walk_translation_unit, NodeRef, Visitor};
use crate::ast::{Declaration, Type, TranslationUnit};
use crate::message::MessageContext;

/// Walk `unit` and report every well-formedness violation spec §4.6 names:
/// empty names, a function whose return type or argument type is itself a
/// function type, a variable whose declared type is a function type, a
/// parameter declaration carrying an initializer, and a non-parameter
/// variable declaration carrying neither a declared type nor an initial
/// value (so nothing downstream could ever resolve its type).
pub fn check_well_formedness(unit: &TranslationUnit, messages: &mut MessageContext) {
    let mut checker = WellFormednessChecker { messages };
    walk_translation_unit(unit, &mut checker);
}

struct WellFormednessChecker<'m> {
    messages: &'m mut MessageContext,
}

impl<'m> WellFormednessChecker<'m> {
    fn check_declaration(&mut self, decl: &Declaration) {
        match decl {
            Declaration::Variable(n) => {
                if n.name.is_empty() {
                    self.messages.error(n.source_range, "variable declaration has an empty name");
                }
                if matches!(&n.ty, Some(Type::Function(_))) {
                    self.messages
                        .error(n.source_range, "a variable cannot be declared with a function type");
                }
                if n.ty.is_none() && n.initial_value.is_none() {
                    self.messages.error(
                        n.source_range,
                        "variable declaration needs a type annotation or an initial value",
                    );
                }
            }
            Declaration::Function(n) => {
                if n.name.is_empty() {
                    self.messages.error(n.source_range, "function declaration has an empty name");
                }
                if matches!(&n.return_type, Some(Type::Function(_))) {
                    self.messages
                        .error(n.source_range, "a function cannot return a function type");
                }
                for arg in &n.args {
                    if arg.name.is_empty() {
                        self.messages.error(arg.source_range, "parameter has an empty name");
                    }
                    if matches!(&arg.ty, Some(Type::Function(_))) {
                        self.messages
                            .error(arg.source_range, "a parameter cannot be declared with a function type");
                    }
                    if arg.initial_value.is_some() {
                        self.messages
                            .error(arg.source_range, "a parameter declaration cannot carry an initializer");
                    }
                }
            }
            Declaration::TypeAlias(n) => {
                if n.name.is_empty() {
                    self.messages.error(n.source_range, "type alias has an empty name");
                }
            }
            Declaration::StructuredType(n) => {
                if n.name.is_empty() {
                    self.messages.error(n.source_range, "structured type has an empty name");
                }
                for inherit in &n.inherits {
                    if inherit.name.is_empty() {
                        self.messages.error(inherit.source_range, "inherited type has an empty name");
                    }
                }
            }
            Declaration::Namespace(n) => {
                if n.name.is_empty() {
                    self.messages.error(n.source_range, "namespace declaration has an empty name");
                }
            }
        }
    }
}

impl<'a, 'm> Visitor<'a> for WellFormednessChecker<'m> {
    fn on_enter(&mut self, node: NodeRef<'a>) {
        match node {
            NodeRef::Declaration(decl) => self.check_declaration(decl),
            NodeRef::Value(crate::ast::Value::Symbol(symbol)) if symbol.name.is_empty() => {
                self.messages.error(symbol.source_range, "symbol reference has an empty name");
            }
            NodeRef::Type(Type::Symbol(symbol)) if symbol.name.is_empty() => {
                self.messages.error(symbol.source_range, "type reference has an empty name");
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forge::parse_translation_unit;
    use crate::combinators::ParsingContext;
    use crate::source::Source;

    fn check(text: &str) -> MessageContext {
        let source = Source::in_memory(text);
        let mut messages = MessageContext::new();
        let tokens = crate::lexer::lex(&mut messages, &source);
        let unit = {
            let mut ctx = ParsingContext::new(&tokens, &mut messages);
            parse_translation_unit(&mut ctx)
        };
        check_well_formedness(&unit, &mut messages);
        messages
    }

    #[test]
    fn a_typed_and_initialized_variable_is_well_formed() {
        assert!(!check("let x: i32 = 1;").has_failed());
    }

    #[test]
    fn a_variable_with_neither_type_nor_initializer_is_ill_formed() {
        assert!(check("func f(y) { let z; }").has_failed());
    }

    #[test]
    fn a_function_returning_a_function_type_is_ill_formed() {
        assert!(check("func f() -> (i32) -> i32 {}").has_failed());
    }

    #[test]
    fn a_parameter_of_function_type_is_ill_formed() {
        assert!(check("func f(g: (i32) -> i32) {}").has_failed());
    }
}
