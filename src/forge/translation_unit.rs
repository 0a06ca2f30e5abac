//! The top-level grammar rule (spec §4.3, "Top level"): loop
//! [`parse_declaration`] until the token stream is exhausted; a failure
//! emits "expected declaration" and stops, since there is no recovery
//! token to resynchronize on at the top level.

use crate::ast::TranslationUnit;
use crate::combinators::ParsingContext;
use crate::source::SourceRange;

use super::declarations::parse_declaration;

pub fn parse_translation_unit(ctx: &mut ParsingContext) -> TranslationUnit {
    let start = ctx.current_range();
    let mut declarations = Vec::new();

    while !ctx.is_at_end() {
        match parse_declaration(ctx, false) {
            Some(decl) => declarations.push(decl),
            None => {
                ctx.error_expected("a declaration");
                break;
            }
        }
    }

    let end = declarations
        .last()
        .map(|d| d.source_range())
        .unwrap_or(start);

    TranslationUnit::new(SourceRange::combine(start, end), declarations)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::MessageContext;
    use crate::source::Source;

    fn parse(text: &str) -> (TranslationUnit, MessageContext) {
        let source = Source::in_memory(text);
        let mut messages = MessageContext::new();
        let tokens = crate::lexer::lex(&mut messages, &source);
        let unit = {
            let mut ctx = ParsingContext::new(&tokens, &mut messages);
            parse_translation_unit(&mut ctx)
        };
        (unit, messages)
    }

    #[test]
    fn parses_several_declarations_in_order() {
        let (unit, messages) = parse("let x = 1; func f() {} namespace n {}");
        assert_eq!(unit.declarations.len(), 3);
        assert!(messages.is_empty());
    }

    #[test]
    fn an_unparseable_top_level_token_is_an_error() {
        let (unit, messages) = parse("let x = 1; )");
        assert_eq!(unit.declarations.len(), 1);
        assert!(messages.has_failed());
    }
}
