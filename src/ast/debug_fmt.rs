//! The two-space-indented pretty-printer (spec §4.4, "Debug formatter").
//!
//! Every node prints a `[kind]` header, then `label = value` lines one
//! indent level deeper: child nodes recurse and indent again, vectors
//! print `label[i] = …`, strings are quoted, primitives are printed raw,
//! and an absent optional prints `null`. The format is deliberately
//! stable text, not a derived `Debug` impl, since spec §8's round-trip
//! property pins test fixtures to this exact shape.

use super::declarations::*;
use super::statements::*;
use super::types::*;
use super::values::*;
use super::TranslationUnit;
use std::fmt::Write;

const INDENT: &str = "  ";

struct Writer {
    out: String,
    depth: usize,
}

impl Writer {
    fn new() -> Self {
        Self {
            out: String::new(),
            depth: 0,
        }
    }

    fn indent(&mut self) {
        for _ in 0..self.depth {
            self.out.push_str(INDENT);
        }
    }

    fn header(&mut self, kind: &str) {
        self.indent();
        let _ = writeln!(self.out, "[{}]", kind);
    }

    fn raw(&mut self, label: &str, value: impl std::fmt::Display) {
        self.indent();
        let _ = writeln!(self.out, "{}{} = {}", INDENT, label, value);
    }

    fn string(&mut self, label: &str, value: &str) {
        self.indent();
        let _ = writeln!(self.out, "{}{} = \"{}\"", INDENT, label, value);
    }

    fn null(&mut self, label: &str) {
        self.indent();
        let _ = writeln!(self.out, "{}{} = null", INDENT, label);
    }

    fn node(&mut self, label: &str, write: impl FnOnce(&mut Self)) {
        self.indent();
        let _ = writeln!(self.out, "{}{} =", INDENT, label);
        self.depth += 2;
        write(self);
        self.depth -= 2;
    }

    fn list<T>(&mut self, label: &str, items: &[T], write: impl Fn(&mut Self, &T)) {
        if items.is_empty() {
            self.indent();
            let _ = writeln!(self.out, "{}{} = []", INDENT, label);
            return;
        }
        for (i, item) in items.iter().enumerate() {
            self.indent();
            let _ = writeln!(self.out, "{}{}[{}] =", INDENT, label, i);
            self.depth += 2;
            write(self, item);
            self.depth -= 2;
        }
    }
}

pub fn format_translation_unit(unit: &TranslationUnit) -> String {
    let mut w = Writer::new();
    write_translation_unit(&mut w, unit);
    w.out
}

fn write_translation_unit(w: &mut Writer, unit: &TranslationUnit) {
    w.header("translation_unit");
    w.list("declarations", &unit.declarations, write_declaration);
}

fn write_type(w: &mut Writer, ty: &Type) {
    match ty {
        Type::Basic(n) => {
            w.header("type_basic");
            w.raw("is_const", n.is_const);
            w.raw("kind", format!("{:?}", n.kind));
        }
        Type::WithBitWidth(n) => {
            w.header("type_with_bit_width");
            w.raw("is_const", n.is_const);
            w.raw("kind", format!("{:?}", n.kind));
            w.raw("bit_width", n.bit_width.bits());
        }
        Type::Symbol(n) => {
            w.header("type_symbol");
            w.raw("is_const", n.is_const);
            w.string("name", &n.name);
        }
        Type::Unary(n) => {
            w.header("type_unary");
            w.raw("is_const", n.is_const);
            w.raw("kind", format!("{:?}", n.kind));
            w.node("operand", |w| write_type(w, &n.operand));
        }
        Type::Function(n) => {
            w.header("type_function");
            w.raw("is_const", n.is_const);
            w.node("return_type", |w| write_type(w, &n.return_type));
            w.list("arg_types", &n.arg_types, write_type);
        }
        Type::Structured(n) => {
            w.header("type_structured");
            w.raw("is_const", n.is_const);
            w.list("members", &n.members, write_declaration);
        }
    }
}

fn write_value(w: &mut Writer, value: &Value) {
    match value {
        Value::LiteralBool(n) => {
            w.header("value_literal_bool");
            w.raw("value", n.value);
        }
        Value::LiteralNumber(n) => {
            w.header("value_literal_number");
            w.node("type", |w| write_type(w, &Type::WithBitWidth(clone_bitwidth(&n.ty))));
            w.raw("scalar", format!("{:?}", n.scalar));
        }
        Value::Symbol(n) => {
            w.header("value_symbol");
            w.string("name", &n.name);
        }
        Value::Unary(n) => {
            w.header("value_unary");
            w.raw("op", format!("{:?}", n.op));
            w.node("operand", |w| write_value(w, &n.operand));
        }
        Value::Binary(n) => {
            w.header("value_binary");
            w.raw("op", format!("{:?}", n.op));
            w.node("lhs", |w| write_value(w, &n.lhs));
            w.node("rhs", |w| match &n.rhs {
                BinaryRhs::Value(v) => write_value(w, v),
                BinaryRhs::Symbol(s) => write_value(w, &Value::Symbol(s.deep_clone())),
            });
        }
        Value::Call(n) => {
            w.header("value_call");
            w.node("callee", |w| write_value(w, &n.callee));
            w.list("args", &n.args, write_value);
        }
        Value::Cast(n) => {
            w.header("value_cast");
            w.node("value", |w| write_value(w, &n.value));
            w.node("type", |w| write_type(w, &n.ty));
        }
    }
}

fn clone_bitwidth(ty: &TypeWithBitWidth) -> TypeWithBitWidth {
    TypeWithBitWidth {
        id: ty.id,
        source_range: ty.source_range,
        is_const: ty.is_const,
        kind: ty.kind,
        bit_width: ty.bit_width,
    }
}

fn write_statement(w: &mut Writer, statement: &Statement) {
    match statement {
        Statement::Basic(n) => {
            w.header("statement_basic");
            w.raw("kind", format!("{:?}", n.kind));
        }
        Statement::Value(n) => {
            w.header("statement_value");
            w.raw("kind", format!("{:?}", n.kind));
            w.node("value", |w| write_value(w, &n.value));
        }
        Statement::If(n) => write_statement_if(w, n),
        Statement::While(n) => {
            w.header("statement_while");
            w.raw("is_do_while", n.is_do_while);
            w.node("condition", |w| write_value(w, &n.condition));
            w.node("body", |w| write_statement_block(w, &n.body));
        }
        Statement::Block(n) => write_statement_block(w, n),
        Statement::Declaration(n) => {
            w.header("statement_declaration");
            w.node("decl", |w| write_declaration(w, &n.decl));
        }
    }
}

fn write_statement_if(w: &mut Writer, n: &StatementIf) {
    w.header("statement_if");
    w.node("condition", |w| write_value(w, &n.condition));
    w.node("then", |w| write_statement_block(w, &n.then_block));
    match &n.else_branch {
        None => w.null("else"),
        Some(ElseBranch::If(inner)) => w.node("else", |w| write_statement_if(w, inner)),
        Some(ElseBranch::Block(block)) => w.node("else", |w| write_statement_block(w, block)),
    }
}

fn write_statement_block(w: &mut Writer, block: &StatementBlock) {
    w.header("statement_block");
    w.list("statements", &block.statements, write_statement);
}

fn write_declaration(w: &mut Writer, decl: &Declaration) {
    match decl {
        Declaration::Variable(n) => write_declaration_variable(w, n),
        Declaration::Function(n) => {
            w.header("declaration_function");
            w.string("name", &n.name);
            w.list("args", &n.args, write_declaration_variable);
            match &n.return_type {
                None => w.null("return_type"),
                Some(ty) => w.node("return_type", |w| write_type(w, ty)),
            }
            match &n.body {
                None => w.null("body"),
                Some(body) => w.node("body", |w| write_statement_block(w, body)),
            }
        }
        Declaration::TypeAlias(n) => {
            w.header("declaration_type_alias");
            w.string("name", &n.name);
            w.raw("is_explicit", n.is_explicit);
            w.node("type", |w| write_type(w, &n.ty));
        }
        Declaration::StructuredType(n) => {
            w.header("declaration_structured_type");
            w.string("name", &n.name);
            w.raw("kind", format!("{:?}", n.kind));
            w.list("inherits", &n.inherits, |w, symbol| {
                write_type(w, &Type::Symbol(symbol.deep_clone()))
            });
            w.list("members", &n.members, write_declaration);
        }
        Declaration::Namespace(n) => {
            w.header("declaration_namespace");
            w.string("name", &n.name);
            w.list("members", &n.members, write_declaration);
        }
    }
}

fn write_declaration_variable(w: &mut Writer, n: &DeclarationVariable) {
    w.header("declaration_variable");
    w.string("name", &n.name);
    w.raw("is_const", n.is_const);
    match &n.ty {
        None => w.null("type"),
        Some(ty) => w.node("type", |w| write_type(w, ty)),
    }
    match &n.initial_value {
        None => w.null("initial_value"),
        Some(value) => w.node("initial_value", |w| write_value(w, value)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::SourceRange;
    use pretty_assertions::assert_eq;

    #[test]
    fn formats_a_bool_literal_with_header_and_value_line() {
        let value = Value::LiteralBool(ValueLiteralBool {
            id: crate::ast::NodeId::fresh(),
            source_range: SourceRange::synthetic(),
            value: true,
        });
        let mut w = Writer::new();
        write_value(&mut w, &value);
        assert_eq!(w.out, "[value_literal_bool]\n  value = true\n");
    }

    #[test]
    fn empty_declaration_list_prints_brackets() {
        let unit = TranslationUnit::new(SourceRange::synthetic(), Vec::new());
        let rendered = format_translation_unit(&unit);
        assert_eq!(rendered, "[translation_unit]\n  declarations = []\n");
    }

    #[test]
    fn formats_a_nested_binary_expression_with_full_indentation() {
        let lhs = Value::Symbol(ValueSymbol {
            id: crate::ast::NodeId::fresh(),
            source_range: SourceRange::synthetic(),
            name: "a".into(),
        });
        let rhs = Value::Symbol(ValueSymbol {
            id: crate::ast::NodeId::fresh(),
            source_range: SourceRange::synthetic(),
            name: "b".into(),
        });
        let value = Value::Binary(ValueBinary {
            id: crate::ast::NodeId::fresh(),
            source_range: SourceRange::synthetic(),
            op: BinaryValueOp::Add,
            lhs: Box::new(lhs),
            rhs: BinaryRhs::Value(Box::new(rhs)),
        });
        let mut w = Writer::new();
        write_value(&mut w, &value);
        assert_eq!(
            w.out,
            "[value_binary]\n  op = Add\n  lhs =\n    [value_symbol]\n      name = \"a\"\n  rhs =\n    [value_symbol]\n      name = \"b\"\n"
        );
    }
}
