//! An ambient `ptree`-backed tree dump, separate from the mandated debug
//! formatter ([`super::debug_fmt`]).
//!
//! Grounded on the teacher's `impl<TNode: Debug + Clone> TreeItem for
//! ASTNode<TNode>` (`ast_node.rs`): build an owned, cheaply cloned shadow
//! tree of labels and hand it to `ptree::print_tree`. This is a developer
//! convenience (a nicer terminal view than the plain debug format) and
//! carries no normative weight; `format_translation_unit` is the contract
//! tests pin to.

use super::declarations::*;
use super::statements::*;
use super::types::*;
use super::values::*;
use super::TranslationUnit;
use ptree::TreeItem;
use std::borrow::Cow;
use std::io;

#[derive(Debug, Clone)]
pub struct PrintNode {
    label: String,
    children: Vec<PrintNode>,
}

impl PrintNode {
    fn leaf(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            children: Vec::new(),
        }
    }

    fn with_children(label: impl Into<String>, children: Vec<PrintNode>) -> Self {
        Self {
            label: label.into(),
            children,
        }
    }
}

impl TreeItem for PrintNode {
    type Child = Self;

    fn write_self<W: io::Write>(&self, f: &mut W, _style: &ptree::Style) -> io::Result<()> {
        write!(f, "{}", self.label)
    }

    fn children(&self) -> Cow<[Self::Child]> {
        Cow::from(&self.children)
    }
}

pub fn print_translation_unit(unit: &TranslationUnit) -> io::Result<()> {
    ptree::print_tree(&translation_unit_to_print_node(unit))
}

fn translation_unit_to_print_node(unit: &TranslationUnit) -> PrintNode {
    PrintNode::with_children(
        "translation_unit",
        unit.declarations.iter().map(declaration_to_print_node).collect(),
    )
}

fn type_to_print_node(ty: &Type) -> PrintNode {
    match ty {
        Type::Basic(n) => PrintNode::leaf(format!("type_basic({:?})", n.kind)),
        Type::WithBitWidth(n) => {
            PrintNode::leaf(format!("type_with_bit_width({:?}, {})", n.kind, n.bit_width.bits()))
        }
        Type::Symbol(n) => PrintNode::leaf(format!("type_symbol({})", n.name)),
        Type::Unary(n) => {
            PrintNode::with_children(format!("type_unary({:?})", n.kind), vec![type_to_print_node(&n.operand)])
        }
        Type::Function(n) => {
            let mut children = vec![type_to_print_node(&n.return_type)];
            children.extend(n.arg_types.iter().map(type_to_print_node));
            PrintNode::with_children("type_function", children)
        }
        Type::Structured(n) => {
            PrintNode::with_children("type_structured", n.members.iter().map(declaration_to_print_node).collect())
        }
    }
}

fn value_to_print_node(value: &Value) -> PrintNode {
    match value {
        Value::LiteralBool(n) => PrintNode::leaf(format!("literal_bool({})", n.value)),
        Value::LiteralNumber(n) => PrintNode::leaf(format!("literal_number({:?})", n.scalar)),
        Value::Symbol(n) => PrintNode::leaf(format!("symbol({})", n.name)),
        Value::Unary(n) => {
            PrintNode::with_children(format!("unary({:?})", n.op), vec![value_to_print_node(&n.operand)])
        }
        Value::Binary(n) => {
            let rhs = match &n.rhs {
                BinaryRhs::Value(v) => value_to_print_node(v),
                BinaryRhs::Symbol(s) => PrintNode::leaf(format!("symbol({})", s.name)),
            };
            PrintNode::with_children(format!("binary({:?})", n.op), vec![value_to_print_node(&n.lhs), rhs])
        }
        Value::Call(n) => {
            let mut children = vec![value_to_print_node(&n.callee)];
            children.extend(n.args.iter().map(value_to_print_node));
            PrintNode::with_children("call", children)
        }
        Value::Cast(n) => {
            PrintNode::with_children("cast", vec![value_to_print_node(&n.value), type_to_print_node(&n.ty)])
        }
    }
}

fn statement_to_print_node(statement: &Statement) -> PrintNode {
    match statement {
        Statement::Basic(n) => PrintNode::leaf(format!("{:?}", n.kind)),
        Statement::Value(n) => {
            PrintNode::with_children(format!("{:?}", n.kind), vec![value_to_print_node(&n.value)])
        }
        Statement::If(n) => statement_if_to_print_node(n),
        Statement::While(n) => PrintNode::with_children(
            if n.is_do_while { "do_while" } else { "while" },
            vec![value_to_print_node(&n.condition), statement_block_to_print_node(&n.body)],
        ),
        Statement::Block(n) => statement_block_to_print_node(n),
        Statement::Declaration(n) => {
            PrintNode::with_children("statement_declaration", vec![declaration_to_print_node(&n.decl)])
        }
    }
}

fn statement_if_to_print_node(n: &StatementIf) -> PrintNode {
    let mut children = vec![value_to_print_node(&n.condition), statement_block_to_print_node(&n.then_block)];
    if let Some(branch) = &n.else_branch {
        children.push(match branch {
            ElseBranch::If(inner) => statement_if_to_print_node(inner),
            ElseBranch::Block(block) => statement_block_to_print_node(block),
        });
    }
    PrintNode::with_children("if", children)
}

fn statement_block_to_print_node(block: &StatementBlock) -> PrintNode {
    PrintNode::with_children("block", block.statements.iter().map(statement_to_print_node).collect())
}

fn declaration_to_print_node(decl: &Declaration) -> PrintNode {
    match decl {
        Declaration::Variable(n) => declaration_variable_to_print_node(n),
        Declaration::Function(n) => {
            let mut children: Vec<PrintNode> = n.args.iter().map(declaration_variable_to_print_node).collect();
            if let Some(ty) = &n.return_type {
                children.push(type_to_print_node(ty));
            }
            if let Some(body) = &n.body {
                children.push(statement_block_to_print_node(body));
            }
            PrintNode::with_children(format!("func {}", n.name), children)
        }
        Declaration::TypeAlias(n) => {
            PrintNode::with_children(format!("type {}", n.name), vec![type_to_print_node(&n.ty)])
        }
        Declaration::StructuredType(n) => PrintNode::with_children(
            format!("{:?} {}", n.kind, n.name),
            n.members.iter().map(declaration_to_print_node).collect(),
        ),
        Declaration::Namespace(n) => PrintNode::with_children(
            format!("namespace {}", n.name),
            n.members.iter().map(declaration_to_print_node).collect(),
        ),
    }
}

fn declaration_variable_to_print_node(n: &DeclarationVariable) -> PrintNode {
    let mut children = Vec::new();
    if let Some(ty) = &n.ty {
        children.push(type_to_print_node(ty));
    }
    if let Some(value) = &n.initial_value {
        children.push(value_to_print_node(value));
    }
    PrintNode::with_children(format!("var {}", n.name), children)
}
