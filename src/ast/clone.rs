//! Deep cloning with fresh identity (spec §3, "Lifecycle").
//!
//! A plain `#[derive(Clone)]` would copy each [`super::NodeId`] verbatim,
//! so a clone and its original would alias the same annotation-table slot
//! the instant either was annotated. `deep_clone` assigns a new id to
//! every node in the copy instead, the same way the teacher's tree
//! construction always mints identity fresh rather than reusing it
//! (`ASTNode::new`, `ast_node.rs`).

use super::declarations::*;
use super::statements::*;
use super::types::*;
use super::values::*;
use super::{NodeId, TranslationUnit};

impl TranslationUnit {
    pub fn deep_clone(&self) -> Self {
        Self {
            id: NodeId::fresh(),
            source_range: self.source_range,
            declarations: self.declarations.iter().map(Declaration::deep_clone).collect(),
        }
    }
}

impl Type {
    pub fn deep_clone(&self) -> Self {
        match self {
            Type::Basic(n) => Type::Basic(TypeBasic {
                id: NodeId::fresh(),
                source_range: n.source_range,
                is_const: n.is_const,
                kind: n.kind,
            }),
            Type::WithBitWidth(n) => Type::WithBitWidth(TypeWithBitWidth {
                id: NodeId::fresh(),
                source_range: n.source_range,
                is_const: n.is_const,
                kind: n.kind,
                bit_width: n.bit_width,
            }),
            Type::Symbol(n) => Type::Symbol(TypeSymbol {
                id: NodeId::fresh(),
                source_range: n.source_range,
                is_const: n.is_const,
                name: n.name.clone(),
            }),
            Type::Unary(n) => Type::Unary(TypeUnary {
                id: NodeId::fresh(),
                source_range: n.source_range,
                is_const: n.is_const,
                kind: n.kind,
                operand: Box::new(n.operand.deep_clone()),
            }),
            Type::Function(n) => Type::Function(TypeFunction {
                id: NodeId::fresh(),
                source_range: n.source_range,
                is_const: n.is_const,
                return_type: Box::new(n.return_type.deep_clone()),
                arg_types: n.arg_types.iter().map(Type::deep_clone).collect(),
            }),
            Type::Structured(n) => Type::Structured(TypeStructured {
                id: NodeId::fresh(),
                source_range: n.source_range,
                is_const: n.is_const,
                members: n.members.iter().map(Declaration::deep_clone).collect(),
            }),
        }
    }
}

impl TypeSymbol {
    pub fn deep_clone(&self) -> Self {
        Self {
            id: NodeId::fresh(),
            source_range: self.source_range,
            is_const: self.is_const,
            name: self.name.clone(),
        }
    }
}

impl TypeWithBitWidth {
    pub fn deep_clone(&self) -> Self {
        Self {
            id: NodeId::fresh(),
            source_range: self.source_range,
            is_const: self.is_const,
            kind: self.kind,
            bit_width: self.bit_width,
        }
    }
}

impl Value {
    pub fn deep_clone(&self) -> Self {
        match self {
            Value::LiteralBool(n) => Value::LiteralBool(ValueLiteralBool {
                id: NodeId::fresh(),
                source_range: n.source_range,
                value: n.value,
            }),
            Value::LiteralNumber(n) => Value::LiteralNumber(ValueLiteralNumber {
                id: NodeId::fresh(),
                source_range: n.source_range,
                ty: n.ty.deep_clone(),
                scalar: n.scalar,
            }),
            Value::Symbol(n) => Value::Symbol(n.deep_clone()),
            Value::Unary(n) => Value::Unary(ValueUnary {
                id: NodeId::fresh(),
                source_range: n.source_range,
                op: n.op,
                operand: Box::new(n.operand.deep_clone()),
            }),
            Value::Binary(n) => Value::Binary(ValueBinary {
                id: NodeId::fresh(),
                source_range: n.source_range,
                op: n.op,
                lhs: Box::new(n.lhs.deep_clone()),
                rhs: match &n.rhs {
                    BinaryRhs::Value(v) => BinaryRhs::Value(Box::new(v.deep_clone())),
                    BinaryRhs::Symbol(s) => BinaryRhs::Symbol(s.deep_clone()),
                },
            }),
            Value::Call(n) => Value::Call(ValueCall {
                id: NodeId::fresh(),
                source_range: n.source_range,
                callee: Box::new(n.callee.deep_clone()),
                args: n.args.iter().map(Value::deep_clone).collect(),
            }),
            Value::Cast(n) => Value::Cast(ValueCast {
                id: NodeId::fresh(),
                source_range: n.source_range,
                value: Box::new(n.value.deep_clone()),
                ty: n.ty.deep_clone(),
            }),
        }
    }
}

impl ValueSymbol {
    pub fn deep_clone(&self) -> Self {
        Self {
            id: NodeId::fresh(),
            source_range: self.source_range,
            name: self.name.clone(),
        }
    }
}

impl Statement {
    pub fn deep_clone(&self) -> Self {
        match self {
            Statement::Basic(n) => Statement::Basic(StatementBasic {
                id: NodeId::fresh(),
                source_range: n.source_range,
                kind: n.kind,
            }),
            Statement::Value(n) => Statement::Value(StatementValue {
                id: NodeId::fresh(),
                source_range: n.source_range,
                kind: n.kind,
                value: n.value.deep_clone(),
            }),
            Statement::If(n) => Statement::If(n.deep_clone()),
            Statement::While(n) => Statement::While(StatementWhile {
                id: NodeId::fresh(),
                source_range: n.source_range,
                condition: n.condition.deep_clone(),
                body: n.body.deep_clone(),
                is_do_while: n.is_do_while,
            }),
            Statement::Block(n) => Statement::Block(n.deep_clone()),
            Statement::Declaration(n) => Statement::Declaration(StatementDeclaration {
                id: NodeId::fresh(),
                source_range: n.source_range,
                decl: n.decl.deep_clone(),
            }),
        }
    }
}

impl StatementIf {
    pub fn deep_clone(&self) -> Self {
        Self {
            id: NodeId::fresh(),
            source_range: self.source_range,
            condition: self.condition.deep_clone(),
            then_block: self.then_block.deep_clone(),
            else_branch: self.else_branch.as_ref().map(|branch| match branch {
                ElseBranch::If(b) => ElseBranch::If(Box::new(b.deep_clone())),
                ElseBranch::Block(b) => ElseBranch::Block(b.deep_clone()),
            }),
        }
    }
}

impl StatementBlock {
    pub fn deep_clone(&self) -> Self {
        Self {
            id: NodeId::fresh(),
            source_range: self.source_range,
            statements: self.statements.iter().map(Statement::deep_clone).collect(),
        }
    }
}

impl Declaration {
    pub fn deep_clone(&self) -> Self {
        match self {
            Declaration::Variable(n) => Declaration::Variable(n.deep_clone()),
            Declaration::Function(n) => Declaration::Function(DeclarationFunction {
                id: NodeId::fresh(),
                source_range: n.source_range,
                name: n.name.clone(),
                args: n.args.iter().map(DeclarationVariable::deep_clone).collect(),
                return_type: n.return_type.as_ref().map(Type::deep_clone),
                body: n.body.as_ref().map(StatementBlock::deep_clone),
            }),
            Declaration::TypeAlias(n) => Declaration::TypeAlias(DeclarationTypeAlias {
                id: NodeId::fresh(),
                source_range: n.source_range,
                name: n.name.clone(),
                ty: n.ty.deep_clone(),
                is_explicit: n.is_explicit,
            }),
            Declaration::StructuredType(n) => {
                Declaration::StructuredType(DeclarationStructuredType {
                    id: NodeId::fresh(),
                    source_range: n.source_range,
                    name: n.name.clone(),
                    kind: n.kind,
                    members: n.members.iter().map(Declaration::deep_clone).collect(),
                    inherits: n.inherits.iter().map(TypeSymbol::deep_clone).collect(),
                })
            }
            Declaration::Namespace(n) => Declaration::Namespace(DeclarationNamespace {
                id: NodeId::fresh(),
                source_range: n.source_range,
                name: n.name.clone(),
                members: n.members.iter().map(Declaration::deep_clone).collect(),
            }),
        }
    }
}

impl DeclarationVariable {
    pub fn deep_clone(&self) -> Self {
        Self {
            id: NodeId::fresh(),
            source_range: self.source_range,
            name: self.name.clone(),
            ty: self.ty.as_ref().map(Type::deep_clone),
            initial_value: self.initial_value.as_ref().map(Value::deep_clone),
            is_const: self.is_const,
        }
    }
}
