use crate::Span;

use super::{
    expressions::{BinaryExpr, BinaryOperator, LiteralExpr, SymbolExpr, UnaryExpr},
    statements::{BlockStmt, FnDeclStmt, IfStmt, InstantiationStmt},
    types::Type,
};

/// Node kinds
///
/// Every shape the parser can produce. Consumers match exhaustively, so a new
/// kind has to be handled everywhere before the crate builds again.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind<'src> {
    Symbol(SymbolExpr<'src>),
    Literal(LiteralExpr<'src>),
    Unary(UnaryExpr<'src>),
    Binary(BinaryExpr<'src>),
    Block(BlockStmt<'src>),
    VariableInstantiation(InstantiationStmt<'src>),
    ConstantInstantiation(InstantiationStmt<'src>),
    FnDecl(FnDeclStmt<'src>),
    If(IfStmt<'src>),
}

/// A node of the syntax tree.
///
/// `ty` is empty until the type checker visits the node and is written
/// exactly once.
#[derive(Debug, Clone, PartialEq)]
pub struct Node<'src> {
    pub kind: NodeKind<'src>,
    pub ty: Option<Type>,
    pub span: Span,
}

impl<'src> Node<'src> {
    pub fn new(kind: NodeKind<'src>, span: Span) -> Self {
        Node {
            kind,
            ty: None,
            span,
        }
    }

    /// Records the resolved type.
    ///
    /// # Panics
    ///
    /// If the node was already typed.
    pub fn set_type(&mut self, ty: Type) {
        assert!(
            self.ty.is_none(),
            "node at {} was type checked twice",
            self.span.start
        );
        self.ty = Some(ty);
    }

    pub fn as_symbol(&self) -> Option<&SymbolExpr<'src>> {
        match &self.kind {
            NodeKind::Symbol(symbol) => Some(symbol),
            _ => None,
        }
    }

    pub fn as_block(&self) -> Option<&BlockStmt<'src>> {
        match &self.kind {
            NodeKind::Block(block) => Some(block),
            _ => None,
        }
    }

    /// Names the statement-only form this node is, if it is one.
    pub fn statement_form(&self) -> Option<&'static str> {
        match &self.kind {
            NodeKind::VariableInstantiation(_) => Some("variable instantiation"),
            NodeKind::ConstantInstantiation(_) => Some("constant instantiation"),
            NodeKind::Binary(BinaryExpr {
                operator: BinaryOperator::Assignment,
                ..
            }) => Some("assignment"),
            NodeKind::Binary(BinaryExpr {
                operator: BinaryOperator::Declaration,
                ..
            }) => Some("declaration"),
            _ => None,
        }
    }
}
