use std::slice::{Iter, IterMut};

use super::ast::Node;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    /// `{ ... }`, opens a scope.
    Statements,
    /// A comma separated list such as parameters.
    List,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BlockStmt<'src> {
    pub kind: BlockKind,
    pub body: Vec<Node<'src>>,
}

impl<'src> BlockStmt<'src> {
    pub fn iter(&self) -> Iter<'_, Node<'src>> {
        self.body.iter()
    }
    pub fn iter_mut(&mut self) -> IterMut<'_, Node<'src>> {
        self.body.iter_mut()
    }
}

/// `name := value`, `name :: value`, or either with `: Type` before the
/// second colon or `=`.
#[derive(Debug, Clone, PartialEq)]
pub struct InstantiationStmt<'src> {
    /// Always a `Symbol` node.
    pub name: Box<Node<'src>>,
    pub signature: Option<Box<Node<'src>>>,
    pub value: Box<Node<'src>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FnDeclStmt<'src> {
    /// A `List` block of `Declaration` nodes.
    pub parameters: Box<Node<'src>>,
    pub return_type: Option<Box<Node<'src>>>,
    pub body: Box<Node<'src>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IfStmt<'src> {
    pub condition: Box<Node<'src>>,
    pub then_body: Box<Node<'src>>,
    /// Either a block or another `If` for `else if` chains.
    pub else_body: Option<Box<Node<'src>>>,
}
