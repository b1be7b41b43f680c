use std::fmt::Display;

use super::ast::Node;

// LITERALS

/// Symbol Expression
/// An identifier, borrowed from the source.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SymbolExpr<'src> {
    pub value: &'src str,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Literal<'src> {
    Null,
    Boolean(bool),
    Character(char),
    Integer(i64),
    Float(f64),
    String(&'src str),
}

/// Literal Expression
/// The raw value of a literal, sign already applied for folded negatives.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LiteralExpr<'src> {
    pub value: Literal<'src>,
}

// COMPLEX

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOperator {
    Not,
    Negate,
}

impl Display for UnaryOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UnaryOperator::Not => write!(f, "!"),
            UnaryOperator::Negate => write!(f, "-"),
        }
    }
}

/// Unary Expression
#[derive(Debug, Clone, PartialEq)]
pub struct UnaryExpr<'src> {
    pub operator: UnaryOperator,
    pub operand: Box<Node<'src>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOperator {
    /// `name : Type`, only produced for parameters.
    Declaration,
    Assignment,
    /// `while` keeps its condition on the left and its body on the right.
    While,
    Add,
    Subtract,
    Multiply,
    Divide,
    And,
    Or,
    Equal,
    NotEqual,
}

impl Display for BinaryOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            BinaryOperator::Declaration => ":",
            BinaryOperator::Assignment => "=",
            BinaryOperator::While => "while",
            BinaryOperator::Add => "+",
            BinaryOperator::Subtract => "-",
            BinaryOperator::Multiply => "*",
            BinaryOperator::Divide => "/",
            BinaryOperator::And => "&&",
            BinaryOperator::Or => "||",
            BinaryOperator::Equal => "==",
            BinaryOperator::NotEqual => "!=",
        };

        write!(f, "{}", text)
    }
}

/// Binary Expression
#[derive(Debug, Clone, PartialEq)]
pub struct BinaryExpr<'src> {
    pub operator: BinaryOperator,
    pub left: Box<Node<'src>>,
    pub right: Box<Node<'src>>,
}
