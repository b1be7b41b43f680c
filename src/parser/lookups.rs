use std::collections::HashMap;

use crate::{ast::ast::Node, errors::errors::Error, lexer::tokens::{Token, TokenKind}};

use super::{expr::*, parser::Parser, stmt::*};

/// How tightly a token binds to the expression on its left, weakest first.
#[derive(PartialEq, Eq, PartialOrd, Ord, Clone, Copy, Debug)]
pub enum BindingPower {
    None,
    Assignment,
    Colon,
    Logical,
    Equality,
    Term,
    Factor,
    Unary,
    Call,
    Primary,
}

impl BindingPower {
    /// The level one step tighter. Right operands are parsed at this level,
    /// which makes every binary operator left associative.
    pub fn next(self) -> BindingPower {
        match self {
            BindingPower::None => BindingPower::Assignment,
            BindingPower::Assignment => BindingPower::Colon,
            BindingPower::Colon => BindingPower::Logical,
            BindingPower::Logical => BindingPower::Equality,
            BindingPower::Equality => BindingPower::Term,
            BindingPower::Term => BindingPower::Factor,
            BindingPower::Factor => BindingPower::Unary,
            BindingPower::Unary => BindingPower::Call,
            BindingPower::Call | BindingPower::Primary => BindingPower::Primary,
        }
    }
}

/// Statement handlers run with the introducing token still unconsumed.
pub type StmtHandler = for<'src> fn(&mut Parser<'src>) -> Result<Node<'src>, Error>;
/// Prefix handlers receive the token that selected them, already consumed.
pub type NUDHandler = for<'src> fn(&mut Parser<'src>, Token<'src>) -> Result<Node<'src>, Error>;
/// Infix handlers receive the left operand and the consumed operator.
pub type LEDHandler =
    for<'src> fn(&mut Parser<'src>, Node<'src>, Token<'src>) -> Result<Node<'src>, Error>;

pub fn create_token_lookups(parser: &mut Parser) {
    parser.led(TokenKind::Assignment, parse_assignment_expr);
    parser.led(TokenKind::Colon, parse_colon_expr);

    // Logical
    parser.led(TokenKind::And, parse_binary_expr);
    parser.led(TokenKind::Or, parse_binary_expr);

    // Equality
    parser.led(TokenKind::Equals, parse_binary_expr);
    parser.led(TokenKind::NotEquals, parse_binary_expr);

    // Term and factor
    parser.led(TokenKind::Plus, parse_binary_expr);
    parser.led(TokenKind::Dash, parse_binary_expr);
    parser.led(TokenKind::Star, parse_binary_expr);
    parser.led(TokenKind::Slash, parse_binary_expr);

    // Literals and symbols
    parser.nud(TokenKind::Identifier, parse_primary_expr);
    parser.nud(TokenKind::Null, parse_primary_expr);
    parser.nud(TokenKind::Boolean, parse_primary_expr);
    parser.nud(TokenKind::Character, parse_primary_expr);
    parser.nud(TokenKind::Integer, parse_primary_expr);
    parser.nud(TokenKind::Float, parse_primary_expr);
    parser.nud(TokenKind::String, parse_primary_expr);

    parser.nud(TokenKind::Not, parse_prefix_expr);
    parser.nud(TokenKind::Dash, parse_prefix_expr);
    parser.nud(TokenKind::OpenParen, parse_grouping_expr);
    parser.nud(TokenKind::Fn, parse_fn_expr);

    // Statements
    parser.stmt(TokenKind::OpenCurly, parse_block_stmt);
    parser.stmt(TokenKind::If, parse_if_stmt);
    parser.stmt(TokenKind::While, parse_while_stmt);
}

// Handler tables, keyed by the token that triggers them
pub type StmtLookup = HashMap<TokenKind, StmtHandler>;
pub type NUDLookup = HashMap<TokenKind, NUDHandler>;
pub type LEDLookup = HashMap<TokenKind, LEDHandler>;
