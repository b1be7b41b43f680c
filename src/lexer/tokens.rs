use lazy_static::lazy_static;
use std::{collections::HashMap, fmt::Display};

use crate::{parser::lookups::BindingPower, Span};

lazy_static! {
    pub static ref RESERVED_LOOKUP: HashMap<&'static str, (TokenKind, TokenValue<'static>)> = {
        let mut map = HashMap::new();
        map.insert("null", (TokenKind::Null, TokenValue::None));
        map.insert("true", (TokenKind::Boolean, TokenValue::Boolean(true)));
        map.insert("false", (TokenKind::Boolean, TokenValue::Boolean(false)));
        map.insert("if", (TokenKind::If, TokenValue::None));
        map.insert("else", (TokenKind::Else, TokenValue::None));
        map.insert("while", (TokenKind::While, TokenValue::None));
        map.insert("fn", (TokenKind::Fn, TokenValue::None));
        map
    };
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum TokenKind {
    EOF,

    // Literals
    Null,
    Boolean,
    Character,
    Integer,
    Float,
    String,

    Identifier,

    // Delimiters
    Newline,
    Semicolon,
    Comma,
    OpenParen,
    CloseParen,
    OpenCurly,
    CloseCurly,

    Assignment, // =
    Equals,     // ==
    Not,        // !
    NotEquals,  // !=

    And,
    Or,

    Colon,
    Arrow,

    Plus,
    Dash,
    Star,
    Slash,

    // Reserved
    If,
    Else,
    While,
    Fn,
}

impl TokenKind {
    /// The fixed precedence this kind binds with when it follows an expression.
    pub fn binding_power(&self) -> BindingPower {
        match self {
            TokenKind::Assignment => BindingPower::Assignment,
            TokenKind::Colon => BindingPower::Colon,
            TokenKind::And | TokenKind::Or => BindingPower::Logical,
            TokenKind::Equals | TokenKind::NotEquals => BindingPower::Equality,
            TokenKind::Plus | TokenKind::Dash => BindingPower::Term,
            TokenKind::Star | TokenKind::Slash => BindingPower::Factor,
            TokenKind::Not => BindingPower::Unary,
            TokenKind::OpenParen => BindingPower::Call,
            TokenKind::Null
            | TokenKind::Boolean
            | TokenKind::Character
            | TokenKind::Integer
            | TokenKind::Float
            | TokenKind::String
            | TokenKind::Identifier => BindingPower::Primary,
            _ => BindingPower::None,
        }
    }
}

impl Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// The decoded payload of a token. Text payloads borrow from the source.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TokenValue<'src> {
    None,
    Boolean(bool),
    Character(char),
    /// Magnitude only. The sign and the i64 range check are applied by the
    /// parser, which sees a leading `-`.
    Integer(u64),
    Float(f64),
    String(&'src str),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token<'src> {
    pub kind: TokenKind,
    pub value: TokenValue<'src>,
    /// The exact source text the token was scanned from.
    pub lexeme: &'src str,
    pub span: Span,
}

impl Display for Token<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.kind {
            TokenKind::EOF => write!(f, "end of input"),
            TokenKind::Newline => write!(f, "newline"),
            _ => write!(f, "{}", self.lexeme),
        }
    }
}
