//! Parser implementation for building the Abstract Syntax Tree.
//!
//! The parser pulls tokens from the lexer on demand. Expressions are parsed
//! with NUD/LED handlers looked up per token kind, statements with their own
//! handler table. Top-level declarations recover from errors so that one
//! malformed line does not hide problems further down the file.

use std::collections::HashMap;

use tracing::{debug, trace};

use crate::{
    ast::{
        ast::{Node, NodeKind},
        statements::{BlockKind, BlockStmt},
    },
    errors::errors::{Error, ErrorImpl},
    lexer::{
        lexer::Lexer,
        tokens::{Token, TokenKind},
    },
    Position, Span,
};

use super::{
    expr::{ensure_expression, parse_expr},
    lookups::{
        create_token_lookups, BindingPower, LEDHandler, LEDLookup, NUDHandler, NUDLookup,
        StmtHandler, StmtLookup,
    },
    stmt::parse_stmt,
};

/// How many expressions and statements may be open at once. Deeper input is
/// rejected instead of exhausting the stack.
pub const MAX_NESTING_DEPTH: usize = 64;

/// The main parser structure that maintains parsing state.
pub struct Parser<'src> {
    /// Token source with one token of lookahead
    lexer: Lexer<'src>,
    /// Number of tokens consumed so far
    consumed: usize,
    /// Expressions and statements currently being parsed
    depth: usize,
    /// Lookup table for statement parsing handlers
    stmt_lookup: StmtLookup,
    /// Lookup table for null denotation (prefix) expression handlers
    nud_lookup: NUDLookup,
    /// Lookup table for left denotation (infix) expression handlers
    led_lookup: LEDLookup,
}

impl<'src> Parser<'src> {
    /// Creates a parser over `source` with every handler registered.
    pub fn new(source: &'src str, file: &str) -> Self {
        let mut parser = Parser {
            lexer: Lexer::new(source, file),
            consumed: 0,
            depth: 0,
            stmt_lookup: HashMap::new(),
            nud_lookup: HashMap::new(),
            led_lookup: HashMap::new(),
        };

        create_token_lookups(&mut parser);
        parser
    }

    /// Returns the next token without consuming it.
    pub fn peek(&mut self) -> Result<&Token<'src>, Error> {
        self.lexer.peek()
    }

    /// Returns the kind of the next token.
    pub fn peek_kind(&mut self) -> Result<TokenKind, Error> {
        Ok(self.lexer.peek()?.kind)
    }

    /// Consumes and returns the next token.
    pub fn advance(&mut self) -> Result<Token<'src>, Error> {
        let token = self.lexer.next()?;
        self.consumed += 1;
        Ok(token)
    }

    /// Consumes the next token if it has the given kind.
    pub fn expect_error(&mut self, expected_kind: TokenKind, message: &str) -> Result<Token<'src>, Error> {
        let token = self.peek()?;
        if token.kind != expected_kind {
            return Err(Error::new(
                ErrorImpl::UnexpectedTokenDetailed {
                    token: token.to_string(),
                    message: message.to_string(),
                },
                token.span.start.clone(),
            ));
        }

        self.advance()
    }

    /// Like [`Parser::expect_error`] with a message naming the expected kind.
    pub fn expect(&mut self, expected_kind: TokenKind) -> Result<Token<'src>, Error> {
        self.expect_error(expected_kind, &format!("expected {}", expected_kind))
    }

    /// Skips newline tokens and reports whether end of input was reached.
    pub fn skip_newlines(&mut self) -> Result<bool, Error> {
        while self.peek_kind()? == TokenKind::Newline {
            self.advance()?;
        }

        Ok(self.peek_kind()? == TokenKind::EOF)
    }

    /// Consumes the newline or `;` ending a statement. End of input also ends
    /// a statement but is left in place.
    pub fn expect_terminator(&mut self) -> Result<(), Error> {
        match self.peek_kind()? {
            TokenKind::Newline | TokenKind::Semicolon => {
                self.advance()?;
                Ok(())
            }
            TokenKind::EOF => Ok(()),
            _ => {
                let token = self.peek()?;
                Err(Error::new(
                    ErrorImpl::MissingTerminator {
                        token: token.to_string(),
                    },
                    token.span.start.clone(),
                ))
            }
        }
    }

    /// Runs `parse` one nesting level deeper, failing at the start of the
    /// level past [`MAX_NESTING_DEPTH`].
    pub fn nested<T>(
        &mut self,
        parse: impl FnOnce(&mut Parser<'src>) -> Result<T, Error>,
    ) -> Result<T, Error> {
        if self.depth >= MAX_NESTING_DEPTH {
            let position = self.peek()?.span.start.clone();
            return Err(Error::new(
                ErrorImpl::NestingTooDeep {
                    limit: MAX_NESTING_DEPTH,
                },
                position,
            ));
        }

        self.depth += 1;
        let result = parse(self);
        self.depth -= 1;
        result
    }

    /// Drops a lexing error waiting in the lookahead. It has already been
    /// reported by whichever call peeked it.
    fn discard_lexing_error(&mut self) {
        if self.lexer.discard_failed_peek() {
            trace!("dropped failed lookahead");
        }
    }

    pub fn get_stmt_lookup(&self) -> &StmtLookup {
        &self.stmt_lookup
    }

    pub fn get_nud_lookup(&self) -> &NUDLookup {
        &self.nud_lookup
    }

    pub fn get_led_lookup(&self) -> &LEDLookup {
        &self.led_lookup
    }

    /// Registers a left denotation (infix) handler for a token. The token's
    /// precedence comes from [`TokenKind::binding_power`].
    pub fn led(&mut self, kind: TokenKind, led_fn: LEDHandler) {
        debug_assert!(kind.binding_power() > BindingPower::None);
        self.led_lookup.insert(kind, led_fn);
    }

    /// Registers a null denotation (prefix) handler for a token.
    pub fn nud(&mut self, kind: TokenKind, nud_fn: NUDHandler) {
        self.nud_lookup.insert(kind, nud_fn);
    }

    /// Registers a statement handler for a token.
    pub fn stmt(&mut self, kind: TokenKind, stmt_fn: StmtHandler) {
        self.stmt_lookup.insert(kind, stmt_fn);
    }

    /// Tokens consumed and source bytes scanned so far, used to detect a
    /// declaration that failed without moving.
    fn progress(&self) -> (usize, usize) {
        (self.consumed, self.lexer.offset())
    }

    pub fn get_position(&self) -> Position {
        self.lexer.location()
    }
}

/// Parses `source` into a root block of top-level declarations.
///
/// Errors are collected per declaration and parsing resumes right after the
/// failure. There is no resynchronization, so one bad line can produce
/// follow-up errors on the next.
pub fn parse<'src>(source: &'src str, file: &str) -> Result<Node<'src>, Vec<Error>> {
    let mut parser = Parser::new(source, file);
    let start = Position::new(1, 1, parser.lexer.file());

    let mut body = vec![];
    let mut errors = vec![];

    loop {
        match parser.skip_newlines() {
            Ok(true) => break,
            Ok(false) => {}
            Err(error) => {
                errors.push(error);
                parser.discard_lexing_error();
                continue;
            }
        }

        let before = parser.progress();
        match parse_stmt(&mut parser) {
            Ok(stmt) => {
                trace!("parsed declaration at {}", stmt.span.start);
                body.push(stmt);
            }
            Err(error) => {
                debug!("recovering from parse error: {}", error);
                errors.push(error);
                parser.discard_lexing_error();

                if parser.progress() == before {
                    if let Err(error) = parser.advance() {
                        errors.push(error);
                    }
                }
            }
        }
    }

    debug!(
        "parsed {} declarations with {} errors",
        body.len(),
        errors.len()
    );

    if !errors.is_empty() {
        return Err(errors);
    }

    Ok(Node::new(
        NodeKind::Block(BlockStmt {
            kind: BlockKind::Statements,
            body,
        }),
        Span {
            start,
            end: parser.get_position(),
        },
    ))
}

/// Parses `source` as a single expression.
///
/// Statement-only forms such as assignments and instantiations are rejected.
/// Only newlines may follow the expression.
pub fn parse_expression<'src>(source: &'src str, file: &str) -> Result<Node<'src>, Error> {
    let mut parser = Parser::new(source, file);

    parser.skip_newlines()?;
    let expr = ensure_expression(parse_expr(&mut parser, BindingPower::Assignment)?)?;

    if !parser.skip_newlines()? {
        let token = parser.peek()?;
        return Err(Error::new(
            ErrorImpl::UnexpectedTokenDetailed {
                token: token.to_string(),
                message: String::from("expected end of input after expression"),
            },
            token.span.start.clone(),
        ));
    }

    Ok(expr)
}
