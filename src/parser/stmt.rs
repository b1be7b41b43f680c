use crate::{
    ast::{
        ast::{Node, NodeKind},
        expressions::{BinaryExpr, BinaryOperator},
        statements::{BlockKind, BlockStmt, IfStmt},
    },
    errors::errors::{Error, ErrorImpl},
    lexer::tokens::TokenKind,
    parser::{
        expr::{ensure_expression, parse_expr},
        lookups::BindingPower,
    },
};

use super::parser::Parser;

/// A declaration: a registered statement form, or an expression ended by a
/// newline, `;` or end of input.
pub fn parse_stmt<'src>(parser: &mut Parser<'src>) -> Result<Node<'src>, Error> {
    parser.nested(declaration)
}

fn declaration<'src>(parser: &mut Parser<'src>) -> Result<Node<'src>, Error> {
    let kind = parser.peek_kind()?;
    if let Some(handler) = parser.get_stmt_lookup().get(&kind).copied() {
        return handler(parser);
    }

    let expr = parse_expr(parser, BindingPower::Assignment)?;
    parser.expect_terminator()?;

    Ok(expr)
}

/// Conditions of `if` and `while` must be plain expressions.
fn parse_condition<'src>(parser: &mut Parser<'src>) -> Result<Node<'src>, Error> {
    ensure_expression(parse_expr(parser, BindingPower::Assignment)?)
}

pub fn parse_block_stmt<'src>(parser: &mut Parser<'src>) -> Result<Node<'src>, Error> {
    let open = parser.expect_error(TokenKind::OpenCurly, "expected `{` to open block")?;

    let mut body = vec![];
    loop {
        if parser.skip_newlines()? {
            let token = parser.peek()?;
            return Err(Error::new(
                ErrorImpl::UnexpectedTokenDetailed {
                    token: token.to_string(),
                    message: String::from("expected `}` to close block"),
                },
                token.span.start.clone(),
            ));
        }

        if parser.peek_kind()? == TokenKind::CloseCurly {
            break;
        }

        body.push(parse_stmt(parser)?);
    }

    let close = parser.advance()?;

    Ok(Node::new(
        NodeKind::Block(BlockStmt {
            kind: BlockKind::Statements,
            body,
        }),
        open.span.to(&close.span),
    ))
}

/// `if cond { } [else if cond { } ...] [else { }]`
pub fn parse_if_stmt<'src>(parser: &mut Parser<'src>) -> Result<Node<'src>, Error> {
    let start = parser.expect(TokenKind::If)?.span;

    let condition = parse_condition(parser)?;
    let then_body = parse_block_stmt(parser)?;

    let else_body = if parser.peek_kind()? == TokenKind::Else {
        parser.advance()?;
        if parser.peek_kind()? == TokenKind::If {
            // `else if` chains count toward the nesting limit like blocks do
            Some(parser.nested(parse_if_stmt)?)
        } else {
            Some(parse_block_stmt(parser)?)
        }
    } else {
        None
    };

    let span = start.to(&else_body.as_ref().unwrap_or(&then_body).span);

    Ok(Node::new(
        NodeKind::If(IfStmt {
            condition: Box::new(condition),
            then_body: Box::new(then_body),
            else_body: else_body.map(Box::new),
        }),
        span,
    ))
}

/// `while cond { }`, kept as a binary node of condition and body.
pub fn parse_while_stmt<'src>(parser: &mut Parser<'src>) -> Result<Node<'src>, Error> {
    let start = parser.expect(TokenKind::While)?.span;

    let condition = parse_condition(parser)?;
    let body = parse_block_stmt(parser)?;
    let span = start.to(&body.span);

    Ok(Node::new(
        NodeKind::Binary(BinaryExpr {
            operator: BinaryOperator::While,
            left: Box::new(condition),
            right: Box::new(body),
        }),
        span,
    ))
}
