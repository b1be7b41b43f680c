use crate::{
    ast::{
        ast::{Node, NodeKind},
        expressions::{
            BinaryExpr, BinaryOperator, Literal, LiteralExpr, SymbolExpr, UnaryExpr, UnaryOperator,
        },
        statements::{BlockKind, BlockStmt, FnDeclStmt, InstantiationStmt},
    },
    errors::errors::{Error, ErrorImpl},
    lexer::tokens::{Token, TokenKind, TokenValue},
};

use super::{lookups::BindingPower, parser::Parser, stmt::parse_block_stmt};

/// Precedence climbing: one prefix handler, then infix handlers for as long
/// as the next token binds at least as tightly as `bp`.
pub fn parse_expr<'src>(parser: &mut Parser<'src>, bp: BindingPower) -> Result<Node<'src>, Error> {
    parser.nested(|parser| climb(parser, bp))
}

fn climb<'src>(parser: &mut Parser<'src>, bp: BindingPower) -> Result<Node<'src>, Error> {
    let token = parser.advance()?;
    let Some(nud) = parser.get_nud_lookup().get(&token.kind).copied() else {
        return Err(unexpected_prefix(&token));
    };

    let mut left = nud(parser, token)?;

    loop {
        let token_bp = parser.peek_kind()?.binding_power();
        if token_bp == BindingPower::None || token_bp < bp {
            break;
        }

        let token = parser.advance()?;
        let Some(led) = parser.get_led_lookup().get(&token.kind).copied() else {
            return Err(unexpected_infix(&token));
        };

        left = led(parser, left, token)?;
    }

    Ok(left)
}

fn unexpected_prefix(token: &Token) -> Error {
    let error = match token.kind.binding_power() {
        BindingPower::None | BindingPower::Primary => ErrorImpl::UnexpectedToken {
            token: token.to_string(),
        },
        _ => ErrorImpl::UnexpectedOperator {
            operator: token.lexeme.to_string(),
        },
    };

    Error::new(error, token.span.start.clone())
}

fn unexpected_infix(token: &Token) -> Error {
    // A value right after a complete expression means the statement ran on.
    let error = match token.kind.binding_power() {
        BindingPower::Primary => ErrorImpl::MissingTerminator {
            token: token.to_string(),
        },
        _ => ErrorImpl::UnexpectedOperator {
            operator: token.lexeme.to_string(),
        },
    };

    Error::new(error, token.span.start.clone())
}

/// Rejects forms that are only legal as statements.
pub fn ensure_expression<'src>(node: Node<'src>) -> Result<Node<'src>, Error> {
    if let Some(form) = node.statement_form() {
        return Err(Error::new(
            ErrorImpl::StatementInExpression {
                form: form.to_string(),
            },
            node.span.start.clone(),
        ));
    }

    Ok(node)
}

fn literal_from_token<'src>(token: &Token<'src>) -> Result<Literal<'src>, Error> {
    match (token.kind, token.value) {
        (TokenKind::Null, _) => Ok(Literal::Null),
        (TokenKind::Boolean, TokenValue::Boolean(value)) => Ok(Literal::Boolean(value)),
        (TokenKind::Character, TokenValue::Character(value)) => Ok(Literal::Character(value)),
        (TokenKind::Integer, TokenValue::Integer(magnitude)) => integer_literal(token, magnitude, false),
        (TokenKind::Float, TokenValue::Float(value)) => Ok(Literal::Float(value)),
        (TokenKind::String, TokenValue::String(value)) => Ok(Literal::String(value)),
        _ => Err(unexpected_prefix(token)),
    }
}

/// Applies the sign to an integer token. `-9223372036854775808` is the one
/// magnitude that only fits when negated.
fn integer_literal<'src>(token: &Token<'src>, magnitude: u64, negative: bool) -> Result<Literal<'src>, Error> {
    let value = if negative {
        0i64.checked_sub_unsigned(magnitude)
    } else {
        i64::try_from(magnitude).ok()
    };

    value.map(Literal::Integer).ok_or_else(|| {
        Error::new(
            ErrorImpl::NumberParseError {
                token: format!("{}{}", if negative { "-" } else { "" }, token.lexeme),
            },
            token.span.start.clone(),
        )
    })
}

pub fn parse_primary_expr<'src>(_parser: &mut Parser<'src>, token: Token<'src>) -> Result<Node<'src>, Error> {
    if token.kind == TokenKind::Identifier {
        return Ok(Node::new(
            NodeKind::Symbol(SymbolExpr {
                value: token.lexeme,
            }),
            token.span,
        ));
    }

    let value = literal_from_token(&token)?;
    Ok(Node::new(NodeKind::Literal(LiteralExpr { value }), token.span))
}

pub fn parse_prefix_expr<'src>(parser: &mut Parser<'src>, token: Token<'src>) -> Result<Node<'src>, Error> {
    let operator = match token.kind {
        TokenKind::Not => UnaryOperator::Not,
        TokenKind::Dash => UnaryOperator::Negate,
        _ => return Err(unexpected_prefix(&token)),
    };

    if operator == UnaryOperator::Negate {
        let next = parser.peek_kind()?;
        if next == TokenKind::Integer || next == TokenKind::Float {
            // `-1` is a negative literal rather than a negation
            let literal = parser.advance()?;
            let value = match literal.value {
                TokenValue::Integer(magnitude) => integer_literal(&literal, magnitude, true)?,
                TokenValue::Float(value) => Literal::Float(-value),
                _ => return Err(unexpected_prefix(&literal)),
            };

            return Ok(Node::new(
                NodeKind::Literal(LiteralExpr { value }),
                token.span.to(&literal.span),
            ));
        }
    }

    let operand = parse_expr(parser, BindingPower::Unary)?;
    let span = token.span.to(&operand.span);

    Ok(Node::new(
        NodeKind::Unary(UnaryExpr {
            operator,
            operand: Box::new(operand),
        }),
        span,
    ))
}

pub fn parse_binary_expr<'src>(
    parser: &mut Parser<'src>,
    left: Node<'src>,
    token: Token<'src>,
) -> Result<Node<'src>, Error> {
    let operator = match token.kind {
        TokenKind::Plus => BinaryOperator::Add,
        TokenKind::Dash => BinaryOperator::Subtract,
        TokenKind::Star => BinaryOperator::Multiply,
        TokenKind::Slash => BinaryOperator::Divide,
        TokenKind::And => BinaryOperator::And,
        TokenKind::Or => BinaryOperator::Or,
        TokenKind::Equals => BinaryOperator::Equal,
        TokenKind::NotEquals => BinaryOperator::NotEqual,
        _ => return Err(unexpected_infix(&token)),
    };

    let right = parse_expr(parser, token.kind.binding_power().next())?;

    Ok(binary(operator, left, right))
}

pub fn parse_assignment_expr<'src>(
    parser: &mut Parser<'src>,
    left: Node<'src>,
    token: Token<'src>,
) -> Result<Node<'src>, Error> {
    let value = parse_expr(parser, token.kind.binding_power().next())?;

    Ok(binary(BinaryOperator::Assignment, left, value))
}

fn binary<'src>(operator: BinaryOperator, left: Node<'src>, right: Node<'src>) -> Node<'src> {
    let span = left.span.to(&right.span);

    Node::new(
        NodeKind::Binary(BinaryExpr {
            operator,
            left: Box::new(left),
            right: Box::new(right),
        }),
        span,
    )
}

/// `name := value`, `name :: value`, `name : T = value` and `name : T : value`.
pub fn parse_colon_expr<'src>(
    parser: &mut Parser<'src>,
    left: Node<'src>,
    token: Token<'src>,
) -> Result<Node<'src>, Error> {
    if left.as_symbol().is_none() {
        return Err(Error::new(
            ErrorImpl::InvalidInstantiationTarget,
            left.span.start.clone(),
        ));
    }

    let signature = match parser.peek_kind()? {
        TokenKind::Assignment | TokenKind::Colon => None,
        _ => {
            let name = parser.expect_error(TokenKind::Identifier, "expected a type name")?;
            Some(Box::new(Node::new(
                NodeKind::Symbol(SymbolExpr { value: name.lexeme }),
                name.span,
            )))
        }
    };

    let is_constant = match parser.peek_kind()? {
        TokenKind::Assignment => false,
        TokenKind::Colon => true,
        _ => {
            return Err(Error::not_implemented(
                "declaration without a value",
                token.span.start,
            ))
        }
    };
    parser.advance()?;

    let value = parse_expr(parser, BindingPower::Colon.next())?;
    let span = left.span.to(&value.span);

    let instantiation = InstantiationStmt {
        name: Box::new(left),
        signature,
        value: Box::new(value),
    };

    let kind = if is_constant {
        NodeKind::ConstantInstantiation(instantiation)
    } else {
        NodeKind::VariableInstantiation(instantiation)
    };

    Ok(Node::new(kind, span))
}

/// `( expr )`
pub fn parse_grouping_expr<'src>(parser: &mut Parser<'src>, _token: Token<'src>) -> Result<Node<'src>, Error> {
    let expr = ensure_expression(parse_expr(parser, BindingPower::Assignment)?)?;
    parser.expect_error(TokenKind::CloseParen, "expected `)` to close group")?;

    Ok(expr)
}

/// `fn (name: T, ...) [-> T] { body }`
pub fn parse_fn_expr<'src>(parser: &mut Parser<'src>, token: Token<'src>) -> Result<Node<'src>, Error> {
    let open = parser.expect_error(TokenKind::OpenParen, "expected `(` to open parameter list")?;

    let mut parameters = vec![];
    while parser.peek_kind()? != TokenKind::CloseParen {
        if !parameters.is_empty() {
            parser.expect_error(TokenKind::Comma, "expected `,` between parameters")?;
        }

        let name = parser.expect_error(TokenKind::Identifier, "expected parameter name")?;
        parser.expect_error(TokenKind::Colon, "expected `:` after parameter name")?;
        let ty = parser.expect_error(TokenKind::Identifier, "expected parameter type")?;

        parameters.push(binary(
            BinaryOperator::Declaration,
            Node::new(NodeKind::Symbol(SymbolExpr { value: name.lexeme }), name.span),
            Node::new(NodeKind::Symbol(SymbolExpr { value: ty.lexeme }), ty.span),
        ));
    }

    let close = parser.expect_error(TokenKind::CloseParen, "expected `)` to close parameter list")?;

    let return_type = if parser.peek_kind()? == TokenKind::Arrow {
        parser.advance()?;
        let ty = parser.expect_error(TokenKind::Identifier, "expected return type")?;
        Some(Box::new(Node::new(
            NodeKind::Symbol(SymbolExpr { value: ty.lexeme }),
            ty.span,
        )))
    } else {
        None
    };

    let body = parse_block_stmt(parser)?;
    let span = token.span.to(&body.span);

    let parameters = Node::new(
        NodeKind::Block(BlockStmt {
            kind: BlockKind::List,
            body: parameters,
        }),
        open.span.to(&close.span),
    );

    Ok(Node::new(
        NodeKind::FnDecl(FnDeclStmt {
            parameters: Box::new(parameters),
            return_type,
            body: Box::new(body),
        }),
        span,
    ))
}
