//! Unit tests for the lexer module.
//!
//! This module contains tests for tokenization including:
//! - Keywords and identifiers
//! - Numeric, character and string literals
//! - Operators and punctuation
//! - Comments and newline coalescing
//! - Lookahead and error cases

use proptest::prelude::*;

use crate::errors::errors::{ErrorImpl, ErrorKind};

use super::{
    lexer::{tokenize, Lexer},
    tokens::{TokenKind, TokenValue},
};

fn kinds(source: &str) -> Vec<TokenKind> {
    tokenize(source, "test.ds")
        .unwrap()
        .iter()
        .map(|token| token.kind)
        .collect()
}

#[test]
fn test_tokenize_keywords() {
    assert_eq!(
        kinds("if else while fn"),
        vec![
            TokenKind::If,
            TokenKind::Else,
            TokenKind::While,
            TokenKind::Fn,
            TokenKind::EOF
        ]
    );
}

#[test]
fn test_tokenize_identifiers() {
    let tokens = tokenize("foo bar baz_123 _underscore CamelCase iff", "test.ds").unwrap();

    assert_eq!(tokens[0].kind, TokenKind::Identifier);
    assert_eq!(tokens[0].value, TokenValue::String("foo"));
    assert_eq!(tokens[2].value, TokenValue::String("baz_123"));
    assert_eq!(tokens[3].value, TokenValue::String("_underscore"));
    assert_eq!(tokens[4].value, TokenValue::String("CamelCase"));
    assert_eq!(tokens[5].kind, TokenKind::Identifier);
    assert_eq!(tokens[6].kind, TokenKind::EOF);
}

#[test]
fn test_tokenize_reserved_literals() {
    let tokens = tokenize("null true false", "test.ds").unwrap();

    assert_eq!(tokens[0].kind, TokenKind::Null);
    assert_eq!(tokens[1].kind, TokenKind::Boolean);
    assert_eq!(tokens[1].value, TokenValue::Boolean(true));
    assert_eq!(tokens[2].kind, TokenKind::Boolean);
    assert_eq!(tokens[2].value, TokenValue::Boolean(false));
}

#[test]
fn test_tokenize_numbers() {
    let tokens = tokenize("42 3.14 0 100.5", "test.ds").unwrap();

    assert_eq!(tokens[0].kind, TokenKind::Integer);
    assert_eq!(tokens[0].value, TokenValue::Integer(42));
    assert_eq!(tokens[1].kind, TokenKind::Float);
    assert_eq!(tokens[1].value, TokenValue::Float(3.14));
    assert_eq!(tokens[2].value, TokenValue::Integer(0));
    assert_eq!(tokens[3].value, TokenValue::Float(100.5));
    assert_eq!(tokens[4].kind, TokenKind::EOF);
}

#[test]
fn test_tokenize_number_overflow() {
    let error = tokenize("99999999999999999999", "test.ds").unwrap_err();

    assert_eq!(error.kind(), ErrorKind::Lexing);
    assert_eq!(error.get_error_name(), "NumberParseError");

    // One past i64::MAX is still a token; the parser decides on the sign.
    let tokens = tokenize("9223372036854775808", "test.ds").unwrap();
    assert_eq!(tokens[0].value, TokenValue::Integer(9_223_372_036_854_775_808));
}

#[test]
fn test_tokenize_strings() {
    let tokens = tokenize(r#""hello" "multiple words" """#, "test.ds").unwrap();

    assert_eq!(tokens[0].kind, TokenKind::String);
    assert_eq!(tokens[0].value, TokenValue::String("hello"));
    assert_eq!(tokens[1].value, TokenValue::String("multiple words"));
    assert_eq!(tokens[2].value, TokenValue::String(""));
    assert_eq!(tokens[3].kind, TokenKind::EOF);
}

#[test]
fn test_tokenize_string_has_no_escapes() {
    let tokens = tokenize(r#""tab\t""#, "test.ds").unwrap();
    assert_eq!(tokens[0].value, TokenValue::String(r"tab\t"));
}

#[test]
fn test_tokenize_string_runs_to_end_of_input() {
    let tokens = tokenize("\"open", "test.ds").unwrap();

    assert_eq!(tokens[0].kind, TokenKind::String);
    assert_eq!(tokens[0].value, TokenValue::String("open"));
    assert_eq!(tokens[1].kind, TokenKind::EOF);
}

#[test]
fn test_tokenize_characters() {
    let tokens = tokenize("'a' ' ' '?'", "test.ds").unwrap();

    assert_eq!(tokens[0].kind, TokenKind::Character);
    assert_eq!(tokens[0].value, TokenValue::Character('a'));
    assert_eq!(tokens[1].value, TokenValue::Character(' '));
    assert_eq!(tokens[2].value, TokenValue::Character('?'));
}

#[test]
fn test_tokenize_unterminated_character() {
    let error = tokenize("'x", "test.ds").unwrap_err();

    assert_eq!(error.kind(), ErrorKind::Lexing);
    assert!(matches!(
        error.get_internal_error(),
        ErrorImpl::UnterminatedLiteral { .. }
    ));
    assert_eq!(error.get_position().line, 1);
    assert_eq!(error.get_position().column, 1);
}

#[test]
fn test_tokenize_malformed_character() {
    let error = tokenize("'ab'", "test.ds").unwrap_err();

    assert_eq!(error.kind(), ErrorKind::Lexing);
    assert_eq!(
        error.get_internal_error(),
        &ErrorImpl::MalformedCharacterLiteral {
            found: String::from("'ab")
        }
    );
}

#[test]
fn test_tokenize_operators() {
    assert_eq!(
        kinds("+ - * / == != ! = && || -> :"),
        vec![
            TokenKind::Plus,
            TokenKind::Dash,
            TokenKind::Star,
            TokenKind::Slash,
            TokenKind::Equals,
            TokenKind::NotEquals,
            TokenKind::Not,
            TokenKind::Assignment,
            TokenKind::And,
            TokenKind::Or,
            TokenKind::Arrow,
            TokenKind::Colon,
            TokenKind::EOF
        ]
    );
}

#[test]
fn test_tokenize_operators_without_spaces() {
    assert_eq!(
        kinds("a:=-1"),
        vec![
            TokenKind::Identifier,
            TokenKind::Colon,
            TokenKind::Assignment,
            TokenKind::Dash,
            TokenKind::Integer,
            TokenKind::EOF
        ]
    );
}

#[test]
fn test_tokenize_punctuation() {
    assert_eq!(
        kinds("( ) { } , ;"),
        vec![
            TokenKind::OpenParen,
            TokenKind::CloseParen,
            TokenKind::OpenCurly,
            TokenKind::CloseCurly,
            TokenKind::Comma,
            TokenKind::Semicolon,
            TokenKind::EOF
        ]
    );
}

#[test]
fn test_tokenize_bare_bitwise_is_unsupported() {
    let error = tokenize("a & b", "test.ds").unwrap_err();
    assert_eq!(error.kind(), ErrorKind::Unsupported);

    let error = tokenize("a | b", "test.ds").unwrap_err();
    assert_eq!(error.kind(), ErrorKind::Unsupported);
}

#[test]
fn test_tokenize_unrecognized_token() {
    let error = tokenize("x := @", "test.ds").unwrap_err();

    assert_eq!(error.get_error_name(), "UnrecognisedToken");
    assert_eq!(error.get_position().column, 6);
}

#[test]
fn test_tokenize_comments() {
    assert_eq!(
        kinds("x := 5 // this is a comment\ny"),
        vec![
            TokenKind::Identifier,
            TokenKind::Colon,
            TokenKind::Assignment,
            TokenKind::Integer,
            TokenKind::Newline,
            TokenKind::Identifier,
            TokenKind::EOF
        ]
    );
}

#[test]
fn test_tokenize_blank_lines_collapse() {
    assert_eq!(
        kinds("a\n\n\n\nb"),
        vec![
            TokenKind::Identifier,
            TokenKind::Newline,
            TokenKind::Identifier,
            TokenKind::EOF
        ]
    );
}

#[test]
fn test_tokenize_blank_lines_with_whitespace_and_comments_collapse() {
    assert_eq!(
        kinds("a\n   \n// note\n\t\nb\n"),
        vec![
            TokenKind::Identifier,
            TokenKind::Newline,
            TokenKind::Identifier,
            TokenKind::Newline,
            TokenKind::EOF
        ]
    );
}

#[test]
fn test_tokenize_whitespace_handling() {
    assert_eq!(
        kinds("  x   =\t42  "),
        vec![
            TokenKind::Identifier,
            TokenKind::Assignment,
            TokenKind::Integer,
            TokenKind::EOF
        ]
    );
}

#[test]
fn test_token_locations() {
    let tokens = tokenize("a := 1\n  b", "test.ds").unwrap();

    assert_eq!(tokens[0].span.start.line, 1);
    assert_eq!(tokens[0].span.start.column, 1);
    assert_eq!(tokens[3].span.start.column, 6);
    assert_eq!(tokens[5].lexeme, "b");
    assert_eq!(tokens[5].span.start.line, 2);
    assert_eq!(tokens[5].span.start.column, 3);
    assert_eq!(&*tokens[5].span.start.file, "test.ds");
}

#[test]
fn test_peek_is_idempotent() {
    let mut lexer = Lexer::new("a + b", "test.ds");

    assert_eq!(lexer.peek().unwrap().kind, TokenKind::Identifier);
    assert_eq!(lexer.peek().unwrap().lexeme, "a");

    let token = lexer.next().unwrap();
    assert_eq!(token.lexeme, "a");
    assert_eq!(lexer.peek().unwrap().kind, TokenKind::Plus);
    assert_eq!(lexer.next().unwrap().kind, TokenKind::Plus);
    assert_eq!(lexer.next().unwrap().lexeme, "b");
    assert_eq!(lexer.next().unwrap().kind, TokenKind::EOF);
    assert_eq!(lexer.next().unwrap().kind, TokenKind::EOF);
}

#[test]
fn test_failed_peek_is_idempotent() {
    let mut lexer = Lexer::new("# a", "test.ds");

    let first = lexer.peek().unwrap_err();
    let second = lexer.peek().unwrap_err();
    assert_eq!(first, second);
    assert_eq!(first.get_error_name(), "UnrecognisedToken");

    assert_eq!(lexer.next().unwrap_err(), first);
    assert_eq!(lexer.next().unwrap().lexeme, "a");
}

#[test]
fn test_discard_failed_peek() {
    let mut lexer = Lexer::new("# a", "test.ds");

    assert!(!lexer.discard_failed_peek());
    assert!(lexer.peek().is_err());
    assert!(lexer.discard_failed_peek());
    assert_eq!(lexer.peek().unwrap().lexeme, "a");
}

#[test]
fn test_lexer_continues_after_error() {
    let mut lexer = Lexer::new("@ a", "test.ds");

    assert!(lexer.next().is_err());
    assert_eq!(lexer.next().unwrap().lexeme, "a");
}

proptest! {
    #[test]
    fn test_lexer_always_reaches_end_of_input(source in "[ -~\n\t]{0,64}") {
        let mut lexer = Lexer::new(&source, "prop.ds");
        let mut steps = 0;

        loop {
            let before = lexer.offset();
            match lexer.next() {
                Ok(token) if token.kind == TokenKind::EOF => break,
                Ok(_) => {}
                Err(_) => prop_assert!(lexer.offset() > before),
            }
            steps += 1;
            prop_assert!(steps <= source.len() + 1);
        }
    }
}
