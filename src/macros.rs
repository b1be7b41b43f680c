//! Utility macros for the front end.
//!
//! This module defines helper macros used by the lexer:
//!
//! - `MK_TOKEN!` - Creates a Token instance
//! - `MK_DEFAULT_HANDLER!` - Creates a default lexer handler for simple tokens
//!
//! These macros reduce boilerplate in the lexer implementation.

/// Creates a Token instance.
///
/// # Arguments
///
/// * `$kind` - The TokenKind
/// * `$value` - The decoded TokenValue
/// * `$lexeme` - The source text of the token
/// * `$span` - The source span
///
/// # Example
///
/// ```ignore
/// let token = MK_TOKEN!(TokenKind::Integer, TokenValue::Integer(42), "42", span);
/// ```
#[macro_export]
macro_rules! MK_TOKEN {
    ($kind:expr, $value:expr, $lexeme:expr, $span:expr) => {
        Token {
            kind: $kind,
            value: $value,
            lexeme: $lexeme,
            span: $span,
        }
    };
}

/// Creates a default lexer handler for simple single-token patterns.
///
/// Generates a handler function that emits a payload-free token of the given
/// kind for the matched text, advancing the lexer past it.
///
/// # Arguments
///
/// * `$kind` - The TokenKind to create
///
/// # Example
///
/// ```ignore
/// RegexPattern {
///     regex: Regex::new("^\\+").unwrap(),
///     handler: MK_DEFAULT_HANDLER!(TokenKind::Plus),
/// }
/// ```
#[macro_export]
macro_rules! MK_DEFAULT_HANDLER {
    ($kind:expr) => {{
        fn handler<'src>(
            lexer: &mut Lexer<'src>,
            matched: &'src str,
        ) -> Result<Option<Token<'src>>, Error> {
            Ok(Some(lexer.emit($kind, TokenValue::None, matched)))
        }
        handler
    }};
}
