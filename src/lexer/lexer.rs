use std::rc::Rc;

use lazy_static::lazy_static;
use regex::Regex;
use tracing::{debug, trace};

use crate::{
    errors::errors::{Error, ErrorImpl},
    Position, Span, MK_DEFAULT_HANDLER, MK_TOKEN,
};

use super::tokens::{Token, TokenKind, TokenValue, RESERVED_LOOKUP};

/// Scans the matched text at the cursor. `Ok(None)` means the text was skipped.
pub type RegexHandler =
    for<'src> fn(&mut Lexer<'src>, &'src str) -> Result<Option<Token<'src>>, Error>;

pub struct RegexPattern {
    regex: Regex,
    handler: RegexHandler,
}

impl RegexPattern {
    fn new(pattern: &str, handler: RegexHandler) -> Self {
        RegexPattern {
            regex: Regex::new(pattern).expect("lexer patterns are valid regular expressions"),
            handler,
        }
    }
}

lazy_static! {
    // Tried in order, every pattern is anchored at the cursor.
    static ref PATTERNS: Vec<RegexPattern> = vec![
        RegexPattern::new(r"^[^\S\n]+", skip_handler),
        RegexPattern::new(r"^//[^\n]*", skip_handler),
        RegexPattern::new(r"^\n", newline_handler),
        RegexPattern::new(r"^[a-zA-Z_][a-zA-Z0-9_]*", symbol_handler),
        RegexPattern::new(r"^[0-9]+(\.[0-9]+)?", number_handler),
        RegexPattern::new(r#"^"[^"]*"?"#, string_handler),
        RegexPattern::new(r"^'", character_handler),
        RegexPattern::new(r"^\{", MK_DEFAULT_HANDLER!(TokenKind::OpenCurly)),
        RegexPattern::new(r"^\}", MK_DEFAULT_HANDLER!(TokenKind::CloseCurly)),
        RegexPattern::new(r"^\(", MK_DEFAULT_HANDLER!(TokenKind::OpenParen)),
        RegexPattern::new(r"^\)", MK_DEFAULT_HANDLER!(TokenKind::CloseParen)),
        RegexPattern::new(r"^;", MK_DEFAULT_HANDLER!(TokenKind::Semicolon)),
        RegexPattern::new(r"^,", MK_DEFAULT_HANDLER!(TokenKind::Comma)),
        RegexPattern::new(r"^==", MK_DEFAULT_HANDLER!(TokenKind::Equals)),
        RegexPattern::new(r"^!=", MK_DEFAULT_HANDLER!(TokenKind::NotEquals)),
        RegexPattern::new(r"^!", MK_DEFAULT_HANDLER!(TokenKind::Not)),
        RegexPattern::new(r"^=", MK_DEFAULT_HANDLER!(TokenKind::Assignment)),
        RegexPattern::new(r"^&&", MK_DEFAULT_HANDLER!(TokenKind::And)),
        RegexPattern::new(r"^\|\|", MK_DEFAULT_HANDLER!(TokenKind::Or)),
        RegexPattern::new(r"^[&|]", bitwise_handler),
        RegexPattern::new(r"^->", MK_DEFAULT_HANDLER!(TokenKind::Arrow)),
        RegexPattern::new(r"^:", MK_DEFAULT_HANDLER!(TokenKind::Colon)),
        RegexPattern::new(r"^\+", MK_DEFAULT_HANDLER!(TokenKind::Plus)),
        RegexPattern::new(r"^-", MK_DEFAULT_HANDLER!(TokenKind::Dash)),
        RegexPattern::new(r"^\*", MK_DEFAULT_HANDLER!(TokenKind::Star)),
        RegexPattern::new(r"^/", MK_DEFAULT_HANDLER!(TokenKind::Slash)),
    ];
}

/// On-demand tokenizer with one token of lookahead.
///
/// Tokens borrow their text from `source`, so they cannot outlive it.
pub struct Lexer<'src> {
    source: &'src str,
    pos: usize,
    line: u32,
    column: u32,
    file: Rc<str>,
    /// Lookahead, failures included, so a failed peek repeats until consumed.
    peeked: Option<Result<Token<'src>, Error>>,
    previous: Option<TokenKind>,
}

impl<'src> Lexer<'src> {
    pub fn new(source: &'src str, file: &str) -> Lexer<'src> {
        Lexer {
            source,
            pos: 0,
            line: 1,
            column: 1,
            file: Rc::from(file),
            peeked: None,
            previous: None,
        }
    }

    /// Returns the next token without consuming it.
    pub fn peek(&mut self) -> Result<&Token<'src>, Error> {
        let scanned = match self.peeked.take() {
            Some(scanned) => scanned,
            None => self.scan(),
        };

        match &*self.peeked.insert(scanned) {
            Ok(token) => Ok(token),
            Err(error) => Err(error.clone()),
        }
    }

    /// Consumes and returns the next token.
    pub fn next(&mut self) -> Result<Token<'src>, Error> {
        match self.peeked.take() {
            Some(scanned) => scanned,
            None => self.scan(),
        }
    }

    /// Forgets a failed lookahead without scanning anything new. Returns
    /// whether there was one.
    pub fn discard_failed_peek(&mut self) -> bool {
        if matches!(self.peeked, Some(Err(_))) {
            self.peeked = None;
            return true;
        }

        false
    }

    /// Byte offset of the cursor. Only ever grows.
    pub fn offset(&self) -> usize {
        self.pos
    }

    pub fn file(&self) -> Rc<str> {
        Rc::clone(&self.file)
    }

    pub fn location(&self) -> Position {
        Position::new(self.line, self.column, Rc::clone(&self.file))
    }

    pub fn remainder(&self) -> &'src str {
        &self.source[self.pos..]
    }

    /// Moves the cursor past `text`, which must be the start of the remainder.
    pub fn advance(&mut self, text: &str) {
        for character in text.chars() {
            if character == '\n' {
                self.line += 1;
                self.column = 1;
            } else {
                self.column += 1;
            }
        }

        self.pos += text.len();
    }

    /// Builds a token for `text` at the cursor and advances past it.
    pub fn emit(&mut self, kind: TokenKind, value: TokenValue<'src>, text: &'src str) -> Token<'src> {
        let start = self.location();
        self.advance(text);

        MK_TOKEN!(
            kind,
            value,
            text,
            Span {
                start,
                end: self.location()
            }
        )
    }

    fn scan(&mut self) -> Result<Token<'src>, Error> {
        loop {
            let remainder = self.remainder();

            let Some(character) = remainder.chars().next() else {
                let location = self.location();
                return Ok(MK_TOKEN!(
                    TokenKind::EOF,
                    TokenValue::None,
                    "",
                    Span {
                        start: location.clone(),
                        end: location
                    }
                ));
            };

            let matched = PATTERNS.iter().find_map(|pattern| {
                pattern
                    .regex
                    .find(remainder)
                    .map(|found| (pattern.handler, &remainder[..found.end()]))
            });

            let Some((handler, text)) = matched else {
                let start = self.location();
                self.advance(&remainder[..character.len_utf8()]);
                return Err(Error::new(
                    ErrorImpl::UnrecognisedToken {
                        token: character.to_string(),
                    },
                    start,
                ));
            };

            if let Some(token) = handler(self, text)? {
                trace!(kind = %token.kind, lexeme = token.lexeme, "token");
                self.previous = Some(token.kind);
                return Ok(token);
            }
        }
    }
}

fn skip_handler<'src>(lexer: &mut Lexer<'src>, matched: &'src str) -> Result<Option<Token<'src>>, Error> {
    lexer.advance(matched);
    Ok(None)
}

fn newline_handler<'src>(lexer: &mut Lexer<'src>, matched: &'src str) -> Result<Option<Token<'src>>, Error> {
    // Blank lines collapse into the boundary that is already pending.
    if lexer.previous == Some(TokenKind::Newline) {
        lexer.advance(matched);
        return Ok(None);
    }

    Ok(Some(lexer.emit(TokenKind::Newline, TokenValue::None, matched)))
}

fn symbol_handler<'src>(lexer: &mut Lexer<'src>, matched: &'src str) -> Result<Option<Token<'src>>, Error> {
    if let Some((kind, value)) = RESERVED_LOOKUP.get(matched) {
        return Ok(Some(lexer.emit(*kind, *value, matched)));
    }

    Ok(Some(lexer.emit(TokenKind::Identifier, TokenValue::String(matched), matched)))
}

fn number_handler<'src>(lexer: &mut Lexer<'src>, matched: &'src str) -> Result<Option<Token<'src>>, Error> {
    let parsed = if matched.contains('.') {
        matched
            .parse()
            .ok()
            .map(|value| (TokenKind::Float, TokenValue::Float(value)))
    } else {
        matched
            .parse()
            .ok()
            .map(|value| (TokenKind::Integer, TokenValue::Integer(value)))
    };

    match parsed {
        Some((kind, value)) => Ok(Some(lexer.emit(kind, value, matched))),
        None => {
            let start = lexer.location();
            lexer.advance(matched);
            Err(Error::new(
                ErrorImpl::NumberParseError {
                    token: matched.to_string(),
                },
                start,
            ))
        }
    }
}

fn string_handler<'src>(lexer: &mut Lexer<'src>, matched: &'src str) -> Result<Option<Token<'src>>, Error> {
    // No escapes; a missing closing quote runs the literal to end of input.
    let contents = &matched[1..];
    let contents = contents.strip_suffix('"').unwrap_or(contents);

    Ok(Some(lexer.emit(TokenKind::String, TokenValue::String(contents), matched)))
}

fn character_handler<'src>(lexer: &mut Lexer<'src>, matched: &'src str) -> Result<Option<Token<'src>>, Error> {
    let start = lexer.location();
    let literal = lexer.remainder();
    let mut characters = literal[matched.len()..].chars();

    let (error, consumed) = match (characters.next(), characters.next()) {
        (Some(character), Some('\'')) if is_character_literal(character) => {
            let text = &literal[..character.len_utf8() + 2];
            return Ok(Some(lexer.emit(
                TokenKind::Character,
                TokenValue::Character(character),
                text,
            )));
        }
        (None, _) => (
            ErrorImpl::UnterminatedLiteral {
                kind: String::from("character"),
            },
            matched.len(),
        ),
        (Some(character), None) => (
            ErrorImpl::UnterminatedLiteral {
                kind: String::from("character"),
            },
            matched.len() + character.len_utf8(),
        ),
        (Some(character), Some(following)) => {
            let consumed = matched.len() + character.len_utf8();
            (
                ErrorImpl::MalformedCharacterLiteral {
                    found: literal[..consumed + following.len_utf8()].to_string(),
                },
                consumed,
            )
        }
    };

    lexer.advance(&literal[..consumed]);
    Err(Error::new(error, start))
}

fn is_character_literal(character: char) -> bool {
    character.is_ascii_alphanumeric() || character.is_ascii_punctuation() || character == ' '
}

fn bitwise_handler<'src>(lexer: &mut Lexer<'src>, matched: &'src str) -> Result<Option<Token<'src>>, Error> {
    let start = lexer.location();
    lexer.advance(matched);

    Err(Error::not_implemented(
        &format!("bitwise operator `{}`", matched),
        start,
    ))
}

/// Scans all of `source`, ending with the EOF token.
pub fn tokenize<'src>(source: &'src str, file: &str) -> Result<Vec<Token<'src>>, Error> {
    let mut lex = Lexer::new(source, file);
    let mut tokens = vec![];

    loop {
        let token = lex.next()?;
        let is_eof = token.kind == TokenKind::EOF;
        tokens.push(token);

        if is_eof {
            break;
        }
    }

    debug!("tokenized {} into {} tokens", file, tokens.len());
    Ok(tokens)
}
