#![allow(clippy::module_inception)]

use std::{fmt::Display, rc::Rc};

use tracing::debug;

use crate::{ast::ast::Node, errors::errors::Error};

pub mod ast;
pub mod errors;
pub mod lexer;
pub mod logger;
pub mod macros;
pub mod parser;
pub mod type_checker;

extern crate regex;

/// A location in a source file. Line and column are 1-indexed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Position {
    pub line: u32,
    pub column: u32,
    pub file: Rc<str>,
}

impl Position {
    pub fn new(line: u32, column: u32, file: Rc<str>) -> Self {
        Position { line, column, file }
    }

    pub fn null() -> Self {
        Position::new(0, 0, Rc::from("<null>"))
    }
}

impl Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}:{}", self.file, self.line, self.column)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    pub start: Position,
    pub end: Position,
}

impl Span {
    /// Joins two spans, keeping the start of `self` and the end of `other`.
    pub fn to(&self, other: &Span) -> Span {
        Span {
            start: self.start.clone(),
            end: other.end.clone(),
        }
    }
}

/// Returns the text of a 1-indexed line, without its line break.
pub fn get_line_at_position(source: &str, line: u32) -> Option<&str> {
    if line == 0 {
        return None;
    }

    source
        .split('\n')
        .nth(line as usize - 1)
        .map(|text| text.strip_suffix('\r').unwrap_or(text))
}

/// Parses and type checks `source`, returning the annotated tree.
///
/// Parse errors are collected for the whole file. Type checking only runs on
/// a tree that parsed cleanly and stops at its first error.
pub fn check_source<'src>(source: &'src str, file: &str) -> Result<Node<'src>, Vec<Error>> {
    debug!("checking {} ({} bytes)", file, source.len());

    let mut ast = parser::parser::parse(source, file)?;
    type_checker::type_checker::type_check(&mut ast).map_err(|error| vec![error])?;

    debug!("{} type checked", file);
    Ok(ast)
}
