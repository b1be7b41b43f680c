//! Parser module for building an Abstract Syntax Tree (AST).
//!
//! This module contains the parser that transforms the lexer's token stream
//! into an Abstract Syntax Tree. It uses a Pratt parser for expressions
//! with proper operator precedence and handles:
//!
//! - Statement parsing (blocks, `if`, `while`, expression statements)
//! - Expression parsing (binary and unary operators, literals, instantiations)
//! - Function literals with typed parameter lists
//! - Error recovery and reporting at the top level
//!
//! The parser uses NUD (null denotation) and LED (left denotation) functions
//! for expression parsing with binding power for precedence handling.

pub mod expr;
pub mod lookups;
pub mod parser;
pub mod stmt;
