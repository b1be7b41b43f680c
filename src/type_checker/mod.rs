//! Type checking and semantic analysis module.
//!
//! This module walks the parsed AST and annotates it in place:
//!
//! - Resolving symbols through nested scopes and the global scope
//! - Inferring literal types, including the integer width
//! - Validating operand and condition types
//! - Detecting redefinitions within a scope and undeclared names
//!
//! Checking stops at the first error.

pub mod scope;
pub mod type_checker;

#[cfg(test)]
mod tests;
