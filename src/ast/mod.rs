/// AST (Abstract Syntax Tree) module
/// Contains all definitions related to the AST structure
///
/// Submodules:
/// - ast: The node type and the closed set of node kinds
/// - expressions: Symbols, literals, unary and binary operations
/// - statements: Blocks, instantiations, functions and conditionals
/// - types: The resolved types written by the type checker
pub mod ast;
pub mod expressions;
pub mod statements;
pub mod types;
