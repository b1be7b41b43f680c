//! Error types and error handling for the front end.
//!
//! This module defines the error types used throughout the pipeline.
//! It includes:
//!
//! - Error structures with source position information
//! - Specific error variants for lexing, parsing and type checking
//! - A kind classification that separates intentional language gaps
//!   from invalid input
//! - Error formatting and display functionality

pub mod errors;
