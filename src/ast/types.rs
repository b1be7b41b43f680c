//! Type system definitions for the AST.
//!
//! This module defines the resolved types the type checker writes into
//! nodes. Numeric types carry their width in bytes.

use std::fmt::Display;

/// A resolved type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Type {
    /// The result of statements, blocks and assignments.
    None,
    Null,
    Boolean,
    Character,
    /// Width in bytes: 1, 2, 4 or 8.
    Integer(u8),
    /// Width in bytes: 4 or 8.
    Float(u8),
    String,
}

impl Type {
    pub fn is_numeric(&self) -> bool {
        matches!(self, Type::Integer(_) | Type::Float(_))
    }

    /// Compares by kind only, ignoring numeric width.
    pub fn same_kind(&self, other: &Type) -> bool {
        std::mem::discriminant(self) == std::mem::discriminant(other)
    }

    /// Smallest signed integer type that can hold `value`.
    pub fn for_integer(value: i64) -> Type {
        if i8::try_from(value).is_ok() {
            Type::Integer(1)
        } else if i16::try_from(value).is_ok() {
            Type::Integer(2)
        } else if i32::try_from(value).is_ok() {
            Type::Integer(4)
        } else {
            Type::Integer(8)
        }
    }

    /// Floating-point literals are always 64-bit for now.
    pub fn for_float(_value: f64) -> Type {
        Type::Float(8)
    }
}

impl Display for Type {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Type::None => write!(f, "()"),
            Type::Null => write!(f, "null"),
            Type::Boolean => write!(f, "bool"),
            Type::Character => write!(f, "char"),
            Type::Integer(width) => write!(f, "i{}", *width as u32 * 8),
            Type::Float(width) => write!(f, "f{}", *width as u32 * 8),
            Type::String => write!(f, "string"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Type;

    #[test]
    fn test_integer_width_boundaries() {
        assert_eq!(Type::for_integer(0), Type::Integer(1));
        assert_eq!(Type::for_integer(127), Type::Integer(1));
        assert_eq!(Type::for_integer(-128), Type::Integer(1));
        assert_eq!(Type::for_integer(128), Type::Integer(2));
        assert_eq!(Type::for_integer(200), Type::Integer(2));
        assert_eq!(Type::for_integer(-32769), Type::Integer(4));
        assert_eq!(Type::for_integer(i32::MAX as i64 + 1), Type::Integer(8));
        assert_eq!(Type::for_integer(i64::MIN), Type::Integer(8));
    }

    #[test]
    fn test_same_kind_ignores_width() {
        assert!(Type::Integer(1).same_kind(&Type::Integer(8)));
        assert!(!Type::Integer(8).same_kind(&Type::Float(8)));
        assert!(!Type::Boolean.same_kind(&Type::Character));
    }

    #[test]
    fn test_display() {
        assert_eq!(Type::Integer(2).to_string(), "i16");
        assert_eq!(Type::Float(8).to_string(), "f64");
        assert_eq!(Type::Boolean.to_string(), "bool");
    }
}
