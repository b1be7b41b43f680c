use std::collections::HashMap;

use crate::{
    ast::types::Type,
    errors::errors::{Error, ErrorImpl},
    Position,
};

/// What a name refers to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Binding {
    Variable(Type),
    Type(Type),
    Function { id: usize, ty: Type },
    /// Nothing creates module bindings yet.
    Module,
}

impl Binding {
    /// The type of the binding when used as a value.
    pub fn value_type(&self) -> Option<Type> {
        match self {
            Binding::Variable(ty) | Binding::Function { ty, .. } => Some(*ty),
            Binding::Type(_) | Binding::Module => None,
        }
    }
}

#[derive(Debug, Default, Clone)]
pub struct Scope {
    bindings: HashMap<String, Binding>,
}

impl Scope {
    pub fn new() -> Self {
        Scope::default()
    }

    /// The global scope every program is checked against: the primitive
    /// type names.
    pub fn builtin() -> Self {
        let mut scope = Scope::new();
        for (name, ty) in [
            ("bool", Type::Boolean),
            ("char", Type::Character),
            ("string", Type::String),
            ("i8", Type::Integer(1)),
            ("i16", Type::Integer(2)),
            ("i32", Type::Integer(4)),
            ("i64", Type::Integer(8)),
            ("f64", Type::Float(8)),
        ] {
            scope.bindings.insert(name.to_string(), Binding::Type(ty));
        }

        scope
    }

    pub fn declare(&mut self, name: &str, binding: Binding, current_position: Position) -> Result<(), Error> {
        if self.bindings.contains_key(name) {
            Err(Error::new(
                ErrorImpl::VariableAlreadyDeclared {
                    variable: name.to_string(),
                },
                current_position,
            ))
        } else {
            self.bindings.insert(name.to_string(), binding);
            Ok(())
        }
    }

    pub fn get(&self, name: &str) -> Option<&Binding> {
        self.bindings.get(name)
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}
