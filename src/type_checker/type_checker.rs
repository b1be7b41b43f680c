use tracing::{debug, trace};

use crate::{
    ast::{
        ast::{Node, NodeKind},
        expressions::{BinaryExpr, BinaryOperator, Literal, UnaryExpr, UnaryOperator},
        statements::{BlockKind, BlockStmt, IfStmt, InstantiationStmt},
        types::Type,
    },
    errors::errors::{Error, ErrorImpl},
    Position,
};

use super::scope::{Binding, Scope};

/// Everything a name can be resolved against while checking.
///
/// A context owns its own scope stack. A context created for a nested body
/// also sees its parent's scopes, except for the parent's variables.
#[derive(Debug)]
pub struct ResolutionContext<'ctx> {
    scopes: Vec<Scope>,
    global: &'ctx Scope,
    parent: Option<&'ctx ResolutionContext<'ctx>>,
}

impl<'ctx> ResolutionContext<'ctx> {
    pub fn new(global: &'ctx Scope) -> Self {
        ResolutionContext {
            scopes: vec![Scope::new()],
            global,
            parent: None,
        }
    }

    /// A context nested inside `parent`, sharing its global scope.
    pub fn with_parent(parent: &'ctx ResolutionContext<'ctx>) -> Self {
        ResolutionContext {
            scopes: vec![Scope::new()],
            global: parent.global,
            parent: Some(parent),
        }
    }

    pub fn push_scope(&mut self) {
        self.scopes.push(Scope::new());
        trace!("pushed scope, depth {}", self.scopes.len());
    }

    pub fn pop_scope(&mut self) {
        let scope = self.scopes.pop();
        debug_assert!(scope.is_some(), "popped more scopes than were pushed");
        trace!("popped scope, depth {}", self.scopes.len());
    }

    pub fn depth(&self) -> usize {
        self.scopes.len()
    }

    /// Binds `name` in the innermost scope.
    pub fn bind(&mut self, name: &str, binding: Binding, position: Position) -> Result<(), Error> {
        if self.scopes.is_empty() {
            self.scopes.push(Scope::new());
        }

        let scope = self.scopes.len() - 1;
        self.scopes[scope].declare(name, binding, position)
    }

    pub fn resolve(&self, name: &str) -> Option<Binding> {
        self.lookup(name, false)
    }

    fn lookup(&self, name: &str, through_parent: bool) -> Option<Binding> {
        for scope in self.scopes.iter().rev() {
            match scope.get(name) {
                Some(Binding::Variable(_)) if through_parent => continue,
                Some(binding) => return Some(*binding),
                None => {}
            }
        }

        if let Some(binding) = self.parent.and_then(|parent| parent.lookup(name, true)) {
            return Some(binding);
        }

        // Only the context the lookup started in falls back to the globals.
        if through_parent {
            return None;
        }

        self.global.get(name).copied()
    }

    /// Checks `node` and its children, writing each resolved type into its
    /// node. Stops at the first error.
    pub fn check(&mut self, node: &mut Node) -> Result<Type, Error> {
        let ty = match &mut node.kind {
            NodeKind::Symbol(symbol) => {
                let name = symbol.value;
                match self.resolve(name) {
                    Some(binding) => binding.value_type().ok_or_else(|| {
                        Error::new(
                            ErrorImpl::ExpectedValue {
                                name: name.to_string(),
                            },
                            node.span.start.clone(),
                        )
                    })?,
                    None => {
                        return Err(Error::new(
                            ErrorImpl::VariableNotDeclared {
                                variable: name.to_string(),
                            },
                            node.span.start.clone(),
                        ))
                    }
                }
            }
            NodeKind::Literal(literal) => match literal.value {
                Literal::Null => Type::Null,
                Literal::Boolean(_) => Type::Boolean,
                Literal::Character(_) => Type::Character,
                Literal::Integer(value) => Type::for_integer(value),
                Literal::Float(value) => Type::for_float(value),
                Literal::String(_) => Type::String,
            },
            NodeKind::Unary(unary) => self.check_unary(unary)?,
            NodeKind::Binary(binary) => self.check_binary(binary)?,
            NodeKind::Block(block) => match block.kind {
                BlockKind::Statements => self.check_block(block)?,
                BlockKind::List => {
                    return Err(Error::not_implemented("list blocks", node.span.start.clone()))
                }
            },
            NodeKind::VariableInstantiation(instantiation) => {
                self.check_variable_instantiation(instantiation)?
            }
            NodeKind::ConstantInstantiation(_) => {
                return Err(Error::not_implemented(
                    "constant instantiation",
                    node.span.start.clone(),
                ))
            }
            NodeKind::FnDecl(_) => {
                return Err(Error::not_implemented(
                    "function declarations",
                    node.span.start.clone(),
                ))
            }
            NodeKind::If(stmt) => self.check_if(stmt)?,
        };

        node.set_type(ty);
        Ok(ty)
    }

    fn check_unary(&mut self, unary: &mut UnaryExpr) -> Result<Type, Error> {
        let operand = self.check(&mut unary.operand)?;

        let valid = match unary.operator {
            UnaryOperator::Not => operand == Type::Boolean,
            UnaryOperator::Negate => operand.is_numeric(),
        };

        if !valid {
            let expected = match unary.operator {
                UnaryOperator::Not => "bool",
                UnaryOperator::Negate => "numeric",
            };

            return Err(operand_error(&unary.operator.to_string(), expected, operand, &unary.operand));
        }

        Ok(operand)
    }

    fn check_binary(&mut self, binary: &mut BinaryExpr) -> Result<Type, Error> {
        match binary.operator {
            BinaryOperator::Declaration => Err(Error::not_implemented(
                "declarations without a value",
                binary.left.span.start.clone(),
            )),
            BinaryOperator::Assignment => {
                if binary.left.as_symbol().is_none() {
                    return Err(Error::new(
                        ErrorImpl::InvalidAssignmentTarget,
                        binary.left.span.start.clone(),
                    ));
                }

                let target = self.check(&mut binary.left)?;
                let value = self.check(&mut binary.right)?;
                expect_same_kind(target, value, &binary.right)?;

                Ok(Type::None)
            }
            BinaryOperator::While => {
                self.check_condition(&mut binary.left)?;
                self.check(&mut binary.right)?;

                Ok(Type::None)
            }
            BinaryOperator::Add
            | BinaryOperator::Subtract
            | BinaryOperator::Multiply
            | BinaryOperator::Divide => {
                let operator = binary.operator.to_string();
                let left = self.check(&mut binary.left)?;
                if !left.is_numeric() {
                    return Err(operand_error(&operator, "numeric", left, &binary.left));
                }

                let right = self.check(&mut binary.right)?;
                if !right.is_numeric() {
                    return Err(operand_error(&operator, "numeric", right, &binary.right));
                }

                expect_same_kind(left, right, &binary.right)?;

                Ok(match (left, right) {
                    (Type::Integer(a), Type::Integer(b)) => Type::Integer(a.max(b)),
                    (Type::Float(a), Type::Float(b)) => Type::Float(a.max(b)),
                    _ => left,
                })
            }
            BinaryOperator::And | BinaryOperator::Or => {
                let operator = binary.operator.to_string();
                let left = self.check(&mut binary.left)?;
                if left != Type::Boolean {
                    return Err(operand_error(&operator, "bool", left, &binary.left));
                }

                let right = self.check(&mut binary.right)?;
                if right != Type::Boolean {
                    return Err(operand_error(&operator, "bool", right, &binary.right));
                }

                Ok(Type::Boolean)
            }
            BinaryOperator::Equal | BinaryOperator::NotEqual => {
                let left = self.check(&mut binary.left)?;
                let right = self.check(&mut binary.right)?;
                expect_same_kind(left, right, &binary.right)?;

                Ok(Type::Boolean)
            }
        }
    }

    fn check_block(&mut self, block: &mut BlockStmt) -> Result<Type, Error> {
        self.push_scope();
        let result = block
            .iter_mut()
            .try_for_each(|stmt| self.check(stmt).map(|_| ()));
        self.pop_scope();

        result.map(|_| Type::None)
    }

    fn check_variable_instantiation(&mut self, instantiation: &mut InstantiationStmt) -> Result<Type, Error> {
        if let Some(signature) = &instantiation.signature {
            return Err(Error::not_implemented(
                "explicitly typed instantiation",
                signature.span.start.clone(),
            ));
        }

        // The initializer cannot see the name it initializes.
        let ty = self.check(&mut instantiation.value)?;

        let name = &mut instantiation.name;
        let Some(symbol) = name.as_symbol() else {
            return Err(Error::new(
                ErrorImpl::InvalidInstantiationTarget,
                name.span.start.clone(),
            ));
        };

        self.bind(symbol.value, Binding::Variable(ty), name.span.start.clone())?;
        name.set_type(ty);

        Ok(Type::None)
    }

    fn check_if(&mut self, stmt: &mut IfStmt) -> Result<Type, Error> {
        self.check_condition(&mut stmt.condition)?;
        self.check(&mut stmt.then_body)?;

        if let Some(else_body) = &mut stmt.else_body {
            self.check(else_body)?;
        }

        Ok(Type::None)
    }

    fn check_condition(&mut self, condition: &mut Node) -> Result<(), Error> {
        let ty = self.check(condition)?;
        if ty != Type::Boolean {
            return Err(Error::new(
                ErrorImpl::ConditionTypeError {
                    received: ty.to_string(),
                },
                condition.span.start.clone(),
            ));
        }

        Ok(())
    }
}

fn operand_error(operator: &str, expected: &str, received: Type, operand: &Node) -> Error {
    Error::new(
        ErrorImpl::OperandTypeError {
            operator: operator.to_string(),
            expected: expected.to_string(),
            received: received.to_string(),
        },
        operand.span.start.clone(),
    )
}

fn expect_same_kind(expected: Type, received: Type, at: &Node) -> Result<(), Error> {
    if expected.same_kind(&received) {
        return Ok(());
    }

    Err(Error::new(
        ErrorImpl::TypeMatchError {
            expected: expected.to_string(),
            received: received.to_string(),
        },
        at.span.start.clone(),
    ))
}

/// Type checks a whole tree against the builtin global scope.
pub fn type_check(ast: &mut Node) -> Result<(), Error> {
    type_check_with_globals(ast, &Scope::builtin())
}

/// Type checks a whole tree against a caller supplied global scope.
pub fn type_check_with_globals(ast: &mut Node, global: &Scope) -> Result<(), Error> {
    debug!("type checking with {} globals", global.len());

    let mut context = ResolutionContext::new(global);
    let result = context.check(ast);

    match &result {
        Ok(_) => debug!("type check passed"),
        Err(error) => debug!("type check failed: {}", error),
    }

    result.map(|_| ())
}
