use std::fmt::Display;

use thiserror::Error;

use crate::Position;

#[derive(Debug, Clone, PartialEq)]
pub struct Error {
    internal_error: ErrorImpl,
    position: Position,
}

impl Error {
    pub fn new(error_impl: ErrorImpl, position: Position) -> Self {
        Error {
            internal_error: error_impl,
            position,
        }
    }

    pub fn not_implemented(feature: &str, position: Position) -> Self {
        Error::new(
            ErrorImpl::NotImplemented {
                feature: feature.to_string(),
            },
            position,
        )
    }

    pub fn get_position(&self) -> &Position {
        &self.position
    }

    pub fn get_internal_error(&self) -> &ErrorImpl {
        &self.internal_error
    }

    pub fn kind(&self) -> ErrorKind {
        self.internal_error.kind()
    }

    pub fn get_error_name(&self) -> &str {
        match &self.internal_error {
            ErrorImpl::UnrecognisedToken { .. } => "UnrecognisedToken",
            ErrorImpl::MalformedCharacterLiteral { .. } => "MalformedCharacterLiteral",
            ErrorImpl::UnterminatedLiteral { .. } => "UnterminatedLiteral",
            ErrorImpl::NumberParseError { .. } => "NumberParseError",
            ErrorImpl::UnexpectedToken { .. } => "UnexpectedToken",
            ErrorImpl::UnexpectedTokenDetailed { .. } => "UnexpectedTokenDetailed",
            ErrorImpl::UnexpectedOperator { .. } => "UnexpectedOperator",
            ErrorImpl::MissingTerminator { .. } => "MissingTerminator",
            ErrorImpl::StatementInExpression { .. } => "StatementInExpression",
            ErrorImpl::InvalidInstantiationTarget => "InvalidInstantiationTarget",
            ErrorImpl::NestingTooDeep { .. } => "NestingTooDeep",
            ErrorImpl::TypeMatchError { .. } => "TypeMatchError",
            ErrorImpl::OperandTypeError { .. } => "OperandTypeError",
            ErrorImpl::ConditionTypeError { .. } => "ConditionTypeError",
            ErrorImpl::VariableAlreadyDeclared { .. } => "VariableAlreadyDeclared",
            ErrorImpl::VariableNotDeclared { .. } => "VariableNotDeclared",
            ErrorImpl::ExpectedValue { .. } => "ExpectedValue",
            ErrorImpl::InvalidAssignmentTarget => "InvalidAssignmentTarget",
            ErrorImpl::NotImplemented { .. } => "NotImplemented",
        }
    }

    pub fn get_tip(&self) -> ErrorTip {
        match &self.internal_error {
            ErrorImpl::UnrecognisedToken { .. } => ErrorTip::None,
            ErrorImpl::MalformedCharacterLiteral { .. } => ErrorTip::Suggestion(String::from(
                "A character literal holds exactly one character, like 'a'",
            )),
            ErrorImpl::UnterminatedLiteral { kind } => {
                ErrorTip::Suggestion(format!("Missing closing quote for {} literal", kind))
            }
            ErrorImpl::NumberParseError { token } => ErrorTip::Suggestion(format!(
                "Invalid number: `{}`, is it above the integer limit?",
                token
            )),
            ErrorImpl::UnexpectedToken { token } => {
                ErrorTip::Suggestion(format!("Unexpected token: `{}`", token))
            }
            ErrorImpl::UnexpectedTokenDetailed { token, message } => {
                ErrorTip::Suggestion(format!("Unexpected token: `{}`, {}", token, message))
            }
            ErrorImpl::UnexpectedOperator { operator } => ErrorTip::Suggestion(format!(
                "`{}` cannot be used in this position",
                operator
            )),
            ErrorImpl::MissingTerminator { token } => ErrorTip::Suggestion(format!(
                "Unexpected token: `{}`, did you miss a newline or semicolon?",
                token
            )),
            ErrorImpl::StatementInExpression { form } => ErrorTip::Suggestion(format!(
                "A {} is a statement and cannot be used as a value",
                form
            )),
            ErrorImpl::InvalidInstantiationTarget => ErrorTip::Suggestion(String::from(
                "Only a plain name can be declared",
            )),
            ErrorImpl::NestingTooDeep { limit } => ErrorTip::Suggestion(format!(
                "Blocks and expressions can be nested at most {} levels deep",
                limit
            )),
            ErrorImpl::TypeMatchError { expected, received } => ErrorTip::Suggestion(format!(
                "Expected type `{}`, received `{}`",
                expected, received
            )),
            ErrorImpl::OperandTypeError {
                operator,
                expected,
                received,
            } => ErrorTip::Suggestion(format!(
                "`{}` requires {} operands, received `{}`",
                operator, expected, received
            )),
            ErrorImpl::ConditionTypeError { received } => ErrorTip::Suggestion(format!(
                "Conditions must be `bool`, received `{}`",
                received
            )),
            ErrorImpl::VariableAlreadyDeclared { variable } => ErrorTip::Suggestion(format!(
                "`{}` is already declared in this scope",
                variable
            )),
            ErrorImpl::VariableNotDeclared { variable } => {
                ErrorTip::Suggestion(format!("Variable `{}` not declared", variable))
            }
            ErrorImpl::ExpectedValue { name } => {
                ErrorTip::Suggestion(format!("`{}` is not a value", name))
            }
            ErrorImpl::InvalidAssignmentTarget => {
                ErrorTip::Suggestion(String::from("Only variables can be assigned to"))
            }
            ErrorImpl::NotImplemented { feature } => ErrorTip::Suggestion(format!(
                "{} is expected to be handled, but has not yet been implemented",
                feature
            )),
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.position, self.internal_error)
    }
}

impl std::error::Error for Error {}

/// The pipeline stage an error belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Lexing,
    Parsing,
    Type,
    /// An intentional gap in the language, not invalid input.
    Unsupported,
}

pub enum ErrorTip {
    None,
    Suggestion(String),
}

impl Display for ErrorTip {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorTip::None => write!(f, ""),
            ErrorTip::Suggestion(suggestion) => write!(f, "{}", suggestion),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ErrorImpl {
    // Lexing
    #[error("unrecognised token: {token:?}")]
    UnrecognisedToken { token: String },
    #[error("malformed character literal: {found:?}")]
    MalformedCharacterLiteral { found: String },
    #[error("unterminated {kind} literal")]
    UnterminatedLiteral { kind: String },
    #[error("error parsing number: {token:?}")]
    NumberParseError { token: String },

    // Parsing
    #[error("unexpected token: {token:?}")]
    UnexpectedToken { token: String },
    #[error("unexpected token ({message}): {token:?}")]
    UnexpectedTokenDetailed { token: String, message: String },
    #[error("unexpected operator {operator:?}")]
    UnexpectedOperator { operator: String },
    #[error("expected newline or `;` after statement, found {token:?}")]
    MissingTerminator { token: String },
    #[error("{form} is only allowed as a statement")]
    StatementInExpression { form: String },
    #[error("only a name can be declared")]
    InvalidInstantiationTarget,
    #[error("nesting exceeds {limit} levels")]
    NestingTooDeep { limit: usize },

    // Typing
    #[error("types do not match: expected {expected}, received {received}")]
    TypeMatchError { expected: String, received: String },
    #[error("`{operator}` requires {expected} operands, received {received}")]
    OperandTypeError {
        operator: String,
        expected: String,
        received: String,
    },
    #[error("condition must be bool, received {received}")]
    ConditionTypeError { received: String },
    #[error("variable {variable:?} already declared")]
    VariableAlreadyDeclared { variable: String },
    #[error("variable {variable:?} not declared")]
    VariableNotDeclared { variable: String },
    #[error("expected a value, {name:?} is not one")]
    ExpectedValue { name: String },
    #[error("invalid assignment target")]
    InvalidAssignmentTarget,

    #[error("not yet supported: {feature}")]
    NotImplemented { feature: String },
}

impl ErrorImpl {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ErrorImpl::UnrecognisedToken { .. }
            | ErrorImpl::MalformedCharacterLiteral { .. }
            | ErrorImpl::UnterminatedLiteral { .. }
            | ErrorImpl::NumberParseError { .. } => ErrorKind::Lexing,
            ErrorImpl::UnexpectedToken { .. }
            | ErrorImpl::UnexpectedTokenDetailed { .. }
            | ErrorImpl::UnexpectedOperator { .. }
            | ErrorImpl::MissingTerminator { .. }
            | ErrorImpl::StatementInExpression { .. }
            | ErrorImpl::InvalidInstantiationTarget
            | ErrorImpl::NestingTooDeep { .. } => ErrorKind::Parsing,
            ErrorImpl::TypeMatchError { .. }
            | ErrorImpl::OperandTypeError { .. }
            | ErrorImpl::ConditionTypeError { .. }
            | ErrorImpl::VariableAlreadyDeclared { .. }
            | ErrorImpl::VariableNotDeclared { .. }
            | ErrorImpl::ExpectedValue { .. }
            | ErrorImpl::InvalidAssignmentTarget => ErrorKind::Type,
            ErrorImpl::NotImplemented { .. } => ErrorKind::Unsupported,
        }
    }
}
