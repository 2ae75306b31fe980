//! Centralised error hierarchy for the **Eelios interpreter**.
//!
//! Every layer has its own closed error enum: [`SyntaxError`] for the scanner
//! and parser, [`RuntimeError`] for the evaluator. [`EeliosError`] wraps both
//! so the convenience pipeline in `lib.rs` and the CLI can use a single
//! `Result` alias.
//!
//! The module **does not** print diagnostics itself; callers use
//! [`EeliosError::render`] to format a message against the source text.

use std::io;
use thiserror::Error;

use log::debug;

use crate::datatype::DataType;
use crate::token::Span;

fn type_list(types: &[DataType]) -> String {
    let names: Vec<String> = types.iter().map(ToString::to_string).collect();
    names.join(" or ")
}

/// Lexical and syntactic errors.
#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum SyntaxError {
    #[error("Unexpected character: {character}")]
    UnexpectedCharacter { character: char, span: Span },

    #[error("Unterminated string.")]
    UnterminatedString { span: Span },

    #[error("Expected {expected}, but found {found}")]
    ExpectedButFound {
        expected: String,
        found: String,
        span: Span,
    },

    #[error("Expected expression, but found {found}")]
    ExpectedExpression { found: String, span: Span },

    #[error("Invalid datatype")]
    InvalidDataType { span: Span },

    #[error("Multiple parameters share the name \"{name}\"")]
    InvalidParameter { name: String, span: Span },

    #[error("Invalid assignment target")]
    InvalidAssignmentTarget { span: Span },
}

impl SyntaxError {
    /// Helper constructor for the **parser**'s `consume` failures.
    pub fn expected<S: Into<String>>(expected: S, found: &str, span: Span) -> Self {
        let expected: String = expected.into();

        debug!("Creating syntax error: expected {}, found {:?}", expected, found);

        SyntaxError::ExpectedButFound {
            expected,
            found: found.to_owned(),
            span,
        }
    }

    pub fn span(&self) -> Span {
        match self {
            SyntaxError::UnexpectedCharacter { span, .. }
            | SyntaxError::UnterminatedString { span }
            | SyntaxError::ExpectedButFound { span, .. }
            | SyntaxError::ExpectedExpression { span, .. }
            | SyntaxError::InvalidDataType { span }
            | SyntaxError::InvalidParameter { span, .. }
            | SyntaxError::InvalidAssignmentTarget { span } => *span,
        }
    }
}

/// Errors raised while evaluating a program.
///
/// Every variant except `Io` carries the span of the offending node.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum RuntimeError {
    #[error("Undefined variable, {name}")]
    UndefinedVariable { name: String, span: Span },

    #[error(
        "Expected a value of type {}, but found a value of type {found}",
        type_list(.expected)
    )]
    ExpectedDataTypesButFound {
        expected: Vec<DataType>,
        found: DataType,
        span: Span,
    },

    #[error("Index {index} is not a valid index")]
    InvalidIndex { index: f64, span: Span },

    #[error("Index {index} is out of bounds for length {length}")]
    OutOfBounds {
        index: f64,
        length: usize,
        span: Span,
    },

    #[error("The function call didn't evaluate to a value")]
    InvalidFunction { span: Span },

    #[error("The closure call didn't evaluate to a value")]
    InvalidClosure { span: Span },

    #[error("Use of self is invalid outside of a function or closure")]
    InvalidSelf { span: Span },

    #[error("The instruction didn't evaluate to a value")]
    InvalidInstruction { span: Span },

    #[error("Provided more or less than {expected} arguments to the function or closure")]
    InvalidArguments { expected: usize, span: Span },

    #[error("exec can only be used inside an expression")]
    InvalidExec { span: Span },

    #[error("Cannot compare values of type Array, Instruction, Function or Closure")]
    CannotCompare { span: Span },

    #[error("\"{raw}\" is not a valid number")]
    InvalidNumber { raw: String, span: Span },

    #[error("\"{raw}\" is not a valid boolean")]
    InvalidBoolean { raw: String, span: Span },

    #[error("len can only be used inside an expression")]
    InvalidLen { span: Span },

    #[error("input can only be used inside an expression")]
    InvalidInput { span: Span },

    #[error("toString can only be used inside an expression")]
    InvalidToString { span: Span },

    #[error("toNumber can only be used inside an expression")]
    InvalidToNumber { span: Span },

    #[error("toBoolean can only be used inside an expression")]
    InvalidToBoolean { span: Span },

    #[error("isNumber can only be used inside an expression")]
    InvalidIsNumber { span: Span },

    #[error("isBoolean can only be used inside an expression")]
    InvalidIsBoolean { span: Span },

    /// Failure of the injected console (reading input or printing).
    #[error(transparent)]
    Io(#[from] io::Error),
}

impl RuntimeError {
    /// Helper constructor for the most common error, a datatype mismatch.
    pub fn mismatch(expected: Vec<DataType>, found: DataType, span: Span) -> Self {
        debug!(
            "Creating datatype mismatch: expected {}, found {} at {}",
            type_list(&expected),
            found,
            span
        );

        RuntimeError::ExpectedDataTypesButFound {
            expected,
            found,
            span,
        }
    }

    pub fn span(&self) -> Option<Span> {
        match self {
            RuntimeError::UndefinedVariable { span, .. }
            | RuntimeError::ExpectedDataTypesButFound { span, .. }
            | RuntimeError::InvalidIndex { span, .. }
            | RuntimeError::OutOfBounds { span, .. }
            | RuntimeError::InvalidFunction { span }
            | RuntimeError::InvalidClosure { span }
            | RuntimeError::InvalidSelf { span }
            | RuntimeError::InvalidInstruction { span }
            | RuntimeError::InvalidArguments { span, .. }
            | RuntimeError::InvalidExec { span }
            | RuntimeError::CannotCompare { span }
            | RuntimeError::InvalidNumber { span, .. }
            | RuntimeError::InvalidBoolean { span, .. }
            | RuntimeError::InvalidLen { span }
            | RuntimeError::InvalidInput { span }
            | RuntimeError::InvalidToString { span }
            | RuntimeError::InvalidToNumber { span }
            | RuntimeError::InvalidToBoolean { span }
            | RuntimeError::InvalidIsNumber { span }
            | RuntimeError::InvalidIsBoolean { span } => Some(*span),
            RuntimeError::Io(_) => None,
        }
    }
}

/// Canonical error type of the tokenize → parse → evaluate pipeline.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum EeliosError {
    #[error(transparent)]
    Syntax(#[from] SyntaxError),

    #[error(transparent)]
    Runtime(#[from] RuntimeError),
}

impl EeliosError {
    pub fn span(&self) -> Option<Span> {
        match self {
            EeliosError::Syntax(e) => Some(e.span()),
            EeliosError::Runtime(e) => e.span(),
        }
    }

    /// Formats the error as `[line L, column C] Error: message`, resolving
    /// the span against `source`.
    pub fn render(&self, source: &str) -> String {
        match self.span() {
            Some(span) => {
                let (line, column) = span.location(source);
                format!("[line {line}, column {column}] Error: {self}")
            }
            None => format!("Error: {self}"),
        }
    }
}

/// Crate‑wide `Result` alias.
pub type Result<T> = std::result::Result<T, EeliosError>;
