use std::fmt;
use std::rc::Rc;

use crate::ast::{Expr, FunctionLiteral};
use crate::datatype::DataType;
use crate::environment::Environment;
use crate::token::Span;

/// A closure literal together with the environment it was created in.
///
/// A closure stored in a variable it captured forms an `Rc` cycle that is
/// never reclaimed. Interpreter runs are short lived, so this is accepted.
pub struct Closure {
    pub literal: Rc<FunctionLiteral>,
    pub environment: Option<Rc<Environment>>,
}

impl fmt::Debug for Closure {
    // The captured environment may contain this closure, so it is not printed.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Closure")
            .field("literal", &self.literal)
            .field("captured", &self.environment.is_some())
            .finish()
    }
}

/// Untyped runtime data. The datatype travels separately in [`Value`].
#[derive(Debug, Clone)]
pub enum Payload {
    /// Content of a freshly created, never written variable.
    Null,
    Str(String),
    Number(f64),
    Boolean(bool),
    Array(Rc<Vec<Payload>>),
    Function(Rc<FunctionLiteral>),
    Closure(Rc<Closure>),
    /// A deferred instruction: the node itself, evaluated when executed.
    Instruction(Rc<Expr>),
}

/// A payload tagged with its datatype and the span that produced it.
#[derive(Debug, Clone)]
pub struct Value {
    pub payload: Payload,
    pub datatype: DataType,
    pub span: Span,
}

impl Value {
    pub fn new(payload: Payload, datatype: DataType, span: Span) -> Self {
        Self {
            payload,
            datatype,
            span,
        }
    }

    pub fn number(n: f64, span: Span) -> Self {
        Self::new(Payload::Number(n), DataType::Number, span)
    }

    pub fn string(s: String, span: Span) -> Self {
        Self::new(Payload::Str(s), DataType::String, span)
    }

    pub fn boolean(b: bool, span: Span) -> Self {
        Self::new(Payload::Boolean(b), DataType::Boolean, span)
    }

    pub fn instruction(node: Rc<Expr>) -> Self {
        let span: Span = node.span;
        Self::new(Payload::Instruction(node), DataType::Instruction, span)
    }

    /// The same value re‑attributed to `span`.
    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.payload)
    }
}

impl fmt::Display for Payload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Payload::Null => write!(f, "null"),

            Payload::Str(s) => write!(f, "{}", s),

            Payload::Number(n) => write!(f, "{}", format_number(*n)),

            Payload::Boolean(b) => write!(f, "{}", b),

            Payload::Array(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }

            Payload::Function(_) => write!(f, "<function>"),

            Payload::Closure(_) => write!(f, "<closure>"),

            Payload::Instruction(_) => write!(f, "<instruction>"),
        }
    }
}

/// Integral numbers print without a fractional part: `3`, `-2`, `2.5`.
pub fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        let mut buf = itoa::Buffer::new();
        buf.format(n as i64).to_owned()
    } else {
        n.to_string()
    }
}
