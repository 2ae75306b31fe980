//! Abstract syntax tree produced by the parser and walked by the evaluator.
//!
//! Instructions are ordinary expression nodes: evaluating `print(...)`,
//! `x <- ...`, `eval ...`, `if ...` or `while ...` in value position yields a
//! value of type `Instruction` wrapping the node itself. Child nodes are held
//! in `Rc` so such values can share the tree instead of copying it.

use serde::Serialize;
use std::rc::Rc;

use crate::datatype::DataType;
use crate::token::Span;

/// An expression node together with its source span.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Expr {
    pub kind: ExprKind,
    pub span: Span,
}

impl Expr {
    pub fn new(kind: ExprKind, span: Span) -> Rc<Self> {
        Rc::new(Self { kind, span })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum UnaryOperator {
    Plus,
    Minus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BinaryOperator {
    Add,
    Subtract,
    Multiply,
    Divide,
    Power,
    Modulus,
    And,
    Or,
    Equal,
    NotEqual,
    LessThan,
    GreaterThan,
    LessThanOrEqual,
    GreaterThanOrEqual,
}

impl BinaryOperator {
    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOperator::Add => "+",
            BinaryOperator::Subtract => "-",
            BinaryOperator::Multiply => "*",
            BinaryOperator::Divide => "/",
            BinaryOperator::Power => "^",
            BinaryOperator::Modulus => "%",
            BinaryOperator::And => "and",
            BinaryOperator::Or => "or",
            BinaryOperator::Equal => "=",
            BinaryOperator::NotEqual => "!=",
            BinaryOperator::LessThan => "<",
            BinaryOperator::GreaterThan => ">",
            BinaryOperator::LessThanOrEqual => "<=",
            BinaryOperator::GreaterThanOrEqual => ">=",
        }
    }
}

/// A declared parameter of a function or closure literal.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Parameter {
    pub name: String,
    pub datatype: DataType,
    pub span: Span,
}

/// Shared shape of function (`|x: T| -> R body`) and closure
/// (`(x: T) => R body`) literals.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FunctionLiteral {
    pub parameters: Vec<Parameter>,
    pub return_type: DataType,
    pub body: Rc<Expr>,
    pub span: Span,
}

impl FunctionLiteral {
    pub fn parameter_types(&self) -> Vec<DataType> {
        self.parameters.iter().map(|p| p.datatype.clone()).collect()
    }

    /// Datatype of this literal when used as a plain function.
    pub fn function_type(&self) -> DataType {
        DataType::function(self.parameter_types(), self.return_type.clone())
    }

    /// Datatype of this literal when used as a closure.
    pub fn closure_type(&self) -> DataType {
        DataType::closure(self.parameter_types(), self.return_type.clone())
    }
}

/// Built‑in conversions and queries. Each takes exactly one operand except
/// `input`, whose prompt is optional.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Builtin {
    Len(Rc<Expr>),
    Input(Option<Rc<Expr>>),
    ToString(Rc<Expr>),
    ToNumber(Rc<Expr>),
    ToBoolean(Rc<Expr>),
    IsNumber(Rc<Expr>),
    IsBoolean(Rc<Expr>),
}

impl Builtin {
    pub fn name(&self) -> &'static str {
        match self {
            Builtin::Len(_) => "len",
            Builtin::Input(_) => "input",
            Builtin::ToString(_) => "toString",
            Builtin::ToNumber(_) => "toNumber",
            Builtin::ToBoolean(_) => "toBoolean",
            Builtin::IsNumber(_) => "isNumber",
            Builtin::IsBoolean(_) => "isBoolean",
        }
    }

    pub fn argument(&self) -> Option<&Rc<Expr>> {
        match self {
            Builtin::Input(prompt) => prompt.as_ref(),
            Builtin::Len(argument)
            | Builtin::ToString(argument)
            | Builtin::ToNumber(argument)
            | Builtin::ToBoolean(argument)
            | Builtin::IsNumber(argument)
            | Builtin::IsBoolean(argument) => Some(argument),
        }
    }
}

/// Assignable storage location.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum LValue {
    /// `name`
    Variable { name: String, span: Span },

    /// `target[index]`
    Index {
        target: Box<LValue>,
        index: Rc<Expr>,
        span: Span,
    },
}

impl LValue {
    pub fn span(&self) -> Span {
        match self {
            LValue::Variable { span, .. } | LValue::Index { span, .. } => *span,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum ExprKind {
    /// String literal.
    Str(String),

    /// Numeric literal, always an `f64`.
    Number(f64),

    /// `true` / `false`.
    Boolean(bool),

    /// `[a, b, ...]`: a value array, or an instruction sequence when
    /// evaluated in instruction position.
    Array(Vec<Rc<Expr>>),

    /// `|x: T| -> R body`
    Function(Rc<FunctionLiteral>),

    /// `(x: T) => R body`
    Closure(Rc<FunctionLiteral>),

    /// Variable reference, including the implicit `self`.
    Variable(String),

    /// Parenthesised sub‑expression.
    Grouping(Rc<Expr>),

    /// `target[index]`
    Index { target: Rc<Expr>, index: Rc<Expr> },

    /// `callee(arguments...)`
    Call {
        callee: Rc<Expr>,
        arguments: Vec<Rc<Expr>>,
    },

    Unary {
        operator: UnaryOperator,
        operand: Rc<Expr>,
    },

    Binary {
        operator: BinaryOperator,
        left: Rc<Expr>,
        right: Rc<Expr>,
    },

    Builtin(Builtin),

    /// `print(a, b, ...)`
    Print(Vec<Rc<Expr>>),

    /// `lvalue <- value`
    Assign { target: LValue, value: Rc<Expr> },

    /// `eval expr` produces a result and stops the enclosing sequence.
    Eval(Rc<Expr>),

    /// `exec expr` runs an instruction for its result (value position only).
    Exec(Rc<Expr>),

    /// `if condition then a else b`
    If {
        condition: Rc<Expr>,
        then_branch: Rc<Expr>,
        else_branch: Option<Rc<Expr>>,
    },

    /// `while condition do body`
    While { condition: Rc<Expr>, body: Rc<Expr> },
}
