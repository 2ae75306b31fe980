/*!
Time & Space Complexity: whole‑file overview
============================================

Definitions
-----------
* **n** = number of tokens (including the sole EOF).
* **m** = number of AST nodes (`m ≤ n`, each token contributes at most one node).

### Time

| Phase / function              | Cost | Rationale                                                  |
|-------------------------------|-----:|------------------------------------------------------------|
| `Parser::parse` main loop     | Θ(n) | Each token is consumed once via `advance()`.               |
| Closure look‑ahead            | O(1) | At most two tokens past a `(` are inspected.               |
| Lvalue conversion             | O(d) | Walks the `[...]` chain of an assignment target (`d ≤ n`). |

**Overall:** **Θ(n)**.

### Space

| Structure                | Asymptotic | Notes                                              |
|--------------------------|-----------:|----------------------------------------------------|
| Borrowed token slice     | O(n)       | Zero‑copy from scanner.                            |
| AST (`Rc<Expr>`)         | O(m)       | Nodes are reference counted so values can share them. |
| Parser scratch fields    | O(1)       | A cursor and temporaries.                          |

Call‑stack depth grows with syntactic nesting.

### Logging Policy

| Location                     | Level  | Purpose                                   |
|------------------------------|--------|-------------------------------------------|
| `Parser::new`, `parse`       | `info` | Lifecycle milestones.                     |
| literals, instructions       | `debug`| Descent into the larger grammar branches. |
| Error paths (`consume`, etc.)| `debug`| Context before returning structured error.|

--------------------------------------------------------------------------------
Grammar (EBNF, condensed)
--------------------------

```text
program        → ( expression ( "." expression )* "."? )? EOF ;
expression     → assignment ;
assignment     → logical ( "<-" expression )? ;
logical        → equality ( ( "&" | "and" | "|" | "or" ) equality )* ;
equality       → comparison ( ( "=" | "!=" ) comparison )* ;
comparison     → addition ( ( "<" | ">" | "<=" | ">=" ) addition )* ;
addition       → multiplication ( ( "+" | "-" ) multiplication )* ;
multiplication → power ( ( "*" | "/" | "%" ) power )* ;
power          → unary ( "^" unary )* ;
unary          → ( "+" | "-" ) unary | postfix ;
postfix        → primary ( "[" expression "]" | "(" arguments? ")" )* ;
primary        → NUMBER | STRING | "true" | "false" | IDENT
               | "[" arguments? "]" | "(" expression ")"
               | "|" parameters? "|" "->" datatype expression
               | "(" parameters? ")" "=>" datatype expression
               | "print" "(" arguments? ")" | "eval" expression
               | "exec" expression
               | "if" expression "then" expression ( "else" expression )?
               | "while" expression "do" expression
               | "len" "(" expression ")" | "input" "(" expression? ")"
               | builtin "(" expression ")" ;
parameters     → IDENT ":" datatype ( "," IDENT ":" datatype )* ;
arguments      → expression ( "," expression )* ;
datatype       → "Any" | "_" | "String" | "Number" | "Boolean"
               | "Instruction" | "Array" "<" datatype ">"
               | "|" datatypes? "|" "->" datatype
               | "(" datatypes? ")" "=>" datatype ;
```

The left side of `<-` is parsed as an ordinary expression and converted to an
[`LValue`] afterwards; only variables and index chains over them qualify.
A `(` opens a closure literal when it is followed by `)` or by `IDENT ":"`.
*/

use std::collections::HashSet;
use std::rc::Rc;

use crate::ast::{
    BinaryOperator, Builtin, Expr, ExprKind, FunctionLiteral, LValue, Parameter, UnaryOperator,
};
use crate::datatype::DataType;
use crate::error::SyntaxError;
use crate::token::{Span, Token, TokenType};

use log::{debug, info};

type Result<T> = std::result::Result<T, SyntaxError>;

/// Top‑level parser over an immutable slice of tokens.
///
/// The slice must end with the `EOF` token emitted by the scanner.
pub struct Parser<'a> {
    tokens: &'a [Token<'a>],
    current: usize,
}

impl<'a> Parser<'a> {
    /// Construct a new parser.
    pub fn new(tokens: &'a [Token<'a>]) -> Self {
        info!("Parser created with {} tokens", tokens.len());

        Self { tokens, current: 0 }
    }

    // ───────────────────────── public API ─────────────────────────

    /// Parse an entire program.
    ///
    /// The result is always an array node: the top‑level instruction
    /// sequence, empty for an empty program.
    pub fn parse(&mut self) -> Result<Rc<Expr>> {
        info!("Beginning parse phase");

        let start: Span = self.peek().span;
        let mut expressions: Vec<Rc<Expr>> = Vec::new();

        if !self.is_at_end() {
            loop {
                expressions.push(self.expression()?);

                if !self.matches(TokenType::DOT) || self.is_at_end() {
                    break;
                }
            }
        }

        if !self.is_at_end() {
            return Err(self.error("'.' or end of input"));
        }

        let span: Span = start.to(self.peek().span);

        info!("Parsed program with {} expressions", expressions.len());

        Ok(Expr::new(ExprKind::Array(expressions), span))
    }

    // ─────────────────────── expression rules ─────────────────────

    fn expression(&mut self) -> Result<Rc<Expr>> {
        self.assignment()
    }

    fn assignment(&mut self) -> Result<Rc<Expr>> {
        let expr: Rc<Expr> = self.logical()?;

        if self.matches(TokenType::LESS_MINUS) {
            let value: Rc<Expr> = self.expression()?;
            let target: LValue = Self::lvalue(&expr)?;
            let span: Span = expr.span.to(value.span);

            return Ok(Expr::new(ExprKind::Assign { target, value }, span));
        }

        Ok(expr)
    }

    /// Convert a parsed expression into an assignment target.
    fn lvalue(expr: &Expr) -> Result<LValue> {
        match &expr.kind {
            ExprKind::Variable(name) => Ok(LValue::Variable {
                name: name.clone(),
                span: expr.span,
            }),

            ExprKind::Index { target, index } => Ok(LValue::Index {
                target: Box::new(Self::lvalue(target)?),
                index: Rc::clone(index),
                span: expr.span,
            }),

            _ => {
                debug!("Invalid assignment target at {}", expr.span);

                Err(SyntaxError::InvalidAssignmentTarget { span: expr.span })
            }
        }
    }

    /// `&` and `|` share one precedence level and associate to the left.
    fn logical(&mut self) -> Result<Rc<Expr>> {
        let mut expr: Rc<Expr> = self.equality()?;

        loop {
            let operator: BinaryOperator =
                if self.matches(TokenType::AMPERSAND) || self.matches(TokenType::AND) {
                    BinaryOperator::And
                } else if self.matches(TokenType::PIPE) || self.matches(TokenType::OR) {
                    BinaryOperator::Or
                } else {
                    break;
                };

            let right: Rc<Expr> = self.equality()?;
            expr = Self::binary(operator, expr, right);
        }

        Ok(expr)
    }

    fn equality(&mut self) -> Result<Rc<Expr>> {
        let mut expr: Rc<Expr> = self.comparison()?;

        loop {
            let operator: BinaryOperator = if self.matches(TokenType::EQUAL) {
                BinaryOperator::Equal
            } else if self.matches(TokenType::BANG_EQUAL) {
                BinaryOperator::NotEqual
            } else {
                break;
            };

            let right: Rc<Expr> = self.comparison()?;
            expr = Self::binary(operator, expr, right);
        }

        Ok(expr)
    }

    fn comparison(&mut self) -> Result<Rc<Expr>> {
        let mut expr: Rc<Expr> = self.addition()?;

        loop {
            let operator: BinaryOperator = if self.matches(TokenType::LESS) {
                BinaryOperator::LessThan
            } else if self.matches(TokenType::GREATER) {
                BinaryOperator::GreaterThan
            } else if self.matches(TokenType::LESS_EQUAL) {
                BinaryOperator::LessThanOrEqual
            } else if self.matches(TokenType::GREATER_EQUAL) {
                BinaryOperator::GreaterThanOrEqual
            } else {
                break;
            };

            let right: Rc<Expr> = self.addition()?;
            expr = Self::binary(operator, expr, right);
        }

        Ok(expr)
    }

    fn addition(&mut self) -> Result<Rc<Expr>> {
        let mut expr: Rc<Expr> = self.multiplication()?;

        loop {
            let operator: BinaryOperator = if self.matches(TokenType::PLUS) {
                BinaryOperator::Add
            } else if self.matches(TokenType::MINUS) {
                BinaryOperator::Subtract
            } else {
                break;
            };

            let right: Rc<Expr> = self.multiplication()?;
            expr = Self::binary(operator, expr, right);
        }

        Ok(expr)
    }

    fn multiplication(&mut self) -> Result<Rc<Expr>> {
        let mut expr: Rc<Expr> = self.power()?;

        loop {
            let operator: BinaryOperator = if self.matches(TokenType::STAR) {
                BinaryOperator::Multiply
            } else if self.matches(TokenType::SLASH) {
                BinaryOperator::Divide
            } else if self.matches(TokenType::PERCENT) {
                BinaryOperator::Modulus
            } else {
                break;
            };

            let right: Rc<Expr> = self.power()?;
            expr = Self::binary(operator, expr, right);
        }

        Ok(expr)
    }

    fn power(&mut self) -> Result<Rc<Expr>> {
        let mut expr: Rc<Expr> = self.unary()?;

        while self.matches(TokenType::CARET) {
            let right: Rc<Expr> = self.unary()?;
            expr = Self::binary(BinaryOperator::Power, expr, right);
        }

        Ok(expr)
    }

    fn unary(&mut self) -> Result<Rc<Expr>> {
        let operator: Option<UnaryOperator> = if self.matches(TokenType::PLUS) {
            Some(UnaryOperator::Plus)
        } else if self.matches(TokenType::MINUS) {
            Some(UnaryOperator::Minus)
        } else {
            None
        };

        match operator {
            Some(operator) => {
                let start: Span = self.previous().span;
                let operand: Rc<Expr> = self.unary()?;
                let span: Span = start.to(operand.span);

                Ok(Expr::new(ExprKind::Unary { operator, operand }, span))
            }
            None => self.postfix(),
        }
    }

    fn postfix(&mut self) -> Result<Rc<Expr>> {
        let mut expr: Rc<Expr> = self.primary()?;

        loop {
            if self.matches(TokenType::LEFT_BRACKET) {
                let index: Rc<Expr> = self.expression()?;
                self.consume(TokenType::RIGHT_BRACKET, "']' after index")?;

                let span: Span = self.span_from(expr.span);
                expr = Expr::new(ExprKind::Index { target: expr, index }, span);
            } else if self.matches(TokenType::LEFT_PAREN) {
                let arguments: Vec<Rc<Expr>> =
                    self.arguments(TokenType::RIGHT_PAREN, "')' after arguments")?;

                let span: Span = self.span_from(expr.span);
                expr = Expr::new(
                    ExprKind::Call {
                        callee: expr,
                        arguments,
                    },
                    span,
                );
            } else {
                break;
            }
        }

        Ok(expr)
    }

    /// Comma separated expressions up to (and including) `close`.
    fn arguments(&mut self, close: TokenType, expected: &str) -> Result<Vec<Rc<Expr>>> {
        let mut arguments: Vec<Rc<Expr>> = Vec::new();

        if !self.check(close.clone()) {
            loop {
                arguments.push(self.expression()?);

                if !self.matches(TokenType::COMMA) {
                    break;
                }
            }
        }

        self.consume(close, expected)?;

        Ok(arguments)
    }

    fn primary(&mut self) -> Result<Rc<Expr>> {
        let token: &'a Token<'a> = self.peek();
        let start: Span = token.span;

        let kind: ExprKind = match &token.token_type {
            TokenType::NUMBER(n) => {
                self.advance();
                ExprKind::Number(*n)
            }

            TokenType::STRING(s) => {
                self.advance();
                ExprKind::Str(s.clone())
            }

            TokenType::TRUE => {
                self.advance();
                ExprKind::Boolean(true)
            }

            TokenType::FALSE => {
                self.advance();
                ExprKind::Boolean(false)
            }

            TokenType::IDENTIFIER => {
                self.advance();
                ExprKind::Variable(token.lexeme.to_owned())
            }

            TokenType::LEFT_BRACKET => {
                self.advance();
                ExprKind::Array(self.arguments(TokenType::RIGHT_BRACKET, "']' after elements")?)
            }

            TokenType::LEFT_PAREN if self.starts_closure() => {
                self.advance();
                debug!("Parsing closure literal on line {}", token.line);

                let literal: FunctionLiteral = self.function_literal(
                    start,
                    TokenType::RIGHT_PAREN,
                    "')' after parameters",
                    TokenType::EQUAL_GREATER,
                    "'=>' after parameters",
                )?;

                ExprKind::Closure(Rc::new(literal))
            }

            TokenType::LEFT_PAREN => {
                self.advance();
                let inner: Rc<Expr> = self.expression()?;
                self.consume(TokenType::RIGHT_PAREN, "')' after expression")?;

                ExprKind::Grouping(inner)
            }

            TokenType::PIPE => {
                self.advance();
                debug!("Parsing function literal on line {}", token.line);

                let literal: FunctionLiteral = self.function_literal(
                    start,
                    TokenType::PIPE,
                    "'|' after parameters",
                    TokenType::MINUS_GREATER,
                    "'->' after parameters",
                )?;

                ExprKind::Function(Rc::new(literal))
            }

            TokenType::PRINT => {
                self.advance();
                self.consume(TokenType::LEFT_PAREN, "'(' after 'print'")?;

                ExprKind::Print(self.arguments(TokenType::RIGHT_PAREN, "')' after arguments")?)
            }

            TokenType::EVAL => {
                self.advance();
                ExprKind::Eval(self.expression()?)
            }

            TokenType::EXEC => {
                self.advance();
                ExprKind::Exec(self.expression()?)
            }

            TokenType::IF => {
                self.advance();
                debug!("Parsing if instruction on line {}", token.line);

                let condition: Rc<Expr> = self.expression()?;
                self.consume(TokenType::THEN, "'then' after condition")?;
                let then_branch: Rc<Expr> = self.expression()?;

                let else_branch: Option<Rc<Expr>> = if self.matches(TokenType::ELSE) {
                    Some(self.expression()?)
                } else {
                    None
                };

                ExprKind::If {
                    condition,
                    then_branch,
                    else_branch,
                }
            }

            TokenType::WHILE => {
                self.advance();
                debug!("Parsing while instruction on line {}", token.line);

                let condition: Rc<Expr> = self.expression()?;
                self.consume(TokenType::DO, "'do' after condition")?;
                let body: Rc<Expr> = self.expression()?;

                ExprKind::While { condition, body }
            }

            TokenType::INPUT => {
                self.advance();
                self.consume(TokenType::LEFT_PAREN, "'(' after 'input'")?;

                let prompt: Option<Rc<Expr>> = if self.check(TokenType::RIGHT_PAREN) {
                    None
                } else {
                    Some(self.expression()?)
                };

                self.consume(TokenType::RIGHT_PAREN, "')' after argument")?;

                ExprKind::Builtin(Builtin::Input(prompt))
            }

            TokenType::LEN
            | TokenType::TO_STRING
            | TokenType::TO_NUMBER
            | TokenType::TO_BOOLEAN
            | TokenType::IS_NUMBER
            | TokenType::IS_BOOLEAN => {
                self.advance();
                self.consume(TokenType::LEFT_PAREN, "'(' after built-in name")?;
                let argument: Rc<Expr> = self.expression()?;
                self.consume(TokenType::RIGHT_PAREN, "')' after argument")?;

                let builtin: Builtin = match token.token_type {
                    TokenType::LEN => Builtin::Len(argument),
                    TokenType::TO_STRING => Builtin::ToString(argument),
                    TokenType::TO_NUMBER => Builtin::ToNumber(argument),
                    TokenType::TO_BOOLEAN => Builtin::ToBoolean(argument),
                    TokenType::IS_NUMBER => Builtin::IsNumber(argument),
                    _ => Builtin::IsBoolean(argument),
                };

                ExprKind::Builtin(builtin)
            }

            _ => {
                debug!("Expected expression, found {:?}", self.found());

                return Err(SyntaxError::ExpectedExpression {
                    found: self.found().to_owned(),
                    span: token.span,
                });
            }
        };

        Ok(Expr::new(kind, self.span_from(start)))
    }

    // ─────────────────────── literals & datatypes ─────────────────

    /// Parameters, return type and body of a function or closure literal.
    /// The opening delimiter has already been consumed.
    fn function_literal(
        &mut self,
        start: Span,
        close: TokenType,
        close_expected: &str,
        arrow: TokenType,
        arrow_expected: &str,
    ) -> Result<FunctionLiteral> {
        let mut parameters: Vec<Parameter> = Vec::new();
        let mut seen: HashSet<&'a str> = HashSet::new();

        if !self.check(close.clone()) {
            loop {
                let name: &'a Token<'a> =
                    self.consume(TokenType::IDENTIFIER, "parameter name")?;
                self.consume(TokenType::COLON, "':' after parameter name")?;
                let datatype: DataType = self.datatype()?;

                if !seen.insert(name.lexeme) {
                    debug!("Duplicate parameter {} on line {}", name.lexeme, name.line);

                    return Err(SyntaxError::InvalidParameter {
                        name: name.lexeme.to_owned(),
                        span: name.span,
                    });
                }

                parameters.push(Parameter {
                    name: name.lexeme.to_owned(),
                    datatype,
                    span: self.span_from(name.span),
                });

                if !self.matches(TokenType::COMMA) {
                    break;
                }
            }
        }

        self.consume(close, close_expected)?;
        self.consume(arrow, arrow_expected)?;

        let return_type: DataType = self.datatype()?;
        let body: Rc<Expr> = self.expression()?;

        Ok(FunctionLiteral {
            parameters,
            return_type,
            body,
            span: self.span_from(start),
        })
    }

    fn datatype(&mut self) -> Result<DataType> {
        let token: &'a Token<'a> = self.advance_any();

        match token.token_type {
            TokenType::IDENTIFIER => match token.lexeme {
                "Any" | "_" => Ok(DataType::Any),
                "String" => Ok(DataType::String),
                "Number" => Ok(DataType::Number),
                "Boolean" => Ok(DataType::Boolean),
                "Instruction" => Ok(DataType::Instruction),
                "Array" => {
                    self.consume(TokenType::LESS, "'<' after 'Array'")?;
                    let element: DataType = self.datatype()?;
                    self.consume(TokenType::GREATER, "'>' after element type")?;

                    Ok(DataType::array(element))
                }
                _ => Err(SyntaxError::InvalidDataType { span: token.span }),
            },

            TokenType::PIPE => {
                let parameters: Vec<DataType> = self.datatypes(TokenType::PIPE, "'|'")?;
                self.consume(TokenType::MINUS_GREATER, "'->' in function type")?;

                Ok(DataType::function(parameters, self.datatype()?))
            }

            TokenType::LEFT_PAREN => {
                let parameters: Vec<DataType> = self.datatypes(TokenType::RIGHT_PAREN, "')'")?;
                self.consume(TokenType::EQUAL_GREATER, "'=>' in closure type")?;

                Ok(DataType::closure(parameters, self.datatype()?))
            }

            _ => {
                debug!("Invalid datatype at {}", token.span);

                Err(SyntaxError::InvalidDataType { span: token.span })
            }
        }
    }

    fn datatypes(&mut self, close: TokenType, expected: &str) -> Result<Vec<DataType>> {
        let mut types: Vec<DataType> = Vec::new();

        if !self.check(close.clone()) {
            loop {
                types.push(self.datatype()?);

                if !self.matches(TokenType::COMMA) {
                    break;
                }
            }
        }

        self.consume(close, expected)?;

        Ok(types)
    }

    // ────────────────────── utility helpers ───────────────────────

    fn binary(operator: BinaryOperator, left: Rc<Expr>, right: Rc<Expr>) -> Rc<Expr> {
        let span: Span = left.span.to(right.span);

        Expr::new(
            ExprKind::Binary {
                operator,
                left,
                right,
            },
            span,
        )
    }

    /// `(` followed by `)` or by `IDENT ":"` opens a closure literal.
    fn starts_closure(&self) -> bool {
        match self.peek_at(1).token_type {
            TokenType::RIGHT_PAREN => true,
            TokenType::IDENTIFIER => matches!(self.peek_at(2).token_type, TokenType::COLON),
            _ => false,
        }
    }

    /// Span from `start` up to the last consumed token.
    #[inline(always)]
    fn span_from(&self, start: Span) -> Span {
        start.to(self.previous().span)
    }

    #[inline(always)]
    fn found(&self) -> &'a str {
        let token: &'a Token<'a> = self.peek();

        if matches!(token.token_type, TokenType::EOF) {
            "end of input"
        } else {
            token.lexeme
        }
    }

    fn error(&self, expected: &str) -> SyntaxError {
        SyntaxError::expected(expected, self.found(), self.peek().span)
    }

    #[inline(always)]
    fn matches(&mut self, ttype: TokenType) -> bool {
        if self.check(ttype) {
            self.advance();

            return true;
        }

        false
    }

    #[inline(always)]
    fn consume(&mut self, ttype: TokenType, expected: &str) -> Result<&'a Token<'a>> {
        if self.check(ttype) {
            return Ok(self.advance());
        }

        Err(self.error(expected))
    }

    #[inline(always)]
    fn check(&self, ttype: TokenType) -> bool {
        if self.is_at_end() {
            return false;
        }

        self.peek().token_type == ttype
    }

    #[inline(always)]
    fn advance(&mut self) -> &'a Token<'a> {
        if !self.is_at_end() {
            self.current += 1;
        }

        self.previous()
    }

    /// Consume the current token whatever it is; at EOF the EOF token itself
    /// is returned without moving.
    #[inline(always)]
    fn advance_any(&mut self) -> &'a Token<'a> {
        let token: &'a Token<'a> = self.peek();
        self.advance();
        token
    }

    #[inline(always)]
    fn is_at_end(&self) -> bool {
        matches!(self.peek().token_type, TokenType::EOF)
    }

    #[inline(always)]
    fn peek(&self) -> &'a Token<'a> {
        &self.tokens[self.current]
    }

    /// Look `offset` tokens ahead, clamped to the trailing EOF.
    #[inline(always)]
    fn peek_at(&self, offset: usize) -> &'a Token<'a> {
        let index: usize = (self.current + offset).min(self.tokens.len() - 1);
        &self.tokens[index]
    }

    #[inline(always)]
    fn previous(&self) -> &'a Token<'a> {
        &self.tokens[self.current.saturating_sub(1)]
    }
}
