//! Tree‑walking evaluator.
//!
//! Every node is evaluated in one of two [`Position`]s. In value position
//! the node produces a [`Value`]; instruction nodes (`print`, `<-`, `eval`,
//! `if`, `while`) produce an `Instruction` value wrapping themselves. In
//! instruction position array literals, `exec` and the built‑ins are not
//! evaluated either, so the instruction runner can sequence the array lazily
//! or report the misuse.
//!
//! Running an instruction yields `Ok(None)` to continue and `Ok(Some(v))`
//! once an `eval` produced a result, which stops every enclosing sequence up
//! to the nearest call.

use std::rc::Rc;

use log::{debug, info, trace};

use crate::ast::{BinaryOperator, Builtin, Expr, ExprKind, FunctionLiteral, LValue, UnaryOperator};
use crate::console::Console;
use crate::datatype::{is_expected_datatype, DataType};
use crate::environment::{Environment, Variable};
use crate::error::RuntimeError;
use crate::lens::Lens;
use crate::token::Span;
use crate::value::{Closure, Payload, Value};

/// Convenient alias for evaluator results.
pub type EvalResult<T> = Result<T, RuntimeError>;

/// What `self` refers to while a function or closure body runs.
#[derive(Debug, Clone)]
pub enum Callee {
    Function(Rc<FunctionLiteral>),
    Closure(Rc<Closure>),
}

impl Callee {
    fn to_value(&self, span: Span) -> Value {
        match self {
            Callee::Function(literal) => Value::new(
                Payload::Function(Rc::clone(literal)),
                literal.function_type(),
                span,
            ),
            Callee::Closure(closure) => Value::new(
                Payload::Closure(Rc::clone(closure)),
                closure.literal.closure_type(),
                span,
            ),
        }
    }

    fn no_result(&self, span: Span) -> RuntimeError {
        match self {
            Callee::Function(_) => RuntimeError::InvalidFunction { span },
            Callee::Closure(_) => RuntimeError::InvalidClosure { span },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Position {
    Value,
    Instruction,
}

pub struct Evaluator {
    instruction: Value,
    environment: Option<Rc<Environment>>,
    self_binding: Option<Callee>,
    console: Rc<dyn Console>,
}

impl Evaluator {
    /// Evaluator for a whole program, starting with an empty environment.
    pub fn new(program: Rc<Expr>, console: Rc<dyn Console>) -> Self {
        info!("Initializing Evaluator");

        Self::nested(Value::instruction(program), None, None, console)
    }

    fn nested(
        instruction: Value,
        environment: Option<Rc<Environment>>,
        self_binding: Option<Callee>,
        console: Rc<dyn Console>,
    ) -> Self {
        Self {
            instruction,
            environment,
            self_binding,
            console,
        }
    }

    /// Current environment; after `evaluate` it holds every top level
    /// variable of the program.
    pub fn environment(&self) -> Option<&Rc<Environment>> {
        self.environment.as_ref()
    }

    /// Run the program. `Some` is the value of the first `eval` reached at
    /// top level.
    pub fn evaluate(&mut self) -> EvalResult<Option<Value>> {
        info!("Evaluating program");

        let instruction: Value = self.instruction.clone();

        let result = match &instruction.payload {
            Payload::Instruction(node) => self.evaluate_instruction(node),
            _ => self.run(&instruction),
        }?;

        info!("Evaluation finished, produced value: {}", result.is_some());

        Ok(result)
    }

    fn execute(&mut self) -> EvalResult<Option<Value>> {
        let instruction: Value = self.instruction.clone();
        self.run(&instruction)
    }

    // ───────────────────────── instructions ─────────────────────────

    /// Evaluate `node` in instruction position and run the result.
    fn evaluate_instruction(&mut self, node: &Rc<Expr>) -> EvalResult<Option<Value>> {
        let instruction: Value = self.evaluate_expression(node, Position::Instruction)?;
        expect(&DataType::Instruction, &instruction)?;

        self.run(&instruction)
    }

    fn run(&mut self, instruction: &Value) -> EvalResult<Option<Value>> {
        match &instruction.payload {
            Payload::Array(items) => {
                trace!("Running instruction sequence of {} items", items.len());

                for item in items.iter() {
                    let item: Value =
                        Value::new(item.clone(), DataType::Instruction, instruction.span);

                    if let Some(result) = self.run(&item)? {
                        return Ok(Some(result));
                    }
                }

                Ok(None)
            }

            Payload::Instruction(node) => self.dispatch(node),

            _ => {
                debug!("Not an instruction at {}", instruction.span);

                Err(RuntimeError::InvalidInstruction {
                    span: instruction.span,
                })
            }
        }
    }

    fn dispatch(&mut self, node: &Rc<Expr>) -> EvalResult<Option<Value>> {
        let span: Span = node.span;

        match &node.kind {
            ExprKind::Array(elements) => {
                for element in elements {
                    if let Some(result) = self.evaluate_instruction(element)? {
                        return Ok(Some(result));
                    }
                }

                Ok(None)
            }

            ExprKind::Print(arguments) => {
                let mut text = String::new();

                for argument in arguments {
                    let value: Value = self.evaluate_expression(argument, Position::Value)?;
                    text.push_str(&value.to_string());
                }

                debug!("print: {}", text);

                self.console.print(&text)?;

                Ok(None)
            }

            ExprKind::Assign { target, value } => {
                let (lens, target_span) = self.evaluate_lvalue(target)?;
                let declared: DataType = lens.get()?.datatype;
                let value: Value = self.evaluate_expression(value, Position::Value)?;

                expect(&declared, &value)?;

                debug!("Assigning {} value at {}", value.datatype, target_span);

                lens.set(value)?;

                Ok(None)
            }

            ExprKind::Eval(inner) => {
                let value: Value = self.evaluate_expression(inner, Position::Value)?;

                debug!("eval produced {} at {}", value.datatype, span);

                Ok(Some(value))
            }

            ExprKind::Exec(_) => Err(RuntimeError::InvalidExec { span }),

            ExprKind::If {
                condition,
                then_branch,
                else_branch,
            } => {
                let branch: Option<&Rc<Expr>> = if self.evaluate_condition(condition)? {
                    Some(then_branch)
                } else {
                    else_branch.as_ref()
                };

                match branch {
                    Some(branch) => self.run_nested(branch),
                    None => Ok(None),
                }
            }

            ExprKind::While { condition, body } => {
                debug!("Entering while loop at {}", span);

                while self.evaluate_condition(condition)? {
                    if let Some(result) = self.run_nested(body)? {
                        return Ok(Some(result));
                    }
                }

                debug!("Exited while loop at {}", span);

                Ok(None)
            }

            ExprKind::Builtin(builtin) => Err(match builtin {
                Builtin::Len(_) => RuntimeError::InvalidLen { span },
                Builtin::Input(_) => RuntimeError::InvalidInput { span },
                Builtin::ToString(_) => RuntimeError::InvalidToString { span },
                Builtin::ToNumber(_) => RuntimeError::InvalidToNumber { span },
                Builtin::ToBoolean(_) => RuntimeError::InvalidToBoolean { span },
                Builtin::IsNumber(_) => RuntimeError::InvalidIsNumber { span },
                Builtin::IsBoolean(_) => RuntimeError::InvalidIsBoolean { span },
            }),

            other => unreachable!("instruction value wraps a non-instruction node: {:?}", other),
        }
    }

    /// Run the body of an `if` branch or a `while` loop in a sub‑evaluator
    /// sharing this evaluator's environment and `self`. Variables the body
    /// creates stay visible afterwards.
    fn run_nested(&mut self, body: &Rc<Expr>) -> EvalResult<Option<Value>> {
        let instruction: Value = self.evaluate_expression(body, Position::Instruction)?;
        expect(&DataType::Instruction, &instruction)?;

        let mut nested = Evaluator::nested(
            instruction,
            self.environment.clone(),
            self.self_binding.clone(),
            Rc::clone(&self.console),
        );

        let result = nested.execute()?;
        self.environment = nested.environment;

        Ok(result)
    }

    fn evaluate_condition(&mut self, condition: &Rc<Expr>) -> EvalResult<bool> {
        let value: Value = self.evaluate_expression(condition, Position::Value)?;
        boolean_operand(&value)
    }

    // ───────────────────────── lvalues ─────────────────────────

    fn evaluate_lvalue(&mut self, target: &LValue) -> EvalResult<(Lens, Span)> {
        match target {
            LValue::Variable { name, span } => {
                let existing: Option<Rc<Variable>> =
                    self.environment.as_ref().and_then(|env| env.find(name));

                let variable: Rc<Variable> = match existing {
                    Some(variable) => variable,
                    None => {
                        debug!("Creating variable {} at {}", name, span);

                        let variable: Rc<Variable> = Variable::new(
                            name.clone(),
                            Value::new(Payload::Null, DataType::Any, *span),
                        );

                        self.environment = Some(Environment::extend(
                            self.environment.take(),
                            Rc::clone(&variable),
                        ));

                        variable
                    }
                };

                Ok((Lens::variable(variable), *span))
            }

            LValue::Index {
                target,
                index,
                span,
            } => {
                let (base, base_span) = self.evaluate_lvalue(target)?;
                let current: Value = base.get()?;

                let length: usize = match (&current.payload, &current.datatype) {
                    (Payload::Array(items), DataType::Array(_)) => items.len(),
                    _ => {
                        return Err(RuntimeError::mismatch(
                            vec![DataType::array(DataType::Any)],
                            current.datatype.clone(),
                            base_span,
                        ))
                    }
                };

                let index: Value = self.evaluate_expression(index, Position::Value)?;
                let index: usize = checked_index(&index, length)?;

                Ok((Lens::element(base, index, *span), *span))
            }
        }
    }

    // ───────────────────────── expressions ─────────────────────────

    pub fn evaluate_expression(&mut self, node: &Rc<Expr>, position: Position) -> EvalResult<Value> {
        let span: Span = node.span;

        trace!("Evaluating {:?} node at {}", position, span);

        match (&node.kind, position) {
            (ExprKind::Str(s), _) => Ok(Value::string(s.clone(), span)),

            (ExprKind::Number(n), _) => Ok(Value::number(*n, span)),

            (ExprKind::Boolean(b), _) => Ok(Value::boolean(*b, span)),

            (ExprKind::Array(elements), Position::Value) => self.evaluate_array(elements, span),

            (ExprKind::Function(literal), _) => Ok(Value::new(
                Payload::Function(Rc::clone(literal)),
                literal.function_type(),
                span,
            )),

            (ExprKind::Closure(literal), _) => {
                let closure = Closure {
                    literal: Rc::clone(literal),
                    environment: self.environment.clone(),
                };

                Ok(Value::new(
                    Payload::Closure(Rc::new(closure)),
                    literal.closure_type(),
                    span,
                ))
            }

            (ExprKind::Variable(name), _) => self.evaluate_variable(name, span),

            (ExprKind::Grouping(inner), position) => {
                Ok(self.evaluate_expression(inner, position)?.with_span(span))
            }

            (ExprKind::Index { target, index }, _) => self.evaluate_index(target, index, span),

            (ExprKind::Call { callee, arguments }, _) => {
                self.evaluate_call(callee, arguments, span)
            }

            (ExprKind::Unary { operator, operand }, _) => {
                let operand: Value = self.evaluate_expression(operand, Position::Value)?;
                let n: f64 = number_operand(&operand)?;

                Ok(match operator {
                    UnaryOperator::Plus => Value::number(n, span),
                    UnaryOperator::Minus => Value::number(-n, span),
                })
            }

            (
                ExprKind::Binary {
                    operator,
                    left,
                    right,
                },
                _,
            ) => self.evaluate_binary(*operator, left, right, span),

            (ExprKind::Exec(inner), Position::Value) => {
                debug!("exec at {}", span);

                match self.evaluate_instruction(inner)? {
                    Some(value) => Ok(value.with_span(span)),
                    None => Err(RuntimeError::InvalidInstruction { span: inner.span }),
                }
            }

            (ExprKind::Builtin(builtin), Position::Value) => self.evaluate_builtin(builtin, span),

            // Instructions, plus arrays, exec and built‑ins in instruction
            // position.
            _ => Ok(Value::instruction(Rc::clone(node))),
        }
    }

    fn evaluate_array(&mut self, elements: &[Rc<Expr>], span: Span) -> EvalResult<Value> {
        let mut items: Vec<Payload> = Vec::with_capacity(elements.len());
        let mut element_type: Option<DataType> = None;

        for element in elements {
            let value: Value = self.evaluate_expression(element, Position::Value)?;

            match &element_type {
                None => element_type = Some(value.datatype.clone()),
                Some(expected) => expect(expected, &value)?,
            }

            items.push(value.payload);
        }

        Ok(Value::new(
            Payload::Array(Rc::new(items)),
            DataType::array(element_type.unwrap_or(DataType::Any)),
            span,
        ))
    }

    fn evaluate_variable(&self, name: &str, span: Span) -> EvalResult<Value> {
        if name == "self" {
            return match &self.self_binding {
                Some(callee) => Ok(callee.to_value(span)),
                None => Err(RuntimeError::InvalidSelf { span }),
            };
        }

        let variable: Rc<Variable> = match &self.environment {
            Some(environment) => environment.get_variable(name, span)?,
            None => {
                return Err(RuntimeError::UndefinedVariable {
                    name: name.to_owned(),
                    span,
                })
            }
        };

        Ok(variable.get().with_span(span))
    }

    fn evaluate_index(&mut self, target: &Rc<Expr>, index: &Rc<Expr>, span: Span) -> EvalResult<Value> {
        let target: Value = self.evaluate_expression(target, Position::Value)?;

        match (&target.payload, &target.datatype) {
            (Payload::Array(items), DataType::Array(element)) => {
                let index: Value = self.evaluate_expression(index, Position::Value)?;
                let i: usize = checked_index(&index, items.len())?;

                Ok(Value::new(items[i].clone(), (**element).clone(), span))
            }

            (Payload::Str(s), DataType::String) => {
                let index: Value = self.evaluate_expression(index, Position::Value)?;
                let i: usize = checked_index(&index, s.chars().count())?;
                let character: String = s.chars().skip(i).take(1).collect();

                Ok(Value::string(character, span))
            }

            _ => Err(RuntimeError::mismatch(
                vec![DataType::array(DataType::Any), DataType::String],
                target.datatype.clone(),
                target.span,
            )),
        }
    }

    fn evaluate_call(&mut self, callee: &Rc<Expr>, arguments: &[Rc<Expr>], span: Span) -> EvalResult<Value> {
        let target: Value = self.evaluate_expression(callee, Position::Value)?;

        let (callee, literal, captured) = match &target.payload {
            Payload::Function(literal) => {
                (Callee::Function(Rc::clone(literal)), Rc::clone(literal), None)
            }
            Payload::Closure(closure) => (
                Callee::Closure(Rc::clone(closure)),
                Rc::clone(&closure.literal),
                closure.environment.clone(),
            ),
            _ => {
                return Err(RuntimeError::mismatch(
                    vec![
                        DataType::function(Vec::new(), DataType::Any),
                        DataType::closure(Vec::new(), DataType::Any),
                    ],
                    target.datatype.clone(),
                    target.span,
                ))
            }
        };

        if arguments.len() != literal.parameters.len() {
            debug!(
                "Call at {} passed {} arguments, expected {}",
                span,
                arguments.len(),
                literal.parameters.len()
            );

            return Err(RuntimeError::InvalidArguments {
                expected: literal.parameters.len(),
                span,
            });
        }

        let mut values: Vec<Value> = Vec::with_capacity(arguments.len());
        for argument in arguments {
            values.push(self.evaluate_expression(argument, Position::Value)?);
        }

        let mut environment: Option<Rc<Environment>> = captured;
        for (parameter, value) in literal.parameters.iter().zip(values) {
            expect(&parameter.datatype, &value)?;

            environment = Some(Environment::extend(
                environment,
                Variable::new(parameter.name.clone(), value),
            ));
        }

        let body: Value = self.evaluate_expression(&literal.body, Position::Instruction)?;
        expect(&DataType::Instruction, &body)?;

        debug!("Calling {} at {}", callee_kind(&callee), span);

        let mut nested = Evaluator::nested(
            body,
            environment,
            Some(callee.clone()),
            Rc::clone(&self.console),
        );

        let result: Value = match nested.execute()? {
            Some(result) => result,
            None => return Err(callee.no_result(span)),
        };

        expect(&literal.return_type, &result)?;

        Ok(result.with_span(span))
    }

    fn evaluate_binary(
        &mut self,
        operator: BinaryOperator,
        left: &Rc<Expr>,
        right: &Rc<Expr>,
        span: Span,
    ) -> EvalResult<Value> {
        match operator {
            BinaryOperator::And | BinaryOperator::Or => {
                let left: bool = self.evaluate_condition(left)?;

                let decided: bool = match operator {
                    BinaryOperator::And => !left,
                    _ => left,
                };

                if decided {
                    trace!("{} short-circuited at {}", operator.symbol(), span);

                    return Ok(Value::boolean(left, span));
                }

                let right: bool = self.evaluate_condition(right)?;

                Ok(Value::boolean(right, span))
            }

            BinaryOperator::Equal | BinaryOperator::NotEqual => {
                let left: Value = self.evaluate_expression(left, Position::Value)?;

                if !matches!(
                    left.payload,
                    Payload::Str(_) | Payload::Number(_) | Payload::Boolean(_)
                ) {
                    return Err(RuntimeError::CannotCompare { span: left.span });
                }

                let right: Value = self.evaluate_expression(right, Position::Value)?;
                expect(&left.datatype, &right)?;

                let equal: bool = match (&left.payload, &right.payload) {
                    (Payload::Str(a), Payload::Str(b)) => a == b,
                    (Payload::Number(a), Payload::Number(b)) => a == b,
                    (Payload::Boolean(a), Payload::Boolean(b)) => a == b,
                    _ => false,
                };

                Ok(Value::boolean(
                    equal == (operator == BinaryOperator::Equal),
                    span,
                ))
            }

            BinaryOperator::Add => {
                let left: Value = self.evaluate_expression(left, Position::Value)?;

                if !is_expected_datatype(&DataType::Number, &left.datatype)
                    && !is_expected_datatype(&DataType::String, &left.datatype)
                {
                    return Err(RuntimeError::mismatch(
                        vec![DataType::Number, DataType::String],
                        left.datatype,
                        left.span,
                    ));
                }

                let right: Value = self.evaluate_expression(right, Position::Value)?;
                expect(&left.datatype, &right)?;

                match (&left.payload, &right.payload) {
                    (Payload::Number(a), Payload::Number(b)) => Ok(Value::number(a + b, span)),
                    (Payload::Str(a), Payload::Str(b)) => Ok(Value::string(format!("{a}{b}"), span)),
                    (Payload::Null, _) => Err(RuntimeError::mismatch(
                        vec![left.datatype.clone()],
                        found(&left),
                        left.span,
                    )),
                    _ => Err(RuntimeError::mismatch(
                        vec![left.datatype.clone()],
                        found(&right),
                        right.span,
                    )),
                }
            }

            _ => {
                let a: f64 = {
                    let left: Value = self.evaluate_expression(left, Position::Value)?;
                    number_operand(&left)?
                };
                let b: f64 = {
                    let right: Value = self.evaluate_expression(right, Position::Value)?;
                    number_operand(&right)?
                };

                Ok(match operator {
                    BinaryOperator::Subtract => Value::number(a - b, span),
                    BinaryOperator::Multiply => Value::number(a * b, span),
                    BinaryOperator::Divide => Value::number(a / b, span),
                    BinaryOperator::Power => Value::number(a.powf(b), span),
                    BinaryOperator::Modulus => Value::number(a % b, span),
                    BinaryOperator::LessThan => Value::boolean(a < b, span),
                    BinaryOperator::GreaterThan => Value::boolean(a > b, span),
                    BinaryOperator::LessThanOrEqual => Value::boolean(a <= b, span),
                    _ => Value::boolean(a >= b, span),
                })
            }
        }
    }

    fn evaluate_builtin(&mut self, builtin: &Builtin, span: Span) -> EvalResult<Value> {
        debug!("Calling built-in {} at {}", builtin.name(), span);

        match builtin {
            Builtin::Input(prompt) => {
                let prompt: Option<String> = match prompt {
                    Some(prompt) => {
                        let value: Value = self.evaluate_expression(prompt, Position::Value)?;
                        Some(string_operand(&value)?.to_owned())
                    }
                    None => None,
                };

                let line: String = self.console.read_line(prompt.as_deref())?;

                Ok(Value::string(line, span))
            }

            Builtin::Len(argument) => {
                let value: Value = self.evaluate_expression(argument, Position::Value)?;

                match &value.payload {
                    Payload::Array(items) => Ok(Value::number(items.len() as f64, span)),
                    Payload::Str(s) => Ok(Value::number(s.chars().count() as f64, span)),
                    _ => Err(RuntimeError::mismatch(
                        vec![DataType::array(DataType::Any), DataType::String],
                        found(&value),
                        value.span,
                    )),
                }
            }

            Builtin::ToString(argument) => {
                let value: Value = self.evaluate_expression(argument, Position::Value)?;
                Ok(Value::string(value.to_string(), span))
            }

            Builtin::ToNumber(argument) => {
                let value: Value = self.evaluate_expression(argument, Position::Value)?;
                let raw: &str = string_operand(&value)?;

                match parse_number(raw) {
                    Some(n) => Ok(Value::number(n, span)),
                    None => Err(RuntimeError::InvalidNumber {
                        raw: raw.to_owned(),
                        span: value.span,
                    }),
                }
            }

            Builtin::ToBoolean(argument) => {
                let value: Value = self.evaluate_expression(argument, Position::Value)?;
                let raw: &str = string_operand(&value)?;

                match raw {
                    "true" => Ok(Value::boolean(true, span)),
                    "false" => Ok(Value::boolean(false, span)),
                    _ => Err(RuntimeError::InvalidBoolean {
                        raw: raw.to_owned(),
                        span: value.span,
                    }),
                }
            }

            Builtin::IsNumber(argument) => {
                let value: Value = self.evaluate_expression(argument, Position::Value)?;
                let raw: &str = string_operand(&value)?;

                Ok(Value::boolean(parse_number(raw).is_some(), span))
            }

            Builtin::IsBoolean(argument) => {
                let value: Value = self.evaluate_expression(argument, Position::Value)?;
                let raw: &str = string_operand(&value)?;

                Ok(Value::boolean(raw == "true" || raw == "false", span))
            }
        }
    }
}

fn callee_kind(callee: &Callee) -> &'static str {
    match callee {
        Callee::Function(_) => "function",
        Callee::Closure(_) => "closure",
    }
}

/// Fail with a datatype mismatch unless `value` fits `expected`.
fn expect(expected: &DataType, value: &Value) -> EvalResult<()> {
    if is_expected_datatype(expected, &value.datatype) {
        Ok(())
    } else {
        Err(RuntimeError::mismatch(
            vec![expected.clone()],
            value.datatype.clone(),
            value.span,
        ))
    }
}

/// Datatype to report for `value`; a never written slot reads as `Any`
/// whatever its tag says.
fn found(value: &Value) -> DataType {
    match value.payload {
        Payload::Null => DataType::Any,
        _ => value.datatype.clone(),
    }
}

fn number_operand(value: &Value) -> EvalResult<f64> {
    match value.payload {
        Payload::Number(n) => Ok(n),
        _ => Err(RuntimeError::mismatch(
            vec![DataType::Number],
            found(value),
            value.span,
        )),
    }
}

fn boolean_operand(value: &Value) -> EvalResult<bool> {
    match value.payload {
        Payload::Boolean(b) => Ok(b),
        _ => Err(RuntimeError::mismatch(
            vec![DataType::Boolean],
            found(value),
            value.span,
        )),
    }
}

fn string_operand(value: &Value) -> EvalResult<&str> {
    match &value.payload {
        Payload::Str(s) => Ok(s),
        _ => Err(RuntimeError::mismatch(
            vec![DataType::String],
            found(value),
            value.span,
        )),
    }
}

/// Integral, in‑range array or string index.
fn checked_index(index: &Value, length: usize) -> EvalResult<usize> {
    let n: f64 = number_operand(index)?;

    if !n.is_finite() || n.fract() != 0.0 {
        return Err(RuntimeError::InvalidIndex {
            index: n,
            span: index.span,
        });
    }

    if n < 0.0 || n >= length as f64 {
        return Err(RuntimeError::OutOfBounds {
            index: n,
            length,
            span: index.span,
        });
    }

    Ok(n as usize)
}

/// Decimal number after trimming, rejecting `inf`/`NaN` spellings.
pub fn parse_number(raw: &str) -> Option<f64> {
    let trimmed: &str = raw.trim();

    if trimmed.is_empty()
        || trimmed
            .chars()
            .any(|c| c.is_ascii_alphabetic() && c != 'e' && c != 'E')
    {
        return None;
    }

    trimmed.parse::<f64>().ok().filter(|n| !n.is_nan())
}
