pub mod ast;
pub mod ast_printer;
pub mod console;
pub mod datatype;
pub mod environment;
pub mod error;
pub mod evaluator;
pub mod lens;
pub mod parser;
pub mod scanner;
pub mod token;
pub mod value;

use std::rc::Rc;

use ast::Expr;
use console::Console;
use error::Result;
use evaluator::Evaluator;
use parser::Parser;
use scanner::Scanner;
use token::Token;
use value::Value;

/// Scan `source`, stopping at the first lexical error.
pub fn tokenize(source: &str) -> Result<Vec<Token<'_>>> {
    let tokens = Scanner::new(source).collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(tokens)
}

/// Scan and parse `source` into its top level instruction sequence.
pub fn parse(source: &str) -> Result<Rc<Expr>> {
    let tokens: Vec<Token<'_>> = tokenize(source)?;
    let program: Rc<Expr> = Parser::new(&tokens).parse()?;

    Ok(program)
}

/// Parse and evaluate `source`, returning the value of the top level `eval`
/// that ended it, if any.
pub fn run(source: &str, console: Rc<dyn Console>) -> Result<Option<Value>> {
    let program: Rc<Expr> = parse(source)?;
    let value: Option<Value> = Evaluator::new(program, console).evaluate()?;

    Ok(value)
}
