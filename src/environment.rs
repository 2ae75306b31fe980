use std::cell::RefCell;
use std::rc::Rc;

use log::trace;

use crate::error::RuntimeError;
use crate::token::Span;
use crate::value::Value;

/// A named, mutable storage cell. Shared by every environment node (and
/// every lens) that refers to it.
#[derive(Debug)]
pub struct Variable {
    pub name: String,
    pub value: RefCell<Value>,
}

impl Variable {
    pub fn new(name: impl Into<String>, value: Value) -> Rc<Self> {
        Rc::new(Self {
            name: name.into(),
            value: RefCell::new(value),
        })
    }

    pub fn get(&self) -> Value {
        self.value.borrow().clone()
    }

    pub fn set(&self, value: Value) {
        *self.value.borrow_mut() = value;
    }
}

/// Immutable linked list of variables, newest first.
///
/// Extending an environment creates a new head node; the tail is shared, so
/// a closure keeps seeing the bindings that existed when it was created
/// while writes through those bindings stay visible to everybody.
#[derive(Debug)]
pub struct Environment {
    pub parent: Option<Rc<Environment>>,
    pub variable: Rc<Variable>,
}

impl Environment {
    /// Prepend `variable` to `parent`.
    pub fn extend(parent: Option<Rc<Environment>>, variable: Rc<Variable>) -> Rc<Self> {
        trace!("Binding variable {}", variable.name);

        Rc::new(Self { parent, variable })
    }

    /// Nearest variable called `name`.
    pub fn find(&self, name: &str) -> Option<Rc<Variable>> {
        let mut node: &Environment = self;

        loop {
            if node.variable.name == name {
                return Some(Rc::clone(&node.variable));
            }

            node = node.parent.as_deref()?;
        }
    }

    pub fn get_variable(&self, name: &str, span: Span) -> Result<Rc<Variable>, RuntimeError> {
        self.find(name).ok_or_else(|| RuntimeError::UndefinedVariable {
            name: name.to_owned(),
            span,
        })
    }

    pub fn has_variable(&self, name: &str) -> bool {
        self.find(name).is_some()
    }
}
