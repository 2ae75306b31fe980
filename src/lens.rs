//! Read/write views onto assignable locations.
//!
//! A [`Lens`] is produced by resolving the left side of `<-`. Variable
//! lenses read and write the shared [`Variable`] cell directly; element
//! lenses go through the lens of the enclosing array and rebuild it on every
//! write, so arrays held elsewhere are never mutated in place.

use std::rc::Rc;

use log::trace;

use crate::datatype::DataType;
use crate::environment::Variable;
use crate::error::RuntimeError;
use crate::token::Span;
use crate::value::{Payload, Value};

type Getter = Box<dyn Fn() -> Result<Value, RuntimeError>>;
type Setter = Box<dyn Fn(Value) -> Result<(), RuntimeError>>;

pub struct Lens {
    getter: Getter,
    setter: Setter,
}

impl Lens {
    pub fn new(getter: Getter, setter: Setter) -> Self {
        Self { getter, setter }
    }

    pub fn get(&self) -> Result<Value, RuntimeError> {
        (self.getter)()
    }

    pub fn set(&self, value: Value) -> Result<(), RuntimeError> {
        (self.setter)(value)
    }

    /// Lens over a whole variable.
    pub fn variable(variable: Rc<Variable>) -> Self {
        let reader: Rc<Variable> = Rc::clone(&variable);

        Self::new(
            Box::new(move || -> Result<Value, RuntimeError> { Ok(reader.get()) }),
            Box::new(move |value: Value| -> Result<(), RuntimeError> {
                trace!("Writing variable {}", variable.name);
                variable.set(value);
                Ok(())
            }),
        )
    }

    /// Lens over element `index` of the array seen through `parent`.
    ///
    /// The index is re‑validated on every access since the array may have
    /// been replaced after the lens was built.
    pub fn element(parent: Lens, index: usize, span: Span) -> Self {
        let parent: Rc<Lens> = Rc::new(parent);
        let writer: Rc<Lens> = Rc::clone(&parent);

        Self::new(
            Box::new(move || -> Result<Value, RuntimeError> {
                let (items, element) = array_at(&parent, index, span)?;

                Ok(Value::new(items[index].clone(), element, span))
            }),
            Box::new(move |value: Value| -> Result<(), RuntimeError> {
                let (items, _) = array_at(&writer, index, span)?;

                let mut written: Vec<Payload> = items.as_ref().clone();
                written[index] = value.payload;

                trace!("Writing element {} at {}", index, span);

                let array: Value = Value::new(
                    Payload::Array(Rc::new(written)),
                    DataType::array(value.datatype),
                    span,
                );

                writer.set(array)
            }),
        )
    }
}

/// Current array behind `lens` and its element type, with `index` in range.
fn array_at(
    lens: &Lens,
    index: usize,
    span: Span,
) -> Result<(Rc<Vec<Payload>>, DataType), RuntimeError> {
    let value: Value = lens.get()?;

    match (value.payload, value.datatype) {
        (Payload::Array(items), DataType::Array(element)) => {
            if index >= items.len() {
                return Err(RuntimeError::OutOfBounds {
                    index: index as f64,
                    length: items.len(),
                    span,
                });
            }

            Ok((items, *element))
        }
        (_, found) => Err(RuntimeError::mismatch(
            vec![DataType::array(DataType::Any)],
            found,
            value.span,
        )),
    }
}
