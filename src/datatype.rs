//! Run‑time type tags and the compatibility check used by every argument,
//! return, operand and assignment check in the evaluator.

use serde::Serialize;
use std::fmt;

/// Closed set of datatypes a value can carry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum DataType {
    Any,
    String,
    Number,
    Boolean,
    Instruction,
    Array(Box<DataType>),
    Function(Vec<DataType>, Box<DataType>),
    Closure(Vec<DataType>, Box<DataType>),
}

impl DataType {
    pub fn array(element: DataType) -> Self {
        DataType::Array(Box::new(element))
    }

    pub fn function(parameters: Vec<DataType>, return_type: DataType) -> Self {
        DataType::Function(parameters, Box::new(return_type))
    }

    pub fn closure(parameters: Vec<DataType>, return_type: DataType) -> Self {
        DataType::Closure(parameters, Box::new(return_type))
    }
}

fn write_list(f: &mut fmt::Formatter<'_>, types: &[DataType]) -> fmt::Result {
    for (i, datatype) in types.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{datatype}")?;
    }
    Ok(())
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataType::Any => write!(f, "Any"),
            DataType::String => write!(f, "String"),
            DataType::Number => write!(f, "Number"),
            DataType::Boolean => write!(f, "Boolean"),
            DataType::Instruction => write!(f, "Instruction"),
            DataType::Array(element) => write!(f, "Array<{element}>"),
            DataType::Function(parameters, return_type) => {
                write!(f, "|")?;
                write_list(f, parameters)?;
                write!(f, "| -> {return_type}")
            }
            DataType::Closure(parameters, return_type) => {
                write!(f, "(")?;
                write_list(f, parameters)?;
                write!(f, ") => {return_type}")
            }
        }
    }
}

/// Decides whether a value typed `actual` may be used where `expected` is
/// required.
///
/// `Instruction` additionally accepts `Array<Instruction>` and `Array<Any>`
/// (instruction sequences, and empty arrays which degrade to `Array<Any>`).
/// The widening is one‑way: `Array<Instruction>` does not accept a bare
/// `Instruction`.
pub fn is_expected_datatype(expected: &DataType, actual: &DataType) -> bool {
    match expected {
        DataType::Any => true,
        DataType::String => matches!(actual, DataType::String),
        DataType::Number => matches!(actual, DataType::Number),
        DataType::Boolean => matches!(actual, DataType::Boolean),
        DataType::Instruction => match actual {
            DataType::Instruction => true,
            DataType::Array(element) => {
                matches!(**element, DataType::Instruction | DataType::Any)
            }
            _ => false,
        },
        DataType::Function(parameters, return_type) => match actual {
            DataType::Function(actual_parameters, actual_return) => {
                signatures_match(parameters, return_type, actual_parameters, actual_return)
            }
            _ => false,
        },
        DataType::Closure(parameters, return_type) => match actual {
            DataType::Closure(actual_parameters, actual_return) => {
                signatures_match(parameters, return_type, actual_parameters, actual_return)
            }
            _ => false,
        },
        DataType::Array(element) => match actual {
            DataType::Array(actual_element) => is_expected_datatype(element, actual_element),
            _ => false,
        },
    }
}

fn signatures_match(
    parameters: &[DataType],
    return_type: &DataType,
    actual_parameters: &[DataType],
    actual_return: &DataType,
) -> bool {
    parameters.len() == actual_parameters.len()
        && parameters
            .iter()
            .zip(actual_parameters)
            .all(|(declared, actual)| is_expected_datatype(declared, actual))
        && is_expected_datatype(return_type, actual_return)
}
