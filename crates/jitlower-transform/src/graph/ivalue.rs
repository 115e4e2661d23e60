use serde::{Deserialize, Serialize};
use std::fmt;

/// A statically known operand value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum IValue {
    None,
    Int(i64),
    Double(f64),
    Bool(bool),
    Str(String),
    IntList(Vec<i64>),
}

impl IValue {
    pub fn is_none(&self) -> bool {
        matches!(self, IValue::None)
    }

    pub fn to_int(&self) -> Option<i64> {
        match self {
            IValue::Int(v) => Some(*v),
            IValue::Bool(b) => Some(i64::from(*b)),
            _ => None,
        }
    }

    /// Numeric value as a double; ints widen, bools do not.
    pub fn to_double(&self) -> Option<f64> {
        match self {
            IValue::Double(v) => Some(*v),
            IValue::Int(v) => Some(*v as f64),
            _ => None,
        }
    }
}

impl fmt::Display for IValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IValue::None => write!(f, "None"),
            IValue::Int(v) => write!(f, "{}", v),
            IValue::Double(v) => write!(f, "{:?}", v),
            IValue::Bool(b) => write!(f, "{}", b),
            IValue::Str(s) => write!(f, "\"{}\"", s),
            IValue::IntList(items) => {
                let items = items
                    .iter()
                    .map(|i| i.to_string())
                    .collect::<Vec<_>>()
                    .join(", ");
                write!(f, "[{}]", items)
            }
        }
    }
}
