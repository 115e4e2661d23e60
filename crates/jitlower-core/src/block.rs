use crate::operations::Operation;
use crate::values::ValueId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Block {
    pub operations: Vec<Operation>,
    pub terminator: Terminator,
}

impl Block {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.operations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    pub fn is_terminated(&self) -> bool {
        !matches!(self.terminator, Terminator::Invalid)
    }

    /// Index of the operation producing `value`, if it was produced inside this block.
    pub fn producer_of(&self, value: ValueId) -> Option<usize> {
        self.operations
            .iter()
            .position(|op| op.results().contains(&value))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub enum Terminator {
    Return(Vec<ValueId>),
    #[default]
    Invalid,
}

impl Terminator {
    pub fn is_return(&self) -> bool {
        matches!(self, Terminator::Return(_))
    }

    pub fn operands(&self) -> &[ValueId] {
        match self {
            Terminator::Return(values) => values,
            Terminator::Invalid => &[],
        }
    }
}
