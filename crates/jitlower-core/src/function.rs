use crate::block::Block;
use crate::types::TensorType;
use crate::values::ValueId;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionArgument {
    pub value: ValueId,
    pub ty: TensorType,
}

/// A single-block function in the target IR.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Function {
    pub name: String,
    pub arguments: Vec<FunctionArgument>,
    pub body: Block,
    pub value_types: IndexMap<ValueId, TensorType>,
}

impl Function {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            arguments: Vec::new(),
            body: Block::new(),
            value_types: IndexMap::new(),
        }
    }

    pub fn value_type(&self, value: ValueId) -> Option<&TensorType> {
        self.value_types.get(&value)
    }

    pub fn result_types(&self) -> Vec<TensorType> {
        self.body
            .terminator
            .operands()
            .iter()
            .filter_map(|v| self.value_types.get(v).cloned())
            .collect()
    }

    pub fn operation_count(&self) -> usize {
        self.body.len()
    }
}
