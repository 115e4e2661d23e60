use crate::{block::Block, operations::Operation, IrError, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum InsertionPoint {
    #[default]
    End,
    Before(usize),
    After(usize),
}

impl InsertionPoint {
    /// Inserts `operation` into `block` and returns the point just past it.
    pub(crate) fn insert(self, block: &mut Block, operation: Operation) -> Result<InsertionPoint> {
        let len = block.operations.len();
        match self {
            InsertionPoint::End => {
                block.operations.push(operation);
                Ok(InsertionPoint::End)
            }
            InsertionPoint::Before(index) => {
                if index > len {
                    return Err(IrError::InvalidInsertionPoint { index, len });
                }
                block.operations.insert(index, operation);
                Ok(InsertionPoint::Before(index + 1))
            }
            InsertionPoint::After(index) => {
                if index >= len {
                    return Err(IrError::InvalidInsertionPoint { index, len });
                }
                block.operations.insert(index + 1, operation);
                Ok(InsertionPoint::After(index + 1))
            }
        }
    }
}
