/*! Target IR for lowered tensor programs.
 *
 * Lowering needs a destination that is statically typed and in SSA form: every value has exactly
 * one producer and a fully known tensor type. This crate provides those types, source locations
 * for diagnostics, and an insertion-point builder that converters append operations through.
 */

pub mod block;
pub mod builder;
pub mod function;
pub mod location;
pub mod operations;
pub mod persist;
pub mod types;
pub mod values;

pub use block::{Block, Terminator};
pub use builder::{InsertionPoint, OpBuilder};
pub use function::{Function, FunctionArgument};
pub use location::Location;
pub use operations::{ElementwiseUnary, Op, Operation, UnaryKind};
pub use types::{Dim, ElementType, TensorType};
pub use values::ValueId;

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum IrError {
    #[error("Unknown value: {0}")]
    UnknownValue(ValueId),
    #[error("Insertion point out of range: index {index} in a block of {len} operations")]
    InvalidInsertionPoint { index: usize, len: usize },
    #[error("Type error: {0}")]
    TypeError(String),
    #[error("Builder error: {0}")]
    BuilderError(String),
}

pub type Result<T> = std::result::Result<T, IrError>;

#[cfg(test)]
mod tests;
