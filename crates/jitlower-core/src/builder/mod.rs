/*! Insertion-point builder for the target IR.
 *
 * Converters never touch blocks directly. They ask the builder for a new operation at a location,
 * and the builder allocates result values, records result types and places the operation at the
 * current insertion point.
 */

pub mod cursor;
pub mod op_builder;

pub use cursor::InsertionPoint;
pub use op_builder::OpBuilder;
