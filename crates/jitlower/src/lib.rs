/*! Unified interface for lowering JIT graphs.
 *
 * Single import for the whole pipeline: reading graph dumps, the converter registry, the lowering
 * driver, the target IR and its emitters.
 */

pub use jitlower_core as core;
pub use jitlower_emit as emit;
pub use jitlower_parser as parser;
pub use jitlower_transform as transform;

pub use jitlower_core::{
    Block, ElementType, Function, Location, Op, OpBuilder, Operation, TensorType, Terminator,
    UnaryKind, ValueId,
};

pub use jitlower_emit::{EmitterConfig, FunctionEmitter};

pub use jitlower_parser::{parse_graph, parse_schema, FunctionSchema};

pub use jitlower_transform::{
    initialize_global_registry, lower_graph, lower_graph_text, read_graph, ConversionContext,
    Converter, LoweringConfig, OperatorTable, PatternRegistry, TransformError,
};
