/*! Lower JIT operator graphs into jitlower IR.
 *
 * Each source node is matched to an operator schema, the schema is looked up in a registry of
 * converters, and the converter rewrites the node into target operations through a shared
 * conversion context. The context keeps the correspondence between source values and target
 * values total and single-assignment for the whole traversal.
 */

pub mod config;
pub mod context;
pub mod converters;
pub mod driver;
pub mod errors;
pub mod graph;
pub mod registry;
pub mod scalar_type;
pub mod type_bridge;

pub use config::{LoweringConfig, UnsupportedPolicy};
pub use context::ConversionContext;
pub use converters::{register_builtin_converters, Converter};
pub use driver::{lower_graph, Lowered, LoweringReport, SkipReason, SkippedNode};
pub use errors::{Result, TransformError};
pub use graph::{read_graph, Graph, IValue, NodeView, OperatorTable, ValueRef};
pub use registry::{global_registry, initialize_global_registry, PatternRegistry};
pub use scalar_type::ScalarType;
pub use type_bridge::{build_element_type, TypeBridge};

/// Parses a graph dump and lowers it with the builtin operator table and the global registry.
pub fn lower_graph_text(source: &str, config: &LoweringConfig) -> anyhow::Result<Lowered> {
    let mut graph = read_graph(source)?;
    let registry = initialize_global_registry()?;
    let table = OperatorTable::builtin()?;
    Ok(lower_graph(&mut graph, registry, &table, config)?)
}
