use crate::config::{LoweringConfig, UnsupportedPolicy};
use crate::context::ConversionContext;
use crate::errors::{Result, TransformError};
use crate::graph::{Graph, NodeView, OperatorTable};
use crate::registry::PatternRegistry;
use crate::type_bridge::TypeBridge;
use jitlower_core::Function;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SkipReason {
    /// No overload in the operator table matches the node.
    UnknownSchema,
    /// The schema is known but nothing is registered for it.
    Unregistered(String),
    /// The converter declined because an operand was not statically known.
    Declined(String),
    /// An operand comes from a node that was itself skipped.
    UnmappedOperand(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedNode {
    pub index: usize,
    pub kind: String,
    pub reason: SkipReason,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoweringReport {
    pub converted: usize,
    pub skipped: Vec<SkippedNode>,
    /// Graph outputs left out of the return because their producer was skipped.
    pub dropped_outputs: Vec<String>,
}

impl LoweringReport {
    pub fn is_complete(&self) -> bool {
        self.skipped.is_empty() && self.dropped_outputs.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct Lowered {
    pub function: Function,
    pub report: LoweringReport,
}

/// Lowers a whole graph into one target function.
///
/// Nodes are visited in program order, which the graph guarantees is a topological order.
/// Constants are not visited; converters resolve them on demand.
pub fn lower_graph(
    graph: &mut Graph,
    registry: &PatternRegistry,
    table: &OperatorTable,
    config: &LoweringConfig,
) -> Result<Lowered> {
    graph.resolve_schemas(table);
    let graph: &Graph = graph;

    let mut ctx = ConversionContext::new(config.function_name.clone());
    for &input in &graph.inputs {
        let value = graph
            .value(input)
            .ok_or_else(|| TransformError::UnmappedValue(graph.value_name(input)))?;
        // Module handles and other opaque inputs have no argument; nodes using them are unlowerable.
        if !value.ty.is_tensor() && !value.ty.is_number() {
            debug!("leaving graph input {} of type {} unbound", graph.value_name(input), value.ty);
            continue;
        }
        let ty = TypeBridge::build_tensor_type(&value.ty, config.default_dtype).map_err(|e| {
            TransformError::UnsupportedInput {
                name: graph.value_name(input),
                reason: e.to_string(),
            }
        })?;
        let argument = ctx.builder_mut().add_argument(ty);
        ctx.set_value(input, argument);
    }

    let mut report = LoweringReport::default();
    for (index, node) in graph.nodes.iter().enumerate() {
        if node.is_constant() {
            continue;
        }
        let view = graph.view(node);
        match lower_node(&mut ctx, &view, registry, table)? {
            None => report.converted += 1,
            Some(reason) => {
                let failure = match &reason {
                    SkipReason::UnknownSchema => TransformError::UnresolvedSchema(node.kind.clone()),
                    SkipReason::Unregistered(schema) => TransformError::UnregisteredSchema {
                        kind: node.kind.clone(),
                        schema: schema.clone(),
                    },
                    SkipReason::Declined(converter) => TransformError::ConversionFailed {
                        converter: converter.clone(),
                        kind: node.kind.clone(),
                    },
                    SkipReason::UnmappedOperand(name) => TransformError::UnmappedValue(name.clone()),
                };
                if config.on_unsupported == UnsupportedPolicy::Abort {
                    return Err(failure);
                }
                warn!("skipping node {}: {}", index, failure);
                report.skipped.push(SkippedNode {
                    index,
                    kind: node.kind.clone(),
                    reason,
                });
            }
        }
    }

    let mut results = Vec::with_capacity(graph.outputs.len());
    for &output in &graph.outputs {
        match ctx.lookup(output) {
            Some(value) => results.push(value),
            None if config.on_unsupported == UnsupportedPolicy::Skip => {
                warn!("dropping graph output {}", graph.value_name(output));
                report.dropped_outputs.push(graph.value_name(output));
            }
            None => return Err(TransformError::UnmappedValue(graph.value_name(output))),
        }
    }
    let function = ctx.into_builder().finish(results)?;

    info!(
        "lowered {} nodes into {} operations ({} skipped)",
        report.converted,
        function.operation_count(),
        report.skipped.len()
    );
    Ok(Lowered { function, report })
}

/// `None` on success, otherwise why the node was not lowered.
fn lower_node(
    ctx: &mut ConversionContext,
    node: &NodeView<'_>,
    registry: &PatternRegistry,
    table: &OperatorTable,
) -> Result<Option<SkipReason>> {
    let Some(schema) = node.schema() else {
        return Ok(Some(SkipReason::UnknownSchema));
    };
    let Some(converter) = registry.lookup(schema) else {
        return Ok(Some(SkipReason::Unregistered(schema.to_string())));
    };

    // Constants are resolved statically by converters, but only where the schema does not expect
    // a tensor; a tensor operand must already be mapped.
    let graph = node.graph();
    let signature = table.schema(schema);
    let unmapped = node.inputs().iter().enumerate().find(|&(index, &input)| {
        if ctx.is_mapped(input) {
            return false;
        }
        let from_constant = graph.producer(input).map_or(false, |p| p.is_constant());
        let wants_tensor = signature
            .and_then(|s| s.arguments.get(index))
            .map_or(true, |arg| arg.ty.is_tensor());
        let is_tensor = graph.value(input).map_or(true, |v| v.ty.is_tensor());
        !from_constant || (wants_tensor && is_tensor)
    });
    if let Some((_, &input)) = unmapped {
        return Ok(Some(SkipReason::UnmappedOperand(graph.value_name(input))));
    }

    debug!("converting {} with {}", node.kind(), converter.name);
    if !converter.call(ctx, node)? {
        return Ok(Some(SkipReason::Declined(converter.name.to_string())));
    }

    if let Some(&output) = node.outputs().iter().find(|&&o| !ctx.is_mapped(o)) {
        return Err(TransformError::IncompleteConversion {
            converter: converter.name.to_string(),
            kind: node.kind().to_string(),
            output: graph.value_name(output),
        });
    }
    Ok(None)
}
