use crate::errors::{Result, TransformError};
use crate::graph::{Graph, NodeView, ValueRef};
use jitlower_core::{Location, OpBuilder, TensorType, ValueId};
use std::collections::HashMap;
use tracing::{trace, warn};

/// Mutable state threaded through every converter while one graph is lowered.
///
/// Holds the target builder and the value table from source values to target values. The table
/// only grows: an entry is written once per converted output and read by later consumers.
#[derive(Debug)]
pub struct ConversionContext {
    builder: OpBuilder,
    value_map: HashMap<ValueRef, ValueId>,
}

impl ConversionContext {
    pub fn new(function_name: impl Into<String>) -> Self {
        Self::with_builder(OpBuilder::new(function_name))
    }

    pub fn with_builder(builder: OpBuilder) -> Self {
        Self {
            builder,
            value_map: HashMap::new(),
        }
    }

    pub fn builder(&self) -> &OpBuilder {
        &self.builder
    }

    pub fn builder_mut(&mut self) -> &mut OpBuilder {
        &mut self.builder
    }

    /// Target value already bound to `value`. Asking for a value whose producer has not been
    /// converted is a traversal-order bug in the caller.
    pub fn get_value(&self, graph: &Graph, value: ValueRef) -> Result<ValueId> {
        self.value_map
            .get(&value)
            .copied()
            .ok_or_else(|| TransformError::UnmappedValue(graph.value_name(value)))
    }

    /// Binds `value`. Returns the previous binding, if any.
    pub fn set_value(&mut self, value: ValueRef, target: ValueId) -> Option<ValueId> {
        let previous = self.value_map.insert(value, target);
        match previous {
            Some(old) if old != target => {
                warn!("value {:?} rebound from {} to {}", value, old, target)
            }
            _ => trace!("value {:?} bound to {}", value, target),
        }
        previous
    }

    pub fn lookup(&self, value: ValueRef) -> Option<ValueId> {
        self.value_map.get(&value).copied()
    }

    pub fn is_mapped(&self, value: ValueRef) -> bool {
        self.value_map.contains_key(&value)
    }

    pub fn mapped_count(&self) -> usize {
        self.value_map.len()
    }

    pub fn value_type(&self, value: ValueId) -> Result<&TensorType> {
        Ok(self.builder.value_type(value)?)
    }

    /// `"kind"("file":line:col)`, or just the kind when the node has no source range.
    pub fn location_of(&self, node: &NodeView<'_>) -> Location {
        let metadata = node.metadata();
        let child = metadata
            .source_range
            .as_ref()
            .map(|range| Location::file(range.file.clone(), range.line, range.column))
            .unwrap_or_default();
        Location::named_at(node.kind().to_string(), child)
    }

    /// Fetches the mapped value of input `index`, reporting a missing input against the node.
    pub fn input_value(&self, node: &NodeView<'_>, index: usize) -> Result<ValueId> {
        let input = node.input(index).ok_or_else(|| TransformError::MissingInput {
            kind: node.kind().to_string(),
            index,
        })?;
        self.get_value(node.graph(), input)
    }

    /// Output `index` of the node. Converters fetch their outputs before emitting anything so a
    /// malformed node cannot leave operations behind without a binding.
    pub fn output_of(&self, node: &NodeView<'_>, index: usize) -> Result<ValueRef> {
        node.output(index).ok_or_else(|| TransformError::MissingOutput {
            kind: node.kind().to_string(),
            index,
        })
    }

    pub fn into_builder(self) -> OpBuilder {
        self.builder
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{SourceRange, SourceType};
    use jitlower_core::ElementType;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_unmapped_value_is_an_error() {
        let mut graph = Graph::new();
        let x = graph.add_input("x", SourceType::tensor());
        let ctx = ConversionContext::new("main");
        assert_eq!(
            ctx.get_value(&graph, x),
            Err(TransformError::UnmappedValue("%x".to_string()))
        );
    }

    #[test]
    fn test_set_value_reports_previous_binding() {
        let mut graph = Graph::new();
        let x = graph.add_input("x", SourceType::tensor());
        let mut ctx = ConversionContext::new("main");
        let a = ctx.builder_mut().add_argument(TensorType::scalar(ElementType::F32));
        let b = ctx.builder_mut().add_argument(TensorType::scalar(ElementType::F32));

        assert_eq!(ctx.set_value(x, a), None);
        assert_eq!(ctx.set_value(x, b), Some(a));
        assert_eq!(ctx.get_value(&graph, x), Ok(b));
        assert_eq!(ctx.mapped_count(), 1);
    }

    #[test]
    fn test_location_from_source_range() {
        let mut graph = Graph::new();
        let x = graph.add_input("x", SourceType::tensor());
        let node = graph.add_node("aten::tanh", vec![x], vec![("y".into(), SourceType::tensor())]);
        if let Some(n) = graph.node_mut(node) {
            n.metadata.source_range = Some(SourceRange {
                file: "model.py".to_string(),
                line: 12,
                column: 8,
            });
        }
        let ctx = ConversionContext::new("main");
        let view = graph.view(graph.node(node).unwrap());
        assert_eq!(
            ctx.location_of(&view).to_string(),
            "\"aten::tanh\"(\"model.py\":12:8)"
        );
    }

    #[test]
    fn test_location_without_metadata() {
        let mut graph = Graph::new();
        let x = graph.add_input("x", SourceType::tensor());
        let node = graph.add_node("aten::neg", vec![x], vec![("y".into(), SourceType::tensor())]);
        let ctx = ConversionContext::new("main");
        let view = graph.view(graph.node(node).unwrap());
        assert_eq!(ctx.location_of(&view), Location::named("aten::neg"));
    }
}
