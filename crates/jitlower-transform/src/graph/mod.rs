/*! Read-only model of the source graph.
 *
 * Nodes reference values by identity, values remember their producer, and constant operands can
 * be resolved statically. Converters see a node only through `NodeView`.
 */

mod ivalue;
mod operator_table;
mod reader;

pub use ivalue::IValue;
pub use operator_table::OperatorTable;
pub use reader::read_graph;

use crate::scalar_type::ScalarType;
use serde::{Deserialize, Serialize};
use std::fmt;

pub const CONSTANT_KIND: &str = "prim::Constant";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ValueRef(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub u32);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SourceType {
    Tensor {
        dtype: Option<ScalarType>,
        /// `None` when the rank is unknown; `Some(None)` entries are dynamic dimensions.
        sizes: Option<Vec<Option<i64>>>,
    },
    Int,
    Float,
    Bool,
    NoneType,
    Str,
    Device,
    IntList,
    Other(String),
}

impl SourceType {
    pub fn tensor() -> Self {
        SourceType::Tensor {
            dtype: None,
            sizes: None,
        }
    }

    pub fn is_tensor(&self) -> bool {
        matches!(self, SourceType::Tensor { .. })
    }

    pub fn is_number(&self) -> bool {
        matches!(self, SourceType::Int | SourceType::Float | SourceType::Bool)
    }

    pub fn from_name(name: &str) -> Self {
        match name {
            "Tensor" => SourceType::tensor(),
            "int" => SourceType::Int,
            "float" => SourceType::Float,
            "bool" => SourceType::Bool,
            "NoneType" => SourceType::NoneType,
            "str" => SourceType::Str,
            "Device" => SourceType::Device,
            "int[]" => SourceType::IntList,
            other => SourceType::Other(other.to_string()),
        }
    }
}

impl fmt::Display for SourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceType::Tensor { dtype: None, .. } => write!(f, "Tensor"),
            SourceType::Tensor {
                dtype: Some(dtype),
                sizes,
            } => {
                write!(f, "{}(", dtype)?;
                if let Some(sizes) = sizes {
                    let dims = sizes
                        .iter()
                        .map(|d| d.map_or("*".to_string(), |n| n.to_string()))
                        .collect::<Vec<_>>()
                        .join(", ");
                    write!(f, "{}", dims)?;
                }
                write!(f, ")")
            }
            SourceType::Int => write!(f, "int"),
            SourceType::Float => write!(f, "float"),
            SourceType::Bool => write!(f, "bool"),
            SourceType::NoneType => write!(f, "NoneType"),
            SourceType::Str => write!(f, "str"),
            SourceType::Device => write!(f, "Device"),
            SourceType::IntList => write!(f, "int[]"),
            SourceType::Other(name) => write!(f, "{}", name),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceRange {
    pub file: String,
    pub line: u32,
    pub column: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeMetadata {
    pub source_range: Option<SourceRange>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphValue {
    pub id: ValueRef,
    pub debug_name: String,
    pub ty: SourceType,
    pub producer: Option<NodeId>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,
    pub kind: String,
    pub inputs: Vec<ValueRef>,
    pub outputs: Vec<ValueRef>,
    pub attributes: Vec<(String, IValue)>,
    pub metadata: NodeMetadata,
    /// Exact schema literal of the matched operator overload, once resolved.
    pub schema: Option<String>,
}

impl Node {
    pub fn attribute(&self, name: &str) -> Option<&IValue> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value)
    }

    pub fn is_constant(&self) -> bool {
        self.kind == CONSTANT_KIND
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Graph {
    pub inputs: Vec<ValueRef>,
    pub outputs: Vec<ValueRef>,
    pub nodes: Vec<Node>,
    pub values: Vec<GraphValue>,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_value(&mut self, debug_name: impl Into<String>, ty: SourceType) -> ValueRef {
        let id = ValueRef(self.values.len() as u32);
        self.values.push(GraphValue {
            id,
            debug_name: debug_name.into(),
            ty,
            producer: None,
        });
        id
    }

    pub fn add_input(&mut self, debug_name: impl Into<String>, ty: SourceType) -> ValueRef {
        let id = self.add_value(debug_name, ty);
        self.inputs.push(id);
        id
    }

    /// Appends a node; its outputs are created here so they always have this node as producer.
    pub fn add_node(
        &mut self,
        kind: impl Into<String>,
        inputs: Vec<ValueRef>,
        outputs: Vec<(String, SourceType)>,
    ) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        let outputs = outputs
            .into_iter()
            .map(|(name, ty)| {
                let value = self.add_value(name, ty);
                self.values[value.0 as usize].producer = Some(id);
                value
            })
            .collect();
        self.nodes.push(Node {
            id,
            kind: kind.into(),
            inputs,
            outputs,
            attributes: Vec::new(),
            metadata: NodeMetadata::default(),
            schema: None,
        });
        id
    }

    pub fn add_constant(&mut self, debug_name: impl Into<String>, ty: SourceType, value: IValue) -> ValueRef {
        let node = self.add_node(CONSTANT_KIND, Vec::new(), vec![(debug_name.into(), ty)]);
        let slot = &mut self.nodes[node.0 as usize];
        if !value.is_none() {
            slot.attributes.push(("value".to_string(), value));
        }
        slot.outputs[0]
    }

    pub fn value(&self, value: ValueRef) -> Option<&GraphValue> {
        self.values.get(value.0 as usize)
    }

    pub fn value_name(&self, value: ValueRef) -> String {
        self.value(value)
            .map(|v| format!("%{}", v.debug_name))
            .unwrap_or_else(|| format!("%<{}>", value.0))
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0 as usize)
    }

    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.0 as usize)
    }

    pub fn producer(&self, value: ValueRef) -> Option<&Node> {
        self.value(value)
            .and_then(|v| v.producer)
            .and_then(|id| self.node(id))
    }

    /// Statically evaluates `value`. Only constant nodes resolve; a constant without a
    /// `value` attribute is `None`.
    pub fn to_ivalue(&self, value: ValueRef) -> Option<IValue> {
        let producer = self.producer(value)?;
        if !producer.is_constant() {
            return None;
        }
        Some(producer.attribute("value").cloned().unwrap_or(IValue::None))
    }

    pub fn view<'g>(&'g self, node: &'g Node) -> NodeView<'g> {
        NodeView { graph: self, node }
    }

    /// Stamps every node with the schema literal of its matching overload.
    pub fn resolve_schemas(&mut self, table: &OperatorTable) {
        let resolved: Vec<Option<String>> = self
            .nodes
            .iter()
            .map(|node| table.resolve(self, node).map(str::to_string))
            .collect();
        for (node, schema) in self.nodes.iter_mut().zip(resolved) {
            node.schema = schema;
        }
    }
}

/// Schema-matched, read-only view of one node.
#[derive(Debug, Clone, Copy)]
pub struct NodeView<'g> {
    graph: &'g Graph,
    node: &'g Node,
}

impl<'g> NodeView<'g> {
    pub fn node(&self) -> &'g Node {
        self.node
    }

    pub fn graph(&self) -> &'g Graph {
        self.graph
    }

    pub fn kind(&self) -> &'g str {
        &self.node.kind
    }

    pub fn schema(&self) -> Option<&'g str> {
        self.node.schema.as_deref()
    }

    pub fn inputs(&self) -> &'g [ValueRef] {
        &self.node.inputs
    }

    pub fn outputs(&self) -> &'g [ValueRef] {
        &self.node.outputs
    }

    pub fn input(&self, index: usize) -> Option<ValueRef> {
        self.node.inputs.get(index).copied()
    }

    pub fn output(&self, index: usize) -> Option<ValueRef> {
        self.node.outputs.get(index).copied()
    }

    /// `None` when the input is absent or not statically known.
    pub fn constant_input(&self, index: usize) -> Option<IValue> {
        self.input(index).and_then(|v| self.graph.to_ivalue(v))
    }

    pub fn metadata(&self) -> &'g NodeMetadata {
        &self.node.metadata
    }
}
