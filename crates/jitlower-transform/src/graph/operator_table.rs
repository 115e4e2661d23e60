use super::{Graph, Node, SourceType};
use crate::errors::Result;
use jitlower_parser::{parse_schema, FunctionSchema, SchemaType};
use std::collections::HashMap;

/// Known operator overloads, used to attach a schema literal to each graph node.
#[derive(Debug, Clone, Default)]
pub struct OperatorTable {
    by_name: HashMap<String, Vec<(FunctionSchema, String)>>,
}

/// Overloads that have no converter. They let the driver tell "unknown operator"
/// apart from "known operator without a lowering".
const UNLOWERED_SCHEMAS: &[&str] = &[
    "aten::hardtanh(Tensor self, Scalar min_val=-1, Scalar max_val=1) -> Tensor",
    "aten::relu(Tensor self) -> Tensor",
    "aten::add.Tensor(Tensor self, Tensor other, *, Scalar alpha=1) -> Tensor",
    "aten::mul.Tensor(Tensor self, Tensor other) -> Tensor",
    "aten::to.device(Tensor self, Device device, int dtype, bool non_blocking=False, bool copy=False, int? memory_format=None) -> Tensor",
];

impl OperatorTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every schema with a builtin converter plus a few common unlowered ones.
    pub fn builtin() -> Result<Self> {
        let mut table = Self::new();
        for schema in crate::converters::builtin_schemas().chain(UNLOWERED_SCHEMAS.iter().copied()) {
            table.add(schema)?;
        }
        Ok(table)
    }

    /// Adds an overload. Earlier overloads of the same name win ties during resolution.
    pub fn add(&mut self, literal: &str) -> Result<()> {
        let schema = parse_schema(literal)?;
        self.by_name
            .entry(schema.qualified_name())
            .or_default()
            .push((schema, literal.to_string()));
        Ok(())
    }

    pub fn overloads(&self, kind: &str) -> impl Iterator<Item = &FunctionSchema> {
        self.by_name
            .get(kind)
            .into_iter()
            .flat_map(|entries| entries.iter().map(|(schema, _)| schema))
    }

    /// The parsed form of a literal previously added to the table.
    pub fn schema(&self, literal: &str) -> Option<&FunctionSchema> {
        self.by_name
            .values()
            .flatten()
            .find(|(_, l)| l == literal)
            .map(|(schema, _)| schema)
    }

    pub fn len(&self) -> usize {
        self.by_name.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }

    /// The literal of the first overload whose arguments accept the node's inputs.
    pub fn resolve<'t>(&'t self, graph: &Graph, node: &Node) -> Option<&'t str> {
        let candidates = self.by_name.get(&node.kind)?;
        candidates
            .iter()
            .find(|(schema, _)| {
                schema.accepts_arity(node.inputs.len())
                    && node.inputs.iter().zip(&schema.arguments).all(|(input, arg)| {
                        graph
                            .value(*input)
                            .map_or(false, |value| accepts(&arg.ty, &value.ty))
                    })
            })
            .map(|(_, literal)| literal.as_str())
    }
}

fn accepts(expected: &SchemaType, actual: &SourceType) -> bool {
    if matches!(actual, SourceType::NoneType) {
        return expected.optional;
    }
    if expected.is_list() {
        return matches!(actual, SourceType::IntList | SourceType::Other(_));
    }
    match expected.base.as_str() {
        "Tensor" => actual.is_tensor(),
        "int" | "ScalarType" | "MemoryFormat" | "Layout" => matches!(actual, SourceType::Int),
        "float" => matches!(actual, SourceType::Float | SourceType::Int),
        "Scalar" => matches!(actual, SourceType::Int | SourceType::Float | SourceType::Bool),
        "bool" => matches!(actual, SourceType::Bool | SourceType::Int),
        "str" => matches!(actual, SourceType::Str),
        "Device" => matches!(actual, SourceType::Device | SourceType::Str),
        _ => matches!(actual, SourceType::Other(_)),
    }
}
