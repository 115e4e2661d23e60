/*! Converters from source operators to target IR operations.
 *
 * A converter sees one schema-matched node and the shared context. It reads the mapped values of
 * the node's inputs, appends whatever operations it needs, and binds every output before
 * returning `Ok(true)`. `Ok(false)` means a required operand was not statically known; in that
 * case nothing has been emitted or bound. `Err` is fatal for the whole conversion.
 */

mod clamp;
mod dtype;
mod elementwise;
mod passthrough;


pub use clamp::convert_clamp;
pub use dtype::convert_to_dtype;
pub use elementwise::{convert_hardtanh, convert_unary, HARDTANH_MAX, HARDTANH_MIN};
pub use passthrough::convert_identity;

use crate::context::ConversionContext;
use crate::errors::Result;
use crate::graph::NodeView;
use crate::registry::PatternRegistry;
use jitlower_core::operations::{
    AbsOp, CeilOp, CosOp, ErfOp, ExpOp, FloorOp, LogOp, LogisticOp, NegOp, RsqrtOp, SinOp, SqrtOp,
    TanhOp,
};
use std::fmt;

pub type ConvertFn = fn(&mut ConversionContext, &NodeView<'_>) -> Result<bool>;

/// A named conversion function. Stateless; all state lives in the context.
#[derive(Clone, Copy)]
pub struct Converter {
    pub name: &'static str,
    func: ConvertFn,
}

impl Converter {
    pub const fn new(name: &'static str, func: ConvertFn) -> Self {
        Self { name, func }
    }

    pub fn call(&self, ctx: &mut ConversionContext, node: &NodeView<'_>) -> Result<bool> {
        (self.func)(ctx, node)
    }
}

impl fmt::Debug for Converter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Converter").field("name", &self.name).finish()
    }
}

/// Every builtin schema literal with its converter.
pub const BUILTIN_PATTERNS: &[(&str, Converter)] = &[
    (
        "aten::tanh(Tensor self) -> Tensor",
        Converter::new("tanh", convert_unary::<TanhOp>),
    ),
    (
        "aten::hardtanh(Tensor self) -> Tensor",
        Converter::new("hardtanh", convert_hardtanh),
    ),
    (
        "aten::neg(Tensor self) -> Tensor",
        Converter::new("neg", convert_unary::<NegOp>),
    ),
    (
        "aten::exp(Tensor self) -> Tensor",
        Converter::new("exp", convert_unary::<ExpOp>),
    ),
    (
        "aten::rsqrt(Tensor self) -> Tensor",
        Converter::new("rsqrt", convert_unary::<RsqrtOp>),
    ),
    (
        "aten::erf(Tensor self) -> Tensor",
        Converter::new("erf", convert_unary::<ErfOp>),
    ),
    (
        "aten::log(Tensor self) -> Tensor",
        Converter::new("log", convert_unary::<LogOp>),
    ),
    (
        "aten::sqrt(Tensor self) -> Tensor",
        Converter::new("sqrt", convert_unary::<SqrtOp>),
    ),
    (
        "aten::abs(Tensor self) -> Tensor",
        Converter::new("abs", convert_unary::<AbsOp>),
    ),
    (
        "aten::sin(Tensor self) -> Tensor",
        Converter::new("sin", convert_unary::<SinOp>),
    ),
    (
        "aten::cos(Tensor self) -> Tensor",
        Converter::new("cos", convert_unary::<CosOp>),
    ),
    (
        "aten::floor(Tensor self) -> Tensor",
        Converter::new("floor", convert_unary::<FloorOp>),
    ),
    (
        "aten::ceil(Tensor self) -> Tensor",
        Converter::new("ceil", convert_unary::<CeilOp>),
    ),
    (
        "aten::sigmoid(Tensor self) -> Tensor",
        Converter::new("sigmoid", convert_unary::<LogisticOp>),
    ),
    (
        "aten::clamp(Tensor self, Scalar? min=None, Scalar? max=None) -> Tensor",
        Converter::new("clamp", convert_clamp),
    ),
    (
        "aten::contiguous(Tensor self, *, MemoryFormat memory_format=contiguous_format) -> Tensor",
        Converter::new("identity", convert_identity),
    ),
    (
        "aten::to.dtype(Tensor self, int dtype, bool non_blocking=False, bool copy=False, int? memory_format=None) -> (Tensor)",
        Converter::new("to_dtype", convert_to_dtype),
    ),
    (
        "aten::cuda(Tensor(a) self) -> (Tensor(b|a))",
        Converter::new("identity", convert_identity),
    ),
    (
        "aten::cpu(Tensor(a) self) -> (Tensor(b|a))",
        Converter::new("identity", convert_identity),
    ),
    (
        "aten::clone(Tensor self, *, int? memory_format=None) -> (Tensor)",
        Converter::new("identity", convert_identity),
    ),
    (
        "aten::detach(Tensor(a) self) -> (Tensor(a))",
        Converter::new("identity", convert_identity),
    ),
];

pub fn builtin_schemas() -> impl Iterator<Item = &'static str> {
    BUILTIN_PATTERNS.iter().map(|(schema, _)| *schema)
}

pub fn register_builtin_converters(registry: &mut PatternRegistry) -> Result<()> {
    for (schema, converter) in BUILTIN_PATTERNS {
        registry.register(schema, *converter)?;
    }
    Ok(())
}
