use crate::context::ConversionContext;
use crate::errors::Result;
use crate::graph::NodeView;
use jitlower_core::ElementwiseUnary;

/// Bounds of `aten::hardtanh` in its fixed-bound form.
pub const HARDTANH_MIN: f64 = -1.0;
pub const HARDTANH_MAX: f64 = 1.0;

/// One input, one output, one target operation of kind `T::KIND`.
pub fn convert_unary<T: ElementwiseUnary>(
    ctx: &mut ConversionContext,
    node: &NodeView<'_>,
) -> Result<bool> {
    let output = ctx.output_of(node, 0)?;
    let input = ctx.input_value(node, 0)?;
    let location = ctx.location_of(node);

    let result = ctx.builder_mut().unary(location, T::KIND, input)?;
    ctx.set_value(output, result);
    Ok(true)
}

/// `clamp(HARDTANH_MIN, x, HARDTANH_MAX)` with both bounds splatted to the input's type.
pub fn convert_hardtanh(ctx: &mut ConversionContext, node: &NodeView<'_>) -> Result<bool> {
    let output = ctx.output_of(node, 0)?;
    let input = ctx.input_value(node, 0)?;
    let location = ctx.location_of(node);

    let builder = ctx.builder_mut();
    let lower = builder.constant_like(location.clone(), HARDTANH_MIN, input)?;
    let upper = builder.constant_like(location.clone(), HARDTANH_MAX, input)?;
    let result = builder.clamp(location, lower, input, upper)?;

    ctx.set_value(output, result);
    Ok(true)
}
