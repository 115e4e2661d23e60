use crate::context::ConversionContext;
use crate::errors::Result;
use crate::graph::{IValue, NodeView};
use tracing::debug;

/// `aten::clamp` with optional scalar bounds.
///
/// Both bounds must be constants. A `None` bound becomes the element type's extreme so a single
/// three-operand clamp is always emitted.
pub fn convert_clamp(ctx: &mut ConversionContext, node: &NodeView<'_>) -> Result<bool> {
    let output = ctx.output_of(node, 0)?;
    let input = ctx.input_value(node, 0)?;
    let (lowest, highest) = ctx.value_type(input)?.element.limits();

    let (Some(min), Some(max)) = (
        static_bound(node, 1, lowest),
        static_bound(node, 2, highest),
    ) else {
        debug!("{}: clamp bounds are not constants", node.kind());
        return Ok(false);
    };

    let location = ctx.location_of(node);
    let builder = ctx.builder_mut();
    let lower = builder.constant_like(location.clone(), min, input)?;
    let upper = builder.constant_like(location.clone(), max, input)?;
    let result = builder.clamp(location, lower, input, upper)?;

    ctx.set_value(output, result);
    Ok(true)
}

/// An absent input or a `None` constant falls back to `fallback`; anything not statically numeric
/// is unresolved.
fn static_bound(node: &NodeView<'_>, index: usize, fallback: f64) -> Option<f64> {
    if node.input(index).is_none() {
        return Some(fallback);
    }
    match node.constant_input(index)? {
        IValue::None => Some(fallback),
        value => value.to_double(),
    }
}
