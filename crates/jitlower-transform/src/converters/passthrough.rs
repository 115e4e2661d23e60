use crate::context::ConversionContext;
use crate::errors::Result;
use crate::graph::NodeView;

/// Binds the output to the input's existing target value. Nothing is emitted.
///
/// Used for device moves, contiguity requests, clone and detach. The target IR has no notion of
/// device, layout or aliasing, so the result is the input itself.
pub fn convert_identity(ctx: &mut ConversionContext, node: &NodeView<'_>) -> Result<bool> {
    let output = ctx.output_of(node, 0)?;
    let input = ctx.input_value(node, 0)?;
    ctx.set_value(output, input);
    Ok(true)
}
