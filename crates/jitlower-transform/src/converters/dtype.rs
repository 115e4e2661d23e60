use crate::context::ConversionContext;
use crate::errors::Result;
use crate::graph::{IValue, NodeView};
use crate::type_bridge::TypeBridge;
use tracing::debug;

/// `aten::to.dtype`: an element type conversion to a statically known dtype.
///
/// `non_blocking`, `copy` and `memory_format` have no meaning here and are not read.
pub fn convert_to_dtype(ctx: &mut ConversionContext, node: &NodeView<'_>) -> Result<bool> {
    let output = ctx.output_of(node, 0)?;

    let code = match node.constant_input(1) {
        None | Some(IValue::None) => {
            debug!("{}: dtype operand is not a constant", node.kind());
            return Ok(false);
        }
        Some(value) => match value.to_int() {
            Some(code) => code,
            None => {
                debug!("{}: dtype operand {} is not an integer", node.kind(), value);
                return Ok(false);
            }
        },
    };
    let element = TypeBridge::build_element_type_from_code(code)?;

    let input = ctx.input_value(node, 0)?;
    let location = ctx.location_of(node);
    let result = ctx.builder_mut().convert(location, input, element)?;

    ctx.set_value(output, result);
    Ok(true)
}
