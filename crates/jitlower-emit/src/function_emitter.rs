use crate::config::EmitterConfig;
use crate::emitter::{EmitContext, EmitHelper, EmitResult, Emitter};
use jitlower_core::{Function, Location, Op, Operation, Terminator, TensorType, ValueId};
use std::io::Write;

/// Prints a function as
///
/// ```text
/// func @main(%0: tensor<2x3xf32>) -> tensor<2x3xf32> {
///     %1 = tanh %0 : tensor<2x3xf32>
///     return %1 : tensor<2x3xf32>
/// }
/// ```
pub struct FunctionEmitter {
    config: EmitterConfig,
}

impl FunctionEmitter {
    pub fn new(config: EmitterConfig) -> Self {
        Self { config }
    }

    fn header(&self, function: &Function, context: &EmitContext) -> String {
        let arguments = function
            .arguments
            .iter()
            .map(|arg| format!("{}: {}", arg.value, arg.ty))
            .collect::<Vec<_>>()
            .join(", ");
        let results = match function.result_types().as_slice() {
            [single] => single.to_string(),
            many => format!("({})", join_types(many)),
        };
        format!(
            "{} {}({}) -> {}",
            EmitHelper::paint(context, "func", "magenta"),
            EmitHelper::paint(context, &format!("@{}", function.name), "bold"),
            arguments,
            results
        )
    }

    fn operation(&self, function: &Function, operation: &Operation, context: &EmitContext) -> String {
        let results = join_values(&operation.results());
        let mnemonic = EmitHelper::paint(context, operation.mnemonic(), "cyan");
        let body = match &operation.op {
            Op::Unary { operand, .. } => format!("{} {}", mnemonic, operand),
            Op::ConstantLike { value, like, .. } => format!("{} {:?}, {}", mnemonic, value, like),
            Op::Clamp {
                min, operand, max, ..
            } => format!("{} {}, {}, {}", mnemonic, min, operand, max),
            Op::Convert { operand, .. } => format!("{} {}", mnemonic, operand),
        };

        let mut line = format!("{} = {}", results, body);
        if self.config.include_types {
            let result_ty = operation
                .results()
                .first()
                .and_then(|v| function.value_type(*v))
                .map(TensorType::to_string)
                .unwrap_or_else(|| "?".to_string());
            match &operation.op {
                Op::Convert { operand, .. } => {
                    let operand_ty = function
                        .value_type(*operand)
                        .map(TensorType::to_string)
                        .unwrap_or_else(|| "?".to_string());
                    line.push_str(&format!(" : ({}) -> {}", operand_ty, result_ty));
                }
                _ => line.push_str(&format!(" : {}", result_ty)),
            }
        }
        line.push_str(&self.location_suffix(&operation.location, context));
        line
    }

    fn terminator(&self, function: &Function, context: &EmitContext) -> String {
        let keyword = EmitHelper::paint(context, "return", "magenta");
        match &function.body.terminator {
            Terminator::Return(values) if values.is_empty() => keyword,
            Terminator::Return(values) => {
                let mut line = format!("{} {}", keyword, join_values(values));
                if self.config.include_types {
                    let types: Vec<TensorType> = values
                        .iter()
                        .filter_map(|v| function.value_type(*v).cloned())
                        .collect();
                    line.push_str(&format!(" : {}", join_types(&types)));
                }
                line
            }
            Terminator::Invalid => EmitHelper::paint(context, "<missing terminator>", "red"),
        }
    }

    fn location_suffix(&self, location: &Location, context: &EmitContext) -> String {
        if !self.config.include_locations || !location.is_known() {
            return String::new();
        }
        format!(" {}", EmitHelper::paint(context, &format!("loc({})", location), "dimmed"))
    }
}

impl Default for FunctionEmitter {
    fn default() -> Self {
        Self::new(EmitterConfig::default())
    }
}

impl Emitter for FunctionEmitter {
    type Item = Function;

    fn context(&self) -> EmitContext {
        EmitContext {
            indent_chars: self.config.indent_style.to_string(),
            use_colors: self.config.use_colors,
            ..EmitContext::new()
        }
    }

    fn emit<W: Write>(
        &self,
        function: &Function,
        writer: &mut W,
        context: &mut EmitContext,
    ) -> EmitResult {
        let header = self.header(function, context);
        EmitHelper::write_block(writer, context, &header, |w, c| {
            for operation in &function.body.operations {
                EmitHelper::write_line(w, c, &self.operation(function, operation, c))?;
            }
            EmitHelper::write_line(w, c, &self.terminator(function, c))
        })
    }
}

fn join_values(values: &[ValueId]) -> String {
    values
        .iter()
        .map(ValueId::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

fn join_types(types: &[TensorType]) -> String {
    types
        .iter()
        .map(TensorType::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
