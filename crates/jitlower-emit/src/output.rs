use crate::config::EmitterConfig;
use crate::emitter::Emitter;
use crate::function_emitter::FunctionEmitter;
use anyhow::Result;
use jitlower_core::Function;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Renders `function` in `format`. JSON output ignores the emitter config.
pub fn emit_function(function: &Function, format: OutputFormat, config: &EmitterConfig) -> Result<String> {
    match format {
        OutputFormat::Text => FunctionEmitter::new(config.clone()).emit_to_string(function),
        OutputFormat::Json => Ok(serde_json::to_string_pretty(function)?),
    }
}
