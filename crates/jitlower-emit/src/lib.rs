/*! Turn lowered IR back into readable text.
 *
 * Lowering bugs are found by reading what came out. These emitters print a function in an
 * MHLO-like textual form, optionally with the source locations every operation carries, or dump
 * it as JSON for other tools.
 */

pub mod config;
pub mod emitter;
pub mod function_emitter;
pub mod output;

pub use config::{EmitterConfig, IndentStyle};
pub use emitter::{EmitContext, EmitHelper, EmitResult, Emitter};
pub use function_emitter::FunctionEmitter;
pub use output::{emit_function, OutputFormat};
