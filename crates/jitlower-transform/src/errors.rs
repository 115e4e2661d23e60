use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum TransformError {
    #[error("Parse error at line {line}, column {column}: {message}")]
    ParseError {
        line: usize,
        column: usize,
        message: String,
    },

    #[error("Undefined value {name} used by {user}")]
    UndefinedValue { name: String, user: String },

    #[error("Value {0} is defined more than once")]
    RedefinedValue(String),

    #[error("Invalid schema: {0}")]
    InvalidSchema(String),

    #[error("Schema already registered: {0}")]
    DuplicateSchema(String),

    #[error("No converter registered for {kind} (schema: {schema})")]
    UnregisteredSchema { kind: String, schema: String },

    #[error("No known schema matches node {0}")]
    UnresolvedSchema(String),

    #[error("Unsupported scalar type code: {0}")]
    UnsupportedScalarTag(i64),

    #[error("Source value {0} has not been converted yet")]
    UnmappedValue(String),

    #[error("Converter {converter} declined node {kind}")]
    ConversionFailed { converter: String, kind: String },

    #[error("Converter {converter} left output {output} of {kind} unmapped")]
    IncompleteConversion {
        converter: String,
        kind: String,
        output: String,
    },

    #[error("No target type for {ty}: {reason}")]
    UnsupportedType { ty: String, reason: String },

    #[error("Unsupported graph input {name}: {reason}")]
    UnsupportedInput { name: String, reason: String },

    #[error("Node {kind} has no input {index}")]
    MissingInput { kind: String, index: usize },

    #[error("Node {kind} has no output {index}")]
    MissingOutput { kind: String, index: usize },

    #[error("IR builder error: {0}")]
    BuilderError(String),
}

impl From<jitlower_core::IrError> for TransformError {
    fn from(err: jitlower_core::IrError) -> Self {
        TransformError::BuilderError(err.to_string())
    }
}

impl From<jitlower_parser::SchemaError> for TransformError {
    fn from(err: jitlower_parser::SchemaError) -> Self {
        TransformError::InvalidSchema(err.to_string())
    }
}

impl From<Box<pest::error::Error<jitlower_parser::graph::Rule>>> for TransformError {
    fn from(err: Box<pest::error::Error<jitlower_parser::graph::Rule>>) -> Self {
        let (line, column) = match err.line_col {
            pest::error::LineColLocation::Pos(pos) => pos,
            pest::error::LineColLocation::Span(start, _) => start,
        };
        TransformError::ParseError {
            line,
            column,
            message: err.variant.message().to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, TransformError>;
