use crate::converters::{register_builtin_converters, Converter};
use crate::errors::{Result, TransformError};
use jitlower_parser::parse_schema;
use std::collections::HashMap;
use std::sync::OnceLock;
use tracing::debug;

/// Schema literal to converter, matched exactly.
///
/// Populated once before any lookup and only read afterwards, so a finished registry can be
/// shared by any number of conversions running in parallel.
#[derive(Debug, Default)]
pub struct PatternRegistry {
    patterns: HashMap<String, Converter>,
}

impl PatternRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding every builtin converter.
    pub fn with_builtins() -> Result<Self> {
        let mut registry = Self::new();
        register_builtin_converters(&mut registry)?;
        Ok(registry)
    }

    /// Associates `schema` with `converter`.
    ///
    /// The literal must parse as an operator schema and is stored verbatim; a second registration
    /// of the same literal is rejected.
    pub fn register(&mut self, schema: &str, converter: Converter) -> Result<&mut Self> {
        parse_schema(schema)?;
        if self.patterns.contains_key(schema) {
            return Err(TransformError::DuplicateSchema(schema.to_string()));
        }
        debug!("registered {} for {}", converter.name, schema);
        self.patterns.insert(schema.to_string(), converter);
        Ok(self)
    }

    pub fn lookup(&self, schema: &str) -> Option<Converter> {
        self.patterns.get(schema).copied()
    }

    pub fn contains(&self, schema: &str) -> bool {
        self.patterns.contains_key(schema)
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    pub fn schemas(&self) -> Vec<&str> {
        let mut schemas: Vec<&str> = self.patterns.keys().map(String::as_str).collect();
        schemas.sort_unstable();
        schemas
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Converter)> {
        self.patterns
            .iter()
            .map(|(schema, converter)| (schema.as_str(), *converter))
    }
}

static GLOBAL_REGISTRY: OnceLock<PatternRegistry> = OnceLock::new();

/// Builds the process-wide registry on first call and returns it on every call after.
///
/// Must run before `global_registry` is expected to return anything. The registry lives until
/// process exit.
pub fn initialize_global_registry() -> Result<&'static PatternRegistry> {
    if let Some(registry) = GLOBAL_REGISTRY.get() {
        return Ok(registry);
    }
    let registry = PatternRegistry::with_builtins()?;
    Ok(GLOBAL_REGISTRY.get_or_init(|| registry))
}

/// The process-wide registry, if `initialize_global_registry` has run.
pub fn global_registry() -> Option<&'static PatternRegistry> {
    GLOBAL_REGISTRY.get()
}
