use pest::iterators::Pair;
use pest::Parser;
use pest_derive::Parser;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

#[derive(Parser)]
#[grammar = "schema.pest"]
struct SchemaParser;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    #[error("Invalid schema `{schema}`: {message}")]
    Syntax { schema: String, message: String },
    #[error("Invalid list length in `{0}`")]
    ListLength(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SchemaType {
    pub base: String,
    pub alias: Option<String>,
    /// `Some(None)` for `T[]`, `Some(Some(n))` for `T[n]`.
    pub list: Option<Option<usize>>,
    /// `T?[]`: the elements are optional, not the list.
    pub element_optional: bool,
    pub optional: bool,
}

impl SchemaType {
    pub fn is_tensor(&self) -> bool {
        self.base == "Tensor" && self.list.is_none()
    }

    pub fn is_list(&self) -> bool {
        self.list.is_some()
    }
}

impl fmt::Display for SchemaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.base)?;
        if let Some(alias) = &self.alias {
            write!(f, "({})", alias)?;
        }
        if self.element_optional {
            write!(f, "?")?;
        }
        match self.list {
            Some(Some(len)) => write!(f, "[{}]", len)?,
            Some(None) => write!(f, "[]")?,
            None => {}
        }
        if self.optional {
            write!(f, "?")?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SchemaArgument {
    pub name: String,
    pub ty: SchemaType,
    pub default: Option<String>,
    pub kwarg_only: bool,
}

impl SchemaArgument {
    pub fn is_required(&self) -> bool {
        self.default.is_none()
    }
}

impl fmt::Display for SchemaArgument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.ty, self.name)?;
        if let Some(default) = &self.default {
            write!(f, "={}", default)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SchemaReturn {
    pub ty: SchemaType,
    pub name: Option<String>,
}

impl fmt::Display for SchemaReturn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.name {
            Some(name) => write!(f, "{} {}", self.ty, name),
            None => write!(f, "{}", self.ty),
        }
    }
}

/// Typed view of an operator signature such as
/// `aten::clone(Tensor self, *, int? memory_format=None) -> (Tensor)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FunctionSchema {
    pub namespace: String,
    pub name: String,
    pub overload: Option<String>,
    pub arguments: Vec<SchemaArgument>,
    pub returns: Vec<SchemaReturn>,
    pub parenthesized_returns: bool,
}

impl FunctionSchema {
    /// `namespace::name`, the form a graph node's kind takes.
    pub fn qualified_name(&self) -> String {
        format!("{}::{}", self.namespace, self.name)
    }

    pub fn required_arguments(&self) -> usize {
        self.arguments.iter().filter(|a| a.is_required()).count()
    }

    /// Whether a call site passing `count` inputs positionally can bind to this schema.
    pub fn accepts_arity(&self, count: usize) -> bool {
        count >= self.required_arguments() && count <= self.arguments.len()
    }

    pub fn argument(&self, name: &str) -> Option<(usize, &SchemaArgument)> {
        self.arguments
            .iter()
            .enumerate()
            .find(|(_, arg)| arg.name == name)
    }
}

impl fmt::Display for FunctionSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.qualified_name())?;
        if let Some(overload) = &self.overload {
            write!(f, ".{}", overload)?;
        }
        write!(f, "(")?;
        let mut kwarg_marker_written = false;
        for (i, arg) in self.arguments.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            if arg.kwarg_only && !kwarg_marker_written {
                write!(f, "*, ")?;
                kwarg_marker_written = true;
            }
            write!(f, "{}", arg)?;
        }
        write!(f, ") -> ")?;
        let returns = self
            .returns
            .iter()
            .map(|r| r.to_string())
            .collect::<Vec<_>>()
            .join(", ");
        if self.parenthesized_returns {
            write!(f, "({})", returns)
        } else {
            write!(f, "{}", returns)
        }
    }
}

pub fn parse_schema(input: &str) -> Result<FunctionSchema, SchemaError> {
    let mut pairs = SchemaParser::parse(Rule::schema, input).map_err(|e| SchemaError::Syntax {
        schema: input.to_string(),
        message: e.to_string(),
    })?;

    let missing = |what: &str| SchemaError::Syntax {
        schema: input.to_string(),
        message: format!("missing {}", what),
    };

    let root = pairs.next().ok_or_else(|| missing("schema"))?;

    let mut schema = FunctionSchema {
        namespace: String::new(),
        name: String::new(),
        overload: None,
        arguments: Vec::new(),
        returns: Vec::new(),
        parenthesized_returns: false,
    };

    for pair in root.into_inner() {
        match pair.as_rule() {
            Rule::op_name => {
                for part in pair.into_inner() {
                    match part.as_rule() {
                        Rule::namespace => schema.namespace = part.as_str().to_string(),
                        Rule::name => schema.name = part.as_str().to_string(),
                        Rule::overload => schema.overload = Some(part.as_str().to_string()),
                        _ => {}
                    }
                }
            }
            Rule::arguments => {
                let mut kwarg_only = false;
                for item in pair.into_inner() {
                    match item.as_rule() {
                        Rule::kwarg_marker => kwarg_only = true,
                        Rule::argument => schema.arguments.push(parse_argument(item, kwarg_only)?),
                        _ => {}
                    }
                }
            }
            Rule::returns => {
                let inner = pair.into_inner().next().ok_or_else(|| missing("returns"))?;
                match inner.as_rule() {
                    Rule::tuple_returns => {
                        schema.parenthesized_returns = true;
                        for item in inner.into_inner() {
                            schema.returns.push(parse_return(item)?);
                        }
                    }
                    Rule::return_item => schema.returns.push(parse_return(inner)?),
                    _ => {}
                }
            }
            _ => {}
        }
    }

    Ok(schema)
}

fn parse_argument(pair: Pair<'_, Rule>, kwarg_only: bool) -> Result<SchemaArgument, SchemaError> {
    let mut ty = None;
    let mut name = String::new();
    let mut default = None;

    for part in pair.into_inner() {
        match part.as_rule() {
            Rule::arg_type => ty = Some(parse_type(part)?),
            Rule::ident => name = part.as_str().to_string(),
            Rule::default_value => default = Some(part.as_str().trim().to_string()),
            _ => {}
        }
    }

    let ty = ty.ok_or_else(|| SchemaError::Syntax {
        schema: name.clone(),
        message: "argument without a type".to_string(),
    })?;

    Ok(SchemaArgument {
        name,
        ty,
        default,
        kwarg_only,
    })
}

fn parse_return(pair: Pair<'_, Rule>) -> Result<SchemaReturn, SchemaError> {
    let text = pair.as_str().to_string();
    let mut ty = None;
    let mut name = None;

    for part in pair.into_inner() {
        match part.as_rule() {
            Rule::arg_type => ty = Some(parse_type(part)?),
            Rule::ident => name = Some(part.as_str().to_string()),
            _ => {}
        }
    }

    let ty = ty.ok_or_else(|| SchemaError::Syntax {
        schema: text,
        message: "return without a type".to_string(),
    })?;

    Ok(SchemaReturn { ty, name })
}

fn parse_type(pair: Pair<'_, Rule>) -> Result<SchemaType, SchemaError> {
    let mut ty = SchemaType {
        base: String::new(),
        alias: None,
        list: None,
        element_optional: false,
        optional: false,
    };

    for part in pair.into_inner() {
        match part.as_rule() {
            Rule::type_name => ty.base = part.as_str().to_string(),
            Rule::alias_annotation => {
                let text = part.as_str();
                ty.alias = Some(text[1..text.len() - 1].to_string());
            }
            Rule::list_suffix => {
                let digits = part.as_str().trim_start_matches('[').trim_end_matches(']');
                let len = if digits.is_empty() {
                    None
                } else {
                    Some(
                        digits
                            .parse::<usize>()
                            .map_err(|_| SchemaError::ListLength(part.as_str().to_string()))?,
                    )
                };
                ty.list = Some(len);
            }
            Rule::optional_suffix => {
                if ty.list.is_some() {
                    ty.optional = true;
                } else {
                    ty.element_optional = true;
                }
            }
            _ => {}
        }
    }

    // A lone `?` with no list applies to the value itself.
    if ty.element_optional && ty.list.is_none() {
        ty.element_optional = false;
        ty.optional = true;
    }

    Ok(ty)
}
