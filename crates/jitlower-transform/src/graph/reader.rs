use super::{Graph, IValue, NodeMetadata, SourceRange, SourceType, ValueRef};
use crate::errors::{Result, TransformError};
use crate::scalar_type::ScalarType;
use jitlower_parser::graph::Rule;
use pest::iterators::Pair;
use std::collections::HashMap;

/// Builds a `Graph` from its textual dump.
pub fn read_graph(source: &str) -> Result<Graph> {
    let mut pairs = jitlower_parser::parse_graph(source)?;
    let file = pairs
        .next()
        .ok_or_else(|| syntax_error(0, 0, "empty input"))?;
    let graph_pair = file
        .into_inner()
        .find(|p| p.as_rule() == Rule::graph)
        .ok_or_else(|| syntax_error(0, 0, "missing graph"))?;

    let mut reader = GraphReader::default();
    reader.read(graph_pair)?;
    Ok(reader.graph)
}

#[derive(Default)]
struct GraphReader {
    graph: Graph,
    names: HashMap<String, ValueRef>,
}

impl GraphReader {
    fn read(&mut self, pair: Pair<'_, Rule>) -> Result<()> {
        for item in pair.into_inner() {
            match item.as_rule() {
                Rule::param_list => {
                    for param in item.into_inner() {
                        let (name, ty) = self.read_param(param)?;
                        let value = self.graph.add_input(name.clone(), ty);
                        self.define(name, value)?;
                    }
                }
                Rule::node => self.read_node(item)?,
                Rule::return_stmt => {
                    let user = "return".to_string();
                    for list in item.into_inner() {
                        self.graph.outputs = self.read_value_list(list, &user)?;
                    }
                }
                _ => {}
            }
        }
        Ok(())
    }

    fn read_node(&mut self, pair: Pair<'_, Rule>) -> Result<()> {
        let mut outputs = Vec::new();
        let mut kind = String::new();
        let mut attributes = Vec::new();
        let mut inputs = Vec::new();
        let mut metadata = NodeMetadata::default();

        for part in pair.into_inner() {
            match part.as_rule() {
                Rule::param_list => {
                    for param in part.into_inner() {
                        outputs.push(self.read_param(param)?);
                    }
                }
                Rule::op_kind => kind = part.as_str().to_string(),
                Rule::attributes => {
                    for attribute in part.into_inner() {
                        let mut inner = attribute.into_inner();
                        let (Some(key), Some(value)) = (inner.next(), inner.next()) else {
                            continue;
                        };
                        attributes.push((key.as_str().to_string(), read_literal(value)?));
                    }
                }
                Rule::value_list => inputs = self.read_value_list(part, &kind)?,
                Rule::source_comment => {
                    let text = part.as_str().trim_start_matches('#').trim();
                    metadata.source_range = parse_source_range(text);
                }
                _ => {}
            }
        }

        let names: Vec<String> = outputs.iter().map(|(name, _)| name.clone()).collect();
        let node = self.graph.add_node(kind, inputs, outputs);
        if let Some(slot) = self.graph.node_mut(node) {
            slot.attributes = attributes;
            slot.metadata = metadata;
        }
        let produced = self
            .graph
            .node(node)
            .map(|n| n.outputs.clone())
            .unwrap_or_default();
        for (name, value) in names.into_iter().zip(produced) {
            self.define(name, value)?;
        }
        Ok(())
    }

    fn read_param(&self, pair: Pair<'_, Rule>) -> Result<(String, SourceType)> {
        let position = pair.as_span().start_pos().line_col();
        let mut inner = pair.into_inner();
        let name = inner
            .next()
            .map(|p| p.as_str().trim_start_matches('%').to_string())
            .ok_or_else(|| syntax_error(position.0, position.1, "missing value name"))?;
        let ty = match inner.next() {
            Some(ty) => read_type(ty)?,
            None => SourceType::tensor(),
        };
        Ok((name, ty))
    }

    fn read_value_list(&self, pair: Pair<'_, Rule>, user: &str) -> Result<Vec<ValueRef>> {
        pair.into_inner()
            .map(|name| {
                let key = name.as_str().trim_start_matches('%');
                self.names
                    .get(key)
                    .copied()
                    .ok_or_else(|| TransformError::UndefinedValue {
                        name: name.as_str().to_string(),
                        user: user.to_string(),
                    })
            })
            .collect()
    }

    fn define(&mut self, name: String, value: ValueRef) -> Result<()> {
        if self.names.contains_key(&name) {
            return Err(TransformError::RedefinedValue(format!("%{}", name)));
        }
        self.names.insert(name, value);
        Ok(())
    }
}

fn read_type(pair: Pair<'_, Rule>) -> Result<SourceType> {
    let Some(inner) = pair.into_inner().next() else {
        return Ok(SourceType::tensor());
    };

    match inner.as_rule() {
        Rule::simple_type => Ok(SourceType::from_name(inner.as_str())),
        Rule::tensor_type => {
            let mut parts = inner.into_inner();
            let name = parts.next().map(|p| p.as_str()).unwrap_or("Tensor");
            let mut sizes = Vec::new();
            for prop in parts.flat_map(|props| props.into_inner()) {
                for item in prop.into_inner() {
                    if item.as_rule() == Rule::dim {
                        let size = match item.as_str() {
                            "*" => None,
                            digits => Some(digits.parse::<i64>().map_err(|e| {
                                let (line, column) = item.as_span().start_pos().line_col();
                                syntax_error(line, column, &e.to_string())
                            })?),
                        };
                        sizes.push(size);
                    }
                }
            }
            match ScalarType::from_type_name(name) {
                Some(dtype) => Ok(SourceType::Tensor {
                    dtype: Some(dtype),
                    sizes: Some(sizes),
                }),
                None if name == "Tensor" => Ok(SourceType::Tensor {
                    dtype: None,
                    sizes: Some(sizes),
                }),
                None => Ok(SourceType::Other(name.to_string())),
            }
        }
        _ => Ok(SourceType::tensor()),
    }
}

fn read_literal(pair: Pair<'_, Rule>) -> Result<IValue> {
    let (line, column) = pair.as_span().start_pos().line_col();
    let Some(inner) = pair.into_inner().next() else {
        return Err(syntax_error(line, column, "empty literal"));
    };

    match inner.as_rule() {
        Rule::float => inner
            .as_str()
            .parse::<f64>()
            .map(IValue::Double)
            .map_err(|e| syntax_error(line, column, &e.to_string())),
        Rule::int => inner
            .as_str()
            .parse::<i64>()
            .map(IValue::Int)
            .map_err(|e| syntax_error(line, column, &e.to_string())),
        Rule::string => Ok(IValue::Str(
            inner
                .into_inner()
                .next()
                .map(|body| body.as_str().to_string())
                .unwrap_or_default(),
        )),
        Rule::list => {
            let mut items = Vec::new();
            for item in inner.into_inner() {
                match read_literal(item)? {
                    IValue::Int(v) => items.push(v),
                    other => {
                        return Err(syntax_error(
                            line,
                            column,
                            &format!("only integer lists are supported, found {}", other),
                        ))
                    }
                }
            }
            Ok(IValue::IntList(items))
        }
        Rule::bare => Ok(match inner.as_str() {
            "None" => IValue::None,
            "True" => IValue::Bool(true),
            "False" => IValue::Bool(false),
            other => IValue::Str(other.to_string()),
        }),
        _ => Err(syntax_error(line, column, "unexpected literal")),
    }
}

/// Accepts `file:line:col`; anything else is treated as a free-form comment.
fn parse_source_range(text: &str) -> Option<SourceRange> {
    let mut parts = text.rsplitn(3, ':');
    let column = parts.next()?.trim().parse().ok()?;
    let line = parts.next()?.trim().parse().ok()?;
    let file = parts.next()?.trim();
    if file.is_empty() {
        return None;
    }
    Some(SourceRange {
        file: file.to_string(),
        line,
        column,
    })
}

fn syntax_error(line: usize, column: usize, message: &str) -> TransformError {
    TransformError::ParseError {
        line,
        column,
        message: message.to_string(),
    }
}
