/*! Parse graph dumps and operator schemas.
 *
 * Two textual inputs feed the lowering pipeline: the dumped source graph, and the schema strings
 * that identify operator overloads. Both are parsed here with pest; the graph parser hands back
 * raw pairs for the transform crate to walk, the schema parser produces a typed `FunctionSchema`.
 */

#![allow(unreachable_patterns)]

pub mod graph;
pub mod schema;

pub use graph::{parse_graph, GraphParser};
pub use schema::{parse_schema, FunctionSchema, SchemaArgument, SchemaError, SchemaType};

pub fn check(input: &str) -> bool {
    parse_graph(input).is_ok()
}
