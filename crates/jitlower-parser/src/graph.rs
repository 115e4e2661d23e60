use pest::iterators::Pairs;
use pest::Parser;
use pest_derive::Parser;

#[derive(Parser)]
#[grammar = "graph.pest"]
pub struct GraphParser;

/// Parses a textual graph dump. The single top-level pair is `Rule::graph_file`.
pub fn parse_graph(input: &str) -> Result<Pairs<'_, Rule>, Box<pest::error::Error<Rule>>> {
    GraphParser::parse(Rule::graph_file, input).map_err(Box::new)
}
