//! DIMACS maximum flow problems and result files.
//!
//! ```text
//! c comment
//! p max <nodes> <arcs>
//! n <id> s
//! n <id> t
//! a <from> <to> <capacity>
//! ```
//!
//! Node ids are 1-based in the text and 0-based in [`Graph`].

use crate::maximum_flow::graph::Graph;
use crate::maximum_flow::pseudo_flow::{BucketOrder, Config, OptimalityReport, RootSelection, Violation};
use num_traits::NumAssign;
use std::fmt::Display;
use std::io::BufRead;
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DimacsError {
    #[error("failed to read input: {0}")]
    Io(#[from] std::io::Error),

    #[error("no problem line before line {line}")]
    MissingProblemLine { line: usize },

    #[error("line {line}: duplicate problem line")]
    DuplicateProblemLine { line: usize },

    #[error("line {line}: malformed line `{content}`")]
    MalformedLine { line: usize, content: String },

    #[error("line {line}: unknown node designator `{designator}`")]
    UnknownDesignator { line: usize, designator: String },

    #[error("line {line}: node {node} is out of range 1..={num_nodes}")]
    NodeOutOfRange { line: usize, node: usize, num_nodes: usize },

    #[error("no source node designated")]
    MissingSource,

    #[error("no sink node designated")]
    MissingSink,

    #[error("problem line announces {expected} arcs, found {found}")]
    ArcCountMismatch { expected: usize, found: usize },

    #[error("line {line}: invalid number `{token}`")]
    InvalidNumber { line: usize, token: String },

    #[error("line {line}: arc ({from}, {to}) has a negative capacity")]
    InvalidArc { line: usize, from: usize, to: usize },
}

/// A parsed problem, node ids already 0-based.
#[derive(Clone)]
pub struct DimacsProblem<Flow> {
    pub graph: Graph<Flow>,
    pub source: usize,
    pub sink: usize,
}

pub fn parse_dimacs<Flow>(input: &str) -> Result<DimacsProblem<Flow>, DimacsError>
where
    Flow: NumAssign + Ord + Copy + FromStr,
{
    read_dimacs(input.as_bytes())
}

pub fn read_dimacs<Flow, R>(reader: R) -> Result<DimacsProblem<Flow>, DimacsError>
where
    Flow: NumAssign + Ord + Copy + FromStr,
    R: BufRead,
{
    let mut graph: Option<Graph<Flow>> = None;
    let mut expected_arcs = 0;
    let mut num_arcs = 0;
    let (mut source, mut sink) = (None, None);
    let mut num_lines = 0;

    for (index, content) in reader.lines().enumerate() {
        let content = content?;
        let line = index + 1;
        num_lines = line;

        let mut tokens = content.split_whitespace();
        let Some(kind) = tokens.next() else {
            continue;
        };
        if kind.starts_with('c') {
            continue;
        }

        let malformed = || DimacsError::MalformedLine { line, content: content.clone() };
        match kind {
            "p" => {
                if graph.is_some() {
                    return Err(DimacsError::DuplicateProblemLine { line });
                }
                if tokens.next() != Some("max") {
                    return Err(malformed());
                }
                let num_nodes: usize = parse_token(tokens.next(), line, &content)?;
                expected_arcs = parse_token(tokens.next(), line, &content)?;

                let mut g = Graph::default();
                g.add_nodes(num_nodes);
                graph = Some(g);
            }
            "n" => {
                let g = graph.as_ref().ok_or(DimacsError::MissingProblemLine { line })?;
                let node = parse_node(tokens.next(), line, &content, g.num_nodes())?;
                match tokens.next() {
                    Some("s") => source = Some(node),
                    Some("t") => sink = Some(node),
                    Some(designator) => return Err(DimacsError::UnknownDesignator { line, designator: designator.to_string() }),
                    None => return Err(malformed()),
                }
            }
            "a" => {
                let g = graph.as_mut().ok_or(DimacsError::MissingProblemLine { line })?;
                let from = parse_node(tokens.next(), line, &content, g.num_nodes())?;
                let to = parse_node(tokens.next(), line, &content, g.num_nodes())?;
                let capacity: Flow = parse_token(tokens.next(), line, &content)?;
                g.add_directed_edge(from, to, capacity).ok_or(DimacsError::InvalidArc { line, from: from + 1, to: to + 1 })?;
                num_arcs += 1;
            }
            _ => return Err(malformed()),
        }

        if tokens.next().is_some() {
            return Err(malformed());
        }
    }

    let graph = graph.ok_or(DimacsError::MissingProblemLine { line: num_lines + 1 })?;
    let source = source.ok_or(DimacsError::MissingSource)?;
    let sink = sink.ok_or(DimacsError::MissingSink)?;
    if num_arcs != expected_arcs {
        return Err(DimacsError::ArcCountMismatch { expected: expected_arcs, found: num_arcs });
    }

    Ok(DimacsProblem { graph, source, sink })
}

fn parse_token<T: FromStr>(token: Option<&str>, line: usize, content: &str) -> Result<T, DimacsError> {
    let token = token.ok_or_else(|| DimacsError::MalformedLine { line, content: content.to_string() })?;
    token.parse().map_err(|_| DimacsError::InvalidNumber { line, token: token.to_string() })
}

fn parse_node(token: Option<&str>, line: usize, content: &str, num_nodes: usize) -> Result<usize, DimacsError> {
    let node: usize = parse_token(token, line, content)?;
    if node == 0 || node > num_nodes {
        return Err(DimacsError::NodeOutOfRange { line, node, num_nodes });
    }
    Ok(node - 1)
}

/// Result file of a solved problem: configuration, feasibility and
/// optimality, the flow value and the flow of every arc in input order.
pub fn format_result<Flow>(header: &str, config: &Config, report: &OptimalityReport<Flow>, graph: &Graph<Flow>) -> String
where
    Flow: NumAssign + Ord + Copy + Display,
{
    let mut lines = vec![
        format!("c {header}"),
        "c ".to_string(),
        "c Dimacs-format maximum flow result file".to_string(),
        "c generated by pseudoflow".to_string(),
        "c ".to_string(),
        "c Optimal flow using Hochbaum's pseudoflow algorithm".to_string(),
        "c ".to_string(),
        "c Runtime configuration -".to_string(),
    ];
    lines.push(match config.root_selection {
        RootSelection::LowestLabel => "c Lowest label pseudoflow algorithm".to_string(),
        RootSelection::HighestLabel => "c Highest label pseudoflow algorithm".to_string(),
    });
    lines.push(match config.bucket_order {
        BucketOrder::Fifo => "c Using FIFO buckets".to_string(),
        BucketOrder::Lifo => "c Using LIFO buckets".to_string(),
    });
    lines.push("c ".to_string());

    for violation in report.violations.iter() {
        match violation {
            Violation::Capacity { from, to, flow, capacity } => {
                lines.push(format!("c Capacity constraint violated on arc ({}, {}). Flow = {flow}, capacity = {capacity}", from + 1, to + 1));
            }
            Violation::Conservation { node, excess } => {
                lines.push(format!("c Flow balance constraint violated in node {}. Excess = {excess}", node + 1));
            }
            Violation::CutMismatch { .. } => {}
        }
    }
    if report.is_feasible() {
        lines.extend(["c ".to_string(), "c Solution checks as feasible".to_string()]);
    }
    if report.is_optimal() {
        lines.extend(["c ".to_string(), "c Solution checks as optimal".to_string()]);
    } else if report.violations.iter().any(|v| matches!(v, Violation::CutMismatch { .. })) {
        lines.extend(["c ".to_string(), "c Flow is not optimal - max flow does not equal min cut".to_string()]);
    }

    lines.extend(["c Solution".to_string(), format!("s {}", report.maximum_flow)]);
    lines.extend(["c ".to_string(), "c SRC DST FLOW".to_string()]);
    lines.extend(graph.edges().map(|e| format!("f {} {} {}", e.from + 1, e.to + 1, e.flow)));

    lines.join("\n")
}
