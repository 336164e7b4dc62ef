//! Plain-text instance format.
//!
//! One record per line; blank lines and lines starting with `#` are ignored.
//!
//! ```text
//! # node: n,<index>,<x>,<y>
//! n,0,0.0,0.0
//! n,1,3.0,0.0
//! # edge: e,<node1>,<node2>,<value>
//! e,0,1,2.5
//! ```
//!
//! Records may appear in any order. Edges are resolved against the declared
//! nodes after the whole text has been read.

use std::collections::{HashMap, HashSet};
use std::fmt::Write as _;
use std::path::Path;

use super::problem::GraphProblem;
use super::types::{Edge, Metric, Node};
use crate::error::{TspError, TspResult};

/// Edge record waiting for node resolution.
struct PendingEdge {
    line: usize,
    node1: usize,
    node2: usize,
    value: f64,
}

impl GraphProblem {
    /// Parses an instance and connects every remaining node pair.
    ///
    /// Explicit edge records keep their auxiliary value.
    pub fn from_text(text: &str) -> TspResult<Self> {
        let mut graph = Self::from_text_sparse(text)?;
        graph.connect_all_nodes()?;
        Ok(graph)
    }

    /// Parses an instance keeping only the listed edges.
    pub fn from_text_sparse(text: &str) -> TspResult<Self> {
        Self::parse(text, Metric::Euclidean)
    }

    /// Reads and parses an instance file, connecting every node pair.
    pub fn from_file(path: impl AsRef<Path>) -> TspResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_text(&text)
    }

    /// Parses `text` under `metric` without completing the graph.
    pub fn parse(text: &str, metric: Metric) -> TspResult<Self> {
        let mut graph = GraphProblem::new(metric);
        let mut declared: HashMap<usize, usize> = HashMap::new();
        let mut pending = Vec::new();

        for (number, raw) in text.lines().enumerate() {
            let line = number + 1;
            let record = raw.trim();
            if record.is_empty() || record.starts_with('#') {
                continue;
            }

            let fields: Vec<&str> = record.split(',').map(str::trim).collect();
            match fields[0] {
                "n" => {
                    let node = parse_node(&fields, line)?;
                    if declared.insert(node.index, line).is_some() {
                        return Err(TspError::DuplicateNode {
                            line,
                            index: node.index,
                        });
                    }
                    graph.push_node(node);
                }
                "e" => pending.push(parse_edge(&fields, line)?),
                other => {
                    return Err(TspError::Parse {
                        line,
                        message: format!("unknown record type '{other}'"),
                    })
                }
            }
        }

        graph.check_nodes()?;
        resolve_edges(&mut graph, pending)?;
        Ok(graph)
    }

    /// Serialises the graph to the text format.
    ///
    /// Nodes are always written. Edges are written when the graph is not
    /// complete, or when they carry an auxiliary value, so that
    /// [`from_text`](GraphProblem::from_text) restores an equivalent graph.
    pub fn to_text(&self) -> String {
        let nodes = self.distinct_nodes();
        let complete = self.edges().len() == nodes.len() * nodes.len().saturating_sub(1) / 2;

        let mut out = String::new();
        for node in nodes {
            let _ = writeln!(
                out,
                "n,{},{},{}",
                node.index, node.position.x, node.position.y
            );
        }
        for edge in self.edges() {
            if !complete || edge.value != 0.0 {
                let _ = writeln!(out, "e,{},{},{}", edge.node1, edge.node2, edge.value);
            }
        }
        out
    }
}

fn parse_node(fields: &[&str], line: usize) -> TspResult<Node> {
    expect_fields(fields, line, "node")?;
    let index = parse_field::<usize>(fields[1], line, "node index")?;
    let x = parse_field::<f64>(fields[2], line, "x coordinate")?;
    let y = parse_field::<f64>(fields[3], line, "y coordinate")?;
    if !x.is_finite() || !y.is_finite() {
        return Err(TspError::Parse {
            line,
            message: "coordinates must be finite".into(),
        });
    }
    Ok(Node::new(index, x, y))
}

fn parse_edge(fields: &[&str], line: usize) -> TspResult<PendingEdge> {
    expect_fields(fields, line, "edge")?;
    let node1 = parse_field::<usize>(fields[1], line, "first node")?;
    let node2 = parse_field::<usize>(fields[2], line, "second node")?;
    let value = parse_field::<f64>(fields[3], line, "edge value")?;
    if node1 == node2 {
        return Err(TspError::SelfLoop { line, index: node1 });
    }
    Ok(PendingEdge {
        line,
        node1,
        node2,
        value,
    })
}

fn expect_fields(fields: &[&str], line: usize, record: &str) -> TspResult<()> {
    if fields.len() != 4 {
        return Err(TspError::Parse {
            line,
            message: format!("{record} record needs 4 fields, found {}", fields.len()),
        });
    }
    Ok(())
}

fn parse_field<T: std::str::FromStr>(field: &str, line: usize, what: &str) -> TspResult<T> {
    field.parse().map_err(|_| TspError::Parse {
        line,
        message: format!("invalid {what} '{field}'"),
    })
}

fn resolve_edges(graph: &mut GraphProblem, pending: Vec<PendingEdge>) -> TspResult<()> {
    let mut seen = HashSet::with_capacity(pending.len());
    for record in pending {
        let a = graph.node(record.node1).ok_or(TspError::UnknownNode {
            line: record.line,
            index: record.node1,
        })?;
        let b = graph.node(record.node2).ok_or(TspError::UnknownNode {
            line: record.line,
            index: record.node2,
        })?;

        let mut edge = Edge::between(a, b, graph.metric());
        if !seen.insert(edge.key()) {
            return Err(TspError::Parse {
                line: record.line,
                message: format!("duplicate edge {}-{}", record.node1, record.node2),
            });
        }
        if edge.distance <= 0.0 {
            return Err(TspError::ZeroDistance {
                first: record.node1,
                second: record.node2,
            });
        }
        edge.value = record.value;
        graph.push_edge(edge);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SQUARE: &str = "\
# unit square
n,0,0,0
n,1,0,1

e,0,1,7.5
n,2,1,1
n,3,1,0
";

    #[test]
    fn test_from_text_completes_graph() {
        let graph = GraphProblem::from_text(SQUARE).unwrap();
        assert_eq!(graph.node_count(), 4);
        assert_eq!(graph.edges().len(), 6);
        let explicit = graph.edge_between(1, 0).unwrap();
        assert_eq!(explicit.value, 7.5);
        assert!((explicit.distance - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_from_text_sparse_keeps_listed_edges() {
        let graph = GraphProblem::from_text_sparse(SQUARE).unwrap();
        assert_eq!(graph.edges().len(), 1);
    }

    #[test]
    fn test_edge_before_node_resolves() {
        let graph = GraphProblem::from_text_sparse("e,0,1,1\nn,0,0,0\nn,1,2,0\n").unwrap();
        assert_eq!(graph.edges().len(), 1);
        assert!((graph.edges()[0].distance - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_unknown_node_names_line() {
        let err = GraphProblem::from_text("n,0,0,0\nn,1,1,0\ne,0,5,1\n").unwrap_err();
        assert!(
            matches!(err, TspError::UnknownNode { line: 3, index: 5 }),
            "got {err}"
        );
    }

    #[test]
    fn test_malformed_record_names_line() {
        let err = GraphProblem::from_text("n,0,0,0\nn,1,abc,0\n").unwrap_err();
        assert!(matches!(err, TspError::Parse { line: 2, .. }), "got {err}");

        let err = GraphProblem::from_text("n,0,0\n").unwrap_err();
        assert!(matches!(err, TspError::Parse { line: 1, .. }), "got {err}");

        let err = GraphProblem::from_text("n,0,0,0\nx,1,2,3\n").unwrap_err();
        assert!(matches!(err, TspError::Parse { line: 2, .. }), "got {err}");
    }

    #[test]
    fn test_duplicate_node_rejected() {
        let err = GraphProblem::from_text("n,0,0,0\nn,0,1,1\n").unwrap_err();
        assert!(matches!(err, TspError::DuplicateNode { line: 2, index: 0 }));
    }

    #[test]
    fn test_duplicate_position_rejected() {
        let err = GraphProblem::from_text("n,0,1,1\nn,1,1,1\n").unwrap_err();
        assert!(matches!(err, TspError::DuplicatePosition { .. }));
    }

    #[test]
    fn test_self_loop_rejected() {
        let err = GraphProblem::from_text("n,0,0,0\ne,0,0,1\n").unwrap_err();
        assert!(matches!(err, TspError::SelfLoop { line: 2, index: 0 }));
    }

    #[test]
    fn test_duplicate_edge_rejected() {
        let err = GraphProblem::from_text("n,0,0,0\nn,1,1,0\ne,0,1,1\ne,1,0,2\n").unwrap_err();
        assert!(matches!(err, TspError::Parse { line: 4, .. }));
    }

    #[test]
    fn test_to_text_restores_graph() {
        let graph = GraphProblem::from_text(SQUARE).unwrap();
        let restored = GraphProblem::from_text(&graph.to_text()).unwrap();
        assert_eq!(restored.node_count(), graph.node_count());
        assert_eq!(restored.edges().len(), graph.edges().len());
        assert!((restored.costs() - graph.costs()).abs() < 1e-9);
        assert_eq!(restored.edge_between(0, 1).map(|e| e.value), Some(7.5));
    }

    #[test]
    fn test_to_text_sparse_writes_all_edges() {
        let graph = GraphProblem::from_text_sparse("n,0,0,0\nn,1,1,0\nn,2,2,0\ne,0,1,0\n").unwrap();
        let text = graph.to_text();
        assert!(text.contains("e,0,1,0"));
        let restored = GraphProblem::from_text_sparse(&text).unwrap();
        assert_eq!(restored.edges().len(), 1);
    }

    #[test]
    fn test_from_file_missing_is_io_error() {
        let err = GraphProblem::from_file("/nonexistent/instance.txt").unwrap_err();
        assert!(matches!(err, TspError::Io(_)));
    }
}
