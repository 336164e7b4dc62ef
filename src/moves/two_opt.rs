//! 2-opt segment reversal.
//!
//! # Algorithm
//!
//! Removing edges `(i, i+1)` and `(j, j+1)` and reconnecting the tour is the
//! same as reversing the segment `[i+1..=j]`:
//!
//! ```text
//! delta = d(i, j) + d(i+1, j+1) - d(i, i+1) - d(j, j+1)
//! ```
//!
//! # Reference
//!
//! Croes, G.A. (1958). "A method for solving traveling salesman problems",
//! *Operations Research* 6(6), 791-812.

use super::types::{leg, MoveKind};
use crate::graph::GraphProblem;
use crate::state::Perturbation;

/// Reversal of the tour segment between two cut points.
#[derive(Debug, Clone, Copy)]
pub struct TwoOptMove<'a> {
    graph: &'a GraphProblem,
    i: usize,
    j: usize,
}

impl<'a> TwoOptMove<'a> {
    /// Cuts after positions `i` and `j`, with `i < j < len - 1`.
    pub fn new(graph: &'a GraphProblem, i: usize, j: usize) -> Self {
        debug_assert!(
            i < j && j + 1 < graph.nodes().len(),
            "2-opt positions ({i}, {j}) out of range"
        );
        Self { graph, i, j }
    }

    /// Cut positions.
    pub fn positions(&self) -> (usize, usize) {
        (self.i, self.j)
    }

    /// Tour length change.
    pub fn delta(&self) -> f64 {
        let (g, i, j) = (self.graph, self.i, self.j);
        leg(g, i, j) + leg(g, i + 1, j + 1) - leg(g, i, i + 1) - leg(g, j, j + 1)
    }

    /// The tour with `[i+1..=j]` reversed.
    pub fn apply(&self) -> GraphProblem {
        let mut nodes = self.graph.nodes().to_vec();
        nodes[self.i + 1..=self.j].reverse();
        GraphProblem::path(nodes, false, self.graph.metric())
    }

    /// Nodes at the two cuts.
    pub fn perturbation(&self) -> Perturbation {
        let nodes = self.graph.nodes();
        Perturbation {
            kind: MoveKind::TwoOpt,
            nodes: vec![nodes[self.i].index, nodes[self.j].index],
            delta: self.delta(),
        }
    }
}
