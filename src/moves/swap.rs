//! Node swap.
//!
//! Exchanges the nodes at interior positions `i < j`. Only the edges around
//! the two positions change:
//!
//! ```text
//! delta = d(i-1, j) + d(j, i+1) + d(j-1, i) + d(i, j+1)
//!       - d(i-1, i) - d(i, i+1) - d(j-1, j) - d(j, j+1)
//! ```
//!
//! When `j = i + 1` the edge `(i, j)` is shared and survives the swap, so
//! only the two outer edges are exchanged.

use super::types::{leg, MoveKind};
use crate::graph::GraphProblem;
use crate::state::Perturbation;

/// Swap of two interior tour positions.
#[derive(Debug, Clone, Copy)]
pub struct SwapMove<'a> {
    graph: &'a GraphProblem,
    i: usize,
    j: usize,
}

impl<'a> SwapMove<'a> {
    /// Swap of positions `i` and `j`, with `0 < i < j < len - 1`.
    pub fn new(graph: &'a GraphProblem, i: usize, j: usize) -> Self {
        debug_assert!(
            0 < i && i < j && j + 1 < graph.nodes().len(),
            "swap positions ({i}, {j}) out of range"
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
        if j == i + 1 {
            leg(g, i - 1, j) + leg(g, i, j + 1) - leg(g, i - 1, i) - leg(g, j, j + 1)
        } else {
            leg(g, i - 1, j) + leg(g, j, i + 1) + leg(g, j - 1, i) + leg(g, i, j + 1)
                - leg(g, i - 1, i)
                - leg(g, i, i + 1)
                - leg(g, j - 1, j)
                - leg(g, j, j + 1)
        }
    }

    /// The swapped tour.
    pub fn apply(&self) -> GraphProblem {
        let mut nodes = self.graph.nodes().to_vec();
        nodes.swap(self.i, self.j);
        GraphProblem::path(nodes, false, self.graph.metric())
    }

    /// Nodes moved by the swap.
    pub fn perturbation(&self) -> Perturbation {
        let nodes = self.graph.nodes();
        Perturbation {
            kind: MoveKind::Swap,
            nodes: vec![nodes[self.i].index, nodes[self.j].index],
            delta: self.delta(),
        }
    }
}
