//! Double-bridge 4-opt.
//!
//! Cuts before positions `i < j < k < l` split the tour into
//! `a1 = [..i]`, `b = [i..j]`, `c = [j..k]`, `d = [k..l]` and `a2 = [l..]`.
//! The move rejoins them as `a1 d c b a2` without reversing anything, which
//! 2-opt and 3-opt sequences cannot undo cheaply.
//!
//! # Reference
//!
//! Martin, O., Otto, S.W., Felten, E.W. (1991). "Large-step Markov chains
//! for the traveling salesman problem", *Complex Systems* 5(3), 299-326.

use super::types::{leg, MoveKind};
use crate::graph::GraphProblem;
use crate::state::Perturbation;

/// Double-bridge reconnection of four cut points.
#[derive(Debug, Clone, Copy)]
pub struct DoubleBridgeMove<'a> {
    graph: &'a GraphProblem,
    i: usize,
    j: usize,
    k: usize,
    l: usize,
}

impl<'a> DoubleBridgeMove<'a> {
    /// Cuts before positions `0 < i < j < k < l < len - 1`.
    pub fn new(graph: &'a GraphProblem, i: usize, j: usize, k: usize, l: usize) -> Self {
        debug_assert!(
            0 < i && i < j && j < k && k < l && l + 1 < graph.nodes().len(),
            "double-bridge positions ({i}, {j}, {k}, {l}) out of range"
        );
        Self { graph, i, j, k, l }
    }

    /// Cut positions.
    pub fn positions(&self) -> (usize, usize, usize, usize) {
        (self.i, self.j, self.k, self.l)
    }

    /// Tour length change.
    pub fn delta(&self) -> f64 {
        let (g, i, j, k, l) = (self.graph, self.i, self.j, self.k, self.l);
        let removed = leg(g, i - 1, i) + leg(g, j - 1, j) + leg(g, k - 1, k) + leg(g, l - 1, l);
        let added = leg(g, i - 1, k) + leg(g, l - 1, j) + leg(g, k - 1, i) + leg(g, j - 1, l);
        added - removed
    }

    /// The tour `a1 d c b a2`.
    pub fn apply(&self) -> GraphProblem {
        let nodes = self.graph.nodes();
        let mut joined = Vec::with_capacity(nodes.len());
        joined.extend_from_slice(&nodes[..self.i]);
        joined.extend_from_slice(&nodes[self.k..self.l]);
        joined.extend_from_slice(&nodes[self.j..self.k]);
        joined.extend_from_slice(&nodes[self.i..self.j]);
        joined.extend_from_slice(&nodes[self.l..]);
        GraphProblem::path(joined, false, self.graph.metric())
    }

    /// First node of each moved segment and of `a2`.
    pub fn perturbation(&self) -> Perturbation {
        let nodes = self.graph.nodes();
        Perturbation {
            kind: MoveKind::DoubleBridge,
            nodes: [self.i, self.j, self.k, self.l]
                .iter()
                .map(|&p| nodes[p].index)
                .collect(),
            delta: self.delta(),
        }
    }
}
