//! 3-opt reconnection.
//!
//! Cutting after positions `i < j < k` splits the tour into
//! `A = [..=i]`, `B = [i+1..=j]`, `C = [j+1..=k]` and `D = [k+1..]`. Seven
//! non-identity reconnections re-join the segments; all of them keep `A`
//! and `D` in place. The move evaluates every reconnection in O(1) and keeps
//! the one with the lowest delta, the first one on ties.

use super::types::{leg, MoveKind};
use crate::graph::{GraphProblem, Node};
use crate::state::Perturbation;

/// Order in which segments `B` and `C` are re-joined between `A` and `D`.
///
/// A trailing `'` in the docs marks a reversed segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Reconnection {
    /// `A B' C D`
    ReverseB,
    /// `A B C' D`
    ReverseC,
    /// `A C B' D`
    ExchangeReverseB,
    /// `A C B D`
    Exchange,
    /// `A C' B' D`
    ExchangeReverseBoth,
    /// `A C' B D`
    ExchangeReverseC,
    /// `A B' C' D`
    ReverseBoth,
}

impl Reconnection {
    /// Every reconnection in evaluation order.
    pub const ALL: [Reconnection; 7] = [
        Reconnection::ReverseB,
        Reconnection::ReverseC,
        Reconnection::ExchangeReverseB,
        Reconnection::Exchange,
        Reconnection::ExchangeReverseBoth,
        Reconnection::ExchangeReverseC,
        Reconnection::ReverseBoth,
    ];
}

/// Best reconnection of one cut triple.
#[derive(Debug, Clone, Copy)]
pub struct ThreeOptMove<'a> {
    graph: &'a GraphProblem,
    i: usize,
    j: usize,
    k: usize,
    reconnection: Reconnection,
    delta: f64,
}

impl<'a> ThreeOptMove<'a> {
    /// Evaluates all reconnections of the cuts after `i < j < k < len - 1`.
    pub fn evaluate(graph: &'a GraphProblem, i: usize, j: usize, k: usize) -> Self {
        debug_assert!(
            i < j && j < k && k + 1 < graph.nodes().len(),
            "3-opt positions ({i}, {j}, {k}) out of range"
        );
        let mut best = Self {
            graph,
            i,
            j,
            k,
            reconnection: Reconnection::ReverseB,
            delta: f64::INFINITY,
        };
        for reconnection in Reconnection::ALL {
            let delta = Self::delta_of(graph, i, j, k, reconnection);
            if delta < best.delta {
                best.reconnection = reconnection;
                best.delta = delta;
            }
        }
        best
    }

    /// Tour length change of one reconnection.
    pub fn delta_of(
        graph: &GraphProblem,
        i: usize,
        j: usize,
        k: usize,
        reconnection: Reconnection,
    ) -> f64 {
        let d = |a, b| leg(graph, a, b);
        let (a, b1, b2, c1, c2, e) = (i, i + 1, j, j + 1, k, k + 1);
        let removed = d(a, b1) + d(b2, c1) + d(c2, e);
        let added = match reconnection {
            Reconnection::ReverseB => d(a, b2) + d(b1, c1) + d(c2, e),
            Reconnection::ReverseC => d(a, b1) + d(b2, c2) + d(c1, e),
            Reconnection::ExchangeReverseB => d(a, c1) + d(c2, b2) + d(b1, e),
            Reconnection::Exchange => d(a, c1) + d(c2, b1) + d(b2, e),
            Reconnection::ExchangeReverseBoth => d(a, c2) + d(c1, b2) + d(b1, e),
            Reconnection::ExchangeReverseC => d(a, c2) + d(c1, b1) + d(b2, e),
            Reconnection::ReverseBoth => d(a, b2) + d(b1, c2) + d(c1, e),
        };
        added - removed
    }

    /// Cut positions.
    pub fn positions(&self) -> (usize, usize, usize) {
        (self.i, self.j, self.k)
    }

    /// Chosen reconnection.
    pub fn reconnection(&self) -> Reconnection {
        self.reconnection
    }

    /// Tour length change of the chosen reconnection.
    pub fn delta(&self) -> f64 {
        self.delta
    }

    /// The reconnected tour.
    pub fn apply(&self) -> GraphProblem {
        let nodes = self.graph.nodes();
        let b = &nodes[self.i + 1..=self.j];
        let c = &nodes[self.j + 1..=self.k];
        // (segment, reversed) in tour order between A and D
        let middle: [(&[Node], bool); 2] = match self.reconnection {
            Reconnection::ReverseB => [(b, true), (c, false)],
            Reconnection::ReverseC => [(b, false), (c, true)],
            Reconnection::ExchangeReverseB => [(c, false), (b, true)],
            Reconnection::Exchange => [(c, false), (b, false)],
            Reconnection::ExchangeReverseBoth => [(c, true), (b, true)],
            Reconnection::ExchangeReverseC => [(c, true), (b, false)],
            Reconnection::ReverseBoth => [(b, true), (c, true)],
        };

        let mut joined = Vec::with_capacity(nodes.len());
        joined.extend_from_slice(&nodes[..=self.i]);
        for (segment, reversed) in middle {
            if reversed {
                joined.extend(segment.iter().rev().cloned());
            } else {
                joined.extend_from_slice(segment);
            }
        }
        joined.extend_from_slice(&nodes[self.k + 1..]);
        GraphProblem::path(joined, false, self.graph.metric())
    }

    /// Nodes at the three cuts.
    pub fn perturbation(&self) -> Perturbation {
        let nodes = self.graph.nodes();
        Perturbation {
            kind: MoveKind::ThreeOpt,
            nodes: vec![
                nodes[self.i].index,
                nodes[self.j].index,
                nodes[self.k].index,
            ],
            delta: self.delta,
        }
    }
}
