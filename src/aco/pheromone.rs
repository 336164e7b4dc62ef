//! Shared pheromone memory.
//!
//! One owned table per colony. Ants read it while building tours; it is
//! written only by the local update after each ant and the global update
//! after each cycle, always in the same order.

use std::collections::HashMap;

use crate::graph::GraphProblem;
use crate::state::PheromoneStats;

/// Symmetric pheromone levels between node positions `0..n`.
#[derive(Debug, Clone, PartialEq)]
pub struct PheromoneTable {
    n: usize,
    initial: f64,
    levels: Vec<f64>,
}

impl PheromoneTable {
    /// Every pair starts at `initial`.
    pub fn new(n: usize, initial: f64) -> Self {
        Self {
            n,
            initial,
            levels: vec![initial; n * n],
        }
    }

    /// Number of node positions.
    pub fn len(&self) -> usize {
        self.n
    }

    /// Whether the table covers no nodes.
    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    /// Initial level `tau0`.
    pub fn initial(&self) -> f64 {
        self.initial
    }

    /// Level between positions `a` and `b`.
    #[inline]
    pub fn get(&self, a: usize, b: usize) -> f64 {
        self.levels[a * self.n + b]
    }

    #[inline]
    fn set(&mut self, a: usize, b: usize, level: f64) {
        self.levels[a * self.n + b] = level;
        self.levels[b * self.n + a] = level;
    }

    /// Local updating rule on every edge of `tour`:
    /// `tau = (1 - rho) * tau + rho * tau0`.
    pub fn local_update(&mut self, tour: &[usize], rho: f64) {
        for w in tour.windows(2) {
            let level = (1.0 - rho) * self.get(w[0], w[1]) + rho * self.initial;
            self.set(w[0], w[1], level);
        }
    }

    /// Global updating rule: every edge evaporates by `(1 - alpha)`, then
    /// the edges of `best` gain `alpha / best_length`.
    pub fn global_update(&mut self, best: &[usize], best_length: f64, alpha: f64) {
        for level in &mut self.levels {
            *level *= 1.0 - alpha;
        }
        let deposit = alpha / best_length;
        for w in best.windows(2) {
            let level = self.get(w[0], w[1]) + deposit;
            self.set(w[0], w[1], level);
        }
    }

    /// Sum, extremes and mean over all unordered pairs.
    pub fn stats(&self) -> PheromoneStats {
        let mut sum = 0.0;
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        let mut count = 0usize;
        for a in 0..self.n {
            for b in (a + 1)..self.n {
                let level = self.get(a, b);
                sum += level;
                min = min.min(level);
                max = max.max(level);
                count += 1;
            }
        }
        if count == 0 {
            return PheromoneStats {
                sum: 0.0,
                min: 0.0,
                max: 0.0,
                average: 0.0,
            };
        }
        PheromoneStats {
            sum,
            min,
            max,
            average: sum / count as f64,
        }
    }

    /// Copies the levels into `graph`'s edges.
    ///
    /// Position `p` is the `p`-th distinct node of `graph`.
    pub fn write_back(&self, graph: &mut GraphProblem) {
        let positions: HashMap<usize, usize> = graph
            .distinct_nodes()
            .iter()
            .enumerate()
            .map(|(p, node)| (node.index, p))
            .collect();
        for edge in graph.edges_mut() {
            if let (Some(&a), Some(&b)) = (positions.get(&edge.node1), positions.get(&edge.node2)) {
                if a < self.n && b < self.n {
                    edge.pheromone = self.get(a, b);
                }
            }
        }
    }
}
