//! A single ant of the colony.

use rand::Rng;

use super::pheromone::PheromoneTable;

/// Tour under construction, over node positions `0..n`.
///
/// Ants only read the pheromone table; the colony applies the updates.
#[derive(Debug, Clone)]
pub struct Ant {
    tour: Vec<usize>,
    unvisited: Vec<usize>,
    length: f64,
    scratch: Vec<(usize, f64)>,
}

impl Ant {
    /// Places a new ant on `start`, with every other position unvisited.
    pub fn new(start: usize, n: usize) -> Self {
        let mut tour = Vec::with_capacity(n + 1);
        tour.push(start);
        Self {
            tour,
            unvisited: (0..n).filter(|&p| p != start).collect(),
            length: 0.0,
            scratch: Vec::with_capacity(n),
        }
    }

    /// Position the ant currently stands on.
    pub fn current(&self) -> usize {
        self.tour[self.tour.len() - 1]
    }

    /// Positions visited so far, in order.
    pub fn tour(&self) -> &[usize] {
        &self.tour
    }

    /// Length of the tour built so far.
    pub fn length(&self) -> f64 {
        self.length
    }

    /// Whether every position has been visited.
    pub fn is_done(&self) -> bool {
        self.unvisited.is_empty()
    }

    /// Moves to `next` over an edge of length `distance`.
    pub fn visit(&mut self, next: usize, distance: f64) {
        if let Some(i) = self.unvisited.iter().position(|&p| p == next) {
            self.unvisited.remove(i);
        }
        self.tour.push(next);
        self.length += distance;
    }

    /// Returns to the start over an edge of length `distance`.
    pub fn close(&mut self, distance: f64) {
        let start = self.tour[0];
        self.tour.push(start);
        self.length += distance;
    }

    /// State transition rule.
    ///
    /// With probability `q0` the ant exploits the unvisited candidate with
    /// the largest `tau * eta^beta` (first on ties). Otherwise it samples
    /// a candidate proportionally to that product. `weights` holds
    /// `eta^beta` as an `n * n` matrix. `None` once every position is
    /// visited.
    pub fn choose_next<R: Rng>(
        &mut self,
        table: &PheromoneTable,
        weights: &[f64],
        q0: f64,
        rng: &mut R,
    ) -> Option<usize> {
        if self.unvisited.is_empty() {
            return None;
        }
        let n = table.len();
        let current = self.current();
        let attraction = |c: usize| table.get(current, c) * weights[current * n + c];

        let q: f64 = rng.random();
        if q <= q0 {
            let mut best = self.unvisited[0];
            let mut best_value = attraction(best);
            for &c in &self.unvisited[1..] {
                let value = attraction(c);
                if value > best_value {
                    best = c;
                    best_value = value;
                }
            }
            return Some(best);
        }

        // biased exploration
        self.scratch.clear();
        let mut total = 0.0;
        for &c in &self.unvisited {
            total += attraction(c);
            self.scratch.push((c, total));
        }
        let target = rng.random::<f64>() * total;
        self.scratch
            .iter()
            .find(|&&(_, cumulative)| target < cumulative)
            .or_else(|| self.scratch.last())
            .map(|&(c, _)| c)
    }
}
