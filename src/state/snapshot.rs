//! Point-in-time run snapshot.

use std::collections::BTreeMap;

use crate::moves::MoveKind;

/// What the last move changed, for visualisation.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Perturbation {
    /// Move type that produced the tour.
    pub kind: MoveKind,
    /// Indices of the nodes at the cut points.
    pub nodes: Vec<usize>,
    /// Tour length change reported by the move.
    pub delta: f64,
}

/// Aggregate pheromone levels over all edges.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PheromoneStats {
    /// Sum over all edges.
    pub sum: f64,
    /// Lowest level.
    pub min: f64,
    /// Highest level.
    pub max: f64,
    /// Mean level.
    pub average: f64,
}

/// One step of a run.
///
/// Drivers produce the next snapshot with [`advance`](GraphState::advance)
/// and overwrite what changed; once pushed into a
/// [`StateHistory`](super::StateHistory) a snapshot is never modified.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GraphState {
    /// Current best tour as node indices. A closed tour ends on its start.
    pub path: Vec<usize>,
    /// Length of `path`.
    pub distance: f64,
    /// Annealing temperature, zero for the other algorithms.
    pub temperature: f64,
    /// Iteration, phase or cycle counter.
    pub iteration: usize,
    /// Set on the terminal snapshot.
    pub finished: bool,
    /// Whether the run produced a complete tour.
    pub success: bool,
    /// Human-readable diagnostics keyed by label.
    pub messages: BTreeMap<String, String>,
    /// Cut points of the move that produced this tour.
    pub perturbation: Option<Perturbation>,
    /// Pheromone levels after this ant colony cycle.
    pub pheromone: Option<PheromoneStats>,
}

impl GraphState {
    /// First snapshot of a run.
    pub fn initial(path: Vec<usize>, distance: f64) -> Self {
        Self {
            path,
            distance,
            ..Self::default()
        }
    }

    /// Copy for the next step. The perturbation belongs to a single step and
    /// is not carried over.
    pub fn advance(&self) -> Self {
        Self {
            perturbation: None,
            ..self.clone()
        }
    }

    /// Sets one diagnostic message.
    pub fn set_message(&mut self, key: &str, value: impl ToString) {
        self.messages.insert(key.to_string(), value.to_string());
    }

    /// Refreshes the messages every driver reports.
    pub(crate) fn describe(&mut self) {
        let route = route_string(&self.path);
        self.set_message("Iteration", self.iteration);
        self.set_message("Route", route);
        self.set_message("Distance", format!("{:.3}", self.distance));
    }

    /// Consecutive node pairs of the path.
    pub fn path_edges(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.path.windows(2).map(|w| (w[0], w[1]))
    }
}

/// Formats a path as `0-3-1-2-0`.
fn route_string(path: &[usize]) -> String {
    path.iter()
        .map(usize::to_string)
        .collect::<Vec<_>>()
        .join("-")
}
