//! Append-only run trajectory.
//!
//! Snapshots are stored as plain records: every path lives in one shared
//! arena and a record only keeps its range plus the scalar fields. A path
//! identical to the previous snapshot's reuses the same range.

use std::collections::BTreeMap;
use std::ops::Range;

use super::snapshot::{GraphState, Perturbation, PheromoneStats};
use crate::graph::Node;

#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
struct Record {
    path: Range<usize>,
    distance: f64,
    temperature: f64,
    iteration: usize,
    finished: bool,
    success: bool,
    messages: BTreeMap<String, String>,
    perturbation: Option<Perturbation>,
    pheromone: Option<PheromoneStats>,
}

/// Ordered sequence of snapshots produced by one run.
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StateHistory {
    nodes: Vec<Node>,
    paths: Vec<usize>,
    records: Vec<Record>,
}

impl StateHistory {
    /// Empty history over the given node set.
    pub fn new(nodes: Vec<Node>) -> Self {
        Self {
            nodes,
            paths: Vec::new(),
            records: Vec::new(),
        }
    }

    /// Appends a snapshot.
    pub fn push(&mut self, state: GraphState) {
        let reuse = self
            .records
            .last()
            .filter(|r| self.paths[r.path.clone()] == state.path[..])
            .map(|r| r.path.clone());

        let path = match reuse {
            Some(range) => range,
            None => {
                let start = self.paths.len();
                self.paths.extend_from_slice(&state.path);
                start..self.paths.len()
            }
        };

        self.records.push(Record {
            path,
            distance: state.distance,
            temperature: state.temperature,
            iteration: state.iteration,
            finished: state.finished,
            success: state.success,
            messages: state.messages,
            perturbation: state.perturbation,
            pheromone: state.pheromone,
        });
    }

    /// Node set of the instance.
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Number of snapshots.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether no snapshot was recorded.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Snapshot at `index`.
    pub fn get(&self, index: usize) -> Option<StateView<'_>> {
        self.records.get(index).map(|record| StateView {
            history: self,
            record,
        })
    }

    /// First snapshot.
    pub fn first(&self) -> Option<StateView<'_>> {
        self.get(0)
    }

    /// Last snapshot.
    pub fn last(&self) -> Option<StateView<'_>> {
        self.records.len().checked_sub(1).and_then(|i| self.get(i))
    }

    /// Snapshots in order.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = StateView<'_>> + '_ {
        self.records.iter().map(move |record| StateView {
            history: self,
            record,
        })
    }

    /// Distance of every snapshot, in order.
    pub fn cost_history(&self) -> Vec<f64> {
        self.records.iter().map(|r| r.distance).collect()
    }

    /// Number of path entries held by the arena.
    pub fn arena_len(&self) -> usize {
        self.paths.len()
    }
}

/// Borrowed view of one recorded snapshot.
#[derive(Debug, Clone, Copy)]
pub struct StateView<'a> {
    history: &'a StateHistory,
    record: &'a Record,
}

impl<'a> StateView<'a> {
    /// Tour as node indices.
    pub fn path(&self) -> &'a [usize] {
        &self.history.paths[self.record.path.clone()]
    }

    /// Consecutive node pairs of the tour.
    pub fn path_edges(&self) -> impl Iterator<Item = (usize, usize)> + 'a {
        self.path().windows(2).map(|w| (w[0], w[1]))
    }

    /// Tour length.
    pub fn distance(&self) -> f64 {
        self.record.distance
    }

    /// Annealing temperature.
    pub fn temperature(&self) -> f64 {
        self.record.temperature
    }

    /// Iteration counter.
    pub fn iteration(&self) -> usize {
        self.record.iteration
    }

    /// Whether this is a terminal snapshot.
    pub fn finished(&self) -> bool {
        self.record.finished
    }

    /// Whether the run produced a complete tour.
    pub fn success(&self) -> bool {
        self.record.success
    }

    /// Diagnostic messages.
    pub fn messages(&self) -> &'a BTreeMap<String, String> {
        &self.record.messages
    }

    /// Cut points of the producing move.
    pub fn perturbation(&self) -> Option<&'a Perturbation> {
        self.record.perturbation.as_ref()
    }

    /// Pheromone levels after this cycle.
    pub fn pheromone(&self) -> Option<PheromoneStats> {
        self.record.pheromone
    }

    /// Owned copy of the snapshot.
    pub fn to_state(&self) -> GraphState {
        GraphState {
            path: self.path().to_vec(),
            distance: self.record.distance,
            temperature: self.record.temperature,
            iteration: self.record.iteration,
            finished: self.record.finished,
            success: self.record.success,
            messages: self.record.messages.clone(),
            perturbation: self.record.perturbation.clone(),
            pheromone: self.record.pheromone,
        }
    }
}
