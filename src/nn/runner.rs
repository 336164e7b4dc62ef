//! Nearest-neighbour execution.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use rand::Rng;
use tracing::{debug, info, warn};

use super::config::{NnConfig, Preference};
use crate::error::{TspError, TspResult};
use crate::graph::GraphProblem;
use crate::random::create_rng;
use crate::state::{GraphState, StateHistory};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Result of one greedy walk.
#[derive(Debug, Clone, PartialEq)]
pub struct Construction {
    /// Start node index.
    pub start: usize,

    /// Visited node indices in order. Ends on `start` when the tour was
    /// closed.
    pub path: Vec<usize>,

    /// Walk length after each entry of `path`.
    pub prefix_lengths: Vec<f64>,

    /// Whether every node was visited and, when requested, the tour closed.
    pub complete: bool,
}

impl Construction {
    /// Total walk length.
    pub fn length(&self) -> f64 {
        self.prefix_lengths.last().copied().unwrap_or(0.0)
    }
}

/// Executes nearest-neighbour construction.
pub struct NnRunner;

impl NnRunner {
    /// Builds one tour, or one per start node when `config.multi_start` is
    /// set.
    ///
    /// # Examples
    ///
    /// ```
    /// use u_tsp::graph::{GraphProblem, Point};
    /// use u_tsp::nn::{NnConfig, NnRunner};
    ///
    /// let square = GraphProblem::from_points(&[
    ///     Point::new(0.0, 0.0),
    ///     Point::new(0.0, 1.0),
    ///     Point::new(1.0, 1.0),
    ///     Point::new(1.0, 0.0),
    /// ])
    /// .unwrap();
    ///
    /// let history = NnRunner::run(&square, &NnConfig::default().with_start(0)).unwrap();
    /// let last = history.last().unwrap();
    /// assert!(last.success());
    /// assert!((last.distance() - 4.0).abs() < 1e-9);
    /// ```
    pub fn run(problem: &GraphProblem, config: &NnConfig) -> TspResult<StateHistory> {
        Self::run_with_cancel(problem, config, None)
    }

    /// Runs with an optional cancellation token.
    ///
    /// A cancelled walk ends with an unsuccessful terminal state.
    pub fn run_with_cancel(
        problem: &GraphProblem,
        config: &NnConfig,
        cancel: Option<Arc<AtomicBool>>,
    ) -> TspResult<StateHistory> {
        config.validate()?;
        ensure_nodes(problem)?;
        if config.multi_start {
            return Ok(run_multi_start(problem, config, cancel.as_deref()));
        }

        let start = match config.start {
            Some(index) => problem
                .node(index)
                .map(|n| n.index)
                .ok_or(TspError::MissingNode(index))?,
            None => {
                let mut rng = create_rng(config.seed);
                let nodes = problem.distinct_nodes();
                nodes[rng.random_range(0..nodes.len())].index
            }
        };

        info!(
            start,
            closed = config.closed,
            preference = %config.preference,
            nodes = problem.node_count(),
            "nearest neighbour started"
        );

        let adjacency = problem.adjacency();
        let construction = walk(
            problem,
            &adjacency,
            start,
            config.closed,
            config.preference,
            cancel.as_deref(),
        );

        info!(
            distance = construction.length(),
            success = construction.complete,
            "nearest neighbour finished"
        );
        Ok(trajectory(problem, &construction))
    }

    /// Runs once from every node and keeps the best complete tour: the
    /// shortest for [`Preference::Nearest`], the longest for
    /// [`Preference::Farthest`].
    ///
    /// The history holds an empty initial state, one state per improvement
    /// of the kept tour and a terminal state. `config.start` is ignored.
    pub fn multi_start(problem: &GraphProblem, config: &NnConfig) -> TspResult<StateHistory> {
        ensure_nodes(problem)?;
        Ok(run_multi_start(problem, config, None))
    }
}

/// Builds a single tour from `start` without recording a history.
pub fn construct(
    problem: &GraphProblem,
    start: usize,
    closed: bool,
    preference: Preference,
) -> TspResult<Construction> {
    ensure_nodes(problem)?;
    if problem.node(start).is_none() {
        return Err(TspError::MissingNode(start));
    }
    let adjacency = problem.adjacency();
    Ok(walk(problem, &adjacency, start, closed, preference, None))
}

/// Lengths of the shortest nearest-first and the longest farthest-first
/// closed tours over all start nodes.
///
/// Their difference is a cheap estimate of the spread of tour lengths.
pub fn tour_length_bounds(problem: &GraphProblem) -> TspResult<(f64, f64)> {
    ensure_nodes(problem)?;
    let adjacency = problem.adjacency();
    let best = |preference| {
        best_of(&walk_all(problem, &adjacency, true, preference, None), preference)
            .map(Construction::length)
            .ok_or_else(|| TspError::Config("no start node yields a complete tour".into()))
    };
    Ok((best(Preference::Nearest)?, best(Preference::Farthest)?))
}

fn ensure_nodes(problem: &GraphProblem) -> TspResult<()> {
    if problem.node_count() < 2 {
        return Err(TspError::TooFewNodes {
            operation: "nearest neighbour",
            required: 2,
            actual: problem.node_count(),
        });
    }
    Ok(())
}

fn walk(
    problem: &GraphProblem,
    adjacency: &HashMap<usize, Vec<usize>>,
    start: usize,
    closed: bool,
    preference: Preference,
    cancel: Option<&AtomicBool>,
) -> Construction {
    let edges = problem.edges();
    let total = problem.node_count();
    let incident = |node: usize| adjacency.get(&node).map(Vec::as_slice).unwrap_or(&[]);

    // visit markers go on a scratch copy; `problem` is shared across starts
    let mut scratch = problem.clone();
    scratch.reset();
    let slots: HashMap<usize, usize> = scratch
        .nodes()
        .iter()
        .enumerate()
        .map(|(p, n)| (n.index, p))
        .collect();
    let is_visited = |graph: &GraphProblem, node: usize| {
        slots
            .get(&node)
            .is_some_and(|&p| graph.nodes()[p].visited)
    };

    scratch.mark_visited(start);
    let mut visited = 1;
    let mut path = Vec::with_capacity(total + 1);
    let mut prefix_lengths = Vec::with_capacity(total + 1);
    path.push(start);
    prefix_lengths.push(0.0);

    let mut current = start;
    let mut length = 0.0;
    let mut cancelled = false;

    while visited < total {
        if cancel.is_some_and(|flag| flag.load(Ordering::Relaxed)) {
            cancelled = true;
            break;
        }

        // ties keep the first edge in adjacency order
        let next = incident(current)
            .iter()
            .filter_map(|&e| {
                let edge = &edges[e];
                let other = edge.opposite(current)?;
                (!is_visited(&scratch, other)).then_some((other, edge.distance()))
            })
            .fold(None, |best: Option<(usize, f64)>, candidate| match best {
                Some((_, d)) if !preference.prefers(candidate.1, d) => best,
                _ => Some(candidate),
            });

        let Some((node, distance)) = next else {
            warn!(start, visited, total, "nearest neighbour walk got stuck");
            break;
        };
        scratch.mark_visited(node);
        visited += 1;
        length += distance;
        path.push(node);
        prefix_lengths.push(length);
        current = node;
    }

    let mut complete = visited == total && !cancelled;
    if complete && closed {
        match incident(current)
            .iter()
            .map(|&e| &edges[e])
            .find(|e| e.is_between(current, start))
        {
            Some(edge) => {
                length += edge.distance();
                path.push(start);
                prefix_lengths.push(length);
            }
            None => {
                warn!(start, last = current, "no edge closes the nearest neighbour tour");
                complete = false;
            }
        }
    }

    Construction {
        start,
        path,
        prefix_lengths,
        complete,
    }
}

fn walk_all(
    problem: &GraphProblem,
    adjacency: &HashMap<usize, Vec<usize>>,
    closed: bool,
    preference: Preference,
    cancel: Option<&AtomicBool>,
) -> Vec<Construction> {
    let starts: Vec<usize> = problem.distinct_nodes().iter().map(|n| n.index).collect();

    #[cfg(feature = "parallel")]
    let iter = starts.par_iter();
    #[cfg(not(feature = "parallel"))]
    let iter = starts.iter();

    iter.map(|&start| walk(problem, adjacency, start, closed, preference, cancel))
        .collect()
}

fn best_of(constructions: &[Construction], preference: Preference) -> Option<&Construction> {
    constructions
        .iter()
        .filter(|c| c.complete)
        .fold(None, |best, c| match best {
            Some(b) if !preference.prefers(c.length(), b.length()) => best,
            _ => Some(c),
        })
}

fn trajectory(problem: &GraphProblem, construction: &Construction) -> StateHistory {
    let mut history = StateHistory::new(problem.distinct_nodes().to_vec());
    let mut state = GraphState::default();
    state.set_message("Start Node", construction.start);

    let last = construction.path.len() - 1;
    for (step, (&node, &length)) in construction
        .path
        .iter()
        .zip(&construction.prefix_lengths)
        .enumerate()
    {
        state.path.push(node);
        state.distance = length;
        state.iteration = step;
        if step == last {
            state.finished = true;
            state.success = construction.complete;
        }
        state.describe();
        history.push(state.clone());
    }
    history
}

fn run_multi_start(
    problem: &GraphProblem,
    config: &NnConfig,
    cancel: Option<&AtomicBool>,
) -> StateHistory {
    info!(
        closed = config.closed,
        preference = %config.preference,
        nodes = problem.node_count(),
        "nearest neighbour multi-start started"
    );

    let adjacency = problem.adjacency();
    let constructions = walk_all(problem, &adjacency, config.closed, config.preference, cancel);

    let mut history = StateHistory::new(problem.distinct_nodes().to_vec());
    let mut state = GraphState::default();
    state.set_message("Preference", config.preference);
    history.push(state.clone());

    let mut best: Option<&Construction> = None;
    for (ordinal, construction) in constructions.iter().enumerate() {
        if !construction.complete {
            continue;
        }
        if best.is_some_and(|b| !config.preference.prefers(construction.length(), b.length())) {
            continue;
        }
        best = Some(construction);
        debug!(
            start = construction.start,
            distance = construction.length(),
            "multi-start improved"
        );

        state.path.clone_from(&construction.path);
        state.distance = construction.length();
        state.iteration = ordinal + 1;
        state.set_message("Start Node", construction.start);
        state.describe();
        history.push(state.clone());
    }

    state.iteration = constructions.len();
    state.finished = true;
    state.success = best.is_some();
    state.describe();
    history.push(state);

    info!(
        distance = best.map_or(f64::NAN, Construction::length),
        starts = constructions.len(),
        "nearest neighbour multi-start finished"
    );
    history
}
