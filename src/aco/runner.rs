//! Ant Colony System execution loop.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::Rng;
use tracing::{debug, info};

use super::ant::Ant;
use super::config::AcoConfig;
use super::pheromone::PheromoneTable;
use crate::error::{TspError, TspResult};
use crate::graph::GraphProblem;
use crate::nn::{construct, Preference};
use crate::random::create_rng;
use crate::state::{GraphState, StateHistory};

/// Tours whose lengths differ by less than this count as equal.
const EQUAL_LENGTH_EPS: f64 = 1e-9;

/// Result of [`AcoRunner::run_detailed`].
#[derive(Debug, Clone)]
pub struct AcoOutcome {
    /// Per-cycle states.
    pub history: StateHistory,
    /// Complete graph carrying the final pheromone level on every edge.
    pub memory: GraphProblem,
}

/// Executes the Ant Colony System.
pub struct AcoRunner;

impl AcoRunner {
    /// Runs the colony.
    ///
    /// The history starts with the nearest-neighbour tour used to scale
    /// the initial pheromone, followed by one state per cycle carrying the
    /// global best tour.
    ///
    /// # Examples
    ///
    /// ```
    /// use u_tsp::aco::{AcoConfig, AcoRunner};
    /// use u_tsp::graph::{GraphProblem, Point};
    ///
    /// let square = GraphProblem::from_points(&[
    ///     Point::new(0.0, 0.0),
    ///     Point::new(1.0, 1.0),
    ///     Point::new(0.0, 1.0),
    ///     Point::new(1.0, 0.0),
    /// ])
    /// .unwrap();
    ///
    /// let config = AcoConfig::default().with_cycles(20).with_seed(7);
    /// let history = AcoRunner::run(&square, &config).unwrap();
    /// assert!((history.last().unwrap().distance() - 4.0).abs() < 1e-9);
    /// ```
    pub fn run(problem: &GraphProblem, config: &AcoConfig) -> TspResult<StateHistory> {
        Self::run_with_cancel(problem, config, None)
    }

    /// Runs the colony with an optional cancellation token, checked between
    /// cycles.
    ///
    /// A cancelled run ends with an unsuccessful terminal state carrying the
    /// best tour so far and a "Cancelled" message.
    pub fn run_with_cancel(
        problem: &GraphProblem,
        config: &AcoConfig,
        cancel: Option<Arc<AtomicBool>>,
    ) -> TspResult<StateHistory> {
        Ok(Self::run_detailed(problem, config, cancel)?.history)
    }

    /// Runs the colony and also returns the pheromone memory.
    pub fn run_detailed(
        problem: &GraphProblem,
        config: &AcoConfig,
        cancel: Option<Arc<AtomicBool>>,
    ) -> TspResult<AcoOutcome> {
        config.validate()?;
        let n = problem.node_count();
        if n < 2 {
            return Err(TspError::TooFewNodes {
                operation: "ant colony",
                required: 2,
                actual: n,
            });
        }

        let mut memory = problem.ordered();
        memory.reset();
        memory.connect_all_nodes()?;
        let mut rng = create_rng(config.seed);
        let colony = Colony::new(&memory, config, &mut rng)?;

        info!(
            ants = config.ant_count,
            cycles = config.cycles,
            alpha = config.alpha,
            rho = config.rho,
            beta = config.beta,
            q0 = config.q0,
            nodes = n,
            initial_pheromone = colony.table.initial(),
            nearest_neighbour = colony.best_length,
            "ant colony started"
        );

        let (history, table) = colony.run(config, &mut rng, cancel.as_deref());
        table.write_back(&mut memory);
        Ok(AcoOutcome { history, memory })
    }
}

/// Colony state shared by all ants of one run.
struct Colony {
    n: usize,
    indices: Vec<usize>,
    distances: Vec<f64>,
    weights: Vec<f64>,
    table: PheromoneTable,
    history: StateHistory,
    best: Vec<usize>,
    best_length: f64,
}

impl Colony {
    /// Seeds the pheromone from a nearest-neighbour tour of `memory`,
    /// which must be complete.
    fn new(memory: &GraphProblem, config: &AcoConfig, rng: &mut StdRng) -> TspResult<Self> {
        let nodes = memory.distinct_nodes();
        let n = nodes.len();
        let indices: Vec<usize> = nodes.iter().map(|node| node.index).collect();
        let positions: HashMap<usize, usize> =
            indices.iter().enumerate().map(|(p, &i)| (i, p)).collect();

        let mut distances = vec![0.0; n * n];
        let mut weights = vec![0.0; n * n];
        for a in 0..n {
            for b in 0..n {
                if a != b {
                    let d = memory.distance(&nodes[a], &nodes[b]);
                    distances[a * n + b] = d;
                    weights[a * n + b] = (1.0 / d).powf(config.beta);
                }
            }
        }

        let start = indices[rng.random_range(0..n)];
        let seed_tour = construct(memory, start, true, Preference::Nearest)?;
        let best: Vec<usize> = seed_tour
            .path
            .iter()
            .filter_map(|index| positions.get(index).copied())
            .collect();
        let best_length = seed_tour.length();

        let table = PheromoneTable::new(n, 1.0 / (n as f64 * best_length));
        let mut history = StateHistory::new(nodes.to_vec());

        let mut state = GraphState::initial(seed_tour.path, best_length);
        state.pheromone = Some(table.stats());
        describe(&mut state);
        history.push(state);

        Ok(Self {
            n,
            indices,
            distances,
            weights,
            table,
            history,
            best,
            best_length,
        })
    }

    fn run(
        mut self,
        config: &AcoConfig,
        rng: &mut StdRng,
        cancel: Option<&AtomicBool>,
    ) -> (StateHistory, PheromoneTable) {
        let mut completed = 0usize;
        let mut converged = false;

        for cycle in 1..=config.cycles {
            if cancel.is_some_and(|flag| flag.load(Ordering::Relaxed)) {
                break;
            }

            let ants = self.cycle(config, rng);
            let lengths: Vec<f64> = ants.iter().map(Ant::length).collect();
            let cycle_length = lengths[self.reinforce(&ants, config.alpha)];

            converged = config.break_when_paths_are_equal && all_equal(&lengths);
            completed = cycle;

            let mut state = self.snapshot(cycle);
            state.finished = converged || cycle == config.cycles;
            state.success = state.finished;
            state.set_message(
                "Ant Distances",
                lengths
                    .iter()
                    .map(|l| format!("{l:.2}"))
                    .collect::<Vec<_>>()
                    .join(";"),
            );
            state.set_message("Cycle Best", format!("{cycle_length:.3}"));
            self.history.push(state);

            debug!(
                cycle,
                cycle_best = cycle_length,
                best = self.best_length,
                converged,
                "cycle finished"
            );
            if converged {
                break;
            }
        }

        if completed < config.cycles && !converged {
            let mut last = self.snapshot(completed);
            last.finished = true;
            last.success = false;
            last.set_message("Cancelled", true);
            self.history.push(last);
        }

        info!(
            distance = self.best_length,
            cycles = completed,
            converged,
            "ant colony finished"
        );
        (self.history, self.table)
    }

    /// Lets every ant build a complete tour, applying the local update after
    /// each ant in order.
    fn cycle(&mut self, config: &AcoConfig, rng: &mut StdRng) -> Vec<Ant> {
        let mut starts: Vec<usize> = (0..self.n).collect();
        starts.shuffle(rng);

        let mut ants = Vec::with_capacity(config.ant_count);
        for k in 0..config.ant_count {
            let mut ant = Ant::new(starts[k % self.n], self.n);
            while let Some(next) = ant.choose_next(&self.table, &self.weights, config.q0, rng) {
                let distance = self.distances[ant.current() * self.n + next];
                ant.visit(next, distance);
            }
            let closing = self.distances[ant.current() * self.n + ant.tour()[0]];
            ant.close(closing);
            self.table.local_update(ant.tour(), config.rho);
            ants.push(ant);
        }
        ants
    }

    /// Applies the global update with the cycle's shortest tour and promotes
    /// it to the global best when shorter. Returns the index of that ant;
    /// ties keep the first.
    fn reinforce(&mut self, ants: &[Ant], alpha: f64) -> usize {
        let mut winner = 0;
        for (k, ant) in ants.iter().enumerate().skip(1) {
            if ant.length() < ants[winner].length() {
                winner = k;
            }
        }
        let cycle_best = &ants[winner];
        if cycle_best.length() < self.best_length {
            self.best = cycle_best.tour().to_vec();
            self.best_length = cycle_best.length();
        }
        self.table
            .global_update(cycle_best.tour(), cycle_best.length(), alpha);
        winner
    }

    /// State for the global best tour after `cycle`.
    fn snapshot(&self, cycle: usize) -> GraphState {
        let path = self.best.iter().map(|&p| self.indices[p]).collect();
        let mut state = GraphState::initial(path, self.best_length);
        state.iteration = cycle;
        state.pheromone = Some(self.table.stats());
        describe(&mut state);
        state
    }
}

fn all_equal(lengths: &[f64]) -> bool {
    lengths
        .windows(2)
        .all(|w| (w[0] - w[1]).abs() < EQUAL_LENGTH_EPS)
}

fn describe(state: &mut GraphState) {
    state.describe();
    if let Some(stats) = state.pheromone {
        state.set_message("Pheromones", format!("{:.6}", stats.sum));
        state.set_message("Highest Pheromone", format!("{:.6}", stats.max));
        state.set_message("Lowest Pheromone", format!("{:.6}", stats.min));
        state.set_message("Average Pheromone", format!("{:.6}", stats.average));
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::graph::Point;

    fn crossed_square() -> GraphProblem {
        GraphProblem::from_points(&[
            Point::new(0.0, 0.0),
            Point::new(1.0, 1.0),
            Point::new(0.0, 1.0),
            Point::new(1.0, 0.0),
        ])
        .unwrap()
    }

    fn scattered() -> GraphProblem {
        GraphProblem::from_points(&[
            Point::new(0.0, 0.0),
            Point::new(10.0, 1.0),
            Point::new(3.0, 7.0),
            Point::new(8.0, 8.0),
            Point::new(1.0, 4.0),
            Point::new(6.0, 2.0),
            Point::new(4.0, 9.0),
            Point::new(9.0, 5.0),
            Point::new(5.0, 5.0),
            Point::new(2.0, 1.0),
        ])
        .unwrap()
    }

    fn quick() -> AcoConfig {
        AcoConfig::default().with_ant_count(5).with_cycles(15)
    }

    #[test]
    fn test_aco_finds_square_perimeter() {
        let history = AcoRunner::run(&crossed_square(), &quick().with_seed(2)).unwrap();
        let last = history.last().unwrap();
        assert!(last.finished() && last.success());
        assert!((last.distance() - 4.0).abs() < 1e-9, "distance {}", last.distance());
        assert_eq!(last.path().first(), last.path().last(), "tour must be closed");
    }

    #[test]
    fn test_one_state_per_cycle() {
        let history = AcoRunner::run(&scattered(), &quick().with_seed(1)).unwrap();
        assert_eq!(history.len(), 16);
        assert_eq!(history.last().unwrap().iteration(), 15);
        assert!(history.iter().take(15).all(|s| !s.finished()));
    }

    #[test]
    fn test_break_when_paths_are_equal() {
        // every tour of a triangle has the same length
        let triangle = GraphProblem::from_points(&[
            Point::new(0.0, 0.0),
            Point::new(3.0, 0.0),
            Point::new(3.0, 4.0),
        ])
        .unwrap();
        let config = quick().with_break_when_paths_are_equal(true).with_seed(4);
        let history = AcoRunner::run(&triangle, &config).unwrap();
        assert_eq!(history.len(), 2, "run must stop after the first cycle");
        let last = history.last().unwrap();
        assert!(last.finished());
        assert!((last.distance() - 12.0).abs() < 1e-9);
    }

    #[test]
    fn test_best_distance_non_increasing() {
        let history = AcoRunner::run(&scattered(), &quick().with_seed(9)).unwrap();
        let costs = history.cost_history();
        assert!(costs.windows(2).all(|w| w[1] <= w[0]), "{costs:?}");
    }

    #[test]
    fn test_tours_visit_every_node_once() {
        let history = AcoRunner::run(&scattered(), &quick().with_seed(5)).unwrap();
        for state in history.iter() {
            let path = state.path();
            assert_eq!(path.len(), 11);
            let mut interior = path[..10].to_vec();
            interior.sort_unstable();
            assert_eq!(interior, (0..10).collect::<Vec<_>>());
        }
    }

    #[test]
    fn test_seeded_is_reproducible() {
        let a = AcoRunner::run(&scattered(), &quick().with_seed(13)).unwrap();
        let b = AcoRunner::run(&scattered(), &quick().with_seed(13)).unwrap();
        assert_eq!(a.cost_history(), b.cost_history());
        assert_eq!(a.last().unwrap().path(), b.last().unwrap().path());
    }

    #[test]
    fn test_pheromone_stats_reported() {
        let history = AcoRunner::run(&scattered(), &quick().with_seed(6)).unwrap();
        for state in history.iter() {
            let stats = state.pheromone().expect("every state carries pheromone stats");
            assert!(stats.min > 0.0 && stats.min <= stats.average && stats.average <= stats.max);
            assert!(state.messages().contains_key("Average Pheromone"));
        }
        let last = history.last().unwrap();
        let ants = last.messages()["Ant Distances"].split(';').count();
        assert_eq!(ants, 5);
    }

    #[test]
    fn test_run_detailed_writes_pheromone_back() {
        let outcome = AcoRunner::run_detailed(&scattered(), &quick().with_seed(8), None).unwrap();
        assert_eq!(outcome.memory.edges().len(), 45, "memory must be complete");
        assert!(outcome.memory.edges().iter().all(|e| e.pheromone > 0.0));
        let stats = outcome.history.last().unwrap().pheromone().unwrap();
        let max = outcome
            .memory
            .edges()
            .iter()
            .map(|e| e.pheromone)
            .fold(f64::NEG_INFINITY, f64::max);
        assert!((max - stats.max).abs() < 1e-12);
    }

    #[test]
    fn test_more_ants_than_nodes() {
        let config = quick().with_ant_count(9).with_seed(3);
        let history = AcoRunner::run(&crossed_square(), &config).unwrap();
        assert_eq!(
            history.last().unwrap().messages()["Ant Distances"].split(';').count(),
            9
        );
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = quick().with_rho(1.5);
        assert!(matches!(
            AcoRunner::run(&scattered(), &config),
            Err(TspError::Config(_))
        ));
    }

    #[test]
    fn test_single_node_rejected() {
        let single = GraphProblem::from_points(&[Point::new(1.0, 1.0)]).unwrap();
        assert!(matches!(
            AcoRunner::run(&single, &quick()),
            Err(TspError::TooFewNodes { .. })
        ));
    }

    #[test]
    fn test_global_update_reinforces_cycle_best() {
        let mut memory = scattered().ordered();
        memory.reset();
        memory.connect_all_nodes().unwrap();
        let config = quick();
        let mut rng = create_rng(Some(0));
        let mut colony = Colony::new(&memory, &config, &mut rng).unwrap();

        // a global best no ant can match, so reinforcing it would be visible
        let phantom: Vec<usize> = (0..colony.n).chain([0]).collect();
        colony.best = phantom.clone();
        colony.best_length = 1e-3;

        let ants = colony.cycle(&config, &mut rng);
        let before = colony.table.clone();
        let winner = colony.reinforce(&ants, config.alpha);

        let shortest = ants.iter().map(Ant::length).fold(f64::INFINITY, f64::min);
        assert_eq!(ants[winner].length(), shortest);
        assert_eq!(colony.best, phantom, "longer cycle best must not replace global best");

        let edges: HashSet<(usize, usize)> = ants[winner]
            .tour()
            .windows(2)
            .map(|w| (w[0].min(w[1]), w[0].max(w[1])))
            .collect();
        let deposit = config.alpha / shortest;
        for a in 0..colony.n {
            for b in (a + 1)..colony.n {
                let mut expected = (1.0 - config.alpha) * before.get(a, b);
                if edges.contains(&(a, b)) {
                    expected += deposit;
                }
                let actual = colony.table.get(a, b);
                assert!(
                    (actual - expected).abs() < 1e-12,
                    "edge ({a},{b}): expected {expected}, got {actual}"
                );
            }
        }
    }

    #[test]
    fn test_reinforce_promotes_shorter_cycle_best() {
        let mut memory = scattered().ordered();
        memory.reset();
        memory.connect_all_nodes().unwrap();
        let config = quick();
        let mut rng = create_rng(Some(3));
        let mut colony = Colony::new(&memory, &config, &mut rng).unwrap();
        colony.best_length = f64::INFINITY;

        let ants = colony.cycle(&config, &mut rng);
        let winner = colony.reinforce(&ants, config.alpha);
        assert_eq!(colony.best, ants[winner].tour());
        assert_eq!(colony.best_length, ants[winner].length());
    }

    #[test]
    fn test_cancelled_before_first_cycle() {
        let flag = Arc::new(AtomicBool::new(true));
        let history = AcoRunner::run_with_cancel(&scattered(), &quick(), Some(flag)).unwrap();
        assert_eq!(history.len(), 2);
        let last = history.last().unwrap();
        assert_eq!(last.iteration(), 0);
        assert!(last.finished());
        assert!(!last.success(), "cancelled run must not report success");
        assert_eq!(last.messages()["Cancelled"], "true");
    }
}
