//! Hill-climbing execution.
//!
//! # Algorithm
//!
//! 1. Start from the instance order (restart 0) or a shuffled tour
//! 2. Generate one neighbour with the configured move and descent policy
//! 3. If the neighbour is shorter, replace the incumbent and go to 2
//! 4. Otherwise stop: the incumbent is a local optimum for the
//!    neighbourhood (or, under random descent, the first failed trial)
//!
//! There is no iteration cap; termination follows from strict descent.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use rand::rngs::StdRng;
use tracing::{debug, info};

use super::config::HcConfig;
use crate::error::TspResult;
use crate::graph::GraphProblem;
use crate::moves::{ensure_size, generate};
use crate::random::{create_rng, derive_seed, shuffle_interior};
use crate::state::{GraphState, Perturbation, StateHistory};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Improving,
    Terminated,
}

/// Final tour of one climb.
struct Climb {
    tour: GraphProblem,
    steps: usize,
    cancelled: bool,
}

/// Executes hill climbing.
pub struct HcRunner;

impl HcRunner {
    /// Runs hill climbing.
    ///
    /// A single climb records every improving step. With restarts, the
    /// history holds the starting tour, one state per restart that beat
    /// the best tour so far, and a terminal state.
    ///
    /// # Examples
    ///
    /// ```
    /// use u_tsp::graph::{GraphProblem, Point};
    /// use u_tsp::hc::{HcConfig, HcRunner};
    ///
    /// // instance order (0,0) -> (1,1) -> (0,1) -> (1,0) crosses itself
    /// let crossed = GraphProblem::from_points(&[
    ///     Point::new(0.0, 0.0),
    ///     Point::new(1.0, 1.0),
    ///     Point::new(0.0, 1.0),
    ///     Point::new(1.0, 0.0),
    /// ])
    /// .unwrap();
    ///
    /// let history = HcRunner::run(&crossed, &HcConfig::default()).unwrap();
    /// assert!((history.last().unwrap().distance() - 4.0).abs() < 1e-9);
    /// ```
    pub fn run(problem: &GraphProblem, config: &HcConfig) -> TspResult<StateHistory> {
        Self::run_with_cancel(problem, config, None)
    }

    /// Runs with an optional cancellation token.
    ///
    /// Cancellation stops before the next neighbour is generated. The
    /// incumbent is reported in an unsuccessful terminal state carrying a
    /// "Cancelled" message.
    pub fn run_with_cancel(
        problem: &GraphProblem,
        config: &HcConfig,
        cancel: Option<Arc<AtomicBool>>,
    ) -> TspResult<StateHistory> {
        config.validate()?;
        let initial = problem.ordered();
        ensure_size(&initial, config.move_kind)?;

        let base_seed = config.seed.unwrap_or_else(rand::random);
        info!(
            move_kind = %config.move_kind,
            descent = %config.descent,
            restarts = config.restarts,
            nodes = initial.node_count(),
            "hill climbing started"
        );

        let history = if config.restarts == 0 {
            climb_recorded(&initial, config, base_seed, cancel.as_deref())
        } else {
            climb_restarts(&initial, config, base_seed, cancel.as_deref())
        };

        if let Some(last) = history.last() {
            info!(
                distance = last.distance(),
                iteration = last.iteration(),
                "hill climbing finished"
            );
        }
        Ok(history)
    }
}

fn cancelled(cancel: Option<&AtomicBool>) -> bool {
    cancel.is_some_and(|flag| flag.load(Ordering::Relaxed))
}

/// Strict descent from `start`, reporting every accepted neighbour.
fn climb<F>(
    start: GraphProblem,
    config: &HcConfig,
    rng: &mut StdRng,
    cancel: Option<&AtomicBool>,
    mut on_step: F,
) -> Climb
where
    F: FnMut(&GraphProblem, Perturbation),
{
    let mut current = start;
    let mut steps = 0;
    let mut phase = Phase::Improving;
    let mut stopped = false;

    while phase == Phase::Improving {
        if cancelled(cancel) {
            stopped = true;
            break;
        }
        let neighbour = generate(&current, config.move_kind, config.descent, rng)
            .map(|mv| (mv.apply(), mv.perturbation()));

        phase = match neighbour {
            Some((next, perturbation)) if next.costs() < current.costs() => {
                current = next;
                steps += 1;
                on_step(&current, perturbation);
                Phase::Improving
            }
            _ => Phase::Terminated,
        };
    }

    Climb {
        tour: current,
        steps,
        cancelled: stopped,
    }
}

fn climb_recorded(
    initial: &GraphProblem,
    config: &HcConfig,
    base_seed: u64,
    cancel: Option<&AtomicBool>,
) -> StateHistory {
    let mut rng = create_rng(Some(derive_seed(base_seed, 0)));
    let mut history = StateHistory::new(initial.distinct_nodes().to_vec());

    let mut state = GraphState::initial(initial.tour(), initial.costs());
    state.describe();
    history.push(state.clone());

    let result = climb(initial.clone(), config, &mut rng, cancel, |tour, perturbation| {
        state = state.advance();
        state.path = tour.tour();
        state.distance = tour.costs();
        state.iteration += 1;
        debug!(
            iteration = state.iteration,
            distance = state.distance,
            delta = perturbation.delta,
            "hill climbing improved"
        );
        state.perturbation = Some(perturbation);
        state.describe();
        history.push(state.clone());
    });

    let mut last = state.advance();
    last.finished = true;
    last.success = !result.cancelled;
    last.set_message("Improving Steps", result.steps);
    last.set_message("Restarts", 0);
    if result.cancelled {
        last.set_message("Cancelled", true);
    }
    last.describe();
    history.push(last);
    history
}

fn climb_restarts(
    initial: &GraphProblem,
    config: &HcConfig,
    base_seed: u64,
    cancel: Option<&AtomicBool>,
) -> StateHistory {
    let run_one = |restart: usize| {
        let mut rng = create_rng(Some(derive_seed(base_seed, restart as u64)));
        let start = if restart == 0 {
            initial.clone()
        } else {
            let mut nodes = initial.nodes().to_vec();
            shuffle_interior(&mut nodes, &mut rng);
            GraphProblem::path(nodes, false, initial.metric())
        };
        climb(start, config, &mut rng, cancel, |_, _| {})
    };

    #[cfg(feature = "parallel")]
    let climbs: Vec<Climb> = (0..=config.restarts).into_par_iter().map(run_one).collect();
    #[cfg(not(feature = "parallel"))]
    let climbs: Vec<Climb> = (0..=config.restarts).map(run_one).collect();

    let mut history = StateHistory::new(initial.distinct_nodes().to_vec());
    let mut state = GraphState::initial(initial.tour(), initial.costs());
    state.describe();
    history.push(state.clone());

    for (restart, result) in climbs.iter().enumerate() {
        if result.tour.costs() >= state.distance {
            continue;
        }
        debug!(
            restart,
            distance = result.tour.costs(),
            steps = result.steps,
            "restart improved"
        );
        state = state.advance();
        state.path = result.tour.tour();
        state.distance = result.tour.costs();
        state.iteration = restart + 1;
        state.set_message("Restart", restart);
        state.describe();
        history.push(state.clone());
    }

    let interrupted = climbs.iter().any(|c| c.cancelled);
    let mut last = state.advance();
    last.finished = true;
    last.success = !interrupted;
    last.set_message("Improving Steps", climbs.iter().map(|c| c.steps).sum::<usize>());
    last.set_message("Restarts", config.restarts);
    if interrupted {
        last.set_message("Cancelled", true);
    }
    last.describe();
    history.push(last);
    history
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{Node, Point};
    use crate::moves::{Descent, MoveKind};

    fn crossed_square() -> GraphProblem {
        GraphProblem::from_points(&[
            Point::new(0.0, 0.0),
            Point::new(1.0, 1.0),
            Point::new(0.0, 1.0),
            Point::new(1.0, 0.0),
        ])
        .unwrap()
    }

    fn ring(count: usize) -> GraphProblem {
        // points on a circle, listed in a scrambled order
        let points: Vec<Point> = (0..count)
            .map(|i| {
                let k = (i * 7) % count;
                let angle = k as f64 / count as f64 * std::f64::consts::TAU;
                Point::new(100.0 * angle.cos(), 100.0 * angle.sin())
            })
            .collect();
        GraphProblem::from_points(&points).unwrap()
    }

    fn tour_of(history: &StateHistory, path: &[usize]) -> GraphProblem {
        let nodes: Vec<Node> = path
            .iter()
            .map(|&i| history.nodes().iter().find(|n| n.index == i).unwrap().clone())
            .collect();
        GraphProblem::path(nodes, false, crate::graph::Metric::Euclidean)
    }

    #[test]
    fn test_square_in_one_move() {
        let history = HcRunner::run(&crossed_square(), &HcConfig::default()).unwrap();
        // initial, one improving step, terminal
        assert_eq!(history.len(), 3);
        let step = history.get(1).unwrap();
        assert!((step.distance() - 4.0).abs() < 1e-9);
        assert_eq!(step.perturbation().map(|p| p.kind), Some(MoveKind::TwoOpt));
        let last = history.last().unwrap();
        assert!(last.finished() && last.success());
        assert_eq!(last.messages()["Improving Steps"], "1");
    }

    #[test]
    fn test_distance_never_increases() {
        for kind in [
            MoveKind::Swap,
            MoveKind::TwoOpt,
            MoveKind::ThreeOpt,
            MoveKind::DoubleBridge,
        ] {
            for descent in [Descent::Random, Descent::First, Descent::Steepest] {
                let config = HcConfig::default()
                    .with_move_kind(kind)
                    .with_descent(descent)
                    .with_seed(17);
                let history = HcRunner::run(&ring(12), &config).unwrap();
                let costs = history.cost_history();
                assert!(
                    costs.windows(2).all(|w| w[1] <= w[0]),
                    "{kind}/{descent}: {costs:?}"
                );
            }
        }
    }

    #[test]
    fn test_final_tour_is_local_optimum() {
        let mut rng = create_rng(Some(0));
        for kind in [MoveKind::Swap, MoveKind::TwoOpt, MoveKind::ThreeOpt] {
            for descent in [Descent::First, Descent::Steepest] {
                let config = HcConfig::default().with_move_kind(kind).with_descent(descent);
                let history = HcRunner::run(&ring(10), &config).unwrap();
                let last = history.last().unwrap();
                let tour = tour_of(&history, last.path());
                assert!((tour.costs() - last.distance()).abs() < 1e-9);
                if let Some(mv) = generate(&tour, kind, Descent::Steepest, &mut rng) {
                    assert!(mv.delta() >= -1e-9, "{kind}/{descent}: delta {}", mv.delta());
                }
            }
        }
    }

    #[test]
    fn test_two_opt_untangles_ring() {
        let ring = ring(16);
        let history = HcRunner::run(&ring, &HcConfig::default()).unwrap();
        let perimeter = 16.0 * 2.0 * 100.0 * (std::f64::consts::PI / 16.0).sin();
        let last = history.last().unwrap();
        assert!(
            (last.distance() - perimeter).abs() < 1e-6,
            "2-opt optimum of a convex ring is its perimeter, got {}",
            last.distance()
        );
    }

    #[test]
    fn test_seeded_random_descent_is_reproducible() {
        let config = HcConfig::default()
            .with_move_kind(MoveKind::Swap)
            .with_descent(Descent::Random)
            .with_seed(5);
        let a = HcRunner::run(&ring(12), &config).unwrap();
        let b = HcRunner::run(&ring(12), &config).unwrap();
        assert_eq!(a.cost_history(), b.cost_history());
    }

    #[test]
    fn test_restarts_never_worse_than_single_climb() {
        let base = HcConfig::default()
            .with_move_kind(MoveKind::Swap)
            .with_descent(Descent::First)
            .with_seed(8);
        let single = HcRunner::run(&ring(13), &base).unwrap();
        let multi = HcRunner::run(&ring(13), &base.clone().with_restarts(6)).unwrap();
        let single_best = single.last().unwrap().distance();
        let multi_best = multi.last().unwrap().distance();
        assert!(multi_best <= single_best + 1e-9, "{multi_best} > {single_best}");
        assert_eq!(multi.last().unwrap().messages()["Restarts"], "6");
    }

    #[test]
    fn test_too_few_nodes_for_double_bridge() {
        let config = HcConfig::default().with_move_kind(MoveKind::DoubleBridge);
        assert!(HcRunner::run(&crossed_square(), &config).is_err());
    }

    #[test]
    fn test_cancelled_run_reports_start() {
        let flag = Arc::new(AtomicBool::new(true));
        let history =
            HcRunner::run_with_cancel(&crossed_square(), &HcConfig::default(), Some(flag)).unwrap();
        assert_eq!(history.len(), 2);
        let last = history.last().unwrap();
        assert_eq!(last.path(), &[0, 1, 2, 3, 0]);
        assert!(last.finished());
        assert!(!last.success(), "a cancelled climb is not a local optimum");
        assert_eq!(last.messages()["Cancelled"], "true");
    }

    #[test]
    fn test_cancelled_restarts_are_unsuccessful() {
        let flag = Arc::new(AtomicBool::new(true));
        let config = HcConfig::default().with_restarts(3).with_seed(2);
        let history = HcRunner::run_with_cancel(&ring(10), &config, Some(flag)).unwrap();
        let last = history.last().unwrap();
        assert!(!last.success());
        assert_eq!(last.messages()["Cancelled"], "true");

        let finished = HcRunner::run(&ring(10), &config).unwrap();
        assert!(finished.last().unwrap().success());
        assert!(!finished.last().unwrap().messages().contains_key("Cancelled"));
    }
}
