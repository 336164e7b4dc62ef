//! SA execution loop.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use rand::Rng;
use tracing::{debug, info, trace};

use super::config::{CoolingSchedule, InitialTemperature, SaConfig};
use crate::error::TspResult;
use crate::graph::GraphProblem;
use crate::moves::{ensure_size, generate, Descent};
use crate::nn::tour_length_bounds;
use crate::random::create_rng;
use crate::state::{GraphState, StateHistory};

/// Executes Simulated Annealing.
pub struct SaRunner;

impl SaRunner {
    /// Runs SA optimization from the instance order.
    ///
    /// The history holds the starting tour, one state per improvement of
    /// the best tour and a terminal state whose iteration is the number of
    /// completed phases.
    ///
    /// # Examples
    ///
    /// ```
    /// use u_tsp::graph::{GraphProblem, Point};
    /// use u_tsp::sa::{SaConfig, SaRunner};
    ///
    /// let crossed = GraphProblem::from_points(&[
    ///     Point::new(0.0, 0.0),
    ///     Point::new(1.0, 1.0),
    ///     Point::new(0.0, 1.0),
    ///     Point::new(1.0, 0.0),
    /// ])
    /// .unwrap();
    ///
    /// let history = SaRunner::run(&crossed, &SaConfig::default().with_seed(1)).unwrap();
    /// assert!((history.last().unwrap().distance() - 4.0).abs() < 1e-9);
    /// ```
    pub fn run(problem: &GraphProblem, config: &SaConfig) -> TspResult<StateHistory> {
        Self::run_with_cancel(problem, config, None)
    }

    /// Runs SA with an optional cancellation token, checked between phases.
    ///
    /// A cancelled run ends with an unsuccessful terminal state carrying the
    /// best tour so far and a "Cancelled" message.
    pub fn run_with_cancel(
        problem: &GraphProblem,
        config: &SaConfig,
        cancel: Option<Arc<AtomicBool>>,
    ) -> TspResult<StateHistory> {
        config.validate()?;
        let mut current = problem.ordered();
        ensure_size(&current, config.move_kind)?;

        let initial_temperature = match config.initial_temperature {
            InitialTemperature::Fixed(t) => t,
            InitialTemperature::Estimated => {
                let (shortest, longest) = tour_length_bounds(problem)?;
                longest - shortest
            }
        };
        config.check_start(initial_temperature)?;

        let phases = config.expected_phases(initial_temperature);
        let mut rng = create_rng(config.seed);

        info!(
            initial_temperature,
            min_temperature = config.min_temperature,
            phases,
            phase_length = config.phase_length,
            move_kind = %config.move_kind,
            nodes = current.node_count(),
            "simulated annealing started"
        );

        let mut history = StateHistory::new(current.distinct_nodes().to_vec());
        let mut current_cost = current.costs();
        let mut state = GraphState::initial(current.tour(), current_cost);
        state.temperature = initial_temperature;
        describe(&mut state);
        history.push(state.clone());

        let mut temperature = initial_temperature;
        let mut accepted_moves = 0usize;
        let mut improving_moves = 0usize;
        let mut completed = 0usize;
        let mut cancelled = false;

        for phase in 0..phases {
            if cancel.as_ref().is_some_and(|flag| flag.load(Ordering::Relaxed)) {
                cancelled = true;
                break;
            }

            for _ in 0..config.phase_length {
                let Some(mv) = generate(&current, config.move_kind, Descent::Random, &mut rng)
                else {
                    break;
                };
                let delta = mv.delta();

                // Metropolis acceptance criterion
                let accept = if delta <= 0.0 {
                    true
                } else {
                    let r: f64 = rng.random();
                    let accepted = r < (-delta / temperature).exp();
                    if accepted {
                        trace!(phase, delta, temperature, "worsening move accepted");
                    }
                    accepted
                };
                if !accept {
                    continue;
                }

                let perturbation = mv.perturbation();
                current = mv.apply();
                current_cost = current.costs();
                accepted_moves += 1;
                if delta < 0.0 {
                    improving_moves += 1;
                }

                if current_cost < state.distance {
                    state = state.advance();
                    state.path = current.tour();
                    state.distance = current_cost;
                    state.temperature = temperature;
                    state.iteration = phase;
                    state.perturbation = Some(perturbation);
                    describe(&mut state);
                    history.push(state.clone());
                }
            }

            debug!(
                phase,
                temperature,
                current = current_cost,
                best = state.distance,
                "phase finished"
            );
            temperature = cool(temperature, initial_temperature, config, phase);
            completed += 1;
        }

        let mut last = state.advance();
        last.temperature = temperature;
        last.iteration = completed;
        last.finished = true;
        last.success = !cancelled;
        last.set_message("Accepted Moves", accepted_moves);
        last.set_message("Improving Moves", improving_moves);
        if cancelled {
            last.set_message("Cancelled", true);
        }
        describe(&mut last);
        history.push(last);

        info!(
            distance = state.distance,
            phases = completed,
            final_temperature = temperature,
            accepted_moves,
            improving_moves,
            "simulated annealing finished"
        );
        Ok(history)
    }
}

fn describe(state: &mut GraphState) {
    state.describe();
    state.set_message("Temperature", format!("{:.6}", state.temperature));
}

/// Apply the cooling schedule to compute the next temperature.
fn cool(temperature: f64, initial: f64, config: &SaConfig, step: usize) -> f64 {
    match config.cooling {
        CoolingSchedule::Geometric { alpha } => temperature * alpha,

        CoolingSchedule::Linear { phases } => {
            let t = initial
                - (step + 1) as f64 * (initial - config.min_temperature) / phases as f64;
            t.max(config.min_temperature)
        }

        CoolingSchedule::LundyMees { beta } => temperature / (1.0 + beta * temperature),
    }
}
