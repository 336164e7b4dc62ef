//! Algorithm selection.
//!
//! [`Algorithm`] pairs each heuristic with its parameter struct so that a
//! caller (typically a command-line front end) can pick one at runtime and
//! drive it through a single entry point.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::time::Instant;

use tracing::info;

use crate::aco::{AcoConfig, AcoRunner};
use crate::error::{TspError, TspResult};
use crate::graph::GraphProblem;
use crate::hc::{HcConfig, HcRunner};
use crate::nn::{NnConfig, NnRunner};
use crate::sa::{CoolingSchedule, InitialTemperature, SaConfig, SaRunner};
use crate::state::{RunSummary, StateHistory};

/// Heuristic selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AlgorithmKind {
    NearestNeighbour,
    HillClimbing,
    SimulatedAnnealing,
    AntColony,
}

impl AlgorithmKind {
    /// Short name.
    pub fn as_str(&self) -> &'static str {
        match self {
            AlgorithmKind::NearestNeighbour => "nn",
            AlgorithmKind::HillClimbing => "hc",
            AlgorithmKind::SimulatedAnnealing => "sa",
            AlgorithmKind::AntColony => "aco",
        }
    }
}

impl fmt::Display for AlgorithmKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AlgorithmKind {
    type Err = TspError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace(['-', '_', ' '], "").as_str() {
            "nn" | "nearestneighbour" | "nearestneighbor" => Ok(AlgorithmKind::NearestNeighbour),
            "hc" | "hillclimbing" => Ok(AlgorithmKind::HillClimbing),
            "sa" | "simulatedannealing" | "annealing" => Ok(AlgorithmKind::SimulatedAnnealing),
            "aco" | "antcolony" | "antsystem" | "acs" => Ok(AlgorithmKind::AntColony),
            _ => Err(TspError::Config(format!("unknown algorithm '{s}'"))),
        }
    }
}

/// A heuristic together with its parameters.
///
/// # Examples
///
/// ```
/// use u_tsp::algorithm::Algorithm;
/// use u_tsp::graph::{GraphProblem, Point};
/// use u_tsp::hc::HcConfig;
///
/// let square = GraphProblem::from_points(&[
///     Point::new(0.0, 0.0),
///     Point::new(1.0, 1.0),
///     Point::new(0.0, 1.0),
///     Point::new(1.0, 0.0),
/// ])
/// .unwrap();
///
/// let algorithm = Algorithm::HillClimbing(HcConfig::default());
/// let summary = algorithm.run_summarized(&square, "square").unwrap();
/// assert!((summary.tour_length - 4.0).abs() < 1e-9);
/// assert_eq!(summary.heuristic, "hc");
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Algorithm {
    NearestNeighbour(NnConfig),
    HillClimbing(HcConfig),
    SimulatedAnnealing(SaConfig),
    AntColony(AcoConfig),
}

impl Algorithm {
    /// Default parameters for `kind`.
    pub fn with_defaults(kind: AlgorithmKind) -> Self {
        match kind {
            AlgorithmKind::NearestNeighbour => Algorithm::NearestNeighbour(NnConfig::default()),
            AlgorithmKind::HillClimbing => Algorithm::HillClimbing(HcConfig::default()),
            AlgorithmKind::SimulatedAnnealing => Algorithm::SimulatedAnnealing(SaConfig::default()),
            AlgorithmKind::AntColony => Algorithm::AntColony(AcoConfig::default()),
        }
    }

    pub fn kind(&self) -> AlgorithmKind {
        match self {
            Algorithm::NearestNeighbour(_) => AlgorithmKind::NearestNeighbour,
            Algorithm::HillClimbing(_) => AlgorithmKind::HillClimbing,
            Algorithm::SimulatedAnnealing(_) => AlgorithmKind::SimulatedAnnealing,
            Algorithm::AntColony(_) => AlgorithmKind::AntColony,
        }
    }

    pub fn validate(&self) -> TspResult<()> {
        match self {
            Algorithm::NearestNeighbour(config) => config.validate(),
            Algorithm::HillClimbing(config) => config.validate(),
            Algorithm::SimulatedAnnealing(config) => config.validate(),
            Algorithm::AntColony(config) => config.validate(),
        }
    }

    /// Runs the heuristic to completion.
    pub fn run(&self, problem: &GraphProblem) -> TspResult<StateHistory> {
        self.run_with_cancel(problem, None)
    }

    /// Runs the heuristic with an optional cancellation token.
    pub fn run_with_cancel(
        &self,
        problem: &GraphProblem,
        cancel: Option<Arc<AtomicBool>>,
    ) -> TspResult<StateHistory> {
        match self {
            Algorithm::NearestNeighbour(config) => NnRunner::run_with_cancel(problem, config, cancel),
            Algorithm::HillClimbing(config) => HcRunner::run_with_cancel(problem, config, cancel),
            Algorithm::SimulatedAnnealing(config) => {
                SaRunner::run_with_cancel(problem, config, cancel)
            }
            Algorithm::AntColony(config) => AcoRunner::run_with_cancel(problem, config, cancel),
        }
    }

    /// Runs the heuristic and condenses the result into one record.
    pub fn run_summarized(&self, problem: &GraphProblem, instance: &str) -> TspResult<RunSummary> {
        let started = Instant::now();
        let history = self.run(problem)?;
        let elapsed = started.elapsed();
        let summary = RunSummary::from_history(
            instance,
            self.kind().as_str(),
            self.parameters(),
            &history,
            elapsed,
        )
        .ok_or_else(|| TspError::Config(format!("{} produced no states", self.kind())))?;
        info!(
            instance,
            heuristic = %self.kind(),
            tour_length = summary.tour_length,
            elapsed_ms = elapsed.as_secs_f64() * 1e3,
            "run summarized"
        );
        Ok(summary)
    }

    /// Parameters as display strings, keyed by name.
    pub fn parameters(&self) -> BTreeMap<String, String> {
        let mut parameters = BTreeMap::new();
        let mut set = |key: &str, value: String| {
            parameters.insert(key.to_string(), value);
        };
        let seed = |seed: Option<u64>| seed.map_or_else(|| "random".to_string(), |s| s.to_string());

        match self {
            Algorithm::NearestNeighbour(c) => {
                set(
                    "start",
                    c.start.map_or_else(|| "random".to_string(), |s| s.to_string()),
                );
                set("closed", c.closed.to_string());
                set("preference", c.preference.to_string());
                set("multi_start", c.multi_start.to_string());
                set("seed", seed(c.seed));
            }
            Algorithm::HillClimbing(c) => {
                set("move", c.move_kind.to_string());
                set("descent", c.descent.to_string());
                set("restarts", c.restarts.to_string());
                set("seed", seed(c.seed));
            }
            Algorithm::SimulatedAnnealing(c) => {
                let initial = match c.initial_temperature {
                    InitialTemperature::Fixed(t) => t.to_string(),
                    InitialTemperature::Estimated => "estimated".to_string(),
                };
                set("initial_temperature", initial);
                set("min_temperature", c.min_temperature.to_string());
                let cooling = match c.cooling {
                    CoolingSchedule::Geometric { alpha } => format!("geometric({alpha})"),
                    CoolingSchedule::Linear { phases } => format!("linear({phases})"),
                    CoolingSchedule::LundyMees { beta } => format!("lundy-mees({beta})"),
                };
                set("cooling", cooling);
                set("phase_length", c.phase_length.to_string());
                set("move", c.move_kind.to_string());
                set("seed", seed(c.seed));
            }
            Algorithm::AntColony(c) => {
                set("ants", c.ant_count.to_string());
                set("cycles", c.cycles.to_string());
                set("alpha", c.alpha.to_string());
                set("rho", c.rho.to_string());
                set("beta", c.beta.to_string());
                set("q0", c.q0.to_string());
                set(
                    "break_when_paths_are_equal",
                    c.break_when_paths_are_equal.to_string(),
                );
                set("seed", seed(c.seed));
            }
        }
        parameters
    }
}
