//! Euclidean Travelling Salesman heuristics with replayable run histories.
//!
//! Provides four heuristics over one shared graph model:
//!
//! - **Nearest Neighbour (NN)**: greedy tour construction, single or
//!   multi-start; also used to seed the other heuristics.
//! - **Hill Climbing (HC)**: local search over swap, 2-opt, 3-opt and
//!   double-bridge moves under random, first-improvement or steepest
//!   descent, optionally restarted from shuffled tours.
//! - **Simulated Annealing (SA)**: random-move trajectory search with
//!   Metropolis acceptance and pluggable cooling schedules.
//! - **Ant Colony System (ACO)**: tour construction by a colony of ants
//!   sharing one pheromone table.
//!
//! Every move reports its length change in O(1), so local search and
//! annealing never recompute a whole tour to evaluate a neighbour.
//!
//! # Architecture
//!
//! Each heuristic lives in its own module with a builder-style config and a
//! unit runner whose `run` returns a [`StateHistory`]: an append-only log of
//! snapshots a caller can step through without re-executing the run.
//! [`Algorithm`] wraps the four configs for runtime selection.
//!
//! ```
//! use u_tsp::graph::{GraphProblem, Point};
//! use u_tsp::sa::{SaConfig, SaRunner};
//!
//! let problem = GraphProblem::from_points(&[
//!     Point::new(0.0, 0.0),
//!     Point::new(4.0, 0.0),
//!     Point::new(0.0, 3.0),
//!     Point::new(4.0, 3.0),
//!     Point::new(2.0, 5.0),
//! ])
//! .unwrap();
//!
//! let history = SaRunner::run(&problem, &SaConfig::default().with_seed(42)).unwrap();
//! for state in history.iter() {
//!     println!("{} {:.3}", state.iteration(), state.distance());
//! }
//! ```

pub mod aco;
pub mod algorithm;
pub mod error;
pub mod graph;
pub mod hc;
pub mod moves;
pub mod nn;
pub mod random;
pub mod sa;
pub mod state;

pub use algorithm::{Algorithm, AlgorithmKind};
pub use error::{TspError, TspResult};
pub use graph::GraphProblem;
pub use state::{GraphState, RunSummary, StateHistory};
