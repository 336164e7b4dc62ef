//! Simulated Annealing (SA).
//!
//! A single-tour trajectory search that accepts worsening moves with a
//! probability that decreases over time (temperature), allowing the search
//! to escape local optima. Each phase runs a fixed number of random-move
//! trials at one temperature; the temperature then drops according to the
//! cooling schedule until it falls below the minimum.
//!
//! The best tour is tracked separately from the current accepted tour, so
//! the recorded distance never increases.
//!
//! # References
//!
//! - Kirkpatrick, Gelatt & Vecchi (1983), "Optimization by Simulated Annealing"
//! - Cerny (1985), "Thermodynamical Approach to the Travelling Salesman Problem"
//! - Lundy & Mees (1986), "Convergence of an Annealing Algorithm"

mod config;
mod runner;

pub use config::{CoolingSchedule, InitialTemperature, SaConfig};
pub use runner::SaRunner;
