//! Hill climbing.
//!
//! Strict local descent over one of the [`moves`](crate::moves)
//! neighbourhoods. The driver is a two-state machine: it keeps improving
//! while the generated neighbour is shorter than the incumbent and
//! terminates on the first neighbour that is not. Optional restarts climb
//! again from shuffled tours and keep the best local optimum.

mod config;
mod runner;

pub use config::HcConfig;
pub use runner::HcRunner;
