//! Run snapshots and their trajectory.
//!
//! Every driver records its run as a [`StateHistory`]: one immutable
//! snapshot at the start, one per improving step, and one at termination.
//! Callers step through a finished run by index without re-executing it.

mod history;
mod snapshot;
mod summary;

pub use history::{StateHistory, StateView};
pub use snapshot::{GraphState, Perturbation, PheromoneStats};
pub use summary::RunSummary;
