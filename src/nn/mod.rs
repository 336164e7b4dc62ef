//! Nearest-neighbour construction.
//!
//! Starting from one node, the walk repeatedly follows the shortest edge to
//! an unvisited node and finally returns to the start. The walk only uses
//! edges present in the graph, so on a sparse graph it may get stuck or
//! find no closing edge; both end the run with an unsuccessful terminal
//! state rather than an error.
//!
//! The multi-start variant runs once from every node. With
//! [`Preference::Farthest`] it produces deliberately long tours, which
//! bound the spread of tour lengths for annealing temperature estimates.
//!
//! # Reference
//!
//! Rosenkrantz, D.J., Stearns, R.E., Lewis, P.M. (1977). "An analysis of
//! several heuristics for the traveling salesman problem", *SIAM Journal on
//! Computing* 6(3), 563-581.

mod config;
mod runner;

pub use config::{NnConfig, Preference};
pub use runner::{construct, tour_length_bounds, Construction, NnRunner};
