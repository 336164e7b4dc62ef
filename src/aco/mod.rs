//! Ant Colony System (ACS).
//!
//! A colony of ants builds tours over the complete graph, guided by a
//! shared pheromone table and by edge visibility (`1 / distance`). Each ant
//! picks its next node with the pseudo-random proportional rule: with
//! probability `q0` it takes the most attractive edge, otherwise it samples
//! proportionally to `tau * eta^beta`.
//!
//! Pheromone starts at `1 / (n * L_nn)` where `L_nn` is the length of a
//! nearest-neighbour tour. Updates happen in a fixed order:
//!
//! 1. after each ant completes its tour, the local rule pulls the levels
//!    on its edges back toward the initial value;
//! 2. after every ant of the cycle, the global rule evaporates all levels
//!    and reinforces the edges of the best tour found so far.
//!
//! Ants never write the table while building, so a seeded run is fully
//! reproducible.
//!
//! # References
//!
//! - Dorigo & Gambardella (1997), "Ant Colony System: A Cooperative Learning
//!   Approach to the Traveling Salesman Problem"

mod ant;
mod config;
mod pheromone;
mod runner;

pub use ant::Ant;
pub use config::AcoConfig;
pub use pheromone::PheromoneTable;
pub use runner::{AcoOutcome, AcoRunner};
