//! Graph model.
//!
//! Nodes carry a stable index and a 2-D position; edges carry the metric
//! distance between their endpoints, an auxiliary value from the text
//! format, and a pheromone level used only by the ant colony.
//!
//! A [`GraphProblem`] is either a complete graph (the instance) or a path
//! graph (a tour over it). Every algorithm reads the same model.

mod problem;
mod text;
mod types;

pub use problem::GraphProblem;
pub use types::{Edge, Metric, Node, Point};
