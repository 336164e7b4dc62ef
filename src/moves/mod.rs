//! Tour neighbourhood moves.
//!
//! Every move works on a tour sequence whose first and last positions are
//! fixed (for a closed tour both hold the start node) and reports its
//! length change in O(1) before anything is rebuilt:
//!
//! - [`SwapMove`]: exchange two interior nodes
//! - [`TwoOptMove`]: reverse one segment
//! - [`ThreeOptMove`]: best of seven reconnections of three cuts
//! - [`DoubleBridgeMove`]: 4-opt segment exchange without reversal
//!
//! [`generate`] draws one neighbour according to a [`Descent`] policy and
//! is shared by hill climbing and simulated annealing.
//!
//! # Examples
//!
//! ```
//! use u_tsp::graph::{GraphProblem, Point};
//! use u_tsp::moves::{generate, Descent, MoveKind};
//! use u_tsp::random::create_rng;
//!
//! let points = [
//!     Point::new(0.0, 0.0),
//!     Point::new(1.0, 1.0),
//!     Point::new(0.0, 1.0),
//!     Point::new(1.0, 0.0),
//! ];
//! let tour = GraphProblem::from_points(&points).unwrap().ordered();
//! let mut rng = create_rng(Some(7));
//!
//! let mv = generate(&tour, MoveKind::TwoOpt, Descent::Steepest, &mut rng).unwrap();
//! let improved = mv.apply();
//! assert!((improved.costs() - 4.0).abs() < 1e-9);
//! ```

mod double_bridge;
mod swap;
mod three_opt;
mod two_opt;
mod types;

pub use double_bridge::DoubleBridgeMove;
pub use swap::SwapMove;
pub use three_opt::{Reconnection, ThreeOptMove};
pub use two_opt::TwoOptMove;
pub use types::{ensure_size, Descent, MoveKind};

pub(crate) use types::IMPROVEMENT_EPS;

use rand::Rng;

use crate::graph::GraphProblem;
use crate::state::Perturbation;

/// One evaluated neighbour of a tour.
#[derive(Debug, Clone, Copy)]
pub enum Move<'a> {
    /// Node swap.
    Swap(SwapMove<'a>),
    /// Segment reversal.
    TwoOpt(TwoOptMove<'a>),
    /// Three-cut reconnection.
    ThreeOpt(ThreeOptMove<'a>),
    /// Double bridge.
    DoubleBridge(DoubleBridgeMove<'a>),
}

impl<'a> Move<'a> {
    /// Move type.
    pub fn kind(&self) -> MoveKind {
        match self {
            Move::Swap(_) => MoveKind::Swap,
            Move::TwoOpt(_) => MoveKind::TwoOpt,
            Move::ThreeOpt(_) => MoveKind::ThreeOpt,
            Move::DoubleBridge(_) => MoveKind::DoubleBridge,
        }
    }

    /// Tour length change.
    pub fn delta(&self) -> f64 {
        match self {
            Move::Swap(m) => m.delta(),
            Move::TwoOpt(m) => m.delta(),
            Move::ThreeOpt(m) => m.delta(),
            Move::DoubleBridge(m) => m.delta(),
        }
    }

    /// Builds the neighbour tour. Its cost is recomputed from the new edges.
    pub fn apply(&self) -> GraphProblem {
        match self {
            Move::Swap(m) => m.apply(),
            Move::TwoOpt(m) => m.apply(),
            Move::ThreeOpt(m) => m.apply(),
            Move::DoubleBridge(m) => m.apply(),
        }
    }

    /// Cut points for visualisation.
    pub fn perturbation(&self) -> Perturbation {
        match self {
            Move::Swap(m) => m.perturbation(),
            Move::TwoOpt(m) => m.perturbation(),
            Move::ThreeOpt(m) => m.perturbation(),
            Move::DoubleBridge(m) => m.perturbation(),
        }
    }
}

/// Draws one neighbour of `graph`.
///
/// - [`Descent::Random`] picks random cut points and always returns a move,
///   improving or not.
/// - [`Descent::First`] scans cut points in nested ascending order and
///   returns the first improving move.
/// - [`Descent::Steepest`] scans everything and returns the most improving
///   move.
///
/// Returns `None` when a scan finds no improving move, or when the tour is
/// too short for `kind` (see [`ensure_size`]).
pub fn generate<'a, R: Rng>(
    graph: &'a GraphProblem,
    kind: MoveKind,
    descent: Descent,
    rng: &mut R,
) -> Option<Move<'a>> {
    let n = graph.nodes().len();
    if n < kind.min_positions() {
        return None;
    }
    match descent {
        Descent::Random => Some(random_move(graph, kind, rng)),
        Descent::First | Descent::Steepest => {
            let first = descent == Descent::First;
            match kind {
                MoveKind::Swap => scan(
                    (1..n - 2).flat_map(move |i| {
                        (i + 1..n - 1).map(move |j| Move::Swap(SwapMove::new(graph, i, j)))
                    }),
                    first,
                ),
                MoveKind::TwoOpt => scan(
                    (0..n - 3).flat_map(move |i| {
                        (i + 2..n - 1).map(move |j| Move::TwoOpt(TwoOptMove::new(graph, i, j)))
                    }),
                    first,
                ),
                MoveKind::ThreeOpt => scan(
                    (0..n - 3).flat_map(move |i| {
                        (i + 1..n - 2).flat_map(move |j| {
                            (j + 1..n - 1).map(move |k| {
                                Move::ThreeOpt(ThreeOptMove::evaluate(graph, i, j, k))
                            })
                        })
                    }),
                    first,
                ),
                MoveKind::DoubleBridge => scan(
                    (1..n - 4).flat_map(move |i| {
                        (i + 1..n - 3).flat_map(move |j| {
                            (j + 1..n - 2).flat_map(move |k| {
                                (k + 1..n - 1).map(move |l| {
                                    Move::DoubleBridge(DoubleBridgeMove::new(graph, i, j, k, l))
                                })
                            })
                        })
                    }),
                    first,
                ),
            }
        }
    }
}

fn random_move<'a, R: Rng>(graph: &'a GraphProblem, kind: MoveKind, rng: &mut R) -> Move<'a> {
    let n = graph.nodes().len();
    match kind {
        MoveKind::Swap => {
            let i = rng.random_range(1..n - 2);
            let j = rng.random_range(i + 1..n - 1);
            Move::Swap(SwapMove::new(graph, i, j))
        }
        MoveKind::TwoOpt => {
            // j >= i + 2 keeps the reversed segment longer than one node
            let i = rng.random_range(0..n - 3);
            let j = rng.random_range(i + 2..n - 1);
            Move::TwoOpt(TwoOptMove::new(graph, i, j))
        }
        MoveKind::ThreeOpt => {
            let i = rng.random_range(0..n - 3);
            let j = rng.random_range(i + 1..n - 2);
            let k = rng.random_range(j + 1..n - 1);
            Move::ThreeOpt(ThreeOptMove::evaluate(graph, i, j, k))
        }
        MoveKind::DoubleBridge => {
            let i = rng.random_range(1..n - 4);
            let j = rng.random_range(i + 1..n - 3);
            let k = rng.random_range(j + 1..n - 2);
            let l = rng.random_range(k + 1..n - 1);
            Move::DoubleBridge(DoubleBridgeMove::new(graph, i, j, k, l))
        }
    }
}

fn scan<'a>(candidates: impl Iterator<Item = Move<'a>>, first: bool) -> Option<Move<'a>> {
    let mut best: Option<(Move<'a>, f64)> = None;
    for mv in candidates {
        let delta = mv.delta();
        if delta >= -IMPROVEMENT_EPS {
            continue;
        }
        if first {
            return Some(mv);
        }
        match best {
            Some((_, best_delta)) if best_delta <= delta => {}
            _ => best = Some((mv, delta)),
        }
    }
    best.map(|(mv, _)| mv)
}
