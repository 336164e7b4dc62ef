//! Move and descent selectors.

use std::fmt;
use std::str::FromStr;

use crate::error::{TspError, TspResult};
use crate::graph::GraphProblem;

/// Deltas above this are not treated as improvements.
pub(crate) const IMPROVEMENT_EPS: f64 = 1e-10;

/// Structural perturbation applied to a tour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MoveKind {
    /// Exchange two interior tour positions.
    Swap,
    /// Reverse the segment between two cut points.
    #[default]
    TwoOpt,
    /// Best reconnection of three cut points.
    ThreeOpt,
    /// Double-bridge 4-opt: `a1 b c d a2` becomes `a1 d c b a2`.
    DoubleBridge,
}

impl MoveKind {
    /// Minimum tour sequence length (closed tours count the start twice).
    pub fn min_positions(&self) -> usize {
        match self {
            MoveKind::Swap | MoveKind::TwoOpt | MoveKind::ThreeOpt => 4,
            MoveKind::DoubleBridge => 6,
        }
    }

    /// Minimum number of distinct nodes of a closed tour.
    pub fn min_nodes(&self) -> usize {
        self.min_positions() - 1
    }

    /// Label used in messages and summaries.
    pub fn as_str(&self) -> &'static str {
        match self {
            MoveKind::Swap => "swap",
            MoveKind::TwoOpt => "2-opt",
            MoveKind::ThreeOpt => "3-opt",
            MoveKind::DoubleBridge => "double-bridge",
        }
    }
}

impl fmt::Display for MoveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MoveKind {
    type Err = TspError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "swap" => Ok(MoveKind::Swap),
            "2-opt" | "2opt" | "twoopt" => Ok(MoveKind::TwoOpt),
            "3-opt" | "3opt" | "threeopt" => Ok(MoveKind::ThreeOpt),
            "double-bridge" | "doublebridge" | "4-opt" | "4opt" | "fouropt" => {
                Ok(MoveKind::DoubleBridge)
            }
            other => Err(TspError::Config(format!("unknown move type '{other}'"))),
        }
    }
}

/// Rule for choosing among candidate moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Descent {
    /// Uniform random cut points, accepted unconditionally.
    Random,
    /// Fixed nested scan, stop at the first improving move.
    First,
    /// Scan every candidate, keep the most improving move.
    #[default]
    Steepest,
}

impl Descent {
    /// Label used in messages and summaries.
    pub fn as_str(&self) -> &'static str {
        match self {
            Descent::Random => "random",
            Descent::First => "first",
            Descent::Steepest => "steepest",
        }
    }
}

impl fmt::Display for Descent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Descent {
    type Err = TspError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "random" => Ok(Descent::Random),
            "first" | "next" => Ok(Descent::First),
            "steepest" | "best" => Ok(Descent::Steepest),
            other => Err(TspError::Config(format!("unknown descent policy '{other}'"))),
        }
    }
}

/// Fails when `graph` is too short for `kind`.
pub fn ensure_size(graph: &GraphProblem, kind: MoveKind) -> TspResult<()> {
    if graph.nodes().len() < kind.min_positions() {
        return Err(TspError::TooFewNodes {
            operation: kind.as_str(),
            required: kind.min_nodes(),
            actual: graph.node_count(),
        });
    }
    Ok(())
}

/// Distance between the nodes at sequence positions `a` and `b`.
#[inline]
pub(crate) fn leg(graph: &GraphProblem, a: usize, b: usize) -> f64 {
    let nodes = graph.nodes();
    graph.distance(&nodes[a], &nodes[b])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Point;

    #[test]
    fn test_move_kind_round_trip() {
        for kind in [
            MoveKind::Swap,
            MoveKind::TwoOpt,
            MoveKind::ThreeOpt,
            MoveKind::DoubleBridge,
        ] {
            assert_eq!(kind.to_string().parse::<MoveKind>().ok(), Some(kind));
        }
        assert_eq!("FourOpt".parse::<MoveKind>().ok(), Some(MoveKind::DoubleBridge));
        assert!("or-opt".parse::<MoveKind>().is_err());
    }

    #[test]
    fn test_descent_parse() {
        assert_eq!("Next".parse::<Descent>().ok(), Some(Descent::First));
        assert_eq!("steepest".parse::<Descent>().ok(), Some(Descent::Steepest));
        assert!("greedy".parse::<Descent>().is_err());
    }

    #[test]
    fn test_ensure_size() {
        let square = GraphProblem::from_points(&[
            Point::new(0.0, 0.0),
            Point::new(0.0, 1.0),
            Point::new(1.0, 1.0),
            Point::new(1.0, 0.0),
        ])
        .unwrap()
        .ordered();
        assert!(ensure_size(&square, MoveKind::TwoOpt).is_ok());
        assert!(matches!(
            ensure_size(&square, MoveKind::DoubleBridge),
            Err(TspError::TooFewNodes {
                required: 5,
                actual: 4,
                ..
            })
        ));
    }
}
