//! Hill-climbing configuration.

use crate::error::TspResult;
use crate::moves::{Descent, MoveKind};

/// Configuration for hill climbing.
///
/// # Examples
///
/// ```
/// use u_tsp::hc::HcConfig;
/// use u_tsp::moves::{Descent, MoveKind};
///
/// let config = HcConfig::default()
///     .with_move_kind(MoveKind::ThreeOpt)
///     .with_descent(Descent::First)
///     .with_restarts(4)
///     .with_seed(42);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HcConfig {
    /// Neighbourhood move.
    pub move_kind: MoveKind,

    /// How a neighbour is chosen.
    pub descent: Descent,

    /// Additional climbs from shuffled tours. 0 = a single climb from the
    /// instance order.
    pub restarts: usize,

    /// Random seed for random descent and restart shuffles.
    pub seed: Option<u64>,
}

impl Default for HcConfig {
    fn default() -> Self {
        Self {
            move_kind: MoveKind::TwoOpt,
            descent: Descent::Steepest,
            restarts: 0,
            seed: None,
        }
    }
}

impl HcConfig {
    pub fn with_move_kind(mut self, kind: MoveKind) -> Self {
        self.move_kind = kind;
        self
    }

    pub fn with_descent(mut self, descent: Descent) -> Self {
        self.descent = descent;
        self
    }

    pub fn with_restarts(mut self, restarts: usize) -> Self {
        self.restarts = restarts;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Validates the configuration.
    ///
    /// Every combination is accepted here; the instance size is checked
    /// against the move kind when the run starts.
    pub fn validate(&self) -> TspResult<()> {
        Ok(())
    }
}
