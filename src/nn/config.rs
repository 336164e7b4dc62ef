//! Nearest-neighbour configuration.

use std::fmt;
use std::str::FromStr;

use crate::error::{TspError, TspResult};

/// Which incident edge the greedy walk follows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Preference {
    /// Shortest edge to an unvisited node.
    #[default]
    Nearest,
    /// Longest edge to an unvisited node. Produces deliberately bad tours,
    /// used as an upper bound when estimating annealing temperatures.
    Farthest,
}

impl Preference {
    /// Whether tour length `candidate` beats `incumbent` under this
    /// preference.
    pub fn prefers(&self, candidate: f64, incumbent: f64) -> bool {
        match self {
            Preference::Nearest => candidate < incumbent,
            Preference::Farthest => candidate > incumbent,
        }
    }
}

impl fmt::Display for Preference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Preference::Nearest => f.write_str("nearest"),
            Preference::Farthest => f.write_str("farthest"),
        }
    }
}

impl FromStr for Preference {
    type Err = TspError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "nearest" | "shortest" => Ok(Preference::Nearest),
            "farthest" | "longest" => Ok(Preference::Farthest),
            other => Err(TspError::Config(format!("unknown preference '{other}'"))),
        }
    }
}

/// Configuration for nearest-neighbour construction.
///
/// # Examples
///
/// ```
/// use u_tsp::nn::{NnConfig, Preference};
///
/// let config = NnConfig::default()
///     .with_start(3)
///     .with_preference(Preference::Nearest)
///     .with_seed(7);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NnConfig {
    /// Start node index. `None` picks a random node.
    pub start: Option<usize>,

    /// Return to the start node once every node is visited.
    pub closed: bool,

    /// Edge choice at every step.
    pub preference: Preference,

    /// Run once from every node and keep the best result.
    pub multi_start: bool,

    /// Random seed for the start node choice.
    pub seed: Option<u64>,
}

impl Default for NnConfig {
    fn default() -> Self {
        Self {
            start: None,
            closed: true,
            preference: Preference::Nearest,
            multi_start: false,
            seed: None,
        }
    }
}

impl NnConfig {
    pub fn with_start(mut self, index: usize) -> Self {
        self.start = Some(index);
        self
    }

    pub fn with_closed(mut self, closed: bool) -> Self {
        self.closed = closed;
        self
    }

    pub fn with_preference(mut self, preference: Preference) -> Self {
        self.preference = preference;
        self
    }

    pub fn with_multi_start(mut self, multi_start: bool) -> Self {
        self.multi_start = multi_start;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Validates the configuration.
    ///
    /// A fixed start node conflicts with multi-start. Whether the start node
    /// exists depends on the instance and is checked by the runner.
    pub fn validate(&self) -> TspResult<()> {
        if self.multi_start && self.start.is_some() {
            return Err(TspError::Config(
                "multi-start runs from every node, a start node cannot be set".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = NnConfig::default();
        assert!(config.closed);
        assert_eq!(config.preference, Preference::Nearest);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_multi_start_with_start() {
        let config = NnConfig::default().with_start(0).with_multi_start(true);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_preference_ordering() {
        assert!(Preference::Nearest.prefers(1.0, 2.0));
        assert!(Preference::Farthest.prefers(2.0, 1.0));
        assert!(!Preference::Farthest.prefers(1.0, 1.0));
        assert_eq!("Longest".parse::<Preference>().ok(), Some(Preference::Farthest));
    }
}
