//! Ant colony configuration.

use crate::error::{TspError, TspResult};

/// Configuration for the Ant Colony System.
///
/// # Examples
///
/// ```
/// use u_tsp::aco::AcoConfig;
///
/// let config = AcoConfig::default()
///     .with_ant_count(20)
///     .with_cycles(200)
///     .with_beta(2.0)
///     .with_q0(0.9)
///     .with_break_when_paths_are_equal(true);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AcoConfig {
    /// Ants per cycle. More ants than nodes share start nodes.
    pub ant_count: usize,

    /// Maximum number of cycles.
    pub cycles: usize,

    /// Global pheromone decay in (0, 1).
    pub alpha: f64,

    /// Local pheromone decay in (0, 1).
    pub rho: f64,

    /// Weight of visibility (1/distance) against pheromone. Non-negative.
    pub beta: f64,

    /// Probability of exploiting the best edge instead of sampling, in
    /// [0, 1].
    pub q0: f64,

    /// Stop after the first cycle in which every ant found a tour of the
    /// same length.
    pub break_when_paths_are_equal: bool,

    /// Random seed for reproducibility.
    pub seed: Option<u64>,
}

impl Default for AcoConfig {
    fn default() -> Self {
        Self {
            ant_count: 10,
            cycles: 100,
            alpha: 0.1,
            rho: 0.1,
            beta: 2.0,
            q0: 0.9,
            break_when_paths_are_equal: false,
            seed: None,
        }
    }
}

impl AcoConfig {
    pub fn with_ant_count(mut self, n: usize) -> Self {
        self.ant_count = n;
        self
    }

    pub fn with_cycles(mut self, n: usize) -> Self {
        self.cycles = n;
        self
    }

    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    pub fn with_rho(mut self, rho: f64) -> Self {
        self.rho = rho;
        self
    }

    pub fn with_beta(mut self, beta: f64) -> Self {
        self.beta = beta;
        self
    }

    pub fn with_q0(mut self, q0: f64) -> Self {
        self.q0 = q0;
        self
    }

    pub fn with_break_when_paths_are_equal(mut self, enabled: bool) -> Self {
        self.break_when_paths_are_equal = enabled;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> TspResult<()> {
        if self.ant_count == 0 {
            return Err(TspError::Config("ant_count must be at least 1".into()));
        }
        if self.cycles == 0 {
            return Err(TspError::Config("cycles must be at least 1".into()));
        }
        if !(self.alpha > 0.0 && self.alpha < 1.0) {
            return Err(TspError::Config(format!(
                "alpha must be in (0, 1), got {}",
                self.alpha
            )));
        }
        if !(self.rho > 0.0 && self.rho < 1.0) {
            return Err(TspError::Config(format!(
                "rho must be in (0, 1), got {}",
                self.rho
            )));
        }
        if !(self.beta >= 0.0 && self.beta.is_finite()) {
            return Err(TspError::Config(format!(
                "beta must be finite and non-negative, got {}",
                self.beta
            )));
        }
        if !(0.0..=1.0).contains(&self.q0) {
            return Err(TspError::Config(format!(
                "q0 must be in [0, 1], got {}",
                self.q0
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AcoConfig::default();
        assert_eq!(config.ant_count, 10);
        assert_eq!(config.cycles, 100);
        assert!(!config.break_when_paths_are_equal);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_ranges() {
        let bad = [
            AcoConfig::default().with_ant_count(0),
            AcoConfig::default().with_cycles(0),
            AcoConfig::default().with_alpha(1.0),
            AcoConfig::default().with_rho(0.0),
            AcoConfig::default().with_beta(-0.5),
            AcoConfig::default().with_q0(1.5),
            AcoConfig::default().with_q0(f64::NAN),
        ];
        for config in bad {
            assert!(config.validate().is_err(), "{config:?} accepted");
        }
    }

    #[test]
    fn test_q0_bounds_are_inclusive() {
        assert!(AcoConfig::default().with_q0(0.0).validate().is_ok());
        assert!(AcoConfig::default().with_q0(1.0).validate().is_ok());
        assert!(AcoConfig::default().with_beta(0.0).validate().is_ok());
    }
}
