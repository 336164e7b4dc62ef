//! SA configuration and cooling schedules.

use crate::error::{TspError, TspResult};
use crate::moves::MoveKind;

/// Cooling schedule for temperature reduction between phases.
///
/// # References
///
/// - Geometric: Kirkpatrick, Gelatt & Vecchi (1983)
/// - Linear: fixed-duration cooling
/// - LundyMees: Lundy & Mees (1986), with convergence proof
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CoolingSchedule {
    /// Geometric (exponential) cooling: `T_{k+1} = alpha * T_k`.
    ///
    /// Typical `alpha`: 0.9-0.99.
    Geometric {
        /// Cooling factor in (0, 1). Higher = slower cooling.
        alpha: f64,
    },

    /// Linear cooling: `T_k = T_0 - k * (T_0 - T_min) / phases`.
    Linear {
        /// Number of phases.
        phases: usize,
    },

    /// Lundy-Mees cooling: `T_{k+1} = T_k / (1 + beta * T_k)`.
    ///
    /// Cools fast at high T, slow at low T.
    LundyMees {
        /// Cooling parameter, positive.
        beta: f64,
    },
}

impl Default for CoolingSchedule {
    fn default() -> Self {
        CoolingSchedule::Geometric { alpha: 0.95 }
    }
}

/// Start temperature of an annealing run.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum InitialTemperature {
    /// Fixed value.
    Fixed(f64),

    /// Spread between the longest farthest-first and the shortest
    /// nearest-first multi-start tour of the instance.
    Estimated,
}

impl Default for InitialTemperature {
    fn default() -> Self {
        InitialTemperature::Fixed(100.0)
    }
}

/// Configuration for Simulated Annealing.
///
/// # Examples
///
/// ```
/// use u_tsp::moves::MoveKind;
/// use u_tsp::sa::{CoolingSchedule, InitialTemperature, SaConfig};
///
/// let config = SaConfig::default()
///     .with_initial_temperature(InitialTemperature::Fixed(100.0))
///     .with_min_temperature(0.01)
///     .with_cooling(CoolingSchedule::Geometric { alpha: 0.9 })
///     .with_phase_length(200)
///     .with_move_kind(MoveKind::TwoOpt);
/// assert_eq!(config.expected_phases(100.0), 88);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SaConfig {
    /// Start temperature. Higher values allow more exploration.
    pub initial_temperature: InitialTemperature,

    /// Minimum temperature. The run stops once T drops below it.
    pub min_temperature: f64,

    /// Cooling schedule.
    pub cooling: CoolingSchedule,

    /// Trials at each temperature level.
    pub phase_length: usize,

    /// Neighbourhood move; neighbours are always drawn at random.
    pub move_kind: MoveKind,

    /// Random seed for reproducibility.
    pub seed: Option<u64>,
}

impl Default for SaConfig {
    fn default() -> Self {
        Self {
            initial_temperature: InitialTemperature::default(),
            min_temperature: 1e-3,
            cooling: CoolingSchedule::default(),
            phase_length: 100,
            move_kind: MoveKind::TwoOpt,
            seed: None,
        }
    }
}

impl SaConfig {
    pub fn with_initial_temperature(mut self, t: InitialTemperature) -> Self {
        self.initial_temperature = t;
        self
    }

    pub fn with_min_temperature(mut self, t: f64) -> Self {
        self.min_temperature = t;
        self
    }

    pub fn with_cooling(mut self, cooling: CoolingSchedule) -> Self {
        self.cooling = cooling;
        self
    }

    pub fn with_phase_length(mut self, n: usize) -> Self {
        self.phase_length = n;
        self
    }

    pub fn with_move_kind(mut self, kind: MoveKind) -> Self {
        self.move_kind = kind;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Validates the configuration.
    ///
    /// An estimated start temperature is checked against the minimum when
    /// the run starts.
    pub fn validate(&self) -> TspResult<()> {
        if !(self.min_temperature > 0.0) {
            return Err(TspError::Config("min_temperature must be positive".into()));
        }
        if let InitialTemperature::Fixed(t) = self.initial_temperature {
            self.check_start(t)?;
        }
        if self.phase_length == 0 {
            return Err(TspError::Config("phase_length must be at least 1".into()));
        }
        match self.cooling {
            CoolingSchedule::Geometric { alpha } => {
                if !(alpha > 0.0 && alpha < 1.0) {
                    return Err(TspError::Config(format!(
                        "geometric alpha must be in (0, 1), got {alpha}"
                    )));
                }
            }
            CoolingSchedule::LundyMees { beta } => {
                if !(beta > 0.0) {
                    return Err(TspError::Config(format!(
                        "lundy-mees beta must be positive, got {beta}"
                    )));
                }
            }
            CoolingSchedule::Linear { phases } => {
                if phases == 0 {
                    return Err(TspError::Config("linear phases must be at least 1".into()));
                }
            }
        }
        Ok(())
    }

    /// Fails unless `initial` is a finite temperature above the minimum.
    pub(crate) fn check_start(&self, initial: f64) -> TspResult<()> {
        if !initial.is_finite() || initial <= self.min_temperature {
            return Err(TspError::Config(format!(
                "initial temperature {initial} must exceed min_temperature {}",
                self.min_temperature
            )));
        }
        Ok(())
    }

    /// Number of phases a run starting at `initial` performs.
    ///
    /// For geometric cooling this is `ceil(ln(T_min / T_0) / ln(alpha))`,
    /// independent of which moves are accepted.
    pub fn expected_phases(&self, initial: f64) -> usize {
        if initial <= self.min_temperature {
            return 0;
        }
        match self.cooling {
            CoolingSchedule::Geometric { alpha } => {
                let phases = ((self.min_temperature / initial).ln() / alpha.ln()).ceil();
                (phases as usize).max(1)
            }
            CoolingSchedule::Linear { phases } => phases,
            CoolingSchedule::LundyMees { beta } => {
                // 1/T_k = 1/T_0 + k * beta
                let steps = (1.0 / self.min_temperature - 1.0 / initial) / beta;
                steps.floor() as usize + 1
            }
        }
    }
}
