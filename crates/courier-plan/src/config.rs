//! Planner configuration.

use crate::{PlanError, PlanResult};

/// Which stop-ordering heuristic [`DeliveryPlanner`](crate::DeliveryPlanner)
/// runs before compiling a plan.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum OrderingStrategy {
    /// Deliver in the order given.
    Unchanged,
    /// Greedy closest-stop-first tour.
    #[default]
    NearestNeighbor,
    /// Randomized swap search from the given order.
    LocalSearch,
    /// Greedy tour refined by the swap search.
    NearestNeighborThenLocalSearch,
}

/// Tuning for [`LocalSearch`](crate::LocalSearch).
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct AnnealingConfig {
    /// Number of cooling passes.
    pub passes: u32,
    /// Swap proposals per pass.
    pub swaps_per_pass: u32,
    /// Starting heat as a fraction of the mean crow leg length.
    pub initial_heat: f64,
    /// Heat multiplier applied after each pass, `(0, 1]`.
    pub cooling: f64,
}

impl Default for AnnealingConfig {
    fn default() -> Self {
        Self {
            passes:         100,
            swaps_per_pass: 50,
            initial_heat:   0.5,
            cooling:        0.9,
        }
    }
}

impl AnnealingConfig {
    pub fn validate(&self) -> PlanResult<()> {
        if !(self.cooling > 0.0 && self.cooling <= 1.0) {
            return Err(PlanError::Config(format!(
                "annealing cooling must be in (0, 1], got {}",
                self.cooling
            )));
        }
        if !self.initial_heat.is_finite() || self.initial_heat < 0.0 {
            return Err(PlanError::Config(format!(
                "annealing initial_heat must be finite and non-negative, got {}",
                self.initial_heat
            )));
        }
        Ok(())
    }
}

/// Top-level planner settings.
///
/// # Example
///
/// ```rust
/// use courier_plan::{OrderingStrategy, PlannerConfig};
///
/// let config = PlannerConfig {
///     strategy: OrderingStrategy::LocalSearch,
///     seed: 7,
///     ..PlannerConfig::default()
/// };
/// assert!(config.validate().is_ok());
/// ```
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PlannerConfig {
    pub strategy:  OrderingStrategy,
    /// Master seed; every plan draws its own child generator from it.
    pub seed:      u64,
    pub annealing: AnnealingConfig,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            strategy:  OrderingStrategy::default(),
            seed:      0,
            annealing: AnnealingConfig::default(),
        }
    }
}

impl PlannerConfig {
    /// Check numeric settings.  Called by `DeliveryPlanner::new`.
    pub fn validate(&self) -> PlanResult<()> {
        self.annealing.validate()
    }
}
