//! Optimizer tuning. Every field has a default, so a TOML file only needs
//! to name the values it changes.

use crate::constants::*;
use crate::error::*;
use serde::{Deserialize, Serialize};

/// Weights of the composite candidate score. They sum to 1.
#[derive(Copy, Clone, PartialEq, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreWeights {
    pub coverage: f64,
    pub risk_mitigation: f64,
    pub vulnerability: f64,
    pub accessibility: f64,
    pub infrastructure: f64,
    pub redundancy: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        ScoreWeights {
            coverage: 0.30,
            risk_mitigation: 0.25,
            vulnerability: 0.15,
            accessibility: 0.15,
            infrastructure: 0.10,
            redundancy: 0.05,
        }
    }
}

impl ScoreWeights {
    pub fn total(&self) -> f64 {
        self.coverage
            + self.risk_mitigation
            + self.vulnerability
            + self.accessibility
            + self.infrastructure
            + self.redundancy
    }
}

#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct OptimizerConfig {
    pub weights: ScoreWeights,
    /// Remaining candidates scored per greedy iteration (clamped to 30-50).
    pub candidate_pool_size: usize,
    /// Minimum spacing between selected facilities.
    pub exclusion_km: f64,
    /// Multiplier on `exclusion_km` when redundancy planning is enabled.
    pub redundancy_exclusion_factor: f64,
    pub refinement_passes: usize,
    /// Relative gain in aggregate score a swap must reach to be accepted.
    pub improvement_threshold: f64,
    pub refinement_min_km: f64,
    pub refinement_max_km: f64,
    /// Alternatives tried per facility per refinement pass.
    pub refinement_alternatives: usize,
    pub average_speed_kmh: f64,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        OptimizerConfig {
            weights: ScoreWeights::default(),
            candidate_pool_size: MAX_CANDIDATE_POOL,
            exclusion_km: 30.0,
            redundancy_exclusion_factor: 0.5,
            refinement_passes: MAX_REFINEMENT_PASSES,
            improvement_threshold: 0.05,
            refinement_min_km: 10.0,
            refinement_max_km: 50.0,
            refinement_alternatives: 5,
            average_speed_kmh: DEFAULT_AVERAGE_SPEED_KMH,
        }
    }
}

impl OptimizerConfig {
    pub fn from_toml_str(text: &str) -> PlannerResult<Self> {
        let config: OptimizerConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> PlannerResult<()> {
        non_negative("exclusion_km", self.exclusion_km)?;
        non_negative("redundancy_exclusion_factor", self.redundancy_exclusion_factor)?;
        non_negative("improvement_threshold", self.improvement_threshold)?;
        non_negative("refinement_min_km", self.refinement_min_km)?;
        non_negative("refinement_max_km", self.refinement_max_km)?;
        if self.refinement_min_km > self.refinement_max_km {
            return Err(PlannerError::Config(format!(
                "refinement band {}-{} km is empty",
                self.refinement_min_km, self.refinement_max_km
            )));
        }
        if !(self.average_speed_kmh > 0.0 && self.average_speed_kmh.is_finite()) {
            return Err(PlannerError::Config(format!(
                "average_speed_kmh must be positive, got {}",
                self.average_speed_kmh
            )));
        }
        Ok(())
    }

    pub fn effective_pool_size(&self) -> usize {
        self.candidate_pool_size
            .clamp(MIN_CANDIDATE_POOL, MAX_CANDIDATE_POOL)
    }

    pub fn effective_refinement_passes(&self) -> usize {
        self.refinement_passes.min(MAX_REFINEMENT_PASSES)
    }

    /// Exclusion distance for a run with or without redundancy planning.
    pub fn exclusion_distance(&self, enable_redundancy: bool) -> f64 {
        if enable_redundancy {
            self.exclusion_km * self.redundancy_exclusion_factor
        } else {
            self.exclusion_km
        }
    }
}

fn non_negative(name: &str, value: f64) -> PlannerResult<()> {
    if value >= 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(PlannerError::Config(format!(
            "{} must be a finite non-negative value, got {}",
            name, value
        )))
    }
}
