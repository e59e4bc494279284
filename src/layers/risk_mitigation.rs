//! RiskMitigationLayer: credits covered risk, weighted by the population it applies to.

use crate::config::ScoreWeights;
use crate::layer::*;

pub struct RiskMitigationLayer;

impl ScoreLayer for RiskMitigationLayer {
    fn name(&self) -> &str {
        "risk_mitigation"
    }

    fn weight(&self, weights: &ScoreWeights) -> f64 {
        weights.risk_mitigation
    }

    fn score(&self, context: &CandidateContext) -> f64 {
        context.coverage.total_risk_covered
    }
}
