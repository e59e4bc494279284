use crate::config::ScoreWeights;
use crate::layer::*;

/// Credits covered residents weighted by their settlement's vulnerability.
pub struct VulnerabilityLayer;

impl ScoreLayer for VulnerabilityLayer {
    fn name(&self) -> &str {
        "vulnerability"
    }

    fn weight(&self, weights: &ScoreWeights) -> f64 {
        weights.vulnerability
    }

    fn score(&self, context: &CandidateContext) -> f64 {
        context.coverage.vulnerable_population_covered as f64
    }
}
