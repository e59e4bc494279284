//! InfrastructureLayer: credits site access quality.

use crate::config::ScoreWeights;
use crate::constants::NORMALIZED_TERM_SCALE;
use crate::layer::*;

pub struct InfrastructureLayer;

impl ScoreLayer for InfrastructureLayer {
    fn name(&self) -> &str {
        "infrastructure"
    }

    fn weight(&self, weights: &ScoreWeights) -> f64 {
        weights.infrastructure
    }

    fn score(&self, context: &CandidateContext) -> f64 {
        context.site.infrastructure * NORMALIZED_TERM_SCALE
    }
}
