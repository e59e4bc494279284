//! CoverageLayer: credits the population a candidate would serve.

use crate::config::ScoreWeights;
use crate::layer::*;

pub struct CoverageLayer;

impl ScoreLayer for CoverageLayer {
    fn name(&self) -> &str {
        "coverage"
    }

    fn weight(&self, weights: &ScoreWeights) -> f64 {
        weights.coverage
    }

    fn score(&self, context: &CandidateContext) -> f64 {
        context.coverage.total_population_covered as f64
    }
}
