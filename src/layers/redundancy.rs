//! RedundancyLayer: credits coverage of points another selected facility
//! already serves, weighted by the candidate's own risk. Backups matter
//! most in high-risk areas. The credit is scaled down when redundancy
//! planning is off.

use crate::config::ScoreWeights;
use crate::constants::*;
use crate::layer::*;

pub struct RedundancyLayer;

impl ScoreLayer for RedundancyLayer {
    fn name(&self) -> &str {
        "redundancy"
    }

    fn weight(&self, weights: &ScoreWeights) -> f64 {
        weights.redundancy
    }

    fn score(&self, context: &CandidateContext) -> f64 {
        let credit = context.overlap_fraction() * context.site_risk * REDUNDANCY_TERM_SCALE;

        if context.enable_redundancy {
            credit
        } else {
            credit * REDUNDANCY_DISABLED_SCALE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layers::test_support::*;

    #[test]
    fn credit_follows_overlap_and_mode() {
        let site = site();
        let coverage = coverage();
        let mut context = CandidateContext {
            site: &site,
            coverage: &coverage,
            overlap_population: 30_000,
            site_risk: 0.4,
            max_drive_time: 60.0,
            enable_redundancy: true,
        };

        // 0.5 overlap * 0.4 risk * 500
        assert!((RedundancyLayer.score(&context) - 100.0).abs() < 1e-9);

        context.enable_redundancy = false;
        assert!((RedundancyLayer.score(&context) - 20.0).abs() < 1e-9);

        context.overlap_population = 0;
        assert_eq!(RedundancyLayer.score(&context), 0.0);
    }
}
