//! AccessibilityLayer: how far below the drive-time limit the average
//! covered resident is.
//!
//! ```text
//! accessibility = clamp01((maxDriveTime - avgDriveTime) / maxDriveTime)
//! ```

use crate::config::ScoreWeights;
use crate::constants::NORMALIZED_TERM_SCALE;
use crate::layer::*;

pub struct AccessibilityLayer;

pub fn accessibility(avg_drive_time: f64, max_drive_time: f64) -> f64 {
    if max_drive_time > 0.0 {
        ((max_drive_time - avg_drive_time) / max_drive_time).clamp(0.0, 1.0)
    } else {
        0.0
    }
}

impl ScoreLayer for AccessibilityLayer {
    fn name(&self) -> &str {
        "accessibility"
    }

    fn weight(&self, weights: &ScoreWeights) -> f64 {
        weights.accessibility
    }

    fn score(&self, context: &CandidateContext) -> f64 {
        accessibility(context.coverage.avg_drive_time_min, context.max_drive_time)
            * NORMALIZED_TERM_SCALE
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layers::test_support::*;

    #[test]
    fn accessibility_is_clamped() {
        assert_eq!(accessibility(0.0, 60.0), 1.0);
        assert_eq!(accessibility(30.0, 60.0), 0.5);
        assert_eq!(accessibility(90.0, 60.0), 0.0);
        assert_eq!(accessibility(10.0, 0.0), 0.0);
    }

    #[test]
    fn scaled_to_people_equivalents() {
        let site = site();
        let coverage = coverage();
        let context = CandidateContext {
            site: &site,
            coverage: &coverage,
            overlap_population: 0,
            site_risk: 0.2,
            max_drive_time: 60.0,
            enable_redundancy: true,
        };
        assert!((AccessibilityLayer.score(&context) - 750.0).abs() < 1e-9);
    }
}
