//! CandidateScorer: the composite score of one candidate given the
//! facilities already selected.
//!
//! A candidate's reach (the points it serves, its drive times and its
//! capacity check) does not depend on the selection, so a rejection is
//! final for the run. Only the redundancy term changes as facilities are
//! added.

use crate::config::ScoreWeights;
use crate::constants::UTILIZATION_BONUS;
use crate::coverage::*;
use crate::drive_time::DriveTimeEstimator;
use crate::layer::*;
use crate::pipeline::analysis::*;
use crate::region_data::DemandPoint;
use crate::scoring::*;
use serde::{Deserialize, Serialize};

/// Hard constraints of a run.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Constraints {
    pub max_drive_time: f64,
    pub min_capacity: u32,
    pub enable_redundancy: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Rejection {
    /// No demand point is reachable within the radius and drive-time limit.
    NoCoverage,
    /// Average drive time to the points inside the radius exceeds the limit.
    DriveTime { avg_drive_time: f64 },
    Capacity { capacity: u32 },
}

#[derive(Clone, Debug)]
pub struct CandidateEvaluation {
    pub site_index: usize,
    pub served: Vec<ServedPoint>,
    pub coverage: SiteCoverage,
    pub overlap_population: u64,
    pub utilization: f64,
    pub composite: CompositeScore,
}

impl CandidateEvaluation {
    pub fn score(&self) -> f64 {
        self.composite.total()
    }
}

pub struct CandidateScorer<'a> {
    points: &'a [DemandPoint],
    analysis: &'a AnalysisOutput,
    weights: &'a ScoreWeights,
    layers: &'a [Box<dyn ScoreLayer>],
    constraints: Constraints,
}

impl<'a> CandidateScorer<'a> {
    pub fn new(
        points: &'a [DemandPoint],
        analysis: &'a AnalysisOutput,
        weights: &'a ScoreWeights,
        layers: &'a [Box<dyn ScoreLayer>],
        constraints: Constraints,
    ) -> Self {
        CandidateScorer {
            points,
            analysis,
            weights,
            layers,
            constraints,
        }
    }

    pub fn analysis(&self) -> &AnalysisOutput {
        self.analysis
    }

    pub fn points(&self) -> &[DemandPoint] {
        self.points
    }

    pub fn constraints(&self) -> &Constraints {
        &self.constraints
    }

    /// Points the candidate serves, or why it can never be selected.
    pub fn reach(
        &self,
        site_index: usize,
        estimator: &mut DriveTimeEstimator,
    ) -> Result<Vec<ServedPoint>, Rejection> {
        let site = &self.analysis.sites[site_index];

        if site.capacity.daily_capacity < self.constraints.min_capacity {
            return Err(Rejection::Capacity {
                capacity: site.capacity.daily_capacity,
            });
        }

        let in_radius = served_points(site.location, site.radius_km, self.points, None, estimator);
        if in_radius.is_empty() {
            return Err(Rejection::NoCoverage);
        }

        let avg_drive_time =
            in_radius.iter().map(|p| p.drive_minutes).sum::<f64>() / in_radius.len() as f64;
        if avg_drive_time > self.constraints.max_drive_time {
            return Err(Rejection::DriveTime { avg_drive_time });
        }

        let served: Vec<ServedPoint> = in_radius
            .into_iter()
            .filter(|p| p.drive_minutes <= self.constraints.max_drive_time)
            .collect();

        if served.is_empty() {
            Err(Rejection::NoCoverage)
        } else {
            Ok(served)
        }
    }

    /// Score a candidate. `serving_count[i]` is the number of other selected
    /// facilities serving demand point `i`.
    pub fn evaluate(
        &self,
        site_index: usize,
        serving_count: &[u32],
        estimator: &mut DriveTimeEstimator,
    ) -> Result<CandidateEvaluation, Rejection> {
        let served = self.reach(site_index, estimator)?;
        let site = &self.analysis.sites[site_index];
        let coverage = SiteCoverage::from_served(&served, self.points, &self.analysis.risk);

        let overlap_population = served
            .iter()
            .filter(|p| serving_count.get(p.index).is_some_and(|count| *count > 0))
            .map(|p| self.points[p.index].population)
            .sum();

        let context = CandidateContext {
            site,
            coverage: &coverage,
            overlap_population,
            site_risk: self.analysis.site_risk(site_index),
            max_drive_time: self.constraints.max_drive_time,
            enable_redundancy: self.constraints.enable_redundancy,
        };

        let mut composite = score_candidate(self.layers, self.weights, &context);

        let utilization = capacity_utilization(
            required_capacity(coverage.total_population_covered),
            site.capacity.daily_capacity,
        );
        if in_preferred_utilization_band(utilization) {
            composite.bonus = UTILIZATION_BONUS;
        }

        Ok(CandidateEvaluation {
            site_index,
            served,
            coverage,
            overlap_population,
            utilization,
            composite,
        })
    }

    /// Sum of each selected facility's score against the rest of the
    /// selection. Facilities that would be rejected contribute nothing.
    pub fn aggregate(&self, selection: &[usize], estimator: &mut DriveTimeEstimator) -> f64 {
        let reaches: Vec<Vec<usize>> = selection
            .iter()
            .map(|site_index| {
                self.reach(*site_index, estimator)
                    .map(|served| served.iter().map(|p| p.index).collect())
                    .unwrap_or_default()
            })
            .collect();

        let mut total = 0.0;
        for (position, site_index) in selection.iter().enumerate() {
            let mut serving_count = vec![0u32; self.points.len()];
            for (other, reach) in reaches.iter().enumerate() {
                if other != position {
                    for index in reach {
                        serving_count[*index] += 1;
                    }
                }
            }

            if let Ok(evaluation) = self.evaluate(*site_index, &serving_count, estimator) {
                total += evaluation.score();
            }
        }
        total
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layers::default_layers;
    use crate::location::Region;

    fn points() -> Vec<DemandPoint> {
        vec![
            DemandPoint::new("Hub", "", 45.0, -94.0, 60_000),
            DemandPoint::new("Satellite", "", 45.2, -94.0, 8_000),
            DemandPoint::new("Remote", "", 48.0, -91.0, 3_000),
        ]
    }

    fn constraints() -> Constraints {
        Constraints {
            max_drive_time: 60.0,
            min_capacity: 1000,
            enable_redundancy: true,
        }
    }

    #[test]
    fn evaluation_covers_nearby_points() {
        let points = points();
        let analysis = analyze(&points, &Region::minnesota(), None);
        let layers = default_layers();
        let weights = ScoreWeights::default();
        let scorer = CandidateScorer::new(&points, &analysis, &weights, &layers, constraints());
        let mut estimator = DriveTimeEstimator::closed_form(60.0);

        let evaluation = scorer.evaluate(0, &[0, 0, 0], &mut estimator).unwrap();
        assert_eq!(evaluation.coverage.points_covered, 2);
        assert_eq!(evaluation.overlap_population, 0);
        assert!(evaluation.score() > 0.0);
        assert_eq!(evaluation.composite.entries.len(), 6);
    }

    #[test]
    fn overlap_raises_redundancy_term() {
        let points = points();
        let analysis = analyze(&points, &Region::minnesota(), None);
        let layers = default_layers();
        let weights = ScoreWeights::default();
        let scorer = CandidateScorer::new(&points, &analysis, &weights, &layers, constraints());
        let mut estimator = DriveTimeEstimator::closed_form(60.0);

        let alone = scorer.evaluate(0, &[0, 0, 0], &mut estimator).unwrap();
        let shared = scorer.evaluate(0, &[0, 1, 0], &mut estimator).unwrap();

        assert_eq!(shared.overlap_population, 8_000);
        assert!(shared.composite.get("redundancy") > alone.composite.get("redundancy"));
    }

    #[test]
    fn capacity_below_minimum_is_rejected() {
        let points = points();
        let analysis = analyze(&points, &Region::minnesota(), None);
        let layers = default_layers();
        let weights = ScoreWeights::default();
        let strict = Constraints {
            min_capacity: 5_000,
            ..constraints()
        };
        let scorer = CandidateScorer::new(&points, &analysis, &weights, &layers, strict);
        let mut estimator = DriveTimeEstimator::closed_form(60.0);

        assert!(matches!(
            scorer.evaluate(2, &[0, 0, 0], &mut estimator),
            Err(Rejection::Capacity { .. })
        ));
    }

    #[test]
    fn slow_sites_are_rejected_on_average_drive_time() {
        let points = points();
        let analysis = analyze(&points, &Region::minnesota(), None);
        let layers = default_layers();
        let weights = ScoreWeights::default();
        let scorer = CandidateScorer::new(&points, &analysis, &weights, &layers, constraints());
        // 15 km/h: the satellite 22 km away is ~89 minutes out, average ~44.
        let mut estimator = DriveTimeEstimator::closed_form(15.0);
        let tight = Constraints {
            max_drive_time: 30.0,
            ..constraints()
        };
        let scorer_tight = CandidateScorer::new(&points, &analysis, &weights, &layers, tight);

        assert!(scorer.evaluate(0, &[0, 0, 0], &mut estimator).is_ok());
        assert!(matches!(
            scorer_tight.evaluate(0, &[0, 0, 0], &mut estimator),
            Err(Rejection::DriveTime { .. })
        ));
    }
}
