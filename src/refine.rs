//! LocalRefiner: bounded swap search over a finished selection.
//!
//! Each pass visits every selected facility and tries a few nearby
//! alternatives, in seed order. A swap is kept when it lifts the aggregate
//! score by at least the improvement threshold. Passes stop once one makes
//! no swap. The facility count never changes.

use crate::candidate::CandidateScorer;
use crate::config::OptimizerConfig;
use crate::drive_time::DriveTimeEstimator;
use crate::search::SearchResult;
use log::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RefineStats {
    pub passes: usize,
    pub swaps: usize,
    pub trials: u64,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LocalRefiner {
    max_passes: usize,
    improvement_threshold: f64,
    min_km: f64,
    max_km: f64,
    alternatives: usize,
    exclusion_km: f64,
    stats: RefineStats,
}

impl LocalRefiner {
    pub fn new(config: &OptimizerConfig, exclusion_km: f64) -> Self {
        LocalRefiner {
            max_passes: config.effective_refinement_passes(),
            improvement_threshold: config.improvement_threshold,
            min_km: config.refinement_min_km,
            max_km: config.refinement_max_km,
            alternatives: config.refinement_alternatives,
            exclusion_km,
            stats: RefineStats::default(),
        }
    }

    pub fn stats(&self) -> &RefineStats {
        &self.stats
    }

    /// Run one refinement pass over `selection`.
    pub fn step(
        &mut self,
        selection: &mut [usize],
        scorer: &CandidateScorer,
        estimator: &mut DriveTimeEstimator,
    ) -> SearchResult {
        if selection.is_empty() || self.stats.passes >= self.max_passes {
            return SearchResult::Complete;
        }

        let swapped = self.pass(selection, scorer, estimator);
        self.stats.passes += 1;

        if !swapped || self.stats.passes >= self.max_passes {
            SearchResult::Complete
        } else {
            SearchResult::Running
        }
    }

    pub fn run(&mut self, selection: &mut [usize], scorer: &CandidateScorer, estimator: &mut DriveTimeEstimator) {
        while let SearchResult::Running = self.step(selection, scorer, estimator) {}
    }

    fn pass(&mut self, selection: &mut [usize], scorer: &CandidateScorer, estimator: &mut DriveTimeEstimator) -> bool {
        let analysis = scorer.analysis();
        let seed_order = analysis.seed_order();
        let mut current = scorer.aggregate(selection, estimator);
        let mut swapped = false;

        for position in 0..selection.len() {
            let origin = analysis.sites[selection[position]].location;

            let alternatives: Vec<usize> = seed_order
                .iter()
                .copied()
                .filter(|candidate| !selection.contains(candidate))
                .filter(|candidate| {
                    let distance = analysis.sites[*candidate].location.distance_to(origin);
                    distance >= self.min_km && distance <= self.max_km
                })
                .filter(|candidate| {
                    let location = analysis.sites[*candidate].location;
                    selection.iter().enumerate().all(|(other, site)| {
                        other == position
                            || analysis.sites[*site].location.distance_to(location) > self.exclusion_km
                    })
                })
                .take(self.alternatives)
                .collect();

            for alternative in alternatives {
                self.stats.trials += 1;

                let previous = selection[position];
                selection[position] = alternative;
                let trial = scorer.aggregate(selection, estimator);

                if trial > current && trial >= current * (1.0 + self.improvement_threshold) {
                    debug!(
                        "Refinement swapped candidate {} for {} (aggregate {:.1} -> {:.1})",
                        previous, alternative, current, trial
                    );
                    current = trial;
                    self.stats.swaps += 1;
                    swapped = true;
                    break;
                }

                selection[position] = previous;
            }
        }

        swapped
    }
}
