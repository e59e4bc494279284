//! GreedySelector: builds the facility set one pick at a time.
//!
//! The selector walks a seed-ordered pool of candidate indices. Each step
//! scores the first `pool_size` remaining candidates, picks the best, and
//! removes everything within the exclusion distance of the pick. Candidate
//! rejections are final for the run, so rejected candidates leave the pool.

use crate::candidate::*;
use crate::drive_time::DriveTimeEstimator;
use log::*;
use serde::{Deserialize, Serialize};

/// Result of a single step of the selector.
pub enum SearchResult {
    /// More facilities remain to be placed.
    Running,
    /// Selection finished, either at the target count or with the pool exhausted.
    Complete,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SelectorState {
    Init,
    Selecting,
    Done,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SelectorStats {
    pub iterations: u64,
    pub candidates_evaluated: u64,
    pub candidates_rejected: u64,
    pub candidates_excluded: u64,
}

/// Facilities chosen by the selector, in pick order.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SelectionOutcome {
    pub selected: Vec<usize>,
    pub shortfall: usize,
    pub reason: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GreedySelector {
    state: SelectorState,
    target: usize,
    pool_size: usize,
    exclusion_km: f64,
    /// Remaining candidate indices, in seed order.
    pool: Vec<usize>,
    selected: Vec<usize>,
    /// Number of selected facilities serving each demand point.
    serving_count: Vec<u32>,
    stats: SelectorStats,
}

impl GreedySelector {
    pub fn new(target: usize, pool_size: usize, exclusion_km: f64) -> Self {
        GreedySelector {
            state: SelectorState::Init,
            target,
            pool_size: pool_size.max(1),
            exclusion_km,
            pool: Vec::new(),
            selected: Vec::new(),
            serving_count: Vec::new(),
            stats: SelectorStats::default(),
        }
    }

    pub fn state(&self) -> SelectorState {
        self.state
    }

    pub fn stats(&self) -> &SelectorStats {
        &self.stats
    }

    pub fn selected(&self) -> &[usize] {
        &self.selected
    }

    /// Advance by one pick.
    pub fn step(&mut self, scorer: &CandidateScorer, estimator: &mut DriveTimeEstimator) -> SearchResult {
        match self.state {
            SelectorState::Init => {
                self.pool = scorer.analysis().seed_order();
                self.serving_count = vec![0; scorer.points().len()];
                self.state = SelectorState::Selecting;
                SearchResult::Running
            }
            SelectorState::Selecting => {
                if self.selected.len() >= self.target || !self.select_next(scorer, estimator) {
                    self.state = SelectorState::Done;
                    return SearchResult::Complete;
                }
                if self.selected.len() >= self.target {
                    self.state = SelectorState::Done;
                    SearchResult::Complete
                } else {
                    SearchResult::Running
                }
            }
            SelectorState::Done => SearchResult::Complete,
        }
    }

    /// Run until done.
    pub fn run(&mut self, scorer: &CandidateScorer, estimator: &mut DriveTimeEstimator) {
        while let SearchResult::Running = self.step(scorer, estimator) {}
    }

    /// Pick one facility. Returns false when the pool is exhausted.
    fn select_next(&mut self, scorer: &CandidateScorer, estimator: &mut DriveTimeEstimator) -> bool {
        self.stats.iterations += 1;

        loop {
            if self.pool.is_empty() {
                return false;
            }

            let window = self.pool.len().min(self.pool_size);
            let mut best: Option<CandidateEvaluation> = None;
            let mut rejected = Vec::new();

            for &site_index in &self.pool[..window] {
                self.stats.candidates_evaluated += 1;
                match scorer.evaluate(site_index, &self.serving_count, estimator) {
                    Ok(evaluation) => {
                        // Strict comparison keeps the earlier seed on ties.
                        if best.as_ref().map_or(true, |b| evaluation.score() > b.score()) {
                            best = Some(evaluation);
                        }
                    }
                    Err(rejection) => {
                        trace!("Candidate {} rejected: {:?}", site_index, rejection);
                        rejected.push(site_index);
                    }
                }
            }

            self.stats.candidates_rejected += rejected.len() as u64;
            self.pool.retain(|c| !rejected.contains(c));

            if let Some(best) = best {
                self.accept(scorer, best);
                return true;
            }
        }
    }

    fn accept(&mut self, scorer: &CandidateScorer, evaluation: CandidateEvaluation) {
        let sites = &scorer.analysis().sites;
        let chosen = evaluation.site_index;
        let origin = sites[chosen].location;

        for served in &evaluation.served {
            self.serving_count[served.index] += 1;
        }

        let before = self.pool.len();
        let exclusion_km = self.exclusion_km;
        self.pool
            .retain(|c| *c != chosen && sites[*c].location.distance_to(origin) > exclusion_km);
        self.stats.candidates_excluded += (before - self.pool.len()).saturating_sub(1) as u64;

        debug!(
            "Selected facility {} at candidate {} (score {:.1}, {} people, {} left in pool)",
            self.selected.len() + 1,
            chosen,
            evaluation.score(),
            evaluation.coverage.total_population_covered,
            self.pool.len()
        );

        self.selected.push(chosen);
    }

    pub fn into_outcome(self) -> SelectionOutcome {
        let shortfall = self.target.saturating_sub(self.selected.len());
        let reason = if self.target > 0 && self.selected.is_empty() {
            Some("no candidate location satisfies the capacity and drive-time constraints".to_string())
        } else if shortfall > 0 {
            Some(format!(
                "candidate pool exhausted after {} of {} facilities",
                self.selected.len(),
                self.target
            ))
        } else {
            None
        };

        SelectionOutcome {
            selected: self.selected,
            shortfall,
            reason,
        }
    }
}
