pub mod analysis;
pub mod finalize;

use crate::candidate::*;
use crate::config::OptimizerConfig;
use crate::drive_time::DriveTimeEstimator;
use crate::layer::*;
use crate::plan::*;
use crate::refine::LocalRefiner;
use crate::region_data::*;
use crate::scenario::Scenario;
use crate::search::*;
use log::*;
use std::borrow::Cow;

/// Normalized parameters of one optimization run.
#[derive(Clone, Debug)]
pub struct RunSettings {
    pub num_facilities: usize,
    pub constraints: Constraints,
    pub analyze_gaps: bool,
    pub scenario: Option<Scenario>,
    pub config: OptimizerConfig,
}

/// Everything the later phases share: settings, the score layers and the
/// analysis output.
pub struct PlanningRun {
    pub settings: RunSettings,
    pub layers: Vec<Box<dyn ScoreLayer>>,
    pub analysis: analysis::AnalysisOutput,
}

impl PlanningRun {
    pub fn scorer<'a>(&'a self, points: &'a [DemandPoint]) -> CandidateScorer<'a> {
        CandidateScorer::new(
            points,
            &self.analysis,
            &self.settings.config.weights,
            &self.layers,
            self.settings.constraints,
        )
    }

    pub fn exclusion_km(&self) -> f64 {
        self.settings
            .config
            .exclusion_distance(self.settings.constraints.enable_redundancy)
    }
}

/// The overall planning pipeline state.
///
/// Analysis -> Selecting -> Refining -> Finalizing -> Complete.
pub enum PlanningState {
    /// Risk annotation and per-candidate location scores.
    Analysis {
        settings: RunSettings,
        layers: Vec<Box<dyn ScoreLayer>>,
    },
    /// Greedy selection, one facility per tick.
    Selecting {
        run: PlanningRun,
        selector: GreedySelector,
    },
    /// Swap refinement, one pass per tick.
    Refining {
        run: PlanningRun,
        outcome: SelectionOutcome,
        refiner: LocalRefiner,
    },
    /// Coverage and gap reports for the final selection.
    Finalizing {
        run: PlanningRun,
        outcome: SelectionOutcome,
    },
    /// Terminal state.
    Complete(OptimizationResult),
}

/// Run one tick of the planning pipeline.
pub fn tick_pipeline(
    state: PlanningState,
    data_source: &dyn DemographicDataSource,
    estimator: &mut DriveTimeEstimator,
) -> PlanningState {
    let region = data_source.region();
    let points = constrained_points(data_source.demand_points(), region);

    match state {
        PlanningState::Analysis { settings, layers } => {
            if let Cow::Owned(_) = points {
                let outside = data_source
                    .demand_points()
                    .iter()
                    .filter(|point| !region.bounds.contains(point.location()))
                    .count();
                warn!("{} demand points outside the region were clamped to its bounds", outside);
            }

            let output = analysis::analyze(&points, region, settings.scenario.as_ref());
            let selector = GreedySelector::new(
                settings.num_facilities,
                settings.config.effective_pool_size(),
                settings.config.exclusion_distance(settings.constraints.enable_redundancy),
            );
            PlanningState::Selecting {
                run: PlanningRun {
                    settings,
                    layers,
                    analysis: output,
                },
                selector,
            }
        }
        PlanningState::Selecting { run, mut selector } => {
            let result = selector.step(&run.scorer(&points), estimator);
            match result {
                SearchResult::Running => PlanningState::Selecting { run, selector },
                SearchResult::Complete => {
                    let outcome = selector.into_outcome();
                    let refiner = LocalRefiner::new(&run.settings.config, run.exclusion_km());
                    PlanningState::Refining {
                        run,
                        outcome,
                        refiner,
                    }
                }
            }
        }
        PlanningState::Refining {
            run,
            mut outcome,
            mut refiner,
        } => {
            let result = refiner.step(&mut outcome.selected, &run.scorer(&points), estimator);
            match result {
                SearchResult::Running => PlanningState::Refining {
                    run,
                    outcome,
                    refiner,
                },
                SearchResult::Complete => PlanningState::Finalizing { run, outcome },
            }
        }
        PlanningState::Finalizing { run, outcome } => {
            PlanningState::Complete(finalize::finalize(&run, outcome, &points, estimator))
        }
        s @ PlanningState::Complete(_) => s,
    }
}

/// Check if the pipeline has reached its terminal state.
pub fn is_complete(state: &PlanningState) -> bool {
    matches!(state, PlanningState::Complete(_))
}

/// Extract the completed result, if any.
pub fn get_result(state: PlanningState) -> Option<OptimizationResult> {
    match state {
        PlanningState::Complete(result) => Some(result),
        _ => None,
    }
}
