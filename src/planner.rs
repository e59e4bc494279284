//! Public API for the facility optimizer.
//!
//! The `PlannerBuilder` provides a fluent, append-only API for configuring a
//! run. It produces a `PlanningState` that can be ticked incrementally or run
//! to completion with `run_planning`.

use crate::config::OptimizerConfig;
use crate::constants::*;
use crate::drive_time::DriveTimeEstimator;
use crate::error::*;
use crate::layer::ScoreLayer;
use crate::layers::default_layers;
use crate::pipeline::{PlanningState, RunSettings};
use crate::region_data::DemographicDataSource;
use crate::routing::RoutingConfig;
use crate::scenario::Scenario;
use itertools::Itertools;
use log::*;
use serde::{Deserialize, Serialize};

pub use crate::candidate::Constraints;
pub use crate::pipeline::PlanningState as PlanState;
pub use crate::plan::*;

/// Request for one optimization run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OptimizationRequest {
    pub num_facilities: usize,
    pub max_drive_time_minutes: f64,
    pub min_capacity: u32,
    pub enable_redundancy: bool,
    pub analyze_gaps: bool,
    pub scenario: Option<Scenario>,
}

impl Default for OptimizationRequest {
    fn default() -> Self {
        OptimizationRequest {
            num_facilities: 5,
            max_drive_time_minutes: 60.0,
            min_capacity: 1000,
            enable_redundancy: true,
            analyze_gaps: false,
            scenario: None,
        }
    }
}

impl OptimizationRequest {
    /// Validate the scenario and clamp the numeric parameters to their
    /// accepted ranges.
    pub fn normalize(&self, config: &OptimizerConfig) -> PlannerResult<RunSettings> {
        if let Some(scenario) = &self.scenario {
            scenario.validate()?;
        }
        config.validate()?;

        let num_facilities = self.num_facilities.min(MAX_FACILITIES);
        if num_facilities != self.num_facilities {
            warn!(
                "numFacilities {} clamped to {}",
                self.num_facilities, num_facilities
            );
        }

        let max_drive_time = if self.max_drive_time_minutes.is_finite() {
            self.max_drive_time_minutes
                .clamp(MIN_DRIVE_TIME_MINUTES, MAX_DRIVE_TIME_MINUTES)
        } else {
            OptimizationRequest::default().max_drive_time_minutes
        };
        if max_drive_time != self.max_drive_time_minutes {
            warn!(
                "maxDriveTimeMinutes {} clamped to {}",
                self.max_drive_time_minutes, max_drive_time
            );
        }

        Ok(RunSettings {
            num_facilities,
            constraints: Constraints {
                max_drive_time,
                min_capacity: self.min_capacity,
                enable_redundancy: self.enable_redundancy,
            },
            analyze_gaps: self.analyze_gaps,
            scenario: self.scenario.clone(),
            config: config.clone(),
        })
    }
}

/// Append-only builder for configuring an optimization run.
pub struct PlannerBuilder {
    layers: Vec<Box<dyn ScoreLayer>>,
    request: OptimizationRequest,
    config: OptimizerConfig,
}

impl PlannerBuilder {
    /// Start with an empty layer stack and default parameters.
    pub fn new() -> Self {
        PlannerBuilder {
            layers: Vec::new(),
            request: OptimizationRequest::default(),
            config: OptimizerConfig::default(),
        }
    }

    /// Add a score layer after the ones already present.
    pub fn add_layer(mut self, layer: Box<dyn ScoreLayer>) -> Self {
        self.layers.push(layer);
        self
    }

    pub fn request(mut self, request: OptimizationRequest) -> Self {
        self.request = request;
        self
    }

    pub fn config(mut self, config: OptimizerConfig) -> Self {
        self.config = config;
        self
    }

    pub fn num_facilities(mut self, count: usize) -> Self {
        self.request.num_facilities = count;
        self
    }

    pub fn max_drive_time(mut self, minutes: f64) -> Self {
        self.request.max_drive_time_minutes = minutes;
        self
    }

    pub fn min_capacity(mut self, capacity: u32) -> Self {
        self.request.min_capacity = capacity;
        self
    }

    pub fn enable_redundancy(mut self, enabled: bool) -> Self {
        self.request.enable_redundancy = enabled;
        self
    }

    pub fn analyze_gaps(mut self, enabled: bool) -> Self {
        self.request.analyze_gaps = enabled;
        self
    }

    pub fn scenario(mut self, scenario: Scenario) -> Self {
        self.request.scenario = Some(scenario);
        self
    }

    /// Validate the request and start the pipeline (begins with Analysis).
    pub fn build(self) -> PlannerResult<PlanningState> {
        let settings = self.request.normalize(&self.config)?;

        info!(
            "Optimizing {} facilities: max drive {} min, min capacity {}, redundancy {}, scenario {}, layers [{}]",
            settings.num_facilities,
            settings.constraints.max_drive_time,
            settings.constraints.min_capacity,
            settings.constraints.enable_redundancy,
            settings
                .scenario
                .as_ref()
                .map(|s| format!("{} x{}", s.scenario_type.as_str(), s.severity))
                .unwrap_or_else(|| "none".to_string()),
            self.layers.iter().map(|l| l.name()).join(", ")
        );

        Ok(PlanningState::Analysis {
            settings,
            layers: self.layers,
        })
    }
}

impl Default for PlannerBuilder {
    /// Returns a builder pre-loaded with the default six-layer stack.
    fn default() -> Self {
        let mut builder = PlannerBuilder::new();
        for layer in default_layers() {
            builder.layers.push(layer);
        }
        builder
    }
}

/// Run the pipeline to completion.
pub fn run_planning(
    mut state: PlanningState,
    data_source: &dyn DemographicDataSource,
    estimator: &mut DriveTimeEstimator,
) -> OptimizationResult {
    loop {
        state = crate::pipeline::tick_pipeline(state, data_source, estimator);
        if let PlanningState::Complete(result) = state {
            return result;
        }
    }
}

/// Optimize with explicit tuning and drive-time estimator.
pub fn optimize_with(
    request: &OptimizationRequest,
    config: &OptimizerConfig,
    data_source: &dyn DemographicDataSource,
    estimator: &mut DriveTimeEstimator,
) -> PlannerResult<OptimizationResult> {
    let state = PlannerBuilder::default()
        .request(request.clone())
        .config(config.clone())
        .build()?;

    let result = run_planning(state, data_source, estimator);

    debug!(
        "Drive-time lookups: {:?} (routing {})",
        estimator.stats(),
        if estimator.is_routing() { "active" } else { "inactive" }
    );

    Ok(result)
}

/// Optimize with default tuning. Drive times come from OpenRouteService when
/// `ORS_API_KEY` is set, otherwise from the closed-form estimate.
pub fn optimize(
    request: &OptimizationRequest,
    data_source: &dyn DemographicDataSource,
) -> PlannerResult<OptimizationResult> {
    let config = OptimizerConfig::default();
    let mut estimator =
        DriveTimeEstimator::from_config(&RoutingConfig::from_env(), config.average_speed_kmh);
    optimize_with(request, &config, data_source, &mut estimator)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scenario::ScenarioType;

    #[test]
    fn request_defaults_from_empty_json() {
        let request: OptimizationRequest = serde_json::from_str("{}").unwrap();
        assert_eq!(request, OptimizationRequest::default());
        assert_eq!(request.num_facilities, 5);
        assert!(request.enable_redundancy);
        assert!(!request.analyze_gaps);
    }

    #[test]
    fn request_reads_camel_case() {
        let request: OptimizationRequest = serde_json::from_str(
            r#"{"numFacilities": 3, "maxDriveTimeMinutes": 45, "analyzeGaps": true,
                "scenario": {"type": "pandemic", "severity": 2.0}}"#,
        )
        .unwrap();
        assert_eq!(request.num_facilities, 3);
        assert_eq!(request.max_drive_time_minutes, 45.0);
        assert!(request.analyze_gaps);
        assert_eq!(request.scenario.unwrap().scenario_type, ScenarioType::Pandemic);
    }

    #[test]
    fn out_of_range_parameters_are_clamped() {
        let request = OptimizationRequest {
            num_facilities: 50,
            max_drive_time_minutes: 500.0,
            ..OptimizationRequest::default()
        };
        let settings = request.normalize(&OptimizerConfig::default()).unwrap();
        assert_eq!(settings.num_facilities, 20);
        assert_eq!(settings.constraints.max_drive_time, 120.0);
    }

    #[test]
    fn bad_severity_is_rejected() {
        let request = OptimizationRequest {
            scenario: Some(Scenario {
                severity: 4.0,
                ..Scenario::default()
            }),
            ..OptimizationRequest::default()
        };
        assert!(matches!(
            PlannerBuilder::default().request(request).build(),
            Err(PlannerError::InvalidSeverity(s)) if s == 4.0
        ));
    }
}
