//! Risk-modification scenarios applied before optimization.

use crate::constants::*;
use crate::error::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScenarioType {
    #[default]
    General,
    Pandemic,
    NaturalDisaster,
    SevereWeather,
    InfrastructureFailure,
}

impl ScenarioType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScenarioType::General => "general",
            ScenarioType::Pandemic => "pandemic",
            ScenarioType::NaturalDisaster => "natural_disaster",
            ScenarioType::SevereWeather => "severe_weather",
            ScenarioType::InfrastructureFailure => "infrastructure_failure",
        }
    }
}

fn default_severity() -> f64 {
    1.0
}

/// A named risk-modification profile.
///
/// Deserialization does not check the severity; call [`Scenario::validate`]
/// (the planner does) before using a deserialized value.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scenario {
    #[serde(rename = "type", default)]
    pub scenario_type: ScenarioType,
    #[serde(default = "default_severity")]
    pub severity: f64,
    /// County or settlement names; only consulted by area-scoped types.
    #[serde(default)]
    pub affected_areas: BTreeSet<String>,
}

impl Default for Scenario {
    fn default() -> Self {
        Scenario {
            scenario_type: ScenarioType::General,
            severity: default_severity(),
            affected_areas: BTreeSet::new(),
        }
    }
}

impl Scenario {
    pub fn new(scenario_type: ScenarioType, severity: f64) -> PlannerResult<Self> {
        let scenario = Scenario {
            scenario_type,
            severity,
            affected_areas: BTreeSet::new(),
        };
        scenario.validate()?;
        Ok(scenario)
    }

    pub fn with_affected_areas<I, S>(mut self, areas: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.affected_areas
            .extend(areas.into_iter().map(|area| area.into()));
        self
    }

    pub fn validate(&self) -> PlannerResult<()> {
        if (MIN_SEVERITY..=MAX_SEVERITY).contains(&self.severity) {
            Ok(())
        } else {
            Err(PlannerError::InvalidSeverity(self.severity))
        }
    }

    /// Whether an area-scoped scenario applies to a point with this name/county.
    /// An empty affected-area set means the whole region is affected.
    pub fn affects_area(&self, name: &str, county: &str) -> bool {
        self.affected_areas.is_empty()
            || self.affected_areas.contains(name)
            || self.affected_areas.contains(county)
    }
}
