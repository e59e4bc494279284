//! Output records of an optimization run, serialized with camelCase keys.

use serde::{Deserialize, Serialize};

/// One selected facility with its accumulated coverage statistics.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PodReport {
    pub name: String,
    pub lat: f64,
    pub lon: f64,
    pub coverage_radius_km: f64,
    pub points_covered: usize,
    pub total_population_covered: u64,
    pub total_risk_covered: f64,
    pub avg_drive_time_min: f64,
    pub max_drive_time_min: f64,
    pub vulnerable_population_covered: u64,
    pub infrastructure_score: f64,
    pub estimated_capacity: u32,
    pub capacity_utilization: f64,
    pub redundancy_score: f64,
    pub status: String,
}

/// Aggregate over all selected facilities. Population and risk count each
/// demand point once, however many facilities serve it.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub total_pods: usize,
    pub total_population_covered: u64,
    pub total_risk_covered: f64,
    pub avg_infrastructure_score: f64,
    /// Share of covered population served by two or more facilities.
    pub redundancy_score: f64,
}

/// An uncovered demand point, ranked by `population * riskScore`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CriticalGap {
    pub name: String,
    pub county: String,
    pub lat: f64,
    pub lon: f64,
    pub population: u64,
    pub risk_score: f64,
    pub uncovered_population: u64,
    pub uncovered_risk: f64,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GapAnalysis {
    pub total_population: u64,
    pub covered_population: u64,
    pub uncovered_population: u64,
    pub coverage_percentage: f64,
    pub uncovered_risk: f64,
    pub gap_count: usize,
    pub critical_gaps: Vec<CriticalGap>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptimizationResult {
    pub pods: Vec<PodReport>,
    pub summary: Summary,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gap_analysis: Option<GapAnalysis>,
    /// Requested facilities that could not be placed.
    #[serde(default)]
    pub shortfall: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl OptimizationResult {
    pub fn is_short(&self) -> bool {
        self.shortfall > 0
    }
}
