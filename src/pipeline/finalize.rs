//! Finalization: coverage and gap reports for the selected facilities.

use super::PlanningRun;
use crate::coverage::*;
use crate::drive_time::DriveTimeEstimator;
use crate::location::round_to;
use crate::plan::*;
use crate::region_data::DemandPoint;
use crate::scoring::*;
use crate::search::SelectionOutcome;
use log::*;

pub const PROPOSED_STATUS: &str = "proposed";

pub fn finalize(
    run: &PlanningRun,
    outcome: SelectionOutcome,
    points: &[DemandPoint],
    estimator: &mut DriveTimeEstimator,
) -> OptimizationResult {
    let sites = &run.analysis.sites;
    let profile = &run.analysis.risk;

    let areas: Vec<CoverageArea> = outcome
        .selected
        .iter()
        .map(|site_index| CoverageArea {
            location: sites[*site_index].location,
            radius_km: sites[*site_index].radius_km,
        })
        .collect();

    let max_drive_time = run.settings.constraints.max_drive_time;
    let report = CoverageAnalyzer::new(points, profile, Some(max_drive_time)).analyze(&areas, estimator);

    let pods: Vec<PodReport> = outcome
        .selected
        .iter()
        .zip(report.facilities.iter())
        .enumerate()
        .map(|(i, (site_index, facility))| {
            let site = &sites[*site_index];
            let coverage = &facility.coverage;
            let location = site.location.rounded(6);
            let capacity = site.capacity.daily_capacity;

            PodReport {
                name: format!("Optimal POD {} - {}", i + 1, points[site.point_index].name),
                lat: location.lat,
                lon: location.lon,
                coverage_radius_km: round_to(site.radius_km, 1),
                points_covered: coverage.points_covered,
                total_population_covered: coverage.total_population_covered,
                total_risk_covered: coverage.total_risk_covered,
                avg_drive_time_min: coverage.avg_drive_time_min,
                max_drive_time_min: coverage.max_drive_time_min,
                vulnerable_population_covered: coverage.vulnerable_population_covered,
                infrastructure_score: site.infrastructure,
                estimated_capacity: capacity,
                capacity_utilization: capacity_utilization(
                    required_capacity(coverage.total_population_covered),
                    capacity,
                ),
                redundancy_score: facility.redundancy_score,
                status: PROPOSED_STATUS.to_string(),
            }
        })
        .collect();

    let avg_infrastructure_score = if pods.is_empty() {
        0.0
    } else {
        pods.iter().map(|p| p.infrastructure_score).sum::<f64>() / pods.len() as f64
    };

    let summary = Summary {
        total_pods: pods.len(),
        total_population_covered: report.total_population_covered,
        total_risk_covered: report.total_risk_covered,
        avg_infrastructure_score,
        redundancy_score: report.redundancy_score(),
    };

    let gap_analysis = if run.settings.analyze_gaps {
        Some(GapAnalyzer::new(points, profile).analyze(&report))
    } else {
        None
    };

    info!(
        "Placed {} facilities covering {} people{}",
        summary.total_pods,
        summary.total_population_covered,
        match outcome.shortfall {
            0 => String::new(),
            n => format!(" ({} short)", n),
        }
    );

    OptimizationResult {
        pods,
        summary,
        gap_analysis,
        shortfall: outcome.shortfall,
        reason: outcome.reason,
    }
}
