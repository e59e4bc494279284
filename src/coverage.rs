//! CoverageAnalyzer and GapAnalyzer.
//!
//! A demand point is served by a facility when it lies within the facility's
//! radius and, when the run sets a drive-time limit, its estimated drive time
//! does not exceed that limit. Points may be served by several facilities;
//! the analyzer keeps the many-to-many assignment so redundancy can be
//! measured, while run totals count each point once.

use crate::constants::*;
use crate::drive_time::DriveTimeEstimator;
use crate::location::*;
use crate::plan::*;
use crate::region_data::*;
use crate::risk::RiskProfile;
use crate::scenario::Scenario;
use crate::scoring::*;
use serde::{Deserialize, Serialize};

/// A demand point served by one facility.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ServedPoint {
    pub index: usize,
    pub drive_minutes: f64,
}

/// Demand points served from `location`.
///
/// The distance test runs first, so the estimator is only consulted for
/// points inside the radius.
pub fn served_points(
    location: GeoLocation,
    radius_km: f64,
    points: &[DemandPoint],
    max_drive_time: Option<f64>,
    estimator: &mut DriveTimeEstimator,
) -> Vec<ServedPoint> {
    points
        .iter()
        .enumerate()
        .filter_map(|(index, point)| {
            let target = point.location();
            if location.distance_to(target) > radius_km {
                return None;
            }

            let drive_minutes = estimator.estimate(location, target);
            match max_drive_time {
                Some(limit) if drive_minutes > limit => None,
                _ => Some(ServedPoint {
                    index,
                    drive_minutes,
                }),
            }
        })
        .collect()
}

/// Coverage statistics of a single facility.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteCoverage {
    pub points_covered: usize,
    pub total_population_covered: u64,
    /// Population-weighted risk: the sum of `risk * population` over served points.
    pub total_risk_covered: f64,
    pub vulnerable_population_covered: u64,
    pub avg_drive_time_min: f64,
    pub max_drive_time_min: f64,
}

impl SiteCoverage {
    pub fn from_served(served: &[ServedPoint], points: &[DemandPoint], profile: &RiskProfile) -> Self {
        let mut coverage = SiteCoverage::default();
        let mut total_drive = 0.0;

        for served_point in served {
            let point = &points[served_point.index];
            let population = point.population;

            coverage.points_covered += 1;
            coverage.total_population_covered += population;
            coverage.total_risk_covered += profile.risk[served_point.index] * population as f64;
            coverage.vulnerable_population_covered +=
                (population as f64 * profile.vulnerability[served_point.index]) as u64;

            total_drive += served_point.drive_minutes;
            coverage.max_drive_time_min = coverage.max_drive_time_min.max(served_point.drive_minutes);
        }

        if coverage.points_covered > 0 {
            coverage.avg_drive_time_min = total_drive / coverage.points_covered as f64;
        }

        coverage
    }
}

/// Location and reach of a placed facility.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct CoverageArea {
    pub location: GeoLocation,
    pub radius_km: f64,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct FacilityCoverage {
    pub coverage: SiteCoverage,
    /// Share of this facility's covered population also served by another facility.
    pub redundancy_score: f64,
}

/// Many-to-many assignment of demand points to a facility set.
#[derive(Clone, Debug, Default)]
pub struct CoverageReport {
    pub facilities: Vec<FacilityCoverage>,
    /// Number of facilities serving each demand point, indexed like the points.
    pub serving_count: Vec<u32>,
    /// Population served by at least one facility.
    pub total_population_covered: u64,
    pub total_risk_covered: f64,
    /// Population served by two or more facilities.
    pub redundant_population: u64,
}

impl CoverageReport {
    pub fn is_covered(&self, index: usize) -> bool {
        self.serving_count.get(index).is_some_and(|count| *count > 0)
    }

    pub fn redundancy_score(&self) -> f64 {
        if self.total_population_covered > 0 {
            self.redundant_population as f64 / self.total_population_covered as f64
        } else {
            0.0
        }
    }
}

pub struct CoverageAnalyzer<'a> {
    points: &'a [DemandPoint],
    profile: &'a RiskProfile,
    max_drive_time: Option<f64>,
}

impl<'a> CoverageAnalyzer<'a> {
    pub fn new(points: &'a [DemandPoint], profile: &'a RiskProfile, max_drive_time: Option<f64>) -> Self {
        CoverageAnalyzer {
            points,
            profile,
            max_drive_time,
        }
    }

    pub fn analyze(&self, areas: &[CoverageArea], estimator: &mut DriveTimeEstimator) -> CoverageReport {
        let served: Vec<Vec<ServedPoint>> = areas
            .iter()
            .map(|area| {
                served_points(
                    area.location,
                    area.radius_km,
                    self.points,
                    self.max_drive_time,
                    estimator,
                )
            })
            .collect();

        let mut serving_count = vec![0u32; self.points.len()];
        for served_point in served.iter().flatten() {
            serving_count[served_point.index] += 1;
        }

        let facilities = served
            .iter()
            .map(|served| {
                let coverage = SiteCoverage::from_served(served, self.points, self.profile);
                let shared: u64 = served
                    .iter()
                    .filter(|p| serving_count[p.index] > 1)
                    .map(|p| self.points[p.index].population)
                    .sum();
                let redundancy_score = if coverage.total_population_covered > 0 {
                    shared as f64 / coverage.total_population_covered as f64
                } else {
                    0.0
                };

                FacilityCoverage {
                    coverage,
                    redundancy_score,
                }
            })
            .collect();

        let mut report = CoverageReport {
            facilities,
            serving_count,
            ..CoverageReport::default()
        };

        for (index, point) in self.points.iter().enumerate() {
            match report.serving_count[index] {
                0 => {}
                count => {
                    report.total_population_covered += point.population;
                    report.total_risk_covered += self.profile.risk[index] * point.population as f64;
                    if count > 1 {
                        report.redundant_population += point.population;
                    }
                }
            }
        }

        report
    }
}

/// Ranks the demand points no facility serves.
pub struct GapAnalyzer<'a> {
    points: &'a [DemandPoint],
    profile: &'a RiskProfile,
}

impl<'a> GapAnalyzer<'a> {
    pub fn new(points: &'a [DemandPoint], profile: &'a RiskProfile) -> Self {
        GapAnalyzer { points, profile }
    }

    pub fn analyze(&self, report: &CoverageReport) -> GapAnalysis {
        let total_population: u64 = self.points.iter().map(|p| p.population).sum();

        let mut gaps: Vec<CriticalGap> = self
            .points
            .iter()
            .enumerate()
            .filter(|(index, _)| !report.is_covered(*index))
            .map(|(index, point)| {
                let risk = self.profile.risk[index];
                CriticalGap {
                    name: point.name.clone(),
                    county: point.county.clone(),
                    lat: point.lat,
                    lon: point.lon,
                    population: point.population,
                    risk_score: risk,
                    uncovered_population: point.population,
                    uncovered_risk: risk * point.population as f64,
                }
            })
            .collect();

        let uncovered_population: u64 = gaps.iter().map(|g| g.uncovered_population).sum();
        let uncovered_risk: f64 = gaps.iter().map(|g| g.uncovered_risk).sum();
        let covered_population = total_population - uncovered_population;

        // Stable, so equal priorities keep input order.
        gaps.sort_by(|a, b| b.uncovered_risk.total_cmp(&a.uncovered_risk));
        let gap_count = gaps.len();
        gaps.truncate(CRITICAL_GAP_LIMIT);

        GapAnalysis {
            total_population,
            covered_population,
            uncovered_population,
            coverage_percentage: percentage(covered_population as f64, total_population as f64),
            uncovered_risk,
            gap_count,
            critical_gaps: gaps,
        }
    }
}

/// `part / whole * 100` rounded to 2 decimals; 0 when `whole` is 0.
pub fn percentage(part: f64, whole: f64) -> f64 {
    if whole > 0.0 {
        round_to(part / whole * 100.0, 2)
    } else {
        0.0
    }
}

fn default_site_radius() -> f64 {
    DEFAULT_SITE_RADIUS_KM
}

/// A manually placed facility.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PodSite {
    pub name: String,
    pub lat: f64,
    pub lon: f64,
    #[serde(default = "default_site_radius")]
    pub coverage_radius_km: f64,
    #[serde(flatten)]
    pub footprint: SiteFootprint,
}

impl PodSite {
    pub fn new(name: impl Into<String>, lat: f64, lon: f64) -> Self {
        PodSite {
            name: name.into(),
            lat,
            lon,
            coverage_radius_km: DEFAULT_SITE_RADIUS_KM,
            footprint: SiteFootprint::default(),
        }
    }

    pub fn with_radius(mut self, radius_km: f64) -> Self {
        self.coverage_radius_km = radius_km;
        self
    }

    pub fn with_footprint(mut self, footprint: SiteFootprint) -> Self {
        self.footprint = footprint;
        self
    }

    pub fn location(&self) -> GeoLocation {
        GeoLocation::new(self.lat, self.lon)
    }
}

/// Coverage and capacity of a manually placed facility.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteEvaluation {
    pub name: String,
    pub lat: f64,
    pub lon: f64,
    pub coverage_radius_km: f64,
    #[serde(flatten)]
    pub coverage: SiteCoverage,
    pub capacity: CapacityEstimate,
}

/// Recompute coverage for a user-placed facility. Coverage is by radius
/// only; the site is clamped to the region first.
pub fn evaluate_site(
    site: &PodSite,
    data_source: &dyn DemographicDataSource,
    scenario: Option<&Scenario>,
    estimator: &mut DriveTimeEstimator,
) -> SiteEvaluation {
    let region = data_source.region();
    let location = region.constrain(site.location(), &site.name);
    let points = constrained_points(data_source.demand_points(), region);
    let profile = RiskProfile::annotate(&points, scenario);

    let served = served_points(location, site.coverage_radius_km, &points, None, estimator);

    SiteEvaluation {
        name: site.name.clone(),
        lat: location.lat,
        lon: location.lon,
        coverage_radius_km: site.coverage_radius_km,
        coverage: SiteCoverage::from_served(&served, &points, &profile),
        capacity: estimate_capacity(&site.footprint),
    }
}

/// Coverage of an existing facility set under a scenario.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioAnalysis {
    pub num_pods: usize,
    /// Sum over facilities; a point served twice counts twice.
    pub total_points_covered: usize,
    pub total_risk_covered: f64,
    pub total_population_covered: u64,
    /// Share of demand points served by at least one facility.
    pub coverage_percentage: f64,
    pub avg_drive_time: f64,
    pub max_drive_time: f64,
    pub points_covered: usize,
    pub total_points: usize,
}

pub fn analyze_scenario(
    pods: &[PodSite],
    data_source: &dyn DemographicDataSource,
    scenario: Option<&Scenario>,
    estimator: &mut DriveTimeEstimator,
) -> ScenarioAnalysis {
    let region = data_source.region();
    let points = constrained_points(data_source.demand_points(), region);
    let profile = RiskProfile::annotate(&points, scenario);

    let areas: Vec<CoverageArea> = pods
        .iter()
        .map(|pod| CoverageArea {
            location: region.constrain(pod.location(), &pod.name),
            radius_km: pod.coverage_radius_km,
        })
        .collect();

    let report = CoverageAnalyzer::new(&points, &profile, None).analyze(&areas, estimator);

    let mut analysis = ScenarioAnalysis {
        num_pods: pods.len(),
        total_points: points.len(),
        ..ScenarioAnalysis::default()
    };

    let mut drive_times = Vec::new();
    for facility in &report.facilities {
        let coverage = &facility.coverage;
        analysis.total_points_covered += coverage.points_covered;
        analysis.total_risk_covered += coverage.total_risk_covered;
        analysis.total_population_covered += coverage.total_population_covered;

        if coverage.points_covered > 0 {
            drive_times.push(coverage.avg_drive_time_min);
            analysis.max_drive_time = analysis.max_drive_time.max(coverage.max_drive_time_min);
        }
    }

    analysis.points_covered = (0..points.len()).filter(|i| report.is_covered(*i)).count();
    analysis.coverage_percentage =
        percentage(analysis.points_covered as f64, analysis.total_points as f64);
    if !drive_times.is_empty() {
        analysis.avg_drive_time =
            round_to(drive_times.iter().sum::<f64>() / drive_times.len() as f64, 2);
    }
    analysis.max_drive_time = round_to(analysis.max_drive_time, 2);

    analysis
}
