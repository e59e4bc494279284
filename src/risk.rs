//! RiskScorer: turns a demand point's population-derived proxies into a
//! normalized risk value, optionally adjusted by an active scenario.
//!
//! ```text
//! risk = clamp01(0.4 * density/2000 + 0.3 * hazard + 0.3 * (1 - infrastructure))
//! ```
//!
//! All functions are pure; scenario adjustments produce a new value and
//! never touch the source `DemandPoint`.

use crate::region_data::*;
use crate::scenario::*;
use crate::scoring::vulnerability_score;
use serde::{Deserialize, Serialize};

/// Residents per square kilometre assumed when estimating settlement area.
const AREA_DENSITY_DIVISOR: f64 = 500.0;
const DENSITY_NORMALIZER: f64 = 2000.0;
const HAZARD_NORMALIZER: f64 = 500_000.0;
/// Population at which a pandemic adds `severity` to the risk multiplier.
const PANDEMIC_POPULATION_NORMALIZER: f64 = 500_000.0;
const INFRASTRUCTURE_NORMALIZER: f64 = 1_000_000.0;
const INFRASTRUCTURE_FLOOR: f64 = 0.3;

const DENSITY_WEIGHT: f64 = 0.4;
const HAZARD_WEIGHT: f64 = 0.3;
const INFRASTRUCTURE_GAP_WEIGHT: f64 = 0.3;

/// Population-density proxy: population over an area estimated from population.
pub fn density_proxy(population: u64) -> f64 {
    let population = population as f64;
    let estimated_area_km2 = (population / AREA_DENSITY_DIVISOR).max(1.0);
    population / estimated_area_km2
}

/// Larger settlements carry more hazard potential.
pub fn hazard_proxy(population: u64) -> f64 {
    (population as f64 / HAZARD_NORMALIZER).min(1.0)
}

/// Infrastructure proxy used by the risk formula (not the site infrastructure score).
pub fn infrastructure_proxy(population: u64) -> f64 {
    (1.0 - population as f64 / INFRASTRUCTURE_NORMALIZER).clamp(INFRASTRUCTURE_FLOOR, 1.0)
}

/// Base risk of a demand point, without any scenario.
pub fn base_risk(point: &DemandPoint) -> f64 {
    let density_score = (density_proxy(point.population) / DENSITY_NORMALIZER).min(1.0);
    let hazard = hazard_proxy(point.population);
    let infrastructure = infrastructure_proxy(point.population);

    let risk = DENSITY_WEIGHT * density_score
        + HAZARD_WEIGHT * hazard
        + INFRASTRUCTURE_GAP_WEIGHT * (1.0 - infrastructure);

    risk.clamp(0.0, 1.0)
}

/// Apply a scenario's multiplier to a base risk, re-clamped to [0, 1].
pub fn apply_scenario(base: f64, point: &DemandPoint, scenario: &Scenario) -> f64 {
    let severity = scenario.severity;
    let infrastructure_gap = 1.0 - infrastructure_proxy(point.population);

    let modification = match scenario.scenario_type {
        ScenarioType::General => 1.0,
        ScenarioType::Pandemic => {
            1.0 + (point.population as f64 / PANDEMIC_POPULATION_NORMALIZER) * severity
        }
        ScenarioType::NaturalDisaster => {
            if scenario.affects_area(&point.name, &point.county) {
                1.0 + severity * 0.5
            } else {
                1.0
            }
        }
        ScenarioType::SevereWeather => 1.0 + infrastructure_gap * severity * 0.3,
        ScenarioType::InfrastructureFailure => 1.0 + infrastructure_gap * severity * 0.4,
    };

    (base * modification).clamp(0.0, 1.0)
}

/// Risk of a point under an optional scenario.
pub fn risk_score(point: &DemandPoint, scenario: Option<&Scenario>) -> f64 {
    let base = base_risk(point);
    match scenario {
        Some(scenario) => apply_scenario(base, point, scenario),
        None => base,
    }
}

/// Derived per-point scores for one run, indexed like the source slice.
#[derive(Clone, Debug, Default)]
pub struct RiskProfile {
    pub risk: Vec<f64>,
    pub vulnerability: Vec<f64>,
}

impl RiskProfile {
    pub fn annotate(points: &[DemandPoint], scenario: Option<&Scenario>) -> Self {
        RiskProfile {
            risk: points.iter().map(|p| risk_score(p, scenario)).collect(),
            vulnerability: points
                .iter()
                .map(|p| vulnerability_score(p.population))
                .collect(),
        }
    }
}

/// One row of the risk listing for a dataset.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskRecord {
    pub name: String,
    pub county: String,
    pub lat: f64,
    pub lon: f64,
    pub population: u64,
    pub risk_score: f64,
}

/// Risk scores for every demand point of a dataset under an optional scenario.
pub fn risk_profile(
    data_source: &dyn DemographicDataSource,
    scenario: Option<&Scenario>,
) -> Vec<RiskRecord> {
    constrained_points(data_source.demand_points(), data_source.region())
        .iter()
        .map(|point| RiskRecord {
            name: point.name.clone(),
            county: point.county.clone(),
            lat: point.lat,
            lon: point.lon,
            population: point.population,
            risk_score: risk_score(point, scenario),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(population: u64) -> DemandPoint {
        DemandPoint::new("Town", "County", 45.0, -93.0, population)
    }

    #[test]
    fn base_risk_matches_formula() {
        // density proxy saturates at 500 -> 0.4 * 0.25 = 0.1
        // hazard = 0.2 -> 0.06, infrastructure gap = 0.1 -> 0.03
        let risk = base_risk(&point(100_000));
        assert!((risk - 0.19).abs() < 1e-9, "got {}", risk);
    }

    #[test]
    fn empty_settlement_has_zero_risk() {
        assert_eq!(base_risk(&point(0)), 0.0);
    }

    #[test]
    fn general_scenario_is_identity() {
        let p = point(50_000);
        let scenario = Scenario::new(ScenarioType::General, 3.0).unwrap();
        assert_eq!(risk_score(&p, Some(&scenario)), base_risk(&p));
    }

    #[test]
    fn pandemic_scales_with_population() {
        // 1 + 100000/500000 * 2.0 = 1.4
        let p = point(100_000);
        let scenario = Scenario::new(ScenarioType::Pandemic, 2.0).unwrap();
        assert!((risk_score(&p, Some(&scenario)) - 0.19 * 1.4).abs() < 1e-9);
    }

    #[test]
    fn natural_disaster_only_touches_affected_areas() {
        let inside = DemandPoint::new("Moorhead", "Clay", 46.87, -96.76, 44_000);
        let outside = DemandPoint::new("Winona", "Winona", 44.05, -91.64, 26_000);
        let scenario = Scenario::new(ScenarioType::NaturalDisaster, 2.0)
            .unwrap()
            .with_affected_areas(["Clay"]);

        assert!((risk_score(&inside, Some(&scenario)) - base_risk(&inside) * 2.0).abs() < 1e-12);
        assert_eq!(risk_score(&outside, Some(&scenario)), base_risk(&outside));
    }

    #[test]
    fn adjusted_risk_is_clamped() {
        let p = point(900_000);
        let scenario = Scenario::new(ScenarioType::Pandemic, 3.0).unwrap();
        assert_eq!(risk_score(&p, Some(&scenario)), 1.0);
    }

    #[test]
    fn annotate_does_not_mutate_source() {
        let points = vec![point(1_000), point(80_000)];
        let before = points.clone();
        let scenario = Scenario::new(ScenarioType::SevereWeather, 2.5).unwrap();
        let profile = RiskProfile::annotate(&points, Some(&scenario));

        assert_eq!(points, before);
        assert_eq!(profile.risk.len(), 2);
        assert_eq!(profile.vulnerability, vec![0.8, 0.2]);
    }
}
