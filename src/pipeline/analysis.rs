use crate::location::*;
use crate::region_data::*;
use crate::risk::RiskProfile;
use crate::scenario::Scenario;
use crate::scoring::*;
use itertools::Itertools;
use log::*;

/// A candidate facility location: one per demand point, addressed by its
/// index in the candidate arena (equal to the demand point's index).
#[derive(Clone, Debug, PartialEq)]
pub struct CandidateSite {
    pub point_index: usize,
    pub location: GeoLocation,
    pub radius_km: f64,
    pub capacity: CapacityEstimate,
    pub infrastructure: f64,
    /// Seed ordering key: `population * risk * vulnerability`.
    pub priority: f64,
}

/// Output of the analysis phase: per-point scores and the candidate arena.
/// Nothing in here depends on which facilities end up selected.
#[derive(Clone, Debug, Default)]
pub struct AnalysisOutput {
    pub risk: RiskProfile,
    pub sites: Vec<CandidateSite>,
}

impl AnalysisOutput {
    /// Risk of the settlement a candidate sits in.
    pub fn site_risk(&self, site_index: usize) -> f64 {
        self.risk.risk[self.sites[site_index].point_index]
    }

    /// Candidate indices in seed order: descending priority, ties by input order.
    pub fn seed_order(&self) -> Vec<usize> {
        (0..self.sites.len())
            .sorted_by(|a, b| self.sites[*b].priority.total_cmp(&self.sites[*a].priority))
            .collect()
    }
}

/// Annotate demand points with risk and vulnerability and derive the
/// location scores of every candidate site.
pub fn analyze(points: &[DemandPoint], region: &Region, scenario: Option<&Scenario>) -> AnalysisOutput {
    let risk = RiskProfile::annotate(points, scenario);

    let sites = points
        .iter()
        .enumerate()
        .map(|(index, point)| {
            let location = point.location();
            let population = point.population;

            CandidateSite {
                point_index: index,
                location,
                radius_km: dynamic_radius(population),
                capacity: estimate_capacity(&SiteFootprint::for_settlement(population)),
                infrastructure: infrastructure_score(location, population, region),
                priority: population as f64 * risk.risk[index] * risk.vulnerability[index],
            }
        })
        .collect();

    debug!(
        "Analysis complete: {} demand points, scenario {}",
        points.len(),
        scenario.map(|s| s.scenario_type.as_str()).unwrap_or("none")
    );

    AnalysisOutput { risk, sites }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seed_order_is_stable_for_ties() {
        let points = vec![
            DemandPoint::new("A", "", 45.0, -94.0, 10_000),
            DemandPoint::new("B", "", 46.0, -94.0, 80_000),
            DemandPoint::new("C", "", 47.0, -94.0, 10_000),
        ];
        let analysis = analyze(&points, &Region::minnesota(), None);

        assert_eq!(analysis.seed_order(), vec![1, 0, 2]);
        assert!(analysis
            .sites
            .iter()
            .all(|s| (20.0..=80.0).contains(&s.radius_km)));
    }
}
