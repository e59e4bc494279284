//! Location scorers: independent estimates over a single candidate site.
//!
//! None of these depend on the current selection, so the analysis phase
//! computes them once per candidate and the selector reuses them.

use crate::constants::*;
use crate::location::*;
use crate::risk::density_proxy;
use serde::{Deserialize, Serialize};

/// Density above which a settlement is treated as dense urban.
const URBAN_DENSITY: f64 = 1000.0;
/// Density above which a settlement is treated as suburban.
const SUBURBAN_DENSITY: f64 = 200.0;

/// Coverage radius for a site, from its density proxy and settlement size.
///
/// Dense urban sites get 20-40 km, suburban 40-60 km, sparse rural 60-80 km.
/// Non-increasing in population (and therefore in the density proxy).
pub fn dynamic_radius(population: u64) -> f64 {
    let density = density_proxy(population);

    let mut radius: f64 = if density > URBAN_DENSITY {
        30.0
    } else if density > SUBURBAN_DENSITY {
        50.0
    } else {
        70.0
    };

    // Large cities need more sites with tighter radii; small towns can stretch.
    if population > 100_000 {
        radius *= 0.8;
    } else if population < 10_000 {
        radius *= 1.2;
    }

    radius.clamp(MIN_COVERAGE_RADIUS_KM, MAX_COVERAGE_RADIUS_KM)
}

/// Physical footprint of a distribution site.
#[derive(Copy, Clone, PartialEq, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteFootprint {
    #[serde(default)]
    pub parking_acres: f64,
    #[serde(default)]
    pub total_acres: f64,
    /// Explicit occupancy limit; overrides the estimate when positive.
    #[serde(default)]
    pub occupancy: u32,
}

impl SiteFootprint {
    /// Typical footprint available in a settlement of the given size.
    pub fn for_settlement(population: u64) -> Self {
        let parking_acres = if population > 50_000 {
            2.0
        } else if population > 20_000 {
            1.2
        } else {
            0.6
        };

        SiteFootprint {
            parking_acres,
            total_acres: 0.0,
            occupancy: 0,
        }
    }
}

#[derive(Copy, Clone, PartialEq, Eq, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CapacityEstimate {
    pub daily_capacity: u32,
    pub vehicle_capacity: u32,
    pub people_capacity: u32,
}

/// Daily throughput estimate from parking and total acreage.
/// Monotonically non-decreasing in both inputs and capped at `MAX_DAILY_CAPACITY`.
pub fn estimate_capacity(footprint: &SiteFootprint) -> CapacityEstimate {
    let vehicle_capacity = if footprint.parking_acres > 0.0 {
        (footprint.parking_acres / ACRES_PER_VEHICLE * VEHICLE_CYCLES_PER_DAY) as u32
    } else {
        0
    };

    let people_capacity = if footprint.total_acres > 0.0 {
        (footprint.total_acres * SQ_FT_PER_ACRE / SQ_FT_PER_PERSON) as u32
    } else {
        0
    };

    let daily_capacity = if footprint.occupancy > 0 {
        footprint.occupancy
    } else {
        (vehicle_capacity.saturating_mul(PEOPLE_PER_VEHICLE)).max(people_capacity)
    };

    CapacityEstimate {
        daily_capacity: daily_capacity.min(MAX_DAILY_CAPACITY),
        vehicle_capacity,
        people_capacity,
    }
}

/// Demand placed on a site by the population it covers.
pub fn required_capacity(population_covered: u64) -> u64 {
    (population_covered as f64 * DAILY_DEMAND_SHARE) as u64
}

/// `required / capacity`; values above 1 mean the site is over capacity.
pub fn capacity_utilization(required: u64, capacity: u32) -> f64 {
    if capacity > 0 {
        required as f64 / capacity as f64
    } else {
        0.0
    }
}

pub fn in_preferred_utilization_band(utilization: f64) -> bool {
    (PREFERRED_UTILIZATION.0..=PREFERRED_UTILIZATION.1).contains(&utilization)
}

/// Site access quality: grows with settlement size, boosted near the metro anchor.
pub fn infrastructure_score(location: GeoLocation, population: u64, region: &Region) -> f64 {
    let mut score: f64 = if population > 100_000 {
        0.9
    } else if population > 50_000 {
        0.7
    } else if population > 20_000 {
        0.5
    } else {
        0.3
    };

    let metro_distance = location.distance_to(region.metro_anchor);
    if metro_distance < 50.0 {
        score += 0.1;
    } else if metro_distance < 100.0 {
        score += 0.05;
    }

    score.clamp(0.0, 1.0)
}

/// Stand-in for elderly, low-income and limited-mobility concentration:
/// smaller settlements score higher.
pub fn vulnerability_score(population: u64) -> f64 {
    if population < 5_000 {
        0.8
    } else if population < 20_000 {
        0.6
    } else if population < 50_000 {
        0.4
    } else {
        0.2
    }
}
