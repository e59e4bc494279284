use crate::error::*;
use crate::location::*;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::io::Read;

/// A population center: the unit of coverage demand.
///
/// Source records are immutable for the duration of a run; derived scores
/// live in a separate `RiskProfile` (see `risk`).
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct DemandPoint {
    pub name: String,
    #[serde(default)]
    pub county: String,
    pub lat: f64,
    pub lon: f64,
    #[serde(default)]
    pub population: u64,
}

impl DemandPoint {
    pub fn new(
        name: impl Into<String>,
        county: impl Into<String>,
        lat: f64,
        lon: f64,
        population: u64,
    ) -> Self {
        DemandPoint {
            name: name.into(),
            county: county.into(),
            lat,
            lon,
            population,
        }
    }

    pub fn location(&self) -> GeoLocation {
        GeoLocation::new(self.lat, self.lon)
    }
}

/// Trait for providing reference demographic data to the optimizer.
/// The data is read-only and static for the duration of a run.
pub trait DemographicDataSource {
    fn demand_points(&self) -> &[DemandPoint];
    fn region(&self) -> &Region;

    fn total_population(&self) -> u64 {
        self.demand_points().iter().map(|p| p.population).sum()
    }
}

/// The points of `points` with every coordinate clamped into `region`.
/// Borrows the input when all of it already lies inside.
pub fn constrained_points<'a>(points: &'a [DemandPoint], region: &Region) -> Cow<'a, [DemandPoint]> {
    if points.iter().all(|point| region.bounds.contains(point.location())) {
        return Cow::Borrowed(points);
    }

    Cow::Owned(
        points
            .iter()
            .map(|point| {
                let clamped = region.bounds.clamp(point.location());
                DemandPoint {
                    lat: clamped.lat,
                    lon: clamped.lon,
                    ..point.clone()
                }
            })
            .collect(),
    )
}

/// In-memory demographic dataset, with every point constrained to its region.
#[derive(Clone, Debug)]
pub struct StaticDemographics {
    region: Region,
    points: Vec<DemandPoint>,
}

impl StaticDemographics {
    pub fn new(region: Region, points: Vec<DemandPoint>) -> Self {
        let points = points
            .into_iter()
            .map(|mut point| {
                let constrained = region.constrain(point.location(), &point.name);
                point.lat = constrained.lat;
                point.lon = constrained.lon;
                point
            })
            .collect();

        StaticDemographics { region, points }
    }

    /// Parse a JSON array of `{name, county, lat, lon, population}` records.
    pub fn from_json_str(region: Region, json: &str) -> PlannerResult<Self> {
        let points: Vec<DemandPoint> = serde_json::from_str(json)?;
        Ok(Self::new(region, points))
    }

    pub fn from_reader<R: Read>(region: Region, reader: R) -> PlannerResult<Self> {
        let points: Vec<DemandPoint> = serde_json::from_reader(reader)?;
        Ok(Self::new(region, points))
    }
}

impl DemographicDataSource for StaticDemographics {
    fn demand_points(&self) -> &[DemandPoint] {
        &self.points
    }

    fn region(&self) -> &Region {
        &self.region
    }
}
