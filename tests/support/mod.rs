#![allow(dead_code)]

use pod_foreman::*;
use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

/// The five settlements used by the determinism scenarios.
pub fn five_points() -> StaticDemographics {
    StaticDemographics::new(
        Region::minnesota(),
        vec![
            DemandPoint::new("A", "Alpha", 45.00, -93.30, 100_000),
            DemandPoint::new("B", "Bravo", 45.35, -93.70, 50_000),
            DemandPoint::new("C", "Charlie", 46.80, -92.10, 20_000),
            DemandPoint::new("D", "Delta", 44.95, -93.05, 200_000),
            DemandPoint::new("E", "Echo", 47.50, -94.90, 10_000),
        ],
    )
}

/// A small Minnesota dataset with a dense metro cluster and rural outliers.
pub fn minnesota_cities() -> StaticDemographics {
    let json = r#"[
        {"name": "Minneapolis", "county": "Hennepin", "lat": 44.9778, "lon": -93.2650, "population": 429954},
        {"name": "Saint Paul", "county": "Ramsey", "lat": 44.9537, "lon": -93.0900, "population": 311527},
        {"name": "Bloomington", "county": "Hennepin", "lat": 44.8408, "lon": -93.2983, "population": 89987},
        {"name": "Plymouth", "county": "Hennepin", "lat": 45.0105, "lon": -93.4555, "population": 81026},
        {"name": "Rochester", "county": "Olmsted", "lat": 44.0121, "lon": -92.4802, "population": 121395},
        {"name": "Duluth", "county": "Saint Louis", "lat": 46.7867, "lon": -92.1005, "population": 86697},
        {"name": "Saint Cloud", "county": "Stearns", "lat": 45.5579, "lon": -94.1632, "population": 68881},
        {"name": "Mankato", "county": "Blue Earth", "lat": 44.1636, "lon": -93.9994, "population": 44488},
        {"name": "Moorhead", "county": "Clay", "lat": 46.8738, "lon": -96.7678, "population": 44505},
        {"name": "Winona", "county": "Winona", "lat": 44.0499, "lon": -91.6393, "population": 25948},
        {"name": "Bemidji", "county": "Beltrami", "lat": 47.4736, "lon": -94.8803, "population": 15404},
        {"name": "Brainerd", "county": "Crow Wing", "lat": 46.3580, "lon": -94.2008, "population": 14395},
        {"name": "Hibbing", "county": "Saint Louis", "lat": 47.4272, "lon": -92.9377, "population": 16214},
        {"name": "Worthington", "county": "Nobles", "lat": 43.6199, "lon": -95.5964, "population": 13947},
        {"name": "International Falls", "county": "Koochiching", "lat": 48.6011, "lon": -93.4105, "population": 5802}
    ]"#;

    StaticDemographics::from_json_str(Region::minnesota(), json).unwrap()
}

/// Points on a coarse grid, every pair further apart than the refinement band.
pub fn sparse_grid() -> StaticDemographics {
    let mut points = Vec::new();
    let mut population = 7_000;
    for row in 0..6 {
        for col in 0..5 {
            let lat = 43.5 + row as f64 * 0.9;
            let lon = -96.5 + col as f64 * 1.5;
            points.push(DemandPoint::new(
                format!("Grid {}-{}", row, col),
                format!("County {}", row),
                lat,
                lon,
                population,
            ));
            population = (population * 7 + 3_000) % 180_000 + 4_000;
        }
    }
    StaticDemographics::new(Region::minnesota(), points)
}

pub fn closed_form() -> DriveTimeEstimator {
    DriveTimeEstimator::closed_form(60.0)
}

pub fn request(num_facilities: usize) -> OptimizationRequest {
    OptimizationRequest {
        num_facilities,
        ..OptimizationRequest::default()
    }
}

/// Routing collaborator that answers from the closed form scaled by `factor`,
/// or fails every call.
pub struct MockRouter {
    pub factor: Option<f64>,
    pub delay: Option<Duration>,
    pub calls: Rc<Cell<u32>>,
}

impl MockRouter {
    pub fn scaled(factor: f64) -> (Self, Rc<Cell<u32>>) {
        let calls = Rc::new(Cell::new(0));
        (
            MockRouter {
                factor: Some(factor),
                delay: None,
                calls: calls.clone(),
            },
            calls,
        )
    }

    pub fn failing() -> (Self, Rc<Cell<u32>>) {
        let calls = Rc::new(Cell::new(0));
        (
            MockRouter {
                factor: None,
                delay: None,
                calls: calls.clone(),
            },
            calls,
        )
    }

    pub fn slow(delay: Duration) -> (Self, Rc<Cell<u32>>) {
        let (mut router, calls) = Self::scaled(1.0);
        router.delay = Some(delay);
        (router, calls)
    }
}

impl DriveTimeSource for MockRouter {
    fn name(&self) -> &str {
        "mock"
    }

    fn drive_minutes(&self, origin: GeoLocation, destination: GeoLocation) -> Result<f64, RoutingError> {
        self.calls.set(self.calls.get() + 1);
        if let Some(delay) = self.delay {
            std::thread::sleep(delay);
        }
        match self.factor {
            Some(factor) => Ok(origin.distance_to(destination) * factor),
            None => Err(RoutingError::Network("connection refused".to_string())),
        }
    }
}
