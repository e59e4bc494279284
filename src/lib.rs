pub mod candidate;
pub mod config;
pub mod constants;
pub mod coverage;
pub mod drive_time;
pub mod error;
pub mod layer;
pub mod layers;
pub mod location;
pub mod pipeline;
pub mod plan;
pub mod planner;
pub mod refine;
pub mod region_data;
pub mod risk;
pub mod routing;
pub mod scenario;
pub mod scoring;
pub mod search;

pub use config::*;
pub use coverage::{analyze_scenario, evaluate_site, PodSite, ScenarioAnalysis, SiteEvaluation};
pub use drive_time::{DriveTimeEstimator, DriveTimeQuote, DriveTimeSource, RoutingError};
pub use error::*;
pub use location::*;
pub use planner::*;
pub use region_data::*;
pub use risk::{risk_profile, RiskRecord};
pub use routing::RoutingConfig;
pub use scenario::*;
