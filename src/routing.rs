//! OpenRouteService directions client used as the primary drive-time source.

use crate::drive_time::*;
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const ORS_API_KEY_VAR: &str = "ORS_API_KEY";
pub const ORS_DIRECTIONS_URL: &str = "https://api.openrouteservice.org/v2/directions/driving-car";

fn default_endpoint() -> String {
    ORS_DIRECTIONS_URL.to_string()
}

fn default_timeout_ms() -> u64 {
    2000
}

/// Routing collaborator settings. The credential is supplied externally;
/// without it the closed-form estimator is used.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RoutingConfig {
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

impl Default for RoutingConfig {
    fn default() -> Self {
        RoutingConfig {
            api_key: None,
            endpoint: default_endpoint(),
            timeout_ms: default_timeout_ms(),
        }
    }
}

impl RoutingConfig {
    /// Read the credential from `ORS_API_KEY`; empty values count as absent.
    pub fn from_env() -> Self {
        RoutingConfig {
            api_key: std::env::var(ORS_API_KEY_VAR)
                .ok()
                .filter(|key| !key.trim().is_empty()),
            ..RoutingConfig::default()
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

#[cfg(feature = "routing")]
pub(crate) fn router_from_config(config: &RoutingConfig) -> Option<Box<dyn DriveTimeSource>> {
    config.api_key.as_ref().map(|key| {
        Box::new(OrsRouter::new(key.clone(), config.endpoint.clone(), config.timeout()))
            as Box<dyn DriveTimeSource>
    })
}

#[cfg(not(feature = "routing"))]
pub(crate) fn router_from_config(_config: &RoutingConfig) -> Option<Box<dyn DriveTimeSource>> {
    None
}

#[cfg(feature = "routing")]
pub use ors::OrsRouter;

#[cfg(feature = "routing")]
mod ors {
    use super::*;
    use crate::location::GeoLocation;

    /// Blocking client for the OpenRouteService driving-car directions endpoint.
    pub struct OrsRouter {
        api_key: String,
        endpoint: String,
        agent: ureq::Agent,
    }

    impl OrsRouter {
        pub fn new(api_key: String, endpoint: String, timeout: Duration) -> Self {
            OrsRouter {
                api_key,
                endpoint,
                agent: ureq::AgentBuilder::new().timeout(timeout).build(),
            }
        }
    }

    impl DriveTimeSource for OrsRouter {
        fn name(&self) -> &str {
            "openrouteservice"
        }

        fn drive_minutes(
            &self,
            origin: GeoLocation,
            destination: GeoLocation,
        ) -> Result<f64, RoutingError> {
            // ORS takes [lon, lat] pairs.
            let body = serde_json::json!({
                "coordinates": [[origin.lon, origin.lat], [destination.lon, destination.lat]],
            });

            let response = self
                .agent
                .post(&self.endpoint)
                .set("Authorization", &self.api_key)
                .set("Accept", "application/json, application/geo+json")
                .set("Content-Type", "application/json; charset=utf-8")
                .send_json(body);

            let json: serde_json::Value = match response {
                Ok(resp) => resp
                    .into_json()
                    .map_err(|e| RoutingError::Response(e.to_string()))?,
                Err(ureq::Error::Status(code, _)) => return Err(RoutingError::Status(code)),
                Err(e) => return Err(RoutingError::Network(e.to_string())),
            };

            json["routes"][0]["summary"]["duration"]
                .as_f64()
                .map(|seconds| seconds / 60.0)
                .ok_or_else(|| RoutingError::Response("missing routes[0].summary.duration".to_string()))
        }
    }
}
