use crate::constants::*;
use serde::*;

/// A WGS84 coordinate pair in decimal degrees.
#[derive(Copy, Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct GeoLocation {
    pub lat: f64,
    pub lon: f64,
}

impl GeoLocation {
    pub fn new(lat: f64, lon: f64) -> Self {
        GeoLocation { lat, lon }
    }

    /// Great-circle (haversine) distance in kilometres.
    pub fn distance_to(self, other: Self) -> f64 {
        haversine_km(self.lat, self.lon, other.lat, other.lon)
    }

    /// Bit-exact key, used to memoize per-pair results.
    #[inline]
    pub fn packed_repr(self) -> (u64, u64) {
        (self.lat.to_bits(), self.lon.to_bits())
    }

    /// Round both coordinates to `decimals` places for presentation.
    pub fn rounded(self, decimals: i32) -> Self {
        GeoLocation {
            lat: round_to(self.lat, decimals),
            lon: round_to(self.lon, decimals),
        }
    }
}

pub fn haversine_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let dlat = (lat2 - lat1).to_radians();
    let dlon = (lon2 - lon1).to_radians();

    let a = (dlat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (dlon / 2.0).sin().powi(2);

    2.0 * EARTH_RADIUS_KM * a.sqrt().min(1.0).asin()
}

pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// Rectangular operating region in decimal degrees.
#[derive(Copy, Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct RegionBounds {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
}

impl RegionBounds {
    /// Latitude span with its ends ordered, whatever order the record gave them in.
    pub fn lat_range(&self) -> (f64, f64) {
        ordered(self.min_lat, self.max_lat)
    }

    pub fn lon_range(&self) -> (f64, f64) {
        ordered(self.min_lon, self.max_lon)
    }

    pub fn contains(&self, location: GeoLocation) -> bool {
        let (lat_lo, lat_hi) = self.lat_range();
        let (lon_lo, lon_hi) = self.lon_range();
        (lat_lo..=lat_hi).contains(&location.lat) && (lon_lo..=lon_hi).contains(&location.lon)
    }

    /// Clamp a coordinate to the nearest point inside the bounds.
    pub fn clamp(&self, location: GeoLocation) -> GeoLocation {
        let (lat_lo, lat_hi) = self.lat_range();
        let (lon_lo, lon_hi) = self.lon_range();
        GeoLocation {
            lat: location.lat.max(lat_lo).min(lat_hi),
            lon: location.lon.max(lon_lo).min(lon_hi),
        }
    }
}

fn ordered(a: f64, b: f64) -> (f64, f64) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

/// The operating region: its bounds plus the largest metropolitan cluster,
/// which boosts the infrastructure score of nearby sites.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct Region {
    pub bounds: RegionBounds,
    pub metro_anchor: GeoLocation,
}

impl Region {
    pub fn minnesota() -> Self {
        Region {
            bounds: RegionBounds {
                min_lat: 43.0,
                max_lat: 49.5,
                min_lon: -97.5,
                max_lon: -89.0,
            },
            metro_anchor: GeoLocation::new(44.9778, -93.2650),
        }
    }

    /// Clamp to the region, logging when the input was outside it.
    pub fn constrain(&self, location: GeoLocation, what: &str) -> GeoLocation {
        if self.bounds.contains(location) {
            location
        } else {
            let clamped = self.bounds.clamp(location);
            log::warn!(
                "{} at ({:.6}, {:.6}) is outside the region, clamped to ({:.6}, {:.6})",
                what,
                location.lat,
                location.lon,
                clamped.lat,
                clamped.lon
            );
            clamped
        }
    }
}

impl Default for Region {
    fn default() -> Self {
        Region::minnesota()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn haversine_of_identical_points_is_zero() {
        let a = GeoLocation::new(44.0, -93.0);
        assert_eq!(a.distance_to(a), 0.0);
    }

    #[test]
    fn one_degree_of_latitude_is_about_111_km() {
        let a = GeoLocation::new(44.0, -93.0);
        let b = GeoLocation::new(45.0, -93.0);
        let d = a.distance_to(b);
        assert!((d - 111.19).abs() < 0.1, "got {}", d);
    }

    #[test]
    fn clamp_moves_outside_points_to_nearest_boundary() {
        let region = Region::minnesota();
        let clamped = region.bounds.clamp(GeoLocation::new(50.2, -100.0));
        assert_eq!(clamped, GeoLocation::new(49.5, -97.5));

        let inside = GeoLocation::new(45.0, -93.0);
        assert_eq!(region.constrain(inside, "point"), inside);
    }

    #[test]
    fn inverted_bounds_clamp_like_ordered_ones() {
        let bounds: RegionBounds = serde_json::from_str(
            r#"{"min_lat": 49.5, "max_lat": 43.0, "min_lon": -89.0, "max_lon": -97.5}"#,
        )
        .unwrap();

        let clamped = bounds.clamp(GeoLocation::new(50.2, -100.0));
        assert_eq!(clamped, GeoLocation::new(49.5, -97.5));
        assert!(bounds.contains(GeoLocation::new(45.0, -93.0)));
    }

    #[test]
    fn rounding_keeps_requested_precision() {
        let loc = GeoLocation::new(44.12345678, -93.98765432).rounded(6);
        assert_eq!(loc, GeoLocation::new(44.123457, -93.987654));
    }
}
