//! Geographic primitives: points, bounding boxes and great-circle distance.

use serde::{Deserialize, Serialize};

/// Mean Earth radius used for haversine distances.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// A latitude/longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinates {
    pub fn new(lat: f64, lng: f64) -> Self {
        Coordinates { lat, lng }
    }

    /// Great-circle distance to `other` in kilometres.
    pub fn distance_km(&self, other: &Coordinates) -> f64 {
        haversine_km(self.lat, self.lng, other.lat, other.lng)
    }
}

impl std::fmt::Display for Coordinates {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.6},{:.6}", self.lat, self.lng)
    }
}

impl std::str::FromStr for Coordinates {
    type Err = String;

    /// Parse `"LAT,LNG"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (lat, lng) = s
            .split_once(',')
            .ok_or_else(|| format!("Invalid coordinates '{}'. Expected LAT,LNG", s))?;
        let lat: f64 = lat
            .trim()
            .parse()
            .map_err(|_| format!("Invalid latitude '{}'", lat.trim()))?;
        let lng: f64 = lng
            .trim()
            .parse()
            .map_err(|_| format!("Invalid longitude '{}'", lng.trim()))?;
        Ok(Coordinates { lat, lng })
    }
}

/// A rectangular lat/lng region, southwest to northeast.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub southwest: Coordinates,
    pub northeast: Coordinates,
}

impl BoundingBox {
    /// Box extending `delta_degrees` in each direction from `center`.
    pub fn around(center: Coordinates, delta_degrees: f64) -> Self {
        BoundingBox {
            southwest: Coordinates::new(center.lat - delta_degrees, center.lng - delta_degrees),
            northeast: Coordinates::new(center.lat + delta_degrees, center.lng + delta_degrees),
        }
    }
}

/// Haversine distance between two points in kilometres.
pub fn haversine_km(lat1: f64, lng1: f64, lat2: f64, lng2: f64) -> f64 {
    let d_lat = (lat2 - lat1).to_radians();
    let d_lng = (lng2 - lng1).to_radians();

    let a = (d_lat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (d_lng / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}
