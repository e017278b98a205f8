//! The external geocoding seam.

use std::future::Future;

use serde::{Deserialize, Serialize};

use crate::error::CalViewResult;
use crate::geo::{BoundingBox, Coordinates};

/// How precisely a candidate's coordinates pin down the address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LocationPrecision {
    Rooftop,
    RangeInterpolated,
    GeometricCenter,
    Approximate,
    Unknown,
}

impl LocationPrecision {
    /// Map a Google-style `location_type` string.
    pub fn from_provider_str(value: &str) -> Self {
        match value.to_ascii_uppercase().as_str() {
            "ROOFTOP" => LocationPrecision::Rooftop,
            "RANGE_INTERPOLATED" => LocationPrecision::RangeInterpolated,
            "GEOMETRIC_CENTER" => LocationPrecision::GeometricCenter,
            "APPROXIMATE" => LocationPrecision::Approximate,
            _ => LocationPrecision::Unknown,
        }
    }
}

/// One match returned by a provider, best first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub coordinates: Coordinates,
    pub precision: LocationPrecision,
    /// Provider type tags ("establishment", "university", ...).
    pub types: Vec<String>,
    pub formatted_address: String,
}

/// An address lookup service.
///
/// Implementations return candidates in the provider's ranking order. An
/// empty list means "no match"; errors are transport or API failures.
pub trait GeocodeProvider {
    fn geocode(
        &self,
        address: &str,
        bounds: Option<BoundingBox>,
    ) -> impl Future<Output = CalViewResult<Vec<Candidate>>> + Send;
}
