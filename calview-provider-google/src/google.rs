//! Google Geocoding API client.

use std::time::Duration;

use anyhow::{Context, Result};
use calview_core::error::{CalViewError, CalViewResult};
use calview_core::geo::{BoundingBox, Coordinates};
use calview_core::geocode::{Candidate, GeocodeProvider, LocationPrecision};
use serde::Deserialize;
use tracing::debug;

use crate::app_config::{self, Credentials};

const ENDPOINT: &str = "https://maps.googleapis.com/maps/api/geocode/json";

/// Transport-level timeout; the gateway applies its own per-lookup timeout on top.
const HTTP_TIMEOUT: Duration = Duration::from_secs(15);

#[derive(Debug, Deserialize)]
struct GeocodeResponse {
    status: String,
    #[serde(default)]
    results: Vec<GeocodeResult>,
    #[serde(default)]
    error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GeocodeResult {
    #[serde(default)]
    formatted_address: String,
    geometry: Geometry,
    #[serde(default)]
    types: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct Geometry {
    location: LatLng,
    #[serde(default)]
    location_type: Option<String>,
}

#[derive(Debug, Deserialize)]
struct LatLng {
    lat: f64,
    lng: f64,
}

impl From<GeocodeResult> for Candidate {
    fn from(result: GeocodeResult) -> Self {
        Candidate {
            coordinates: Coordinates::new(result.geometry.location.lat, result.geometry.location.lng),
            precision: result
                .geometry
                .location_type
                .as_deref()
                .map(LocationPrecision::from_provider_str)
                .unwrap_or(LocationPrecision::Unknown),
            types: result.types,
            formatted_address: result.formatted_address,
        }
    }
}

pub struct GoogleGeocoder {
    client: reqwest::Client,
    credentials: Credentials,
}

impl GoogleGeocoder {
    fn new(credentials: Credentials) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(HTTP_TIMEOUT)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(GoogleGeocoder {
            client,
            credentials,
        })
    }

    /// Build a geocoder from `GOOGLE_MAPS_KEY` or the credentials file.
    pub fn from_env() -> Result<Self> {
        Self::new(app_config::load()?)
    }

    async fn request(&self, address: &str, bounds: Option<BoundingBox>) -> Result<Vec<Candidate>> {
        let mut query = vec![
            ("address", address.to_string()),
            ("key", self.credentials.api_key.clone()),
        ];
        if let Some(bounds) = bounds {
            query.push(("bounds", format_bounds(&bounds)));
        }

        let response: GeocodeResponse = self
            .client
            .get(ENDPOINT)
            .query(&query)
            .send()
            .await
            .with_context(|| format!("Geocoding request failed for '{}'", address))?
            .error_for_status()
            .context("Geocoding API returned an error status")?
            .json()
            .await
            .context("Failed to decode geocoding response")?;

        candidates_from_response(response)
    }
}

impl GeocodeProvider for GoogleGeocoder {
    async fn geocode(
        &self,
        address: &str,
        bounds: Option<BoundingBox>,
    ) -> CalViewResult<Vec<Candidate>> {
        self.request(address, bounds)
            .await
            .map_err(|e| CalViewError::Geocode(format!("{:#}", e)))
    }
}

/// `ZERO_RESULTS` is an empty answer, not an error.
fn candidates_from_response(response: GeocodeResponse) -> Result<Vec<Candidate>> {
    match response.status.as_str() {
        "OK" => {
            debug!(count = response.results.len(), "Geocoding candidates");
            Ok(response.results.into_iter().map(Candidate::from).collect())
        }
        "ZERO_RESULTS" => Ok(Vec::new()),
        status => match response.error_message {
            Some(message) => anyhow::bail!("{}: {}", status, message),
            None => anyhow::bail!("{}", status),
        },
    }
}

/// `south,west|north,east`
fn format_bounds(bounds: &BoundingBox) -> String {
    format!(
        "{},{}|{},{}",
        bounds.southwest.lat, bounds.southwest.lng, bounds.northeast.lat, bounds.northeast.lng
    )
}
