//! Geocoder selection for CLI commands.

use anyhow::Result;
use calview_core::error::CalViewResult;
use calview_core::geo::BoundingBox;
use calview_core::geocode::{Candidate, GeocodeProvider};
use calview_provider_google::GoogleGeocoder;

pub enum Geocoder {
    Google(GoogleGeocoder),
    /// Answers every lookup with "no match".
    Offline,
}

impl Geocoder {
    pub fn select(offline: bool) -> Result<Self> {
        if offline {
            Ok(Geocoder::Offline)
        } else {
            Ok(Geocoder::Google(GoogleGeocoder::from_env()?))
        }
    }
}

impl GeocodeProvider for Geocoder {
    async fn geocode(
        &self,
        address: &str,
        bounds: Option<BoundingBox>,
    ) -> CalViewResult<Vec<Candidate>> {
        match self {
            Geocoder::Google(google) => google.geocode(address, bounds).await,
            Geocoder::Offline => Ok(Vec::new()),
        }
    }
}
