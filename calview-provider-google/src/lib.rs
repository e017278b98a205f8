//! calview-provider-google - Google Geocoding API provider for calview
//!
//! The API key is read from `GOOGLE_MAPS_KEY`, or from:
//!   ~/.config/calview/providers/google.toml

mod app_config;
mod google;

pub use google::GoogleGeocoder;
