//! Error types for calview.

use thiserror::Error;

/// Errors that can occur while turning a calendar file into occurrences.
///
/// Only request-level failures surface here. Per-location geocoding problems
/// are carried as [`crate::geocode::GeocodeOutcome::Unresolved`] instead.
#[derive(Error, Debug)]
pub enum CalViewError {
    #[error("Invalid ICS file: {0}")]
    IcsParse(String),

    #[error("No valid events found")]
    NoEvents,

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Geocoding error: {0}")]
    Geocode(String),
}

/// Result type alias for calview operations.
pub type CalViewResult<T> = Result<T, CalViewError>;
