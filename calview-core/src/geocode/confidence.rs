//! Heuristic trust score for a geocode candidate.
//!
//! The weights are hand-picked, not calibrated against ground truth. Treat
//! the score as an ordering signal ("this lookup looks more like a campus
//! building than that one"), not a probability.

use super::provider::{Candidate, LocationPrecision};

/// Type tags that indicate the provider matched a specific place.
pub const HIGH_CONFIDENCE_TYPES: &[&str] = &[
    "premise",
    "street_address",
    "establishment",
    "point_of_interest",
    "university",
];

/// Formatted-address substrings that suggest an academic building.
pub const INSTITUTION_KEYWORDS: &[&str] = &["university", "college", "campus", "hall"];

const BASE_SCORE: f64 = 0.5;
const TYPE_BONUS: f64 = 0.3;
const ROOFTOP_BONUS: f64 = 0.2;
const INTERPOLATED_BONUS: f64 = 0.1;
const KEYWORD_BONUS: f64 = 0.1;

/// Score a candidate in [0, 1].
pub fn confidence_score(candidate: &Candidate) -> f64 {
    let mut score = BASE_SCORE;

    if candidate
        .types
        .iter()
        .any(|t| HIGH_CONFIDENCE_TYPES.contains(&t.as_str()))
    {
        score += TYPE_BONUS;
    }

    score += match candidate.precision {
        LocationPrecision::Rooftop => ROOFTOP_BONUS,
        LocationPrecision::RangeInterpolated => INTERPOLATED_BONUS,
        _ => 0.0,
    };

    let address = candidate.formatted_address.to_lowercase();
    if INSTITUTION_KEYWORDS.iter().any(|k| address.contains(k)) {
        score += KEYWORD_BONUS;
    }

    score.min(1.0)
}
