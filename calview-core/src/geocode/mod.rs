//! Address-to-coordinate resolution.
//!
//! A [`GeocodeProvider`] performs the external lookup; the
//! [`GeocodeGateway`] wraps it with bias handling, caching, timeouts and
//! failure containment, and turns the best candidate into a
//! [`GeocodeOutcome`].

mod cache;
mod confidence;
mod gateway;
mod provider;

pub use cache::{CacheKey, LocationCache};
pub use confidence::{HIGH_CONFIDENCE_TYPES, INSTITUTION_KEYWORDS, confidence_score};
pub use gateway::{BIAS_DELTA_DEGREES, DEFAULT_LOOKUP_TIMEOUT, GeocodeGateway};
pub use provider::{Candidate, GeocodeProvider, LocationPrecision};

use serde::Serialize;

use crate::geo::Coordinates;

/// Why a location ended up without coordinates.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum UnresolvedReason {
    /// Nothing to look up.
    EmptyAddress,
    /// The provider answered but had no candidates.
    NoMatch,
    /// The provider call failed.
    Provider(String),
    /// The provider did not answer in time.
    Timeout,
    /// A retry for an outlier still landed too far from the anchor.
    RejectedOutlier,
}

impl std::fmt::Display for UnresolvedReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UnresolvedReason::EmptyAddress => write!(f, "empty address"),
            UnresolvedReason::NoMatch => write!(f, "no match"),
            UnresolvedReason::Provider(msg) => write!(f, "provider error: {msg}"),
            UnresolvedReason::Timeout => write!(f, "timed out"),
            UnresolvedReason::RejectedOutlier => write!(f, "rejected outlier"),
        }
    }
}

/// Result of geocoding one cleaned location.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum GeocodeOutcome {
    Located {
        coordinates: Coordinates,
        /// See [`confidence_score`].
        confidence: f64,
        /// The provider candidate the coordinates came from.
        candidate: Candidate,
    },
    Unresolved { reason: UnresolvedReason },
}

impl GeocodeOutcome {
    pub fn located(candidate: Candidate) -> Self {
        GeocodeOutcome::Located {
            coordinates: candidate.coordinates,
            confidence: confidence_score(&candidate),
            candidate,
        }
    }

    pub fn unresolved(reason: UnresolvedReason) -> Self {
        GeocodeOutcome::Unresolved { reason }
    }

    pub fn coordinates(&self) -> Option<Coordinates> {
        match self {
            GeocodeOutcome::Located { coordinates, .. } => Some(*coordinates),
            GeocodeOutcome::Unresolved { .. } => None,
        }
    }

    /// Confidence in [0, 1]; always 0 when unresolved.
    pub fn confidence(&self) -> f64 {
        match self {
            GeocodeOutcome::Located { confidence, .. } => *confidence,
            GeocodeOutcome::Unresolved { .. } => 0.0,
        }
    }

    pub fn is_located(&self) -> bool {
        matches!(self, GeocodeOutcome::Located { .. })
    }
}
