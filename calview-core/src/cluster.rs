//! Cross-event agreement on where campus is.
//!
//! No trusted campus coordinate is known up front, so it is inferred from the
//! schedule itself: most classes sit within a few kilometres of each other, so
//! the median of all first-pass lookups lands on campus even when a few
//! lookups resolved to the wrong city. Lookups far from that centre are
//! treated as mis-geocodes and retried near the best-trusted location.

use std::collections::HashMap;

use serde::Serialize;
use tracing::{debug, info};

use crate::geo::Coordinates;
use crate::geocode::{GeocodeGateway, GeocodeOutcome, GeocodeProvider, UnresolvedReason};

/// Lookups further than this from the centroid are outliers.
pub const OUTLIER_DISTANCE_KM: f64 = 50.0;

/// Non-outliers below this confidence get a biased second lookup.
pub const RETRY_CONFIDENCE_THRESHOLD: f64 = 0.5;

/// One distinct cleaned location and what it resolved to.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LocationEntry {
    /// Cleaned location, the map key.
    pub location: String,
    /// The string actually sent to the provider.
    pub query: String,
    pub outcome: GeocodeOutcome,
}

/// Insertion-ordered map of cleaned location to geocode result.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GeocodedLocations {
    entries: Vec<LocationEntry>,
    index: HashMap<String, usize>,
}

impl GeocodedLocations {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace, keeping the original position on replace.
    pub fn insert(&mut self, location: String, query: String, outcome: GeocodeOutcome) {
        match self.index.get(&location) {
            Some(&i) => {
                self.entries[i].query = query;
                self.entries[i].outcome = outcome;
            }
            None => {
                self.index.insert(location.clone(), self.entries.len());
                self.entries.push(LocationEntry {
                    location,
                    query,
                    outcome,
                });
            }
        }
    }

    pub fn get(&self, location: &str) -> Option<&LocationEntry> {
        self.index.get(location).map(|&i| &self.entries[i])
    }

    pub fn outcome(&self, location: &str) -> Option<&GeocodeOutcome> {
        self.get(location).map(|e| &e.outcome)
    }

    pub fn iter(&self) -> impl Iterator<Item = &LocationEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries that have coordinates, in first-seen order.
    pub fn located(&self) -> impl Iterator<Item = (&LocationEntry, Coordinates)> {
        self.entries
            .iter()
            .filter_map(|e| e.outcome.coordinates().map(|c| (e, c)))
    }

    pub fn located_count(&self) -> usize {
        self.located().count()
    }
}

impl FromIterator<LocationEntry> for GeocodedLocations {
    fn from_iter<I: IntoIterator<Item = LocationEntry>>(iter: I) -> Self {
        let mut map = GeocodedLocations::new();
        for entry in iter {
            map.insert(entry.location, entry.query, entry.outcome);
        }
        map
    }
}

/// Where an anchor point came from.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "name", rename_all = "snake_case")]
pub enum AnchorSource {
    /// The most trusted non-outlier lookup.
    Location(String),
    /// The median centre of all lookups.
    Centroid,
    /// A configured campus coordinate.
    School(String),
}

/// The bias point for second-pass lookups.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Anchor {
    pub point: Coordinates,
    pub source: AnchorSource,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ClusterSummary {
    pub centroid: Option<Coordinates>,
    pub outliers: Vec<String>,
    pub anchor: Option<Anchor>,
}

impl ClusterSummary {
    pub fn analyze(locations: &GeocodedLocations) -> Self {
        let centroid = centroid(locations);
        let outliers = centroid
            .map(|c| find_outliers(locations, c))
            .unwrap_or_default();
        let anchor = select_anchor(locations, &outliers, centroid);

        ClusterSummary {
            centroid,
            outliers,
            anchor,
        }
    }

    /// Use `fallback` only if no anchor could be inferred.
    pub fn with_fallback_anchor(mut self, fallback: Option<Anchor>) -> Self {
        if self.anchor.is_none() {
            self.anchor = fallback;
        }
        self
    }

    pub fn is_outlier(&self, location: &str) -> bool {
        self.outliers.iter().any(|o| o == location)
    }
}

/// Median of `values`; the mean of the middle two for even counts.
pub fn median(values: &mut [f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    values.sort_by(f64::total_cmp);

    let mid = values.len() / 2;
    if values.len() % 2 == 1 {
        Some(values[mid])
    } else {
        Some((values[mid - 1] + values[mid]) / 2.0)
    }
}

/// Per-axis median of all located entries.
pub fn centroid(locations: &GeocodedLocations) -> Option<Coordinates> {
    let (mut lats, mut lngs): (Vec<f64>, Vec<f64>) =
        locations.located().map(|(_, c)| (c.lat, c.lng)).unzip();

    Some(Coordinates::new(median(&mut lats)?, median(&mut lngs)?))
}

/// Located entries further than [`OUTLIER_DISTANCE_KM`] from `centroid`.
pub fn find_outliers(locations: &GeocodedLocations, centroid: Coordinates) -> Vec<String> {
    locations
        .located()
        .filter(|(_, c)| c.distance_km(&centroid) > OUTLIER_DISTANCE_KM)
        .map(|(e, _)| e.location.clone())
        .collect()
}

/// Highest-confidence located non-outlier (first seen wins ties), else the
/// centroid.
pub fn select_anchor(
    locations: &GeocodedLocations,
    outliers: &[String],
    centroid: Option<Coordinates>,
) -> Option<Anchor> {
    let mut best: Option<(&LocationEntry, Coordinates)> = None;

    for (entry, coords) in locations.located() {
        if outliers.contains(&entry.location) {
            continue;
        }
        let better = match best {
            Some((current, _)) => entry.outcome.confidence() > current.outcome.confidence(),
            None => true,
        };
        if better {
            best = Some((entry, coords));
        }
    }

    match best {
        Some((entry, point)) => Some(Anchor {
            point,
            source: AnchorSource::Location(entry.location.clone()),
        }),
        None => centroid.map(|point| Anchor {
            point,
            source: AnchorSource::Centroid,
        }),
    }
}

/// Second pass: re-geocode doubtful entries biased towards the anchor.
///
/// - Outliers are retried and kept only if the retry lands within
///   [`OUTLIER_DISTANCE_KM`] of the anchor; otherwise they lose their
///   coordinates.
/// - Other entries with low confidence or no coordinates take the retry
///   whenever it finds something.
///
/// Without an anchor there is nothing to bias towards and the map is
/// returned as is.
pub async fn refine<P: GeocodeProvider>(
    gateway: &GeocodeGateway<'_, P>,
    locations: GeocodedLocations,
    summary: &ClusterSummary,
) -> GeocodedLocations {
    let Some(anchor) = &summary.anchor else {
        debug!("No anchor, skipping re-geocode pass");
        return locations;
    };

    let mut refined = GeocodedLocations::new();
    let mut retried = 0usize;

    for entry in locations.entries {
        let outcome = if summary.is_outlier(&entry.location) {
            retried += 1;
            let retry = gateway.lookup(&entry.query, Some(anchor.point)).await;
            match retry.coordinates() {
                Some(c) if c.distance_km(&anchor.point) <= OUTLIER_DISTANCE_KM => retry,
                _ => {
                    debug!(location = %entry.location, "Outlier retry still off campus, dropping");
                    GeocodeOutcome::unresolved(UnresolvedReason::RejectedOutlier)
                }
            }
        } else if entry.outcome.confidence() < RETRY_CONFIDENCE_THRESHOLD
            || !entry.outcome.is_located()
        {
            retried += 1;
            let retry = gateway.lookup(&entry.query, Some(anchor.point)).await;
            if retry.is_located() { retry } else { entry.outcome }
        } else {
            entry.outcome
        };

        refined.insert(entry.location, entry.query, outcome);
    }

    info!(
        retried,
        located = refined.located_count(),
        total = refined.len(),
        "Re-geocode pass complete"
    );

    refined
}
