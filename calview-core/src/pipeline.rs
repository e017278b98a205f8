//! One calendar file in, dated and geocoded occurrences out.
//!
//! ```text
//! parse -> distinct locations -> pass 1 -> cluster -> pass 2 -> expand
//! ```
//!
//! Each geocode pass is a function from one [`GeocodedLocations`] to the
//! next; nothing is mutated across steps.

use std::time::Duration;

use chrono::Datelike;
use tracing::info;

use crate::cluster::{Anchor, AnchorSource, ClusterSummary, GeocodedLocations, refine};
use crate::error::CalViewResult;
use crate::event::RawEvent;
use crate::geocode::{DEFAULT_LOOKUP_TIMEOUT, GeocodeGateway, GeocodeProvider, LocationCache};
use crate::ics::parse_calendar;
use crate::occurrence::Occurrence;
use crate::school::SchoolDirectory;

/// Everything one run produced, for callers that want more than the records.
#[derive(Debug, Clone)]
pub struct PipelineReport {
    pub occurrences: Vec<Occurrence>,
    pub locations: GeocodedLocations,
    pub summary: ClusterSummary,
}

pub struct CalendarPipeline<'a, P> {
    provider: &'a P,
    cache: &'a LocationCache,
    schools: &'a SchoolDirectory,
    timeout: Duration,
}

impl<'a, P: GeocodeProvider> CalendarPipeline<'a, P> {
    pub fn new(provider: &'a P, cache: &'a LocationCache, schools: &'a SchoolDirectory) -> Self {
        CalendarPipeline {
            provider,
            cache,
            schools,
            timeout: DEFAULT_LOOKUP_TIMEOUT,
        }
    }

    /// Per-lookup timeout. A timed-out lookup counts as a failed lookup.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Run the pipeline and return only the occurrences.
    pub async fn process(&self, content: &str, hint: &str) -> CalViewResult<Vec<Occurrence>> {
        Ok(self.run(content, hint).await?.occurrences)
    }

    /// Run the pipeline.
    ///
    /// Fails only if the file cannot be parsed or has no events. Every event
    /// yields at least one occurrence; geocoding problems only null out
    /// coordinates.
    pub async fn run(&self, content: &str, hint: &str) -> CalViewResult<PipelineReport> {
        let events = parse_calendar(content)?;
        let gateway = GeocodeGateway::new(self.provider, self.cache).with_timeout(self.timeout);

        let first_pass = self.geocode_distinct(&gateway, &events, hint).await;
        info!(
            events = events.len(),
            locations = first_pass.len(),
            located = first_pass.located_count(),
            "First geocode pass complete"
        );

        let summary =
            ClusterSummary::analyze(&first_pass).with_fallback_anchor(self.school_anchor(hint));
        info!(
            centroid = ?summary.centroid,
            outliers = summary.outliers.len(),
            anchor = ?summary.anchor.as_ref().map(|a| &a.source),
            "Clustered locations"
        );

        let locations = refine(&gateway, first_pass, &summary).await;
        let occurrences = expand(&events, &locations);

        Ok(PipelineReport {
            occurrences,
            locations,
            summary,
        })
    }

    /// Pass 1: each distinct cleaned location once, unbiased, in first-seen order.
    async fn geocode_distinct(
        &self,
        gateway: &GeocodeGateway<'_, P>,
        events: &[RawEvent],
        hint: &str,
    ) -> GeocodedLocations {
        let mut locations = GeocodedLocations::new();

        for event in events {
            let cleaned = event.cleaned_location();
            if cleaned.is_empty() || locations.get(&cleaned).is_some() {
                continue;
            }
            let query = self.schools.query_for(&cleaned, hint);
            let outcome = gateway.lookup(&query, None).await;
            locations.insert(cleaned, query, outcome);
        }

        locations
    }

    fn school_anchor(&self, hint: &str) -> Option<Anchor> {
        let school = self.schools.find(hint)?;
        Some(Anchor {
            point: school.coordinates?,
            source: AnchorSource::School(school.name.clone()),
        })
    }
}

/// Expand every event into occurrences carrying its location's final result.
pub fn expand(events: &[RawEvent], locations: &GeocodedLocations) -> Vec<Occurrence> {
    events
        .iter()
        .flat_map(|event| {
            let coordinates = locations
                .outcome(&event.cleaned_location())
                .and_then(|o| o.coordinates());

            event
                .recurrence()
                .dates()
                .map(|date| Occurrence {
                    title: event.title.clone(),
                    location: event.location.clone(),
                    start_time: event.start_time,
                    end_time: event.end_time,
                    date,
                    weekday: date.weekday(),
                    coordinates,
                })
                .collect::<Vec<_>>()
        })
        .collect()
}
