//! End-to-end pipeline runs against an in-memory geocoder.

use std::collections::HashMap;
use std::sync::Mutex;

use calview_core::error::{CalViewError, CalViewResult};
use calview_core::geo::{BoundingBox, Coordinates};
use calview_core::geocode::{Candidate, GeocodeProvider, LocationCache, LocationPrecision};
use calview_core::school::SchoolDirectory;
use calview_core::CalendarPipeline;
use chrono::{Datelike, NaiveDate, Weekday};

/// Fake provider keyed by query string. Biased lookups consult `biased` first.
#[derive(Default)]
struct FakeGeocoder {
    unbiased: HashMap<String, Candidate>,
    biased: HashMap<String, Candidate>,
    failing: Vec<String>,
    calls: Mutex<Vec<(String, bool)>>,
}

impl FakeGeocoder {
    fn with(mut self, query: &str, lat: f64, lng: f64) -> Self {
        self.unbiased.insert(query.to_string(), candidate(lat, lng));
        self
    }

    fn with_biased(mut self, query: &str, lat: f64, lng: f64) -> Self {
        self.biased.insert(query.to_string(), candidate(lat, lng));
        self
    }

    fn failing(mut self, query: &str) -> Self {
        self.failing.push(query.to_string());
        self
    }

    fn calls(&self) -> Vec<(String, bool)> {
        self.calls.lock().unwrap().clone()
    }
}

fn candidate(lat: f64, lng: f64) -> Candidate {
    Candidate {
        coordinates: Coordinates::new(lat, lng),
        precision: LocationPrecision::Rooftop,
        types: vec!["establishment".into()],
        formatted_address: "University of Virginia, Charlottesville, VA".into(),
    }
}

impl GeocodeProvider for FakeGeocoder {
    async fn geocode(
        &self,
        address: &str,
        bounds: Option<BoundingBox>,
    ) -> CalViewResult<Vec<Candidate>> {
        self.calls
            .lock()
            .unwrap()
            .push((address.to_string(), bounds.is_some()));

        if self.failing.iter().any(|f| f == address) {
            return Err(CalViewError::Geocode("OVER_QUERY_LIMIT".into()));
        }

        let hit = bounds
            .and_then(|_| self.biased.get(address))
            .or_else(|| self.unbiased.get(address));
        Ok(hit.cloned().into_iter().collect())
    }
}

fn calendar(events: &[&str]) -> String {
    format!(
        "BEGIN:VCALENDAR\r\nVERSION:2.0\r\nPRODID:TEST\r\n{}END:VCALENDAR\r\n",
        events.concat()
    )
}

fn vevent(uid: &str, summary: &str, location: &str, start: &str, rrule: Option<&str>) -> String {
    let mut lines = vec![
        "BEGIN:VEVENT".to_string(),
        format!("UID:{uid}"),
        format!("SUMMARY:{summary}"),
    ];
    if !location.is_empty() {
        lines.push(format!("LOCATION:{location}"));
    }
    lines.push(format!("DTSTART:{start}"));
    lines.push(format!("DTEND:{}", start.replace("T09", "T10")));
    if let Some(rule) = rrule {
        lines.push(format!("RRULE:{rule}"));
    }
    lines.push("END:VEVENT".to_string());
    lines.iter().map(|l| format!("{l}\r\n")).collect()
}

#[tokio::test]
async fn test_weekly_event_expands_mon_wed_fri() {
    let ics = calendar(&[&vevent(
        "math",
        "Math 101",
        "Room 101",
        "20240115T090000",
        Some("FREQ=WEEKLY;BYDAY=MO,WE,FR;UNTIL=20240215"),
    )]);
    let provider = FakeGeocoder::default().with("Room", 38.0316, -78.5108);
    let cache = LocationCache::new();
    let schools = SchoolDirectory::default();
    let pipeline = CalendarPipeline::new(&provider, &cache, &schools);

    let occurrences = pipeline.process(&ics, "").await.unwrap();

    let start = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
    let end = NaiveDate::from_ymd_opt(2024, 2, 15).unwrap();
    let expected: Vec<NaiveDate> = start
        .iter_days()
        .take_while(|d| *d <= end)
        .filter(|d| matches!(d.weekday(), Weekday::Mon | Weekday::Wed | Weekday::Fri))
        .collect();

    let dates: Vec<NaiveDate> = occurrences.iter().map(|o| o.date).collect();
    assert_eq!(dates, expected);

    let first = occurrences[0].coordinates;
    assert_eq!(first, Some(Coordinates::new(38.0316, -78.5108)));
    assert!(occurrences.iter().all(|o| o.coordinates == first));
    assert!(occurrences.iter().all(|o| o.location == "Room 101"));
    assert!(occurrences.iter().all(|o| o.weekday == o.date.weekday()));

    // One lookup for the one distinct location.
    assert_eq!(provider.calls().len(), 1);
}

#[tokio::test]
async fn test_empty_location_yields_null_coordinates() {
    let ics = calendar(&[
        &vevent("online", "Online Meeting", "", "20240116T090000", None),
        &vevent("cs", "CS 2150", "Rice Hall 130", "20240117T090000", None),
    ]);
    let provider = FakeGeocoder::default().with("Rice Hall", 38.0316, -78.5108);
    let cache = LocationCache::disabled();
    let schools = SchoolDirectory::default();
    let pipeline = CalendarPipeline::new(&provider, &cache, &schools);

    let occurrences = pipeline.process(&ics, "").await.unwrap();

    assert_eq!(occurrences.len(), 2);
    assert_eq!(occurrences[0].title, "Online Meeting");
    assert_eq!(occurrences[0].coordinates, None);
    assert!(occurrences[1].coordinates.is_some());
    assert!(provider.calls().iter().all(|(q, _)| !q.is_empty()));
}

#[tokio::test]
async fn test_no_events_is_rejected() {
    let provider = FakeGeocoder::default();
    let cache = LocationCache::disabled();
    let schools = SchoolDirectory::default();
    let pipeline = CalendarPipeline::new(&provider, &cache, &schools);

    let result = pipeline.process(&calendar(&[]), "").await;
    assert!(matches!(result, Err(CalViewError::NoEvents)));
}

#[tokio::test]
async fn test_garbage_is_rejected() {
    let provider = FakeGeocoder::default();
    let cache = LocationCache::disabled();
    let schools = SchoolDirectory::default();
    let pipeline = CalendarPipeline::new(&provider, &cache, &schools);

    assert!(pipeline.process("definitely not a calendar", "").await.is_err());
}

#[tokio::test]
async fn test_event_with_bad_start_rejects_file() {
    let ics = calendar(&[
        &vevent("good", "Good", "Rice Hall", "20240117T090000", None),
        &vevent("broken", "Broken", "Olsson Hall", "notadate", None),
    ]);
    let provider = FakeGeocoder::default().with("Rice Hall", 38.0316, -78.5108);
    let cache = LocationCache::disabled();
    let schools = SchoolDirectory::default();
    let pipeline = CalendarPipeline::new(&provider, &cache, &schools);

    let result = pipeline.process(&ics, "").await;
    assert!(matches!(result, Err(CalViewError::IcsParse(_))));
    assert!(provider.calls().is_empty());
}

#[tokio::test]
async fn test_geocode_failure_does_not_abort() {
    let ics = calendar(&[&vevent("cs", "CS 2150", "Rice Hall", "20240117T090000", None)]);
    let provider = FakeGeocoder::default().failing("Rice Hall");
    let cache = LocationCache::new();
    let schools = SchoolDirectory::default();
    let pipeline = CalendarPipeline::new(&provider, &cache, &schools);

    let occurrences = pipeline.process(&ics, "").await.unwrap();
    assert_eq!(occurrences.len(), 1);
    assert_eq!(occurrences[0].coordinates, None);
}

#[tokio::test]
async fn test_outlier_is_corrected_near_campus() {
    let hint = "University of Virginia";
    let suffix = ", University of Virginia, Charlottesville, VA";
    let ics = calendar(&[
        &vevent("a", "CS 2150", "Thornton Hall 101", "20240115T090000", None),
        &vevent("b", "APMA 3080", "Olsson Hall 009", "20240116T090000", None),
        &vevent("c", "CS 3100", "Rice Hall 130", "20240117T090000", None),
        &vevent("d", "PHYS 1425", "Physics Bldg 203", "20240118T090000", None),
    ]);
    let provider = FakeGeocoder::default()
        .with(&format!("Thornton Hall{suffix}"), 38.0333, -78.5097)
        .with(&format!("Olsson Hall{suffix}"), 38.0320, -78.5100)
        .with(&format!("Rice Hall{suffix}"), 29.7174, -95.4018)
        .with_biased(&format!("Rice Hall{suffix}"), 38.0316, -78.5108)
        .with("382 McCormick Rd, Charlottesville, VA 22904", 38.0334, -78.5094);
    let cache = LocationCache::new();
    let schools = SchoolDirectory::builtin();
    let pipeline = CalendarPipeline::new(&provider, &cache, &schools);

    let report = pipeline.run(&ics, hint).await.unwrap();

    assert_eq!(report.summary.outliers, vec!["Rice Hall".to_string()]);
    let rice = report
        .occurrences
        .iter()
        .find(|o| o.title == "CS 3100")
        .unwrap();
    assert_eq!(rice.coordinates, Some(Coordinates::new(38.0316, -78.5108)));

    let physics = report
        .occurrences
        .iter()
        .find(|o| o.title == "PHYS 1425")
        .unwrap();
    assert_eq!(physics.location, "Physics Bldg 203");
    assert_eq!(physics.coordinates, Some(Coordinates::new(38.0334, -78.5094)));

    let biased: Vec<String> = provider
        .calls()
        .into_iter()
        .filter(|(_, biased)| *biased)
        .map(|(q, _)| q)
        .collect();
    assert_eq!(biased, vec![format!("Rice Hall{suffix}")]);
}

#[tokio::test]
async fn test_school_anchor_used_when_nothing_located() {
    let hint = "University of Virginia";
    let query = "Clark Hall, University of Virginia, Charlottesville, VA";
    let ics = calendar(&[&vevent("a", "ENWR 1510", "Clark Hall", "20240115T090000", None)]);
    let provider = FakeGeocoder::default().with_biased(query, 38.0330, -78.5076);
    let cache = LocationCache::disabled();
    let schools = SchoolDirectory::builtin();
    let pipeline = CalendarPipeline::new(&provider, &cache, &schools);

    let occurrences = pipeline.process(&ics, hint).await.unwrap();

    assert_eq!(occurrences[0].coordinates, Some(Coordinates::new(38.0330, -78.5076)));
    assert_eq!(provider.calls(), vec![(query.to_string(), false), (query.to_string(), true)]);
}

#[tokio::test]
async fn test_shared_cache_across_runs() {
    let ics = calendar(&[&vevent("cs", "CS 2150", "Rice Hall", "20240117T090000", None)]);
    let provider = FakeGeocoder::default().with("Rice Hall", 38.0316, -78.5108);
    let cache = LocationCache::new();
    let schools = SchoolDirectory::default();
    let pipeline = CalendarPipeline::new(&provider, &cache, &schools);

    let first = pipeline.process(&ics, "").await.unwrap();
    let second = pipeline.process(&ics, "").await.unwrap();

    assert_eq!(first, second);
    assert_eq!(provider.calls().len(), 1);
}
