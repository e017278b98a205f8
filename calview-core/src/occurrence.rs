//! Concrete dated class meetings, the pipeline's output.

use chrono::{NaiveDate, NaiveTime, Weekday};
use serde::{Deserialize, Serialize};

use crate::geo::Coordinates;
use crate::recurrence::{weekday_code, weekday_name};

/// One (event, date) pair.
#[derive(Debug, Clone, PartialEq)]
pub struct Occurrence {
    pub title: String,
    /// Location as written in the calendar file, not the cleaned form.
    pub location: String,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub date: NaiveDate,
    pub weekday: Weekday,
    pub coordinates: Option<Coordinates>,
}

impl Occurrence {
    pub fn day_code(&self) -> &'static str {
        weekday_code(self.weekday)
    }

    pub fn day_name(&self) -> &'static str {
        weekday_name(self.weekday)
    }
}

/// Flat, serializable view handed to persistence and clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OccurrenceRecord {
    pub title: String,
    pub location: String,
    /// HH:MM
    pub start: String,
    /// HH:MM
    pub end: String,
    /// YYYY-MM-DD
    pub date: String,
    pub day_code: String,
    #[serde(rename = "dayOfWeek")]
    pub day_of_week: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl From<&Occurrence> for OccurrenceRecord {
    fn from(o: &Occurrence) -> Self {
        OccurrenceRecord {
            title: o.title.clone(),
            location: o.location.clone(),
            start: o.start_time.format("%H:%M").to_string(),
            end: o.end_time.format("%H:%M").to_string(),
            date: o.date.format("%Y-%m-%d").to_string(),
            day_code: o.day_code().to_string(),
            day_of_week: o.day_name().to_string(),
            latitude: o.coordinates.map(|c| c.lat),
            longitude: o.coordinates.map(|c| c.lng),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_formats() {
        let occurrence = Occurrence {
            title: "CS 2150".into(),
            location: "Rice Hall 130".into(),
            start_time: NaiveTime::from_hms_opt(9, 5, 0).unwrap(),
            end_time: NaiveTime::from_hms_opt(9, 55, 30).unwrap(),
            date: NaiveDate::from_ymd_opt(2024, 1, 17).unwrap(),
            weekday: Weekday::Wed,
            coordinates: None,
        };

        let record = OccurrenceRecord::from(&occurrence);
        assert_eq!(record.start, "09:05");
        assert_eq!(record.end, "09:55");
        assert_eq!(record.date, "2024-01-17");
        assert_eq!(record.day_code, "WE");
        assert_eq!(record.day_of_week, "Wednesday");

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["dayOfWeek"], "Wednesday");
        assert!(json["latitude"].is_null());
        assert!(json["longitude"].is_null());
    }
}
