//! ICS file parsing using the icalendar crate's parser.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use icalendar::{
    CalendarDateTime, DatePerhapsTime,
    parser::{Component, read_calendar, unfold},
};
use tracing::debug;

use crate::error::{CalViewError, CalViewResult};
use crate::event::{DEFAULT_TITLE, RawEvent};
use crate::recurrence::RecurrenceRule;

/// Parse ICS content into the events it contains.
///
/// Fails if the content is not a calendar, if it holds no VEVENT, or if any
/// VEVENT lacks a usable DTSTART.
pub fn parse_calendar(content: &str) -> CalViewResult<Vec<RawEvent>> {
    let unfolded = unfold(content);
    let calendar =
        read_calendar(&unfolded).map_err(|e| CalViewError::IcsParse(e.to_string()))?;

    let mut vevents = Vec::new();
    collect_vevents(&calendar.components, &mut vevents);

    let events = vevents
        .into_iter()
        .map(parse_vevent)
        .collect::<CalViewResult<Vec<_>>>()?;
    debug!(count = events.len(), "Parsed calendar events");

    if events.is_empty() {
        return Err(CalViewError::NoEvents);
    }

    Ok(events)
}

/// VEVENTs may sit at the top level or inside a VCALENDAR component.
fn collect_vevents<'a>(components: &'a [Component<'a>], out: &mut Vec<&'a Component<'a>>) {
    for component in components {
        if component.name == "VEVENT" {
            out.push(component);
        } else if component.name == "VCALENDAR" {
            collect_vevents(&component.components, out);
        }
    }
}

fn parse_vevent(vevent: &Component) -> CalViewResult<RawEvent> {
    let title = vevent
        .find_prop("SUMMARY")
        .map(|p| p.val.to_string())
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_TITLE.to_string());

    let Some(start) = vevent
        .find_prop("DTSTART")
        .and_then(|p| DatePerhapsTime::try_from(p).ok())
        .map(wall_clock)
    else {
        return Err(CalViewError::IcsParse(format!(
            "event '{title}' has no usable DTSTART"
        )));
    };

    let end = vevent
        .find_prop("DTEND")
        .and_then(|p| DatePerhapsTime::try_from(p).ok())
        .map(wall_clock)
        .unwrap_or(start);

    let location = vevent
        .find_prop("LOCATION")
        .map(|p| p.val.to_string())
        .unwrap_or_default();

    let start_date = start.date();
    let rule = vevent
        .find_prop("RRULE")
        .map(|p| RecurrenceRule::from_rrule(Some(p.val.as_ref()), start_date));

    Ok(RawEvent {
        title,
        location,
        start_date,
        start_time: start.time(),
        end_time: end.time(),
        rule,
    })
}

/// Local wall-clock reading of a DTSTART/DTEND value.
///
/// Zoned and floating values keep their local time, UTC values their UTC time,
/// and all-day values start at midnight.
fn wall_clock(value: DatePerhapsTime) -> NaiveDateTime {
    match value {
        DatePerhapsTime::Date(d) => midnight(d),
        DatePerhapsTime::DateTime(dt) => match dt {
            CalendarDateTime::Utc(dt) => dt.naive_utc(),
            CalendarDateTime::Floating(naive) => naive,
            CalendarDateTime::WithTimezone { date_time, .. } => date_time,
        },
    }
}

fn midnight(date: NaiveDate) -> NaiveDateTime {
    date.and_time(NaiveTime::MIN)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Weekday;

    const SCHEDULE: &str = r#"BEGIN:VCALENDAR
VERSION:2.0
PRODID:TEST
BEGIN:VEVENT
UID:math-101
SUMMARY:Math 101
LOCATION:Room 101
DTSTART;TZID=America/New_York:20240115T090000
DTEND;TZID=America/New_York:20240115T095000
RRULE:FREQ=WEEKLY;BYDAY=MO,WE,FR;UNTIL=20240215T235959Z
END:VEVENT
BEGIN:VEVENT
UID:online
SUMMARY:Online Meeting
DTSTART:20240116T140000
DTEND:20240116T150000
END:VEVENT
END:VCALENDAR"#;

    #[test]
    fn test_parse_schedule() {
        let events = parse_calendar(SCHEDULE).expect("Should parse");
        assert_eq!(events.len(), 2);

        let math = &events[0];
        assert_eq!(math.title, "Math 101");
        assert_eq!(math.location, "Room 101");
        assert_eq!(math.start_date, NaiveDate::from_ymd_opt(2024, 1, 15).unwrap());
        assert_eq!(math.start_time, NaiveTime::from_hms_opt(9, 0, 0).unwrap());
        assert_eq!(math.end_time, NaiveTime::from_hms_opt(9, 50, 0).unwrap());

        let rule = math.rule.as_ref().expect("Should have recurrence");
        assert_eq!(rule.weekdays, vec![Weekday::Mon, Weekday::Wed, Weekday::Fri]);
        assert_eq!(rule.until, NaiveDate::from_ymd_opt(2024, 2, 15));

        let online = &events[1];
        assert_eq!(online.location, "");
        assert!(online.rule.is_none());
        assert_eq!(online.recurrence().dates().count(), 1);
    }

    #[test]
    fn test_missing_summary_defaults_to_untitled() {
        let ics = "BEGIN:VCALENDAR\r\n\
VERSION:2.0\r\n\
PRODID:TEST\r\n\
BEGIN:VEVENT\r\n\
UID:x\r\n\
DTSTART:20240301T100000Z\r\n\
DTEND:20240301T110000Z\r\n\
END:VEVENT\r\n\
END:VCALENDAR";

        let events = parse_calendar(ics).expect("Should parse");
        assert_eq!(events[0].title, DEFAULT_TITLE);
        assert_eq!(events[0].start_time, NaiveTime::from_hms_opt(10, 0, 0).unwrap());
    }

    #[test]
    fn test_folded_location_is_unfolded() {
        let ics = "BEGIN:VCALENDAR\r\n\
VERSION:2.0\r\n\
PRODID:TEST\r\n\
BEGIN:VEVENT\r\n\
UID:x\r\n\
SUMMARY:Lab\r\n\
LOCATION:Jesse Beams \r\n Lab 204\r\n\
DTSTART:20240301T100000\r\n\
END:VEVENT\r\n\
END:VCALENDAR";

        let events = parse_calendar(ics).expect("Should parse");
        assert_eq!(events[0].location, "Jesse Beams Lab 204");
        assert_eq!(events[0].end_time, events[0].start_time);
    }

    #[test]
    fn test_all_day_event_starts_at_midnight() {
        let ics = r#"BEGIN:VCALENDAR
VERSION:2.0
PRODID:TEST
BEGIN:VEVENT
UID:exam
SUMMARY:Reading Day
DTSTART;VALUE=DATE:20240501
DTEND;VALUE=DATE:20240502
END:VEVENT
END:VCALENDAR"#;

        let events = parse_calendar(ics).expect("Should parse");
        assert_eq!(events[0].start_time, NaiveTime::MIN);
        assert_eq!(events[0].start_date, NaiveDate::from_ymd_opt(2024, 5, 1).unwrap());
    }

    #[test]
    fn test_empty_calendar_is_rejected() {
        let ics = r#"BEGIN:VCALENDAR
VERSION:2.0
PRODID:TEST
END:VCALENDAR"#;

        assert!(matches!(parse_calendar(ics), Err(CalViewError::NoEvents)));
    }

    #[test]
    fn test_event_without_start_rejects_file() {
        let ics = r#"BEGIN:VCALENDAR
VERSION:2.0
PRODID:TEST
BEGIN:VEVENT
UID:broken
SUMMARY:No Start
END:VEVENT
END:VCALENDAR"#;

        match parse_calendar(ics) {
            Err(CalViewError::IcsParse(msg)) => assert!(msg.contains("No Start")),
            other => panic!("Expected IcsParse, got {:?}", other),
        }
    }

    #[test]
    fn test_one_broken_event_rejects_whole_file() {
        let ics = r#"BEGIN:VCALENDAR
VERSION:2.0
PRODID:TEST
BEGIN:VEVENT
UID:good
SUMMARY:Good
DTSTART:20240301T100000
END:VEVENT
BEGIN:VEVENT
UID:broken
SUMMARY:Broken
DTSTART:notadate
END:VEVENT
END:VCALENDAR"#;

        match parse_calendar(ics) {
            Err(CalViewError::IcsParse(msg)) => assert!(msg.contains("Broken")),
            other => panic!("Expected IcsParse, got {:?}", other),
        }
    }
}
