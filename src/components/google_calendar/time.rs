use super::models::UpcomingEvent;
use chrono::{DateTime, Duration, FixedOffset, NaiveDate, Utc};

/// Length of every event this service creates
pub const EVENT_DURATION_HOURS: i64 = 1;

/// Most events a listing returns
pub const MAX_UPCOMING_EVENTS: usize = 10;

/// Page size requested from the remote
///
/// Larger than [`MAX_UPCOMING_EVENTS`] because entries already in progress
/// come back from the remote and are dropped locally.
pub const LIST_FETCH_LIMIT: usize = 25;

/// End time of an event starting at `start`
pub fn event_end(start: DateTime<FixedOffset>) -> DateTime<FixedOffset> {
    start + Duration::hours(EVENT_DURATION_HOURS)
}

/// Parse an event start that is either a date-time or a date
pub fn parse_event_start(value: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }

    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}

/// Whether an event starts at or after `now`
///
/// All-day entries count from the start of their day, so today's all-day
/// entries are kept. Entries with a start that cannot be read are kept.
pub fn starts_at_or_after(event: &UpcomingEvent, now: DateTime<Utc>) -> bool {
    let Some(start) = event.start.as_deref() else {
        return true;
    };

    if let Ok(date) = NaiveDate::parse_from_str(start, "%Y-%m-%d") {
        return date >= now.date_naive();
    }

    parse_event_start(start).map_or(true, |start| start >= now)
}

/// Drop entries already in progress and cap the listing length
pub fn retain_upcoming(events: Vec<UpcomingEvent>, now: DateTime<Utc>) -> Vec<UpcomingEvent> {
    events
        .into_iter()
        .filter(|event| starts_at_or_after(event, now))
        .take(MAX_UPCOMING_EVENTS)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn event(start: &str) -> UpcomingEvent {
        UpcomingEvent {
            title: Some(format!("Event at {}", start)),
            start: Some(start.to_string()),
            end: None,
        }
    }

    #[test]
    fn test_event_end() {
        let start = FixedOffset::west_opt(5 * 3600)
            .unwrap()
            .with_ymd_and_hms(2026, 12, 31, 23, 15, 0)
            .unwrap();

        let end = event_end(start);
        assert_eq!(end - start, Duration::hours(1));
        assert_eq!(end.to_rfc3339(), "2027-01-01T00:15:00-05:00");
    }

    #[test]
    fn test_parse_event_start() {
        assert_eq!(
            parse_event_start("2026-10-17T09:00:00+03:00"),
            Some(Utc.with_ymd_and_hms(2026, 10, 17, 6, 0, 0).unwrap())
        );
        assert_eq!(
            parse_event_start("2026-10-18"),
            Some(Utc.with_ymd_and_hms(2026, 10, 18, 0, 0, 0).unwrap())
        );
        assert_eq!(parse_event_start("someday"), None);
    }

    #[test]
    fn test_starts_at_or_after() {
        let now = Utc.with_ymd_and_hms(2026, 10, 16, 12, 0, 0).unwrap();

        assert!(starts_at_or_after(&event("2026-10-16T12:00:00Z"), now));
        assert!(starts_at_or_after(&event("2026-10-16T15:00:00+02:00"), now));
        assert!(!starts_at_or_after(&event("2026-10-16T11:30:00Z"), now));
        // All-day entry for today
        assert!(starts_at_or_after(&event("2026-10-16"), now));
        assert!(!starts_at_or_after(&event("2026-10-15"), now));
    }

    #[test]
    fn test_retain_upcoming_caps_length() {
        let now = Utc.with_ymd_and_hms(2026, 10, 16, 12, 0, 0).unwrap();
        let mut events = vec![event("2026-10-16T10:00:00Z")];
        events.extend((1..=12).map(|day| event(&format!("2026-11-{:02}T09:00:00Z", day))));

        let upcoming = retain_upcoming(events, now);

        assert_eq!(upcoming.len(), MAX_UPCOMING_EVENTS);
        assert_eq!(upcoming[0].start.as_deref(), Some("2026-11-01T09:00:00Z"));
    }

    #[test]
    fn test_retain_upcoming_empty() {
        let now = Utc::now();
        assert!(retain_upcoming(Vec::new(), now).is_empty());
    }
}
