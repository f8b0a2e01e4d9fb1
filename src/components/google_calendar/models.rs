use super::time::event_end;
use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

/// Start or end of an event as the Calendar API represents it
///
/// Timed events carry `dateTime`, all-day events carry `date`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventDateTime {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_zone: Option<String>,
}

impl EventDateTime {
    /// The date-time value, or the date for all-day entries
    pub fn value(&self) -> Option<String> {
        self.date_time.clone().or_else(|| self.date.clone())
    }
}

/// Calendar event as stored by the remote service
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CalendarEvent {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub start: EventDateTime,
    #[serde(default)]
    pub end: EventDateTime,
}

/// Response body of the events list call
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EventList {
    #[serde(default)]
    pub items: Vec<CalendarEvent>,
}

/// Request body of the events insert call
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewEvent {
    pub summary: String,
    pub start: EventDateTime,
    pub end: EventDateTime,
}

impl NewEvent {
    /// Build a one-hour event starting at `start`
    pub fn new(title: &str, start: DateTime<FixedOffset>, time_zone: &str) -> Self {
        let end = event_end(start);

        Self {
            summary: title.to_string(),
            start: EventDateTime {
                date_time: Some(start.to_rfc3339()),
                date: None,
                time_zone: Some(time_zone.to_string()),
            },
            end: EventDateTime {
                date_time: Some(end.to_rfc3339()),
                date: None,
                time_zone: Some(time_zone.to_string()),
            },
        }
    }
}

/// What a successful create returns to the caller
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedEvent {
    pub title: String,
    pub date: String,
    pub id: String,
}

impl CreatedEvent {
    /// Echo the remote event, falling back to what was submitted
    pub fn from_remote(event: CalendarEvent, submitted: &NewEvent) -> Self {
        Self {
            title: event.summary.unwrap_or_else(|| submitted.summary.clone()),
            date: event
                .start
                .value()
                .or_else(|| submitted.start.date_time.clone())
                .unwrap_or_default(),
            id: event.id,
        }
    }
}

/// One entry of the upcoming events listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpcomingEvent {
    pub title: Option<String>,
    pub start: Option<String>,
    pub end: Option<String>,
}

impl From<CalendarEvent> for UpcomingEvent {
    fn from(event: CalendarEvent) -> Self {
        Self {
            title: event.summary,
            start: event.start.value(),
            end: event.end.value(),
        }
    }
}
