use async_trait::async_trait;
use calendar_scheduler::components::google_calendar::time::{event_end, retain_upcoming};
use calendar_scheduler::components::google_calendar::{
    CalendarService, CreatedEvent, UpcomingEvent,
};
use calendar_scheduler::error::{google_calendar_error, ServiceResult};
use chrono::{DateTime, FixedOffset, Utc};
use std::sync::Mutex;

/// Event recorded by the mock on create
#[derive(Debug, Clone)]
pub struct RecordedEvent {
    pub id: String,
    pub title: String,
    pub start: DateTime<FixedOffset>,
    pub end: DateTime<FixedOffset>,
}

/// In-memory stand-in for the Google Calendar client
#[derive(Debug, Default)]
pub struct MockCalendarService {
    created: Mutex<Vec<RecordedEvent>>,
    listing: Vec<UpcomingEvent>,
    fail: bool,
}

impl MockCalendarService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mock whose listing returns these raw remote entries
    pub fn with_listing(listing: Vec<UpcomingEvent>) -> Self {
        Self {
            listing,
            ..Self::default()
        }
    }

    /// Mock whose every call fails like an unreachable remote
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn created(&self) -> Vec<RecordedEvent> {
        self.created.lock().unwrap().clone()
    }
}

#[async_trait]
impl CalendarService for MockCalendarService {
    async fn create_event(
        &self,
        title: &str,
        start: DateTime<FixedOffset>,
    ) -> ServiceResult<CreatedEvent> {
        if self.fail {
            return Err(google_calendar_error("Failed to create event: HTTP 401 Unauthorized"));
        }

        let event = RecordedEvent {
            id: uuid::Uuid::new_v4().simple().to_string(),
            title: title.to_string(),
            start,
            end: event_end(start),
        };
        self.created.lock().unwrap().push(event.clone());

        Ok(CreatedEvent {
            title: event.title,
            date: event.start.to_rfc3339(),
            id: event.id,
        })
    }

    async fn list_upcoming(&self) -> ServiceResult<Vec<UpcomingEvent>> {
        if self.fail {
            return Err(google_calendar_error("Failed to fetch events: HTTP 503"));
        }

        Ok(retain_upcoming(self.listing.clone(), Utc::now()))
    }
}
