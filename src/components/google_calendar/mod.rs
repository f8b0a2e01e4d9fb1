mod client;
pub mod models;
pub mod time;
pub mod token;

pub use client::{GoogleCalendarClient, CALENDAR_API_BASE};
pub use models::{CalendarEvent, CreatedEvent, UpcomingEvent};

use crate::error::ServiceResult;
use async_trait::async_trait;
use chrono::{DateTime, FixedOffset};

/// Create/list relay to a remote calendar
#[async_trait]
pub trait CalendarService: Send + Sync {
    /// Create a one-hour event starting at `start`
    ///
    /// Not idempotent: every call creates a new remote event.
    async fn create_event(
        &self,
        title: &str,
        start: DateTime<FixedOffset>,
    ) -> ServiceResult<CreatedEvent>;

    /// Up to ten soonest events starting from now, ordered by start time
    async fn list_upcoming(&self) -> ServiceResult<Vec<UpcomingEvent>>;
}
