#[cfg(feature = "agent")]
pub mod agent;
pub mod extractor;
pub mod google_calendar;
pub mod scheduler;

pub use extractor::{ExtractedEvent, Extractor};
pub use google_calendar::{CalendarService, GoogleCalendarClient};
pub use scheduler::{DirectScheduler, ScheduleRequest, ScheduleResponse, Scheduler};
