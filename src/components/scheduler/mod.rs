pub mod models;

pub use models::{ScheduleRequest, ScheduleResponse, PARSE_FAILURE_MESSAGE};

use crate::components::extractor::Extractor;
use crate::components::google_calendar::CalendarService;
use crate::error::ServiceResult;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::info;

/// Turns a scheduling request into a calendar event
#[async_trait]
pub trait Scheduler: Send + Sync {
    async fn schedule(&self, request: &ScheduleRequest) -> ServiceResult<ScheduleResponse>;
}

/// Extractor followed by the calendar client
#[derive(Clone)]
pub struct DirectScheduler {
    extractor: Extractor,
    calendar: Arc<dyn CalendarService>,
}

impl DirectScheduler {
    pub fn new(extractor: Extractor, calendar: Arc<dyn CalendarService>) -> Self {
        Self {
            extractor,
            calendar,
        }
    }
}

#[async_trait]
impl Scheduler for DirectScheduler {
    async fn schedule(&self, request: &ScheduleRequest) -> ServiceResult<ScheduleResponse> {
        let Some(event) = self.extractor.extract(&request.user_input) else {
            info!("No time found in {:?}", request.user_input);
            return Ok(ScheduleResponse::parse_failure());
        };

        // Remote failures propagate as-is; there is no retry
        let created = self
            .calendar
            .create_event(&event.title, event.start_time)
            .await?;

        Ok(ScheduleResponse::Created(created))
    }
}
