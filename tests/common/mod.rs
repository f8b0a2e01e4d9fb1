#![allow(dead_code)]

pub mod google_calendar_mock;

use calendar_scheduler::components::extractor::Extractor;
use calendar_scheduler::components::scheduler::DirectScheduler;
use calendar_scheduler::handlers::{router, AppState};
use google_calendar_mock::MockCalendarService;
use std::sync::Arc;

/// Router wired with the direct scheduler over a mock calendar
pub fn test_router(calendar: Arc<MockCalendarService>) -> axum::Router {
    let extractor = Extractor::new(chrono_tz::UTC);
    let scheduler = Arc::new(DirectScheduler::new(extractor, calendar.clone()));
    router(AppState::new(scheduler, calendar))
}
