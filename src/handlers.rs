use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::error;

use crate::components::google_calendar::{CalendarService, UpcomingEvent};
use crate::components::scheduler::{ScheduleRequest, ScheduleResponse, Scheduler};
use crate::error::Error;

/// Shared state handed to every request
#[derive(Clone)]
pub struct AppState {
    /// Create path, either direct or through the agent
    pub scheduler: Arc<dyn Scheduler>,
    /// Calendar client used for listings
    pub calendar: Arc<dyn CalendarService>,
}

impl AppState {
    pub fn new(scheduler: Arc<dyn Scheduler>, calendar: Arc<dyn CalendarService>) -> Self {
        Self {
            scheduler,
            calendar,
        }
    }
}

/// Remote and agent failures surface as a generic server error
impl IntoResponse for Error {
    fn into_response(self) -> Response {
        error!("Request failed: {}", self);
        (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
    }
}

/// Build the HTTP router
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/create_event/", post(create_event_handler))
        .route("/events/", get(list_events_handler))
        .route("/health", get(health_handler))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Handler for creating an event from natural-language text
pub async fn create_event_handler(
    State(state): State<AppState>,
    Json(request): Json<ScheduleRequest>,
) -> Result<Json<ScheduleResponse>, Error> {
    let response = state.scheduler.schedule(&request).await?;
    Ok(Json(response))
}

/// Handler for listing upcoming events
pub async fn list_events_handler(
    State(state): State<AppState>,
) -> Result<Json<Vec<UpcomingEvent>>, Error> {
    let events = state.calendar.list_upcoming().await?;
    Ok(Json(events))
}

// Handler for API health check
pub async fn health_handler() -> &'static str {
    "OK"
}
