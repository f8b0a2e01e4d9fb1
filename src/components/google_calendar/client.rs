use super::models::{CalendarEvent, CreatedEvent, EventList, NewEvent, UpcomingEvent};
use super::time::{retain_upcoming, LIST_FETCH_LIMIT};
use super::token::TokenManager;
use super::CalendarService;
use crate::config::Config;
use crate::error::{google_calendar_error, ServiceResult};
use async_trait::async_trait;
use chrono::{DateTime, FixedOffset, SecondsFormat, Utc};
use reqwest::{Client, Response};
use tracing::{debug, info};
use url::Url;

/// Base URL of the Calendar v3 REST API
pub const CALENDAR_API_BASE: &str = "https://www.googleapis.com/calendar/v3";

/// Google Calendar REST client
///
/// Holds no session state; an access token is fetched for every call.
#[derive(Debug, Clone)]
pub struct GoogleCalendarClient {
    client: Client,
    token_manager: TokenManager,
    calendar_id: String,
    time_zone: String,
    base_url: String,
}

impl GoogleCalendarClient {
    pub fn new(token_manager: TokenManager, calendar_id: &str, time_zone: &str) -> Self {
        Self {
            client: Client::new(),
            token_manager,
            calendar_id: calendar_id.to_string(),
            time_zone: time_zone.to_string(),
            base_url: CALENDAR_API_BASE.to_string(),
        }
    }

    /// Create a client from the service configuration
    pub fn from_config(config: &Config) -> Self {
        Self::new(
            TokenManager::new(&config.google_token_file),
            &config.google_calendar_id,
            &config.timezone,
        )
    }

    /// Use a different API base URL
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    /// URL of the events collection of the configured calendar
    pub fn events_url(&self) -> ServiceResult<Url> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| google_calendar_error(&format!("Failed to parse URL: {}", e)))?;

        url.path_segments_mut()
            .map_err(|_| google_calendar_error("Calendar API base URL cannot have a path"))?
            .push("calendars")
            .push(&self.calendar_id)
            .push("events");

        Ok(url)
    }

    /// URL of the upcoming events listing from `now`
    pub fn list_url(&self, now: DateTime<Utc>) -> ServiceResult<Url> {
        let mut url = self.events_url()?;

        url.query_pairs_mut()
            .append_pair("timeMin", &now.to_rfc3339_opts(SecondsFormat::Micros, true))
            .append_pair("maxResults", &LIST_FETCH_LIMIT.to_string())
            .append_pair("singleEvents", "true")
            .append_pair("orderBy", "startTime");

        Ok(url)
    }

    /// Turn a non-success response into an error
    async fn check_status(response: Response, action: &str) -> ServiceResult<Response> {
        if response.status().is_success() {
            return Ok(response);
        }

        let status = response.status();
        let error_body = response
            .text()
            .await
            .unwrap_or_else(|_| "Could not read error response".to_string());
        Err(google_calendar_error(&format!(
            "Failed to {}: HTTP {} - {}",
            action, status, error_body
        )))
    }
}

#[async_trait]
impl CalendarService for GoogleCalendarClient {
    async fn create_event(
        &self,
        title: &str,
        start: DateTime<FixedOffset>,
    ) -> ServiceResult<CreatedEvent> {
        let access_token = self.token_manager.get_token().await?;
        let body = NewEvent::new(title, start, &self.time_zone);
        let url = self.events_url()?;

        debug!("Inserting event {:?} at {}", body.summary, start);

        let response = self
            .client
            .post(url)
            .bearer_auth(&access_token)
            .json(&body)
            .send()
            .await
            .map_err(|e| google_calendar_error(&format!("Failed to create event: {}", e)))?;

        let response = Self::check_status(response, "create event").await?;

        let event: CalendarEvent = response.json().await.map_err(|e| {
            google_calendar_error(&format!("Failed to parse created event: {}", e))
        })?;

        info!("Created calendar event {} ({})", event.id, title);
        Ok(CreatedEvent::from_remote(event, &body))
    }

    async fn list_upcoming(&self) -> ServiceResult<Vec<UpcomingEvent>> {
        let access_token = self.token_manager.get_token().await?;
        let now = Utc::now();
        let url = self.list_url(now)?;

        let response = self
            .client
            .get(url)
            .bearer_auth(&access_token)
            .send()
            .await
            .map_err(|e| google_calendar_error(&format!("Failed to fetch events: {}", e)))?;

        let response = Self::check_status(response, "fetch events").await?;

        let list: EventList = response.json().await.map_err(|e| {
            google_calendar_error(&format!("Failed to parse events response: {}", e))
        })?;

        debug!("Fetched {} upcoming events", list.items.len());

        let events = list.items.into_iter().map(UpcomingEvent::from).collect();
        Ok(retain_upcoming(events, now))
    }
}
