use super::models::{ApiEvent, CalendarEvent, EventListResponse};
use crate::components::EventSource;
use crate::config::Config;
use crate::error::{google_calendar_error, SyncResult};
use crate::utils::time::{now_in, to_query_timestamp};
use async_trait::async_trait;
use reqwest::Client;
use tracing::{info, warn};
use url::Url;

/// Reads upcoming events from the Google Calendar API
pub struct GoogleCalendarReader<'a> {
    config: &'a Config,
    client: Client,
    access_token: String,
}

impl<'a> GoogleCalendarReader<'a> {
    pub fn new(config: &'a Config, client: Client, access_token: impl Into<String>) -> Self {
        Self {
            config,
            client,
            access_token: access_token.into(),
        }
    }

    /// `events.list` URL for the configured calendar, starting at `time_min`
    pub fn events_url(&self, time_min: &str) -> SyncResult<Url> {
        let mut url = Url::parse(&self.config.google_api_base)
            .map_err(|e| google_calendar_error(&format!("Failed to parse URL: {}", e)))?;

        url.path_segments_mut()
            .map_err(|_| google_calendar_error("Google API base cannot carry a path"))?
            .pop_if_empty()
            .extend(["calendar", "v3", "calendars"])
            .push(&self.config.google_calendar_id)
            .push("events");

        url.query_pairs_mut()
            .append_pair("timeMin", time_min)
            .append_pair("maxResults", &self.config.max_events.to_string())
            .append_pair("singleEvents", "true")
            .append_pair("orderBy", "startTime");

        Ok(url)
    }
}

#[async_trait]
impl EventSource for GoogleCalendarReader<'_> {
    async fn upcoming_events(&self) -> SyncResult<Vec<CalendarEvent>> {
        info!("Getting the upcoming {} events", self.config.max_events);

        let time_min = to_query_timestamp(&now_in(self.config.timezone));
        let url = self.events_url(&time_min)?;

        let response = self
            .client
            .get(url)
            .bearer_auth(&self.access_token)
            .send()
            .await
            .map_err(|e| google_calendar_error(&format!("Failed to fetch events: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_body = response
                .text()
                .await
                .unwrap_or_else(|_| "Could not read error response".to_string());
            return Err(google_calendar_error(&format!(
                "Failed to fetch events: HTTP {} - {}",
                status, error_body
            )));
        }

        let response_data: EventListResponse = response
            .json()
            .await
            .map_err(|e| google_calendar_error(&format!("Failed to parse events response: {}", e)))?;

        let mut events = Vec::with_capacity(response_data.items.len());
        for item in response_data.items {
            let id = item.id.clone();
            match ApiEvent::into_event(item) {
                Some(event) => events.push(event),
                None => warn!("Skipping event {} without a start time", id),
            }
        }

        Ok(events)
    }
}
