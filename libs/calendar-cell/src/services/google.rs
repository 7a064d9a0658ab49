// libs/calendar-cell/src/services/google.rs
use reqwest::Client;
use tracing::{debug, error, info, warn};

use shared_config::AppConfig;

use crate::models::{CalendarError, CalendarEvent, EventInput};

/// Google Calendar v3 client for mirroring appointments into connected
/// staff calendars. Access tokens are per-user and supplied by the caller;
/// this client never refreshes them.
#[derive(Debug)]
pub struct GoogleCalendarClient {
    client: Client,
    base_url: String,
}

impl GoogleCalendarClient {
    pub fn new(config: &AppConfig) -> Result<Self, CalendarError> {
        if !config.is_calendar_sync_configured() {
            return Err(CalendarError::NotConfigured);
        }

        Ok(Self {
            client: Client::new(),
            base_url: config.google_calendar_base_url.clone(),
        })
    }

    /// Create an event on the given calendar.
    /// POST /calendars/{calendarId}/events
    pub async fn insert_event(
        &self,
        calendar_id: &str,
        access_token: &str,
        event: &EventInput,
    ) -> Result<CalendarEvent, CalendarError> {
        info!("Creating calendar event on {}", calendar_id);

        let url = format!("{}/calendars/{}/events", self.base_url, calendar_id);

        let response = self
            .client
            .post(&url)
            .bearer_auth(access_token)
            .header("Content-Type", "application/json")
            .json(event)
            .send()
            .await?;

        self.parse_event_response(response).await
    }

    /// Update an existing event in place.
    /// PATCH /calendars/{calendarId}/events/{eventId}
    pub async fn patch_event(
        &self,
        calendar_id: &str,
        event_id: &str,
        access_token: &str,
        event: &EventInput,
    ) -> Result<CalendarEvent, CalendarError> {
        info!("Patching calendar event {} on {}", event_id, calendar_id);

        let url = format!(
            "{}/calendars/{}/events/{}",
            self.base_url, calendar_id, event_id
        );

        let response = self
            .client
            .patch(&url)
            .bearer_auth(access_token)
            .header("Content-Type", "application/json")
            .json(event)
            .send()
            .await?;

        self.parse_event_response(response).await
    }

    /// Remove an event. An event already gone on Google's side counts as
    /// deleted.
    /// DELETE /calendars/{calendarId}/events/{eventId}
    pub async fn delete_event(
        &self,
        calendar_id: &str,
        event_id: &str,
        access_token: &str,
    ) -> Result<(), CalendarError> {
        info!("Deleting calendar event {} on {}", event_id, calendar_id);

        let url = format!(
            "{}/calendars/{}/events/{}",
            self.base_url, calendar_id, event_id
        );

        let response = self
            .client
            .delete(&url)
            .bearer_auth(access_token)
            .send()
            .await?;

        let status = response.status();

        if status.as_u16() == 404 || status.as_u16() == 410 {
            warn!("Calendar event {} was already removed", event_id);
            return Ok(());
        }

        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            error!("Calendar event deletion failed: {} - {}", status, message);
            return Err(CalendarError::ApiError {
                status: status.as_u16(),
                message,
            });
        }

        Ok(())
    }

    async fn parse_event_response(
        &self,
        response: reqwest::Response,
    ) -> Result<CalendarEvent, CalendarError> {
        let status = response.status();
        let response_text = response.text().await?;

        debug!("Calendar API response: {} - {}", status, response_text);

        if !status.is_success() {
            error!("Calendar API call failed: {} - {}", status, response_text);
            return Err(CalendarError::ApiError {
                status: status.as_u16(),
                message: response_text,
            });
        }

        let event: CalendarEvent = serde_json::from_str(&response_text)
            .map_err(|e| CalendarError::ParseError(e.to_string()))?;

        Ok(event)
    }
}
