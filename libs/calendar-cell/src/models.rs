// libs/calendar-cell/src/models.rs
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ==============================================================================
// GOOGLE CALENDAR WIRE MODELS
// ==============================================================================

/// Event time in the Google Calendar v3 wire shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventDateTime {
    #[serde(rename = "dateTime")]
    pub date_time: String,
    #[serde(rename = "timeZone", skip_serializing_if = "Option::is_none")]
    pub time_zone: Option<String>,
}

/// Payload for creating or patching a calendar event.
#[derive(Debug, Clone, Serialize)]
pub struct EventInput {
    pub summary: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    pub start: EventDateTime,
    pub end: EventDateTime,
}

/// Event representation returned by the Calendar API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalendarEvent {
    pub id: String,
    pub status: Option<String>,
    pub summary: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub start: Option<EventDateTime>,
    pub end: Option<EventDateTime>,
    #[serde(rename = "htmlLink")]
    pub html_link: Option<String>,
}

// ==============================================================================
// CONNECTED ACCOUNT MODELS
// ==============================================================================

/// A staff member's connected Google Calendar, as stored in the
/// `calendar_accounts` collection. Token acquisition and refresh are owned
/// by the managed auth platform; this record only carries the result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalendarAccount {
    pub id: Uuid,
    pub user_id: Uuid,
    pub calendar_id: String,
    pub access_token: String,
    pub sync_enabled: bool,
    pub display_name: Option<String>,
}

// ==============================================================================
// ERROR TYPES
// ==============================================================================

#[derive(Debug, thiserror::Error)]
pub enum CalendarError {
    #[error("Calendar sync is not configured")]
    NotConfigured,

    #[error("Google Calendar API error ({status}): {message}")]
    ApiError { status: u16, message: String },

    #[error("Failed to parse calendar response: {0}")]
    ParseError(String),

    #[error("Calendar request failed: {0}")]
    RequestFailed(String),

    #[error("Account lookup failed: {0}")]
    AccountLookupFailed(String),
}

impl From<reqwest::Error> for CalendarError {
    fn from(err: reqwest::Error) -> Self {
        CalendarError::RequestFailed(err.to_string())
    }
}
