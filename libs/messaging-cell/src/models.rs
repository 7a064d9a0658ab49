// libs/messaging-cell/src/models.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

// ==============================================================================
// THREAD AND MESSAGE MODELS
// ==============================================================================

/// A conversation between staff members (and optionally a client contact).
///
/// Deletion is per user: `hidden_for` lists participants who removed the
/// thread from their own view. The row itself survives until every
/// participant has done so.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageThread {
    pub id: Uuid,
    pub subject: Option<String>,
    pub participant_ids: Vec<Uuid>,
    pub hidden_for: Vec<Uuid>,
    pub last_message_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub id: Uuid,
    pub thread_id: Uuid,
    pub sender_id: Uuid,
    pub body: String,
    pub sent_at: DateTime<Utc>,
    pub read_by: Vec<Uuid>,
    pub hidden_for: Vec<Uuid>,
}

/// A thread as one user sees it, with their unread tally.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThreadSummary {
    pub thread: MessageThread,
    pub unread_count: usize,
}

// ==============================================================================
// REQUEST MODELS
// ==============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StartThreadRequest {
    pub subject: Option<String>,
    pub participant_ids: Vec<Uuid>,
    pub body: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SendMessageRequest {
    pub body: String,
}

// ==============================================================================
// NOTIFICATION MODELS
// ==============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    pub id: Uuid,
    pub recipient_id: Uuid,
    pub kind: NotificationKind,
    pub body: String,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    AppointmentBooked,
    AppointmentRescheduled,
    AppointmentCancelled,
    NewMessage,
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NotificationKind::AppointmentBooked => write!(f, "appointment_booked"),
            NotificationKind::AppointmentRescheduled => write!(f, "appointment_rescheduled"),
            NotificationKind::AppointmentCancelled => write!(f, "appointment_cancelled"),
            NotificationKind::NewMessage => write!(f, "new_message"),
        }
    }
}

// ==============================================================================
// ERROR TYPES
// ==============================================================================

#[derive(Debug, Clone, thiserror::Error)]
pub enum MessagingError {
    #[error("Thread not found")]
    ThreadNotFound,

    #[error("Notification not found")]
    NotificationNotFound,

    #[error("User is not a participant in this thread")]
    NotParticipant,

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Database error: {0}")]
    DatabaseError(String),
}
