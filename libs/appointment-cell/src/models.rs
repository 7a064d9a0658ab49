// libs/appointment-cell/src/models.rs
use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

pub use scheduling_cell::models::AppointmentStatus;

// ==============================================================================
// CORE APPOINTMENT MODELS
// ==============================================================================

/// Persisted appointment record, deserialized from the store at the adapter
/// boundary before it reaches any business logic. `date_of_session` is the
/// local civil start time; the occupied interval is
/// `[date_of_session, date_of_session + duration)`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Appointment {
    pub id: Uuid,
    pub client_id: Option<Uuid>,
    pub attending_clinician_id: Uuid,
    pub date_of_session: NaiveDateTime,
    pub duration_minutes: i32,
    pub location: Option<String>,
    pub status: AppointmentStatus,
    pub session_type: Option<SessionType>,
    pub notes: Option<String>,
    pub cancellation_reason: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Appointment {
    pub fn end_of_session(&self) -> NaiveDateTime {
        self.date_of_session + Duration::minutes(self.duration_minutes as i64)
    }

    /// The slice of this record the scheduling engine operates on.
    pub fn scheduling_view(&self) -> scheduling_cell::models::Appointment {
        scheduling_cell::models::Appointment {
            id: self.id,
            date_of_session: self.date_of_session,
            duration_minutes: self.duration_minutes,
            attending_clinician_id: self.attending_clinician_id,
            client_id: self.client_id,
            location: self.location.clone(),
            status: self.status,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SessionType {
    Intake,
    Therapy,
    Assessment,
    Review,
    FollowUp,
}

impl fmt::Display for SessionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionType::Intake => write!(f, "intake"),
            SessionType::Therapy => write!(f, "therapy"),
            SessionType::Assessment => write!(f, "assessment"),
            SessionType::Review => write!(f, "review"),
            SessionType::FollowUp => write!(f, "follow_up"),
        }
    }
}

// ==============================================================================
// REQUEST/RESPONSE MODELS
// ==============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookAppointmentRequest {
    pub client_id: Option<Uuid>,
    pub attending_clinician_id: Uuid,
    pub date_of_session: NaiveDateTime,
    pub duration_minutes: i32,
    pub location: Option<String>,
    pub session_type: Option<SessionType>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RescheduleAppointmentRequest {
    pub new_date_of_session: NaiveDateTime,
    pub new_duration_minutes: Option<i32>,
    pub reason: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CancelAppointmentRequest {
    pub reason: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppointmentSearchQuery {
    pub client_id: Option<Uuid>,
    pub clinician_id: Option<Uuid>,
    pub status: Option<AppointmentStatus>,
    pub from_date: Option<NaiveDate>,
    pub to_date: Option<NaiveDate>,
    pub limit: Option<i32>,
}

/// Conflict-check response returned to the UI: the engine verdict plus
/// alternative start times worth offering when the requested one is taken.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConflictCheckResponse {
    pub has_conflict: bool,
    pub conflict_type: scheduling_cell::models::ConflictType,
    pub message: Option<String>,
    pub conflicting_appointment_ids: Vec<Uuid>,
    pub suggested_alternatives: Vec<NaiveDateTime>,
}

// ==============================================================================
// CALENDAR SYNC MODELS
// ==============================================================================

/// What happened to the appointment, driving what each connected calendar
/// needs done to its mirrored event.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SyncAction {
    Created,
    Updated,
    Cancelled,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncedCalendar {
    pub user_id: Uuid,
    pub calendar_id: String,
    pub event_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncFailure {
    pub user_id: Uuid,
    pub error: String,
}

/// Aggregate outcome of one fan-out pass. Partial failure is data, not an
/// exception: every connected calendar is attempted exactly once and each
/// failure is recorded alongside the successes.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CalendarSyncReport {
    pub attempted: usize,
    pub synced: Vec<SyncedCalendar>,
    pub failures: Vec<SyncFailure>,
}

impl CalendarSyncReport {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Link row tying an appointment to the event mirrored into one user's
/// calendar, so later updates and cancellations can target each copy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppointmentCalendarEvent {
    pub id: Uuid,
    pub appointment_id: Uuid,
    pub user_id: Uuid,
    pub calendar_id: String,
    pub event_id: String,
}

// ==============================================================================
// ERROR TYPES
// ==============================================================================

#[derive(Debug, Clone, thiserror::Error)]
pub enum AppointmentError {
    #[error("Appointment not found")]
    NotFound,

    #[error("Appointment conflicts with existing booking: {0}")]
    ConflictDetected(String),

    #[error("Invalid appointment time: {0}")]
    InvalidTime(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Appointment cannot be modified in current status: {0}")]
    InvalidStatusTransition(AppointmentStatus),

    #[error("Unauthorized access to appointment")]
    Unauthorized,

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("External service error: {0}")]
    ExternalServiceError(String),
}
