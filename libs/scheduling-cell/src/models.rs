// libs/scheduling-cell/src/models.rs
use chrono::{Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

// ==============================================================================
// SCHEDULING INPUT MODELS
// ==============================================================================

/// A proposed appointment window that has not been persisted yet.
///
/// All times are local civil times; the engine performs no timezone
/// conversion of its own.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppointmentSlot {
    pub start_time: NaiveDateTime,
    pub end_time: NaiveDateTime,
    pub clinician_id: Uuid,
    pub client_id: Option<Uuid>,
    pub location: Option<String>,
}

impl AppointmentSlot {
    /// Build a slot from a start time and a duration in minutes.
    pub fn with_duration(
        start_time: NaiveDateTime,
        duration_minutes: i32,
        clinician_id: Uuid,
    ) -> Self {
        Self {
            start_time,
            end_time: start_time + Duration::minutes(duration_minutes as i64),
            clinician_id,
            client_id: None,
            location: None,
        }
    }
}

/// The engine's view of a booked appointment. Callers map their persisted
/// records into this shape; the engine never touches storage itself.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Appointment {
    pub id: Uuid,
    pub date_of_session: NaiveDateTime,
    pub duration_minutes: i32,
    pub attending_clinician_id: Uuid,
    pub client_id: Option<Uuid>,
    pub location: Option<String>,
    pub status: AppointmentStatus,
}

impl Appointment {
    /// An appointment occupies `[date_of_session, date_of_session + duration)`.
    pub fn start_time(&self) -> NaiveDateTime {
        self.date_of_session
    }

    pub fn end_time(&self) -> NaiveDateTime {
        self.date_of_session + Duration::minutes(self.duration_minutes as i64)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AppointmentStatus {
    Scheduled,
    Confirmed,
    Completed,
    Cancelled,
    NoShow,
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppointmentStatus::Scheduled => write!(f, "scheduled"),
            AppointmentStatus::Confirmed => write!(f, "confirmed"),
            AppointmentStatus::Completed => write!(f, "completed"),
            AppointmentStatus::Cancelled => write!(f, "cancelled"),
            AppointmentStatus::NoShow => write!(f, "no_show"),
        }
    }
}

// ==============================================================================
// CONFLICT DETECTION MODELS
// ==============================================================================

/// Which booking attribute the most recently matched conflict shared.
///
/// Checks run in a fixed order (clinician, then client, then room) and each
/// match overwrites the previous value, so an appointment conflicting on
/// several attributes reports the one checked last.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ConflictType {
    Clinician,
    Client,
    Room,
    None,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConflictCheckResult {
    pub has_conflict: bool,
    pub conflicting_appointments: Vec<Appointment>,
    pub conflict_type: ConflictType,
    pub message: Option<String>,
}

// ==============================================================================
// SLOT SEARCH CONFIGURATION
// ==============================================================================

/// Day-window parameters for slot enumeration. Hours are whole local hours.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlotSearchConfig {
    pub start_hour: u32,
    pub end_hour: u32,
    pub slot_duration_minutes: i32,
    pub break_between_slots_minutes: i32,
}

impl Default for SlotSearchConfig {
    fn default() -> Self {
        Self {
            start_hour: 9,
            end_hour: 17,
            slot_duration_minutes: 60,
            break_between_slots_minutes: 0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuggestionOptions {
    pub max_suggestions: usize,
    pub search_days: i64,
    pub preferred_start_hour: u32,
    pub preferred_end_hour: u32,
}

impl Default for SuggestionOptions {
    fn default() -> Self {
        Self {
            max_suggestions: 5,
            search_days: 7,
            preferred_start_hour: 9,
            preferred_end_hour: 17,
        }
    }
}

// ==============================================================================
// TIMING VALIDATION MODELS
// ==============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimingRules {
    pub min_duration_minutes: i32,
    pub max_duration_minutes: i32,
    pub allow_past_booking: bool,
    pub business_start_hour: u32,
    pub business_end_hour: u32,
}

impl Default for TimingRules {
    fn default() -> Self {
        Self {
            min_duration_minutes: 15,
            max_duration_minutes: 480,
            allow_past_booking: false,
            business_start_hour: 8,
            business_end_hour: 18,
        }
    }
}

/// Accumulated validation outcome; every violated rule contributes an entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimingValidation {
    pub is_valid: bool,
    pub errors: Vec<String>,
}
