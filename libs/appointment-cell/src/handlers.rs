// libs/appointment-cell/src/handlers.rs
use std::sync::Arc;

use axum::{
    extract::{Extension, Path, Query, State},
    Json,
};
use axum_extra::TypedHeader;
use chrono::{NaiveDate, NaiveDateTime};
use headers::{authorization::Bearer, Authorization};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, warn};
use uuid::Uuid;

use calendar_cell::models::CalendarError;
use scheduling_cell::models::{AppointmentSlot, SlotSearchConfig, SuggestionOptions};
use shared_config::AppConfig;
use shared_database::RecordStoreClient;
use shared_models::auth::User;
use shared_models::error::AppError;

use crate::models::{
    Appointment, AppointmentError, AppointmentSearchQuery, BookAppointmentRequest,
    CalendarSyncReport, CancelAppointmentRequest, RescheduleAppointmentRequest, SyncAction,
};
use crate::services::booking::AppointmentBookingService;
use crate::services::calendar_sync::CalendarSyncService;

// ==============================================================================
// QUERY PARAMETER STRUCTS
// ==============================================================================

#[derive(Debug, Deserialize)]
pub struct AvailabilityQuery {
    pub date: NaiveDate,
    pub clinician_id: Uuid,
    pub slot_duration_minutes: Option<i32>,
    pub break_between_slots_minutes: Option<i32>,
    pub start_hour: Option<u32>,
    pub end_hour: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct SuggestionQuery {
    pub preferred_start: NaiveDateTime,
    pub duration_minutes: i32,
    pub clinician_id: Uuid,
    pub max_suggestions: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct ConflictCheckQuery {
    pub clinician_id: Uuid,
    pub start_time: NaiveDateTime,
    pub end_time: NaiveDateTime,
    pub client_id: Option<Uuid>,
    pub location: Option<String>,
    pub exclude_appointment_id: Option<Uuid>,
}

// ==============================================================================
// APPOINTMENT HANDLERS
// ==============================================================================

#[axum::debug_handler]
pub async fn book_appointment(
    State(state): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
    Json(request): Json<BookAppointmentRequest>,
) -> Result<Json<Value>, AppError> {
    let token = auth.token();

    if !user.is_staff() {
        return Err(AppError::Auth("Only staff can book appointments".to_string()));
    }

    let store = Arc::new(RecordStoreClient::new(&state));
    let booking_service = AppointmentBookingService::new(Arc::clone(&store));

    let appointment = booking_service
        .book_appointment(request, token)
        .await
        .map_err(map_booking_error)?;

    let calendar_sync = run_calendar_sync(&state, store, &appointment, SyncAction::Created, token).await;

    Ok(Json(json!({
        "success": true,
        "appointment": appointment,
        "calendar_sync": calendar_sync,
        "message": "Appointment booked successfully"
    })))
}

#[axum::debug_handler]
pub async fn get_appointment(
    State(state): State<Arc<AppConfig>>,
    Path(appointment_id): Path<Uuid>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
) -> Result<Json<Value>, AppError> {
    let token = auth.token();
    let store = Arc::new(RecordStoreClient::new(&state));
    let booking_service = AppointmentBookingService::new(store);

    let appointment = booking_service
        .get_appointment(appointment_id, token)
        .await
        .map_err(map_booking_error)?;

    // Clients may view their own sessions; staff may view any.
    let is_client = appointment
        .client_id
        .map(|id| id.to_string() == user.id)
        .unwrap_or(false);

    if !is_client && !user.is_staff() {
        return Err(AppError::Auth("Not authorized to view this appointment".to_string()));
    }

    Ok(Json(json!(appointment)))
}

#[axum::debug_handler]
pub async fn search_appointments(
    State(state): State<Arc<AppConfig>>,
    Query(query): Query<AppointmentSearchQuery>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
) -> Result<Json<Value>, AppError> {
    let token = auth.token();

    if !user.is_staff() {
        return Err(AppError::Auth("Only staff can search appointments".to_string()));
    }

    let store = Arc::new(RecordStoreClient::new(&state));
    let booking_service = AppointmentBookingService::new(store);

    let appointments = booking_service
        .search_appointments(&query, token)
        .await
        .map_err(map_booking_error)?;

    let count = appointments.len();

    Ok(Json(json!({
        "appointments": appointments,
        "count": count
    })))
}

#[axum::debug_handler]
pub async fn reschedule_appointment(
    State(state): State<Arc<AppConfig>>,
    Path(appointment_id): Path<Uuid>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
    Json(request): Json<RescheduleAppointmentRequest>,
) -> Result<Json<Value>, AppError> {
    let token = auth.token();

    if !user.is_staff() {
        return Err(AppError::Auth("Only staff can reschedule appointments".to_string()));
    }

    let store = Arc::new(RecordStoreClient::new(&state));
    let booking_service = AppointmentBookingService::new(Arc::clone(&store));

    let appointment = booking_service
        .reschedule_appointment(appointment_id, request, token)
        .await
        .map_err(map_booking_error)?;

    let calendar_sync = run_calendar_sync(&state, store, &appointment, SyncAction::Updated, token).await;

    Ok(Json(json!({
        "success": true,
        "appointment": appointment,
        "calendar_sync": calendar_sync,
        "message": "Appointment rescheduled successfully"
    })))
}

#[axum::debug_handler]
pub async fn cancel_appointment(
    State(state): State<Arc<AppConfig>>,
    Path(appointment_id): Path<Uuid>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
    Json(request): Json<CancelAppointmentRequest>,
) -> Result<Json<Value>, AppError> {
    let token = auth.token();

    if !user.is_staff() {
        return Err(AppError::Auth("Only staff can cancel appointments".to_string()));
    }

    let store = Arc::new(RecordStoreClient::new(&state));
    let booking_service = AppointmentBookingService::new(Arc::clone(&store));

    let appointment = booking_service
        .cancel_appointment(appointment_id, request, token)
        .await
        .map_err(map_booking_error)?;

    let calendar_sync = run_calendar_sync(&state, store, &appointment, SyncAction::Cancelled, token).await;

    Ok(Json(json!({
        "success": true,
        "appointment": appointment,
        "calendar_sync": calendar_sync,
        "message": "Appointment cancelled"
    })))
}

// ==============================================================================
// SCHEDULING HANDLERS
// ==============================================================================

#[axum::debug_handler]
pub async fn get_available_slots(
    State(state): State<Arc<AppConfig>>,
    Query(query): Query<AvailabilityQuery>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
) -> Result<Json<Value>, AppError> {
    let token = auth.token();
    let store = Arc::new(RecordStoreClient::new(&state));
    let booking_service = AppointmentBookingService::new(store);

    let defaults = SlotSearchConfig::default();
    let config = SlotSearchConfig {
        start_hour: query.start_hour.unwrap_or(defaults.start_hour),
        end_hour: query.end_hour.unwrap_or(defaults.end_hour),
        slot_duration_minutes: query
            .slot_duration_minutes
            .unwrap_or(defaults.slot_duration_minutes),
        break_between_slots_minutes: query
            .break_between_slots_minutes
            .unwrap_or(defaults.break_between_slots_minutes),
    };

    if config.start_hour > 23 || config.end_hour > 23 {
        return Err(AppError::BadRequest("Hours must be between 0 and 23".to_string()));
    }
    if config.slot_duration_minutes <= 0 {
        return Err(AppError::BadRequest("Slot duration must be positive".to_string()));
    }

    let slots = booking_service
        .available_slots(query.date, query.clinician_id, &config, token)
        .await
        .map_err(map_booking_error)?;

    Ok(Json(json!({
        "date": query.date,
        "clinician_id": query.clinician_id,
        "available_slots": slots
    })))
}

#[axum::debug_handler]
pub async fn suggest_alternative_slots(
    State(state): State<Arc<AppConfig>>,
    Query(query): Query<SuggestionQuery>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
) -> Result<Json<Value>, AppError> {
    let token = auth.token();
    let store = Arc::new(RecordStoreClient::new(&state));
    let booking_service = AppointmentBookingService::new(store);

    if query.duration_minutes <= 0 {
        return Err(AppError::BadRequest("Duration must be positive".to_string()));
    }

    let options = SuggestionOptions {
        max_suggestions: query.max_suggestions.unwrap_or(5),
        ..SuggestionOptions::default()
    };

    let suggestions = booking_service
        .alternative_slots(
            query.preferred_start,
            query.duration_minutes,
            query.clinician_id,
            &options,
            token,
        )
        .await
        .map_err(map_booking_error)?;

    Ok(Json(json!({
        "preferred_start": query.preferred_start,
        "suggestions": suggestions
    })))
}

#[axum::debug_handler]
pub async fn check_appointment_conflicts(
    State(state): State<Arc<AppConfig>>,
    Query(query): Query<ConflictCheckQuery>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
) -> Result<Json<Value>, AppError> {
    let token = auth.token();
    let store = Arc::new(RecordStoreClient::new(&state));
    let booking_service = AppointmentBookingService::new(store);

    if query.end_time <= query.start_time {
        return Err(AppError::BadRequest("End time must be after start time".to_string()));
    }

    let slot = AppointmentSlot {
        start_time: query.start_time,
        end_time: query.end_time,
        clinician_id: query.clinician_id,
        client_id: query.client_id,
        location: query.location,
    };

    let response = booking_service
        .check_conflicts(slot, query.exclude_appointment_id, token)
        .await
        .map_err(map_booking_error)?;

    Ok(Json(json!(response)))
}

// ==============================================================================
// HELPERS
// ==============================================================================

/// Best-effort fan-out after a successful write. Sync problems are reported
/// in the response body and the log, never as a request failure.
async fn run_calendar_sync(
    state: &Arc<AppConfig>,
    store: Arc<RecordStoreClient>,
    appointment: &Appointment,
    action: SyncAction,
    token: &str,
) -> Option<CalendarSyncReport> {
    let sync_service = match CalendarSyncService::new(store, state) {
        Ok(service) => service,
        Err(CalendarError::NotConfigured) => {
            debug!("Calendar sync not configured, skipping");
            return None;
        }
        Err(e) => {
            warn!("Calendar sync unavailable: {}", e);
            return None;
        }
    };

    match sync_service.push_appointment(appointment, action, token).await {
        Ok(report) => {
            if !report.is_complete() {
                warn!(
                    "Calendar sync incomplete for appointment {}: {} of {} calendars failed",
                    appointment.id,
                    report.failures.len(),
                    report.attempted
                );
            }
            Some(report)
        }
        Err(e) => {
            warn!("Calendar sync skipped for appointment {}: {}", appointment.id, e);
            None
        }
    }
}

fn map_booking_error(error: AppointmentError) -> AppError {
    match error {
        AppointmentError::NotFound => AppError::NotFound("Appointment not found".to_string()),
        AppointmentError::ConflictDetected(msg) => AppError::Conflict(msg),
        AppointmentError::InvalidTime(msg) => AppError::BadRequest(msg),
        AppointmentError::ValidationError(msg) => AppError::BadRequest(msg),
        AppointmentError::InvalidStatusTransition(status) => {
            AppError::BadRequest(format!("Appointment cannot be modified while {}", status))
        }
        AppointmentError::Unauthorized => {
            AppError::Auth("Not authorized for this appointment".to_string())
        }
        AppointmentError::DatabaseError(msg) => AppError::Database(msg),
        AppointmentError::ExternalServiceError(msg) => AppError::ExternalService(msg),
    }
}
