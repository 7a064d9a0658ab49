// libs/appointment-cell/src/services/booking.rs
use std::sync::Arc;

use chrono::{Duration, NaiveDate, NaiveDateTime, Utc};
use serde_json::json;
use tracing::{debug, info};
use uuid::Uuid;

use scheduling_cell::models::{AppointmentSlot, SlotSearchConfig, SuggestionOptions, TimingRules};
use scheduling_cell::services::{
    check_appointment_conflicts, get_available_time_slots, suggest_alternative_slots,
    validate_appointment_timing,
};
use shared_database::RecordStoreClient;

use crate::models::{
    Appointment, AppointmentError, AppointmentSearchQuery, AppointmentStatus,
    BookAppointmentRequest, CancelAppointmentRequest, ConflictCheckResponse,
    RescheduleAppointmentRequest,
};

const DATE_TIME_FILTER: &str = "%Y-%m-%dT%H:%M:%S";

/// Orchestrates appointment persistence around the pure scheduling engine:
/// records are loaded from the store, the engine decides, and only then is
/// anything written back.
pub struct AppointmentBookingService {
    store: Arc<RecordStoreClient>,
    timing_rules: TimingRules,
}

impl AppointmentBookingService {
    pub fn new(store: Arc<RecordStoreClient>) -> Self {
        Self {
            store,
            timing_rules: TimingRules::default(),
        }
    }

    pub fn with_timing_rules(store: Arc<RecordStoreClient>, timing_rules: TimingRules) -> Self {
        Self { store, timing_rules }
    }

    pub async fn book_appointment(
        &self,
        request: BookAppointmentRequest,
        auth_token: &str,
    ) -> Result<Appointment, AppointmentError> {
        debug!(
            "Booking appointment for clinician {} at {}",
            request.attending_clinician_id, request.date_of_session
        );

        let timing = validate_appointment_timing(
            request.date_of_session,
            request.duration_minutes,
            &self.timing_rules,
        );
        if !timing.is_valid {
            return Err(AppointmentError::ValidationError(timing.errors.join("; ")));
        }

        let same_day = self
            .appointments_on_date(request.date_of_session.date(), auth_token)
            .await?;
        let views: Vec<_> = same_day.iter().map(Appointment::scheduling_view).collect();

        let slot = AppointmentSlot {
            start_time: request.date_of_session,
            end_time: request.date_of_session + Duration::minutes(request.duration_minutes as i64),
            clinician_id: request.attending_clinician_id,
            client_id: request.client_id,
            location: request.location.clone(),
        };

        let conflict = check_appointment_conflicts(&slot, &views, None);
        if conflict.has_conflict {
            return Err(AppointmentError::ConflictDetected(
                conflict
                    .message
                    .unwrap_or_else(|| "Requested slot is already taken".to_string()),
            ));
        }

        let now = Utc::now();
        let body = json!({
            "client_id": request.client_id,
            "attending_clinician_id": request.attending_clinician_id,
            "date_of_session": request.date_of_session,
            "duration_minutes": request.duration_minutes,
            "location": request.location,
            "status": AppointmentStatus::Scheduled,
            "session_type": request.session_type,
            "notes": request.notes,
            "cancellation_reason": null,
            "created_at": now,
            "updated_at": now,
        });

        let appointment: Appointment = self
            .store
            .insert("/rest/v1/appointments", auth_token, body)
            .await
            .map_err(|e| AppointmentError::DatabaseError(e.to_string()))?;

        info!(
            "Appointment {} booked for clinician {}",
            appointment.id, appointment.attending_clinician_id
        );

        Ok(appointment)
    }

    pub async fn get_appointment(
        &self,
        appointment_id: Uuid,
        auth_token: &str,
    ) -> Result<Appointment, AppointmentError> {
        let path = format!("/rest/v1/appointments?id=eq.{}", appointment_id);

        self.store
            .fetch_one(&path, auth_token)
            .await
            .map_err(|e| AppointmentError::DatabaseError(e.to_string()))?
            .ok_or(AppointmentError::NotFound)
    }

    pub async fn search_appointments(
        &self,
        query: &AppointmentSearchQuery,
        auth_token: &str,
    ) -> Result<Vec<Appointment>, AppointmentError> {
        let mut query_parts = Vec::new();

        if let Some(client_id) = query.client_id {
            query_parts.push(format!("client_id=eq.{}", client_id));
        }
        if let Some(clinician_id) = query.clinician_id {
            query_parts.push(format!("attending_clinician_id=eq.{}", clinician_id));
        }
        if let Some(status) = query.status {
            query_parts.push(format!("status=eq.{}", status));
        }
        if let Some(from_date) = query.from_date {
            query_parts.push(format!("date_of_session=gte.{}T00:00:00", from_date));
        }
        if let Some(to_date) = query.to_date {
            query_parts.push(format!(
                "date_of_session=lt.{}T00:00:00",
                to_date + Duration::days(1)
            ));
        }

        query_parts.push("order=date_of_session.asc".to_string());
        query_parts.push(format!("limit={}", query.limit.unwrap_or(100)));

        let path = format!("/rest/v1/appointments?{}", query_parts.join("&"));

        self.store
            .fetch_list(&path, auth_token)
            .await
            .map_err(|e| AppointmentError::DatabaseError(e.to_string()))
    }

    pub async fn reschedule_appointment(
        &self,
        appointment_id: Uuid,
        request: RescheduleAppointmentRequest,
        auth_token: &str,
    ) -> Result<Appointment, AppointmentError> {
        let current = self.get_appointment(appointment_id, auth_token).await?;

        if matches!(
            current.status,
            AppointmentStatus::Completed | AppointmentStatus::Cancelled
        ) {
            return Err(AppointmentError::InvalidStatusTransition(current.status));
        }

        let duration_minutes = request
            .new_duration_minutes
            .unwrap_or(current.duration_minutes);

        let timing = validate_appointment_timing(
            request.new_date_of_session,
            duration_minutes,
            &self.timing_rules,
        );
        if !timing.is_valid {
            return Err(AppointmentError::ValidationError(timing.errors.join("; ")));
        }

        let same_day = self
            .appointments_on_date(request.new_date_of_session.date(), auth_token)
            .await?;
        let views: Vec<_> = same_day.iter().map(Appointment::scheduling_view).collect();

        let slot = AppointmentSlot {
            start_time: request.new_date_of_session,
            end_time: request.new_date_of_session + Duration::minutes(duration_minutes as i64),
            clinician_id: current.attending_clinician_id,
            client_id: current.client_id,
            location: current.location.clone(),
        };

        // The appointment being moved must not collide with itself.
        let conflict = check_appointment_conflicts(&slot, &views, Some(appointment_id));
        if conflict.has_conflict {
            return Err(AppointmentError::ConflictDetected(
                conflict
                    .message
                    .unwrap_or_else(|| "Requested slot is already taken".to_string()),
            ));
        }

        let path = format!("/rest/v1/appointments?id=eq.{}", appointment_id);
        let body = json!({
            "date_of_session": request.new_date_of_session,
            "duration_minutes": duration_minutes,
            "status": AppointmentStatus::Scheduled,
            "updated_at": Utc::now(),
        });

        let updated: Appointment = self
            .store
            .update(&path, auth_token, body)
            .await
            .map_err(|e| AppointmentError::DatabaseError(e.to_string()))?;

        info!("Appointment {} rescheduled to {}", appointment_id, updated.date_of_session);
        Ok(updated)
    }

    pub async fn cancel_appointment(
        &self,
        appointment_id: Uuid,
        request: CancelAppointmentRequest,
        auth_token: &str,
    ) -> Result<Appointment, AppointmentError> {
        let current = self.get_appointment(appointment_id, auth_token).await?;

        if current.status == AppointmentStatus::Cancelled {
            return Err(AppointmentError::InvalidStatusTransition(current.status));
        }

        let path = format!("/rest/v1/appointments?id=eq.{}", appointment_id);
        let body = json!({
            "status": AppointmentStatus::Cancelled,
            "cancellation_reason": request.reason,
            "updated_at": Utc::now(),
        });

        let cancelled: Appointment = self
            .store
            .update(&path, auth_token, body)
            .await
            .map_err(|e| AppointmentError::DatabaseError(e.to_string()))?;

        info!("Appointment {} cancelled", appointment_id);
        Ok(cancelled)
    }

    /// Free slot starts for one clinician on one day.
    pub async fn available_slots(
        &self,
        date: NaiveDate,
        clinician_id: Uuid,
        config: &SlotSearchConfig,
        auth_token: &str,
    ) -> Result<Vec<NaiveDateTime>, AppointmentError> {
        let same_day = self.appointments_on_date(date, auth_token).await?;
        let views: Vec<_> = same_day.iter().map(Appointment::scheduling_view).collect();

        Ok(get_available_time_slots(date, clinician_id, &views, config))
    }

    /// Alternative start times near a preferred one.
    pub async fn alternative_slots(
        &self,
        preferred_start: NaiveDateTime,
        duration_minutes: i32,
        clinician_id: Uuid,
        options: &SuggestionOptions,
        auth_token: &str,
    ) -> Result<Vec<NaiveDateTime>, AppointmentError> {
        let window = self
            .clinician_appointments_in_window(
                clinician_id,
                preferred_start.date(),
                options.search_days,
                auth_token,
            )
            .await?;
        let views: Vec<_> = window.iter().map(Appointment::scheduling_view).collect();

        Ok(suggest_alternative_slots(
            preferred_start,
            duration_minutes,
            clinician_id,
            &views,
            options,
        ))
    }

    /// Engine verdict for a proposed slot, with alternatives attached when
    /// the answer is no.
    pub async fn check_conflicts(
        &self,
        slot: AppointmentSlot,
        exclude_appointment_id: Option<Uuid>,
        auth_token: &str,
    ) -> Result<ConflictCheckResponse, AppointmentError> {
        let same_day = self
            .appointments_on_date(slot.start_time.date(), auth_token)
            .await?;
        let views: Vec<_> = same_day.iter().map(Appointment::scheduling_view).collect();

        let result = check_appointment_conflicts(&slot, &views, exclude_appointment_id);

        let suggested_alternatives = if result.has_conflict {
            let duration_minutes = (slot.end_time - slot.start_time).num_minutes() as i32;
            let options = SuggestionOptions::default();
            let window = self
                .clinician_appointments_in_window(
                    slot.clinician_id,
                    slot.start_time.date(),
                    options.search_days,
                    auth_token,
                )
                .await?;
            let window_views: Vec<_> = window.iter().map(Appointment::scheduling_view).collect();

            suggest_alternative_slots(
                slot.start_time,
                duration_minutes,
                slot.clinician_id,
                &window_views,
                &options,
            )
        } else {
            vec![]
        };

        Ok(ConflictCheckResponse {
            has_conflict: result.has_conflict,
            conflict_type: result.conflict_type,
            message: result.message,
            conflicting_appointment_ids: result
                .conflicting_appointments
                .iter()
                .map(|a| a.id)
                .collect(),
            suggested_alternatives,
        })
    }

    // ==============================================================================
    // PRIVATE HELPER METHODS
    // ==============================================================================

    /// Every appointment starting on the given civil day, clinic-wide; the
    /// conflict engine also checks client and room collisions across
    /// clinicians.
    async fn appointments_on_date(
        &self,
        date: NaiveDate,
        auth_token: &str,
    ) -> Result<Vec<Appointment>, AppointmentError> {
        let day_start = date.and_hms_opt(0, 0, 0).unwrap();
        let next_day = (date + Duration::days(1)).and_hms_opt(0, 0, 0).unwrap();

        let path = format!(
            "/rest/v1/appointments?date_of_session=gte.{}&date_of_session=lt.{}&order=date_of_session.asc",
            day_start.format(DATE_TIME_FILTER),
            next_day.format(DATE_TIME_FILTER)
        );

        self.store
            .fetch_list(&path, auth_token)
            .await
            .map_err(|e| AppointmentError::DatabaseError(e.to_string()))
    }

    async fn clinician_appointments_in_window(
        &self,
        clinician_id: Uuid,
        from_date: NaiveDate,
        days: i64,
        auth_token: &str,
    ) -> Result<Vec<Appointment>, AppointmentError> {
        let window_start = from_date.and_hms_opt(0, 0, 0).unwrap();
        let window_end = (from_date + Duration::days(days)).and_hms_opt(0, 0, 0).unwrap();

        let path = format!(
            "/rest/v1/appointments?attending_clinician_id=eq.{}&date_of_session=gte.{}&date_of_session=lt.{}&order=date_of_session.asc",
            clinician_id,
            window_start.format(DATE_TIME_FILTER),
            window_end.format(DATE_TIME_FILTER)
        );

        self.store
            .fetch_list(&path, auth_token)
            .await
            .map_err(|e| AppointmentError::DatabaseError(e.to_string()))
    }
}
