// libs/scheduling-cell/src/services/conflict.rs
use tracing::{debug, warn};
use uuid::Uuid;

use crate::models::{
    Appointment, AppointmentSlot, AppointmentStatus, ConflictCheckResult, ConflictType,
};

/// Check a proposed slot against every existing appointment.
///
/// An appointment conflicts when its interval overlaps the slot AND it
/// shares the clinician, the client, or the room. `exclude_appointment_id`
/// removes the appointment being edited from consideration; cancelled
/// appointments never count.
pub fn check_appointment_conflicts(
    slot: &AppointmentSlot,
    existing: &[Appointment],
    exclude_appointment_id: Option<Uuid>,
) -> ConflictCheckResult {
    debug!(
        "Checking conflicts for clinician {} from {} to {}",
        slot.clinician_id, slot.start_time, slot.end_time
    );

    let mut conflicting_appointments = Vec::new();
    let mut conflict_type = ConflictType::None;

    for appointment in existing {
        if Some(appointment.id) == exclude_appointment_id {
            continue;
        }
        if appointment.status == AppointmentStatus::Cancelled {
            continue;
        }

        let existing_start = appointment.start_time();
        let existing_end = appointment.end_time();

        // Overlap rule: a proposed endpoint falls inside the existing
        // interval, or the existing start falls inside the proposed one.
        // Endpoints are compared inclusively, so back-to-back bookings count
        // as overlapping. Deliberately not the canonical
        // max(start) < min(end) formula.
        let overlaps = (slot.start_time >= existing_start && slot.start_time <= existing_end)
            || (slot.end_time >= existing_start && slot.end_time <= existing_end)
            || (existing_start >= slot.start_time && existing_start <= slot.end_time);

        if !overlaps {
            continue;
        }

        // Attribute checks run independently in a fixed order; each match
        // appends the appointment and overwrites the reported type, so the
        // last matching category wins.
        if appointment.attending_clinician_id == slot.clinician_id {
            conflicting_appointments.push(appointment.clone());
            conflict_type = ConflictType::Clinician;
        }

        if let Some(client_id) = slot.client_id {
            if appointment.client_id == Some(client_id) {
                conflicting_appointments.push(appointment.clone());
                conflict_type = ConflictType::Client;
            }
        }

        if let (Some(proposed_room), Some(booked_room)) =
            (slot.location.as_deref(), appointment.location.as_deref())
        {
            if !proposed_room.is_empty() && !booked_room.is_empty() && proposed_room == booked_room
            {
                conflicting_appointments.push(appointment.clone());
                conflict_type = ConflictType::Room;
            }
        }
    }

    let has_conflict = !conflicting_appointments.is_empty();

    if has_conflict {
        warn!(
            "Conflict detected for clinician {} - {} conflicting appointments",
            slot.clinician_id,
            conflicting_appointments.len()
        );
    }

    ConflictCheckResult {
        has_conflict,
        message: conflict_message(conflict_type),
        conflict_type,
        conflicting_appointments,
    }
}

fn conflict_message(conflict_type: ConflictType) -> Option<String> {
    match conflict_type {
        ConflictType::Clinician => {
            Some("The clinician already has an appointment during this time".to_string())
        }
        ConflictType::Client => {
            Some("The client already has an appointment during this time".to_string())
        }
        ConflictType::Room => Some("This room is already booked during this time".to_string()),
        ConflictType::None => None,
    }
}
