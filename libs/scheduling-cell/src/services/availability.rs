// libs/scheduling-cell/src/services/availability.rs
use chrono::{Duration, NaiveDate, NaiveDateTime};
use tracing::debug;
use uuid::Uuid;

use crate::models::{Appointment, AppointmentStatus, SlotSearchConfig};

/// Enumerate the slot start times on `date` where the clinician can take a
/// full appointment of `config.slot_duration_minutes` without touching any
/// of their non-cancelled bookings that day.
///
/// The day window is `[start_hour:00, end_hour:00)`. Appointments are
/// matched by civil date equality, not a time range. Returns a fresh,
/// ascending list on every call.
pub fn get_available_time_slots(
    date: NaiveDate,
    clinician_id: Uuid,
    existing: &[Appointment],
    config: &SlotSearchConfig,
) -> Vec<NaiveDateTime> {
    // A non-positive cursor step would never terminate.
    if config.slot_duration_minutes <= 0
        || config.slot_duration_minutes + config.break_between_slots_minutes <= 0
    {
        return Vec::new();
    }

    let window_start = date.and_hms_opt(config.start_hour, 0, 0).unwrap();
    let window_end = date.and_hms_opt(config.end_hour, 0, 0).unwrap();

    let slot_length = Duration::minutes(config.slot_duration_minutes as i64);
    let step = Duration::minutes(
        (config.slot_duration_minutes + config.break_between_slots_minutes) as i64,
    );
    let break_length = Duration::minutes(config.break_between_slots_minutes as i64);

    let mut day_appointments: Vec<&Appointment> = existing
        .iter()
        .filter(|apt| {
            apt.attending_clinician_id == clinician_id
                && apt.status != AppointmentStatus::Cancelled
                && apt.date_of_session.date() == date
        })
        .collect();
    day_appointments.sort_by_key(|apt| apt.date_of_session);

    debug!(
        "Computing slots for clinician {} on {} around {} appointments",
        clinician_id,
        date,
        day_appointments.len()
    );

    let mut slots = Vec::new();
    let mut cursor = window_start;

    for appointment in day_appointments {
        let busy_start = appointment.start_time();
        let busy_end = appointment.end_time();

        while cursor + slot_length <= busy_start && cursor + slot_length <= window_end {
            slots.push(cursor);
            cursor += step;
        }

        // Resume after the booking; never move the cursor backwards when an
        // appointment ended before the point we had already reached.
        let resume = busy_end + break_length;
        if resume > cursor {
            cursor = resume;
        }
    }

    while cursor + slot_length <= window_end {
        slots.push(cursor);
        cursor += step;
    }

    slots
}
