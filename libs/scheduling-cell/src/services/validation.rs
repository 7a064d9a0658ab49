// libs/scheduling-cell/src/services/validation.rs
use chrono::{Duration, Local, NaiveDateTime, Timelike};

use crate::models::{TimingRules, TimingValidation};

/// Validate a proposed start/duration against booking rules, using the
/// current local time for the past-booking check.
pub fn validate_appointment_timing(
    start_time: NaiveDateTime,
    duration_minutes: i32,
    rules: &TimingRules,
) -> TimingValidation {
    validate_appointment_timing_at(start_time, duration_minutes, rules, Local::now().naive_local())
}

/// Clock-explicit form of [`validate_appointment_timing`].
///
/// Every violated rule contributes an error; nothing short-circuits, so the
/// caller can surface all problems at once.
pub fn validate_appointment_timing_at(
    start_time: NaiveDateTime,
    duration_minutes: i32,
    rules: &TimingRules,
    now: NaiveDateTime,
) -> TimingValidation {
    let mut errors = Vec::new();
    let end_time = start_time + Duration::minutes(duration_minutes as i64);

    if !rules.allow_past_booking && start_time < now {
        errors.push("Appointment cannot be scheduled in the past".to_string());
    }

    if duration_minutes < rules.min_duration_minutes {
        errors.push(format!(
            "Appointment must be at least {} minutes long",
            rules.min_duration_minutes
        ));
    }

    if duration_minutes > rules.max_duration_minutes {
        errors.push(format!(
            "Appointment cannot be longer than {} minutes",
            rules.max_duration_minutes
        ));
    }

    let start_hour = start_time.hour();
    if start_hour < rules.business_start_hour || start_hour >= rules.business_end_hour {
        errors.push(format!(
            "Appointment must start within business hours ({}:00-{}:00)",
            rules.business_start_hour, rules.business_end_hour
        ));
    }

    // End-of-day check only applies when the appointment stays on one civil
    // day; crossing midnight is reported separately below.
    if end_time.date() == start_time.date() {
        let end_minute_of_day = end_time.hour() * 60 + end_time.minute();
        if end_minute_of_day > rules.business_end_hour * 60 {
            errors.push(format!(
                "Appointment must end by {}:00",
                rules.business_end_hour
            ));
        }
    }

    if start_time.date() != end_time.date() {
        errors.push("Appointment cannot span multiple days".to_string());
    }

    TimingValidation {
        is_valid: errors.is_empty(),
        errors,
    }
}
