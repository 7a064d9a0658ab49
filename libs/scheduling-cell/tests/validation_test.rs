// libs/scheduling-cell/tests/validation_test.rs

use chrono::{NaiveDate, NaiveDateTime};

use scheduling_cell::models::TimingRules;
use scheduling_cell::services::validation::validate_appointment_timing_at;

fn at(hour: u32, minute: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 3, 1)
        .unwrap()
        .and_hms_opt(hour, minute, 0)
        .unwrap()
}

fn clock() -> NaiveDateTime {
    at(8, 0)
}

#[test]
fn a_reasonable_appointment_is_valid() {
    let result = validate_appointment_timing_at(at(10, 0), 60, &TimingRules::default(), clock());

    assert!(result.is_valid);
    assert!(result.errors.is_empty());
}

#[test]
fn durations_below_the_minimum_are_rejected() {
    let result = validate_appointment_timing_at(at(10, 0), 10, &TimingRules::default(), clock());

    assert!(!result.is_valid);
    assert_eq!(result.errors.len(), 1);
    assert!(result.errors[0].contains("at least 15 minutes"));
}

#[test]
fn durations_above_the_maximum_are_rejected() {
    let result = validate_appointment_timing_at(at(9, 0), 481, &TimingRules::default(), clock());

    assert!(!result.is_valid);
    assert!(result.errors.iter().any(|e| e.contains("longer than 480")));
}

#[test]
fn past_start_times_are_rejected_by_default() {
    let result = validate_appointment_timing_at(at(7, 0), 60, &TimingRules::default(), at(12, 0));

    assert!(!result.is_valid);
    assert!(result.errors.iter().any(|e| e.contains("in the past")));
}

#[test]
fn past_start_times_pass_when_past_booking_is_allowed() {
    let rules = TimingRules {
        allow_past_booking: true,
        business_start_hour: 0,
        ..TimingRules::default()
    };

    let result = validate_appointment_timing_at(at(7, 0), 60, &rules, at(12, 0));

    assert!(result.is_valid);
}

#[test]
fn starts_outside_business_hours_are_rejected() {
    let result = validate_appointment_timing_at(at(7, 0), 60, &TimingRules::default(), clock());

    assert!(!result.is_valid);
    assert!(result.errors.iter().any(|e| e.contains("business hours")));
}

#[test]
fn appointments_running_past_close_are_rejected() {
    let result = validate_appointment_timing_at(at(17, 30), 60, &TimingRules::default(), clock());

    assert!(!result.is_valid);
    assert!(result.errors.iter().any(|e| e.contains("end by 18:00")));
}

#[test]
fn an_appointment_ending_exactly_at_close_is_valid() {
    let result = validate_appointment_timing_at(at(17, 0), 60, &TimingRules::default(), clock());

    assert!(result.is_valid);
}

#[test]
fn crossing_midnight_reports_a_multi_day_error() {
    let result = validate_appointment_timing_at(at(22, 0), 180, &TimingRules::default(), clock());

    assert!(!result.is_valid);
    assert!(result
        .errors
        .iter()
        .any(|e| e.contains("cannot span multiple days")));
}

#[test]
fn every_violated_rule_is_reported() {
    // Past start, too short, and outside business hours all at once.
    let result = validate_appointment_timing_at(at(6, 0), 5, &TimingRules::default(), at(12, 0));

    assert!(!result.is_valid);
    assert_eq!(result.errors.len(), 3);
}
