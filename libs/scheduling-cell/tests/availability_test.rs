// libs/scheduling-cell/tests/availability_test.rs

use chrono::{NaiveDate, NaiveDateTime};
use uuid::Uuid;

use scheduling_cell::models::{Appointment, AppointmentStatus, SlotSearchConfig};
use scheduling_cell::services::availability::get_available_time_slots;

fn day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
}

fn at(hour: u32, minute: u32) -> NaiveDateTime {
    day().and_hms_opt(hour, minute, 0).unwrap()
}

fn booking(clinician_id: Uuid, start: NaiveDateTime, duration_minutes: i32) -> Appointment {
    Appointment {
        id: Uuid::new_v4(),
        date_of_session: start,
        duration_minutes,
        attending_clinician_id: clinician_id,
        client_id: None,
        location: None,
        status: AppointmentStatus::Confirmed,
    }
}

#[test]
fn empty_day_fills_the_whole_window() {
    let clinician = Uuid::new_v4();

    let slots = get_available_time_slots(day(), clinician, &[], &SlotSearchConfig::default());

    let expected: Vec<NaiveDateTime> = (9..17).map(|hour| at(hour, 0)).collect();
    assert_eq!(slots, expected);
}

#[test]
fn slots_skip_an_on_the_hour_booking() {
    let clinician = Uuid::new_v4();
    let existing = vec![booking(clinician, at(10, 0), 60)];

    let slots = get_available_time_slots(day(), clinician, &existing, &SlotSearchConfig::default());

    assert_eq!(slots.len(), 7);
    assert!(!slots.contains(&at(10, 0)));
    assert_eq!(slots[0], at(9, 0));
    assert_eq!(slots[1], at(11, 0));
}

#[test]
fn no_emitted_slot_overlaps_a_booking() {
    let clinician = Uuid::new_v4();
    let existing = vec![
        booking(clinician, at(10, 0), 60),
        booking(clinician, at(13, 30), 45),
    ];
    let config = SlotSearchConfig::default();

    let slots = get_available_time_slots(day(), clinician, &existing, &config);

    for slot_start in &slots {
        let slot_end = *slot_start + chrono::Duration::minutes(config.slot_duration_minutes as i64);
        for appointment in &existing {
            let disjoint =
                slot_end <= appointment.start_time() || *slot_start >= appointment.end_time();
            assert!(
                disjoint,
                "slot {} overlaps booking at {}",
                slot_start,
                appointment.start_time()
            );
        }
    }
}

#[test]
fn cursor_resumes_after_an_off_hour_booking() {
    let clinician = Uuid::new_v4();
    let existing = vec![booking(clinician, at(10, 30), 60)];

    let slots = get_available_time_slots(day(), clinician, &existing, &SlotSearchConfig::default());

    // One slot fits before the 10:30 booking, then the walk resumes at 11:30.
    assert_eq!(
        slots,
        vec![at(9, 0), at(11, 30), at(12, 30), at(13, 30), at(14, 30), at(15, 30)]
    );
}

#[test]
fn break_between_slots_spreads_the_grid() {
    let clinician = Uuid::new_v4();
    let config = SlotSearchConfig {
        break_between_slots_minutes: 15,
        ..SlotSearchConfig::default()
    };

    let slots = get_available_time_slots(day(), clinician, &[], &config);

    assert_eq!(
        slots,
        vec![at(9, 0), at(10, 15), at(11, 30), at(12, 45), at(14, 0), at(15, 15)]
    );
}

#[test]
fn booking_abutting_the_window_start_changes_nothing() {
    let clinician = Uuid::new_v4();
    let existing = vec![booking(clinician, at(8, 0), 60)];

    let slots = get_available_time_slots(day(), clinician, &existing, &SlotSearchConfig::default());

    assert_eq!(slots.len(), 8);
    assert_eq!(slots[0], at(9, 0));
}

#[test]
fn other_clinicians_bookings_are_ignored() {
    let clinician = Uuid::new_v4();
    let someone_else = Uuid::new_v4();
    let existing = vec![booking(someone_else, at(10, 0), 60)];

    let slots = get_available_time_slots(day(), clinician, &existing, &SlotSearchConfig::default());

    assert_eq!(slots.len(), 8);
}

#[test]
fn cancelled_bookings_free_their_slot() {
    let clinician = Uuid::new_v4();
    let mut cancelled = booking(clinician, at(10, 0), 60);
    cancelled.status = AppointmentStatus::Cancelled;
    let existing = vec![cancelled];

    let slots = get_available_time_slots(day(), clinician, &existing, &SlotSearchConfig::default());

    assert_eq!(slots.len(), 8);
    assert!(slots.contains(&at(10, 0)));
}

#[test]
fn a_nonsensical_slot_duration_yields_no_slots() {
    let clinician = Uuid::new_v4();
    let config = SlotSearchConfig {
        slot_duration_minutes: 0,
        ..SlotSearchConfig::default()
    };

    assert!(get_available_time_slots(day(), clinician, &[], &config).is_empty());
}

#[test]
fn bookings_on_other_days_are_ignored() {
    let clinician = Uuid::new_v4();
    let next_day = NaiveDate::from_ymd_opt(2024, 3, 2)
        .unwrap()
        .and_hms_opt(10, 0, 0)
        .unwrap();
    let existing = vec![booking(clinician, next_day, 60)];

    let slots = get_available_time_slots(day(), clinician, &existing, &SlotSearchConfig::default());

    assert_eq!(slots.len(), 8);
}
