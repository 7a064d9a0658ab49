// libs/scheduling-cell/tests/suggestions_test.rs

use chrono::{Datelike, NaiveDate, NaiveDateTime, Weekday};
use uuid::Uuid;

use scheduling_cell::models::{Appointment, AppointmentStatus, SuggestionOptions};
use scheduling_cell::services::suggestions::suggest_alternative_slots;

fn at(year: i32, month: u32, day: u32, hour: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(year, month, day)
        .unwrap()
        .and_hms_opt(hour, 0, 0)
        .unwrap()
}

fn full_day_booking(clinician_id: Uuid, start: NaiveDateTime) -> Appointment {
    Appointment {
        id: Uuid::new_v4(),
        date_of_session: start,
        duration_minutes: 480,
        attending_clinician_id: clinician_id,
        client_id: None,
        location: None,
        status: AppointmentStatus::Confirmed,
    }
}

#[test]
fn weekends_are_never_suggested() {
    let clinician = Uuid::new_v4();
    // 2024-03-01 is a Friday; block it so the search must move past the weekend.
    let existing = vec![full_day_booking(clinician, at(2024, 3, 1, 9))];

    let suggestions = suggest_alternative_slots(
        at(2024, 3, 1, 9),
        60,
        clinician,
        &existing,
        &SuggestionOptions::default(),
    );

    assert!(!suggestions.is_empty());
    for slot in &suggestions {
        assert!(!matches!(slot.weekday(), Weekday::Sat | Weekday::Sun));
    }
    // Everything lands on the following Monday.
    assert!(suggestions.iter().all(|s| s.date() == NaiveDate::from_ymd_opt(2024, 3, 4).unwrap()));
}

#[test]
fn result_count_is_capped_at_max_suggestions() {
    let clinician = Uuid::new_v4();

    let suggestions = suggest_alternative_slots(
        at(2024, 3, 1, 9),
        60,
        clinician,
        &[],
        &SuggestionOptions::default(),
    );

    assert_eq!(suggestions.len(), 5);
}

#[test]
fn preferred_day_is_ordered_by_proximity() {
    let clinician = Uuid::new_v4();

    let suggestions = suggest_alternative_slots(
        at(2024, 3, 1, 13),
        60,
        clinician,
        &[],
        &SuggestionOptions::default(),
    );

    assert_eq!(
        suggestions,
        vec![
            at(2024, 3, 1, 13),
            at(2024, 3, 1, 12),
            at(2024, 3, 1, 14),
            at(2024, 3, 1, 11),
            at(2024, 3, 1, 15),
        ]
    );
}

#[test]
fn later_days_stay_in_ascending_order() {
    let clinician = Uuid::new_v4();
    let existing = vec![full_day_booking(clinician, at(2024, 3, 1, 9))];

    let suggestions = suggest_alternative_slots(
        at(2024, 3, 1, 16),
        60,
        clinician,
        &existing,
        &SuggestionOptions::default(),
    );

    assert_eq!(
        suggestions,
        vec![
            at(2024, 3, 4, 9),
            at(2024, 3, 4, 10),
            at(2024, 3, 4, 11),
            at(2024, 3, 4, 12),
            at(2024, 3, 4, 13),
        ]
    );
}

#[test]
fn a_fully_booked_search_window_yields_nothing() {
    let clinician = Uuid::new_v4();
    // Solid bookings Monday through Friday; the window's weekend days are
    // skipped anyway.
    let existing: Vec<Appointment> = (4..=8)
        .map(|day| full_day_booking(clinician, at(2024, 3, day, 9)))
        .collect();

    let suggestions = suggest_alternative_slots(
        at(2024, 3, 4, 10),
        60,
        clinician,
        &existing,
        &SuggestionOptions::default(),
    );

    assert!(suggestions.is_empty());
}

#[test]
fn search_stops_as_soon_as_the_cap_is_reached() {
    let clinician = Uuid::new_v4();
    let options = SuggestionOptions {
        max_suggestions: 3,
        ..SuggestionOptions::default()
    };

    let suggestions =
        suggest_alternative_slots(at(2024, 3, 1, 9), 60, clinician, &[], &options);

    assert_eq!(suggestions.len(), 3);
    assert!(suggestions.iter().all(|s| s.date() == NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()));
}
