// libs/scheduling-cell/src/services/suggestions.rs
use chrono::{Datelike, Duration, NaiveDateTime, Timelike, Weekday};
use tracing::debug;
use uuid::Uuid;

use crate::models::{Appointment, SlotSearchConfig, SuggestionOptions};
use crate::services::availability::get_available_time_slots;

/// Offer up to `max_suggestions` alternative start times near a preferred
/// one, scanning day by day from the preferred date. Saturdays and Sundays
/// are always skipped. On the preferred day the candidates are ordered by
/// time-of-day proximity to the preferred start; later days stay ascending.
///
/// Suggestions are not re-checked for conflicts here; callers run a fresh
/// conflict check on the chosen slot before committing it.
pub fn suggest_alternative_slots(
    preferred_start: NaiveDateTime,
    duration_minutes: i32,
    clinician_id: Uuid,
    existing: &[Appointment],
    options: &SuggestionOptions,
) -> Vec<NaiveDateTime> {
    let search_config = SlotSearchConfig {
        start_hour: options.preferred_start_hour,
        end_hour: options.preferred_end_hour,
        slot_duration_minutes: duration_minutes,
        break_between_slots_minutes: 0,
    };

    let preferred_minute_of_day =
        preferred_start.hour() as i64 * 60 + preferred_start.minute() as i64;

    let mut suggestions = Vec::new();

    for day_offset in 0..options.search_days {
        let date = preferred_start.date() + Duration::days(day_offset);

        if matches!(date.weekday(), Weekday::Sat | Weekday::Sun) {
            continue;
        }

        let mut day_slots = get_available_time_slots(date, clinician_id, existing, &search_config);

        if day_offset == 0 {
            // Favor the slot closest to the requested time of day.
            day_slots.sort_by_key(|slot| {
                let minute_of_day = slot.hour() as i64 * 60 + slot.minute() as i64;
                (minute_of_day - preferred_minute_of_day).abs()
            });
        }

        for slot in day_slots {
            suggestions.push(slot);
            if suggestions.len() >= options.max_suggestions {
                debug!("Collected {} suggestions, stopping early", suggestions.len());
                return suggestions;
            }
        }
    }

    suggestions
}
