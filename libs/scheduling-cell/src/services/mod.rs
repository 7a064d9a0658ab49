pub mod availability;
pub mod conflict;
pub mod suggestions;
pub mod validation;

pub use availability::get_available_time_slots;
pub use conflict::check_appointment_conflicts;
pub use suggestions::suggest_alternative_slots;
pub use validation::{validate_appointment_timing, validate_appointment_timing_at};
