pub mod booking;
pub mod calendar_sync;

pub use booking::AppointmentBookingService;
pub use calendar_sync::CalendarSyncService;
