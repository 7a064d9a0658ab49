pub mod accounts;
pub mod google;

pub use accounts::CalendarAccountService;
pub use google::GoogleCalendarClient;
