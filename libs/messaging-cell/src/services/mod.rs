pub mod notifications;
pub mod threads;
pub mod visibility;

pub use notifications::NotificationService;
pub use threads::ThreadService;
