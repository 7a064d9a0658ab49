use std::env;
use tracing::warn;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub record_store_url: String,
    pub record_store_api_key: String,
    pub record_store_jwt_secret: String,
    pub google_calendar_base_url: String,
    pub calendar_sync_enabled: bool,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let config = Self {
            record_store_url: env::var("RECORD_STORE_URL")
                .unwrap_or_else(|_| {
                    warn!("RECORD_STORE_URL not set, using empty value");
                    String::new()
                }),
            record_store_api_key: env::var("RECORD_STORE_API_KEY")
                .unwrap_or_else(|_| {
                    warn!("RECORD_STORE_API_KEY not set, using empty value");
                    String::new()
                }),
            record_store_jwt_secret: env::var("RECORD_STORE_JWT_SECRET")
                .unwrap_or_else(|_| {
                    warn!("RECORD_STORE_JWT_SECRET not set, using empty value");
                    String::new()
                }),
            google_calendar_base_url: env::var("GOOGLE_CALENDAR_BASE_URL")
                .unwrap_or_else(|_| {
                    warn!("GOOGLE_CALENDAR_BASE_URL not set, using default");
                    "https://www.googleapis.com/calendar/v3".to_string()
                }),
            calendar_sync_enabled: env::var("CALENDAR_SYNC_ENABLED")
                .map(|v| v == "true" || v == "1")
                .unwrap_or(true),
        };

        if !config.is_configured() {
            warn!("Application not fully configured - missing environment variables");
        }

        config
    }

    pub fn is_configured(&self) -> bool {
        !self.record_store_url.is_empty()
            && !self.record_store_api_key.is_empty()
            && !self.record_store_jwt_secret.is_empty()
    }

    pub fn is_calendar_sync_configured(&self) -> bool {
        self.calendar_sync_enabled && !self.google_calendar_base_url.is_empty()
    }
}
