// libs/calendar-cell/tests/google_client_test.rs

use assert_matches::assert_matches;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use calendar_cell::models::{CalendarError, EventDateTime, EventInput};
use calendar_cell::services::google::GoogleCalendarClient;
use shared_config::AppConfig;

fn config_for(server: &MockServer) -> AppConfig {
    AppConfig {
        record_store_url: String::new(),
        record_store_api_key: String::new(),
        record_store_jwt_secret: String::new(),
        google_calendar_base_url: server.uri(),
        calendar_sync_enabled: true,
    }
}

fn sample_event() -> EventInput {
    EventInput {
        summary: "Session with client".to_string(),
        description: None,
        location: Some("Room 2".to_string()),
        start: EventDateTime {
            date_time: "2024-03-01T09:00:00".to_string(),
            time_zone: Some("Europe/London".to_string()),
        },
        end: EventDateTime {
            date_time: "2024-03-01T10:00:00".to_string(),
            time_zone: Some("Europe/London".to_string()),
        },
    }
}

#[tokio::test]
async fn insert_event_parses_the_created_event() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/calendars/primary/events"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id": "evt_123",
            "status": "confirmed",
            "summary": "Session with client",
            "htmlLink": "https://calendar.google.com/event?eid=evt_123"
        })))
        .mount(&server)
        .await;

    let client = GoogleCalendarClient::new(&config_for(&server)).unwrap();
    let event = client
        .insert_event("primary", "user-token", &sample_event())
        .await
        .unwrap();

    assert_eq!(event.id, "evt_123");
    assert_eq!(event.status.as_deref(), Some("confirmed"));
}

#[tokio::test]
async fn api_failures_carry_status_and_body() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/calendars/primary/events"))
        .respond_with(ResponseTemplate::new(403).set_body_string("insufficient scope"))
        .mount(&server)
        .await;

    let client = GoogleCalendarClient::new(&config_for(&server)).unwrap();
    let result = client
        .insert_event("primary", "user-token", &sample_event())
        .await;

    assert_matches!(
        result,
        Err(CalendarError::ApiError { status: 403, ref message }) if message.contains("insufficient scope")
    );
}

#[tokio::test]
async fn deleting_an_already_gone_event_is_not_an_error() {
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/calendars/primary/events/evt_gone"))
        .respond_with(ResponseTemplate::new(410))
        .mount(&server)
        .await;

    let client = GoogleCalendarClient::new(&config_for(&server)).unwrap();
    let result = client.delete_event("primary", "evt_gone", "user-token").await;

    assert!(result.is_ok());
}

#[tokio::test]
async fn sync_disabled_config_refuses_to_build_a_client() {
    let config = AppConfig {
        record_store_url: String::new(),
        record_store_api_key: String::new(),
        record_store_jwt_secret: String::new(),
        google_calendar_base_url: "https://www.googleapis.com/calendar/v3".to_string(),
        calendar_sync_enabled: false,
    };

    assert_matches!(
        GoogleCalendarClient::new(&config),
        Err(CalendarError::NotConfigured)
    );
}
