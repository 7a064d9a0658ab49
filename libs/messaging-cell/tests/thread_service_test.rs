// libs/messaging-cell/tests/thread_service_test.rs

use std::sync::Arc;

use assert_matches::assert_matches;
use chrono::Utc;
use serde_json::json;
use uuid::Uuid;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use messaging_cell::models::MessagingError;
use messaging_cell::services::threads::ThreadService;
use shared_config::AppConfig;
use shared_database::RecordStoreClient;

fn service_for(server: &MockServer) -> ThreadService {
    let config = AppConfig {
        record_store_url: server.uri(),
        record_store_api_key: "test-api-key".to_string(),
        record_store_jwt_secret: "test-secret".to_string(),
        google_calendar_base_url: String::new(),
        calendar_sync_enabled: false,
    };
    ThreadService::new(Arc::new(RecordStoreClient::new(&config)))
}

fn thread_row(id: Uuid, participants: &[Uuid], hidden_for: &[Uuid]) -> serde_json::Value {
    json!({
        "id": id,
        "subject": "Care plan",
        "participant_ids": participants,
        "hidden_for": hidden_for,
        "last_message_at": Utc::now(),
        "created_at": Utc::now(),
        "updated_at": Utc::now()
    })
}

#[tokio::test]
async fn first_deletion_only_hides_the_thread() {
    let server = MockServer::start().await;
    let alice = Uuid::new_v4();
    let bob = Uuid::new_v4();
    let thread_id = Uuid::new_v4();

    Mock::given(method("GET"))
        .and(path("/rest/v1/message_threads"))
        .respond_with(ResponseTemplate::new(200).set_body_json(vec![thread_row(
            thread_id,
            &[alice, bob],
            &[],
        )]))
        .mount(&server)
        .await;

    // The update writes the new hidden_for list; no DELETE is mounted, so a
    // purge attempt would fail the test.
    Mock::given(method("PATCH"))
        .and(path("/rest/v1/message_threads"))
        .respond_with(ResponseTemplate::new(200).set_body_json(vec![thread_row(
            thread_id,
            &[alice, bob],
            &[alice],
        )]))
        .mount(&server)
        .await;

    let service = service_for(&server);
    let result = service.delete_thread_for_user(thread_id, alice, "token").await;

    assert!(result.is_ok());
}

#[tokio::test]
async fn last_deletion_purges_thread_and_messages() {
    let server = MockServer::start().await;
    let alice = Uuid::new_v4();
    let bob = Uuid::new_v4();
    let thread_id = Uuid::new_v4();

    // Bob already deleted the thread; Alice's deletion is the last one.
    Mock::given(method("GET"))
        .and(path("/rest/v1/message_threads"))
        .respond_with(ResponseTemplate::new(200).set_body_json(vec![thread_row(
            thread_id,
            &[alice, bob],
            &[bob],
        )]))
        .mount(&server)
        .await;

    Mock::given(method("DELETE"))
        .and(path("/rest/v1/messages"))
        .respond_with(ResponseTemplate::new(200).set_body_json(Vec::<serde_json::Value>::new()))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("DELETE"))
        .and(path("/rest/v1/message_threads"))
        .respond_with(ResponseTemplate::new(200).set_body_json(Vec::<serde_json::Value>::new()))
        .expect(1)
        .mount(&server)
        .await;

    let service = service_for(&server);
    let result = service.delete_thread_for_user(thread_id, alice, "token").await;

    assert!(result.is_ok());
}

#[tokio::test]
async fn outsiders_cannot_delete_a_thread() {
    let server = MockServer::start().await;
    let thread_id = Uuid::new_v4();

    Mock::given(method("GET"))
        .and(path("/rest/v1/message_threads"))
        .respond_with(ResponseTemplate::new(200).set_body_json(vec![thread_row(
            thread_id,
            &[Uuid::new_v4(), Uuid::new_v4()],
            &[],
        )]))
        .mount(&server)
        .await;

    let service = service_for(&server);
    let result = service
        .delete_thread_for_user(thread_id, Uuid::new_v4(), "token")
        .await;

    assert_matches!(result, Err(MessagingError::NotParticipant));
}

#[tokio::test]
async fn a_deleted_thread_is_gone_for_that_user() {
    let server = MockServer::start().await;
    let alice = Uuid::new_v4();
    let bob = Uuid::new_v4();
    let thread_id = Uuid::new_v4();

    Mock::given(method("GET"))
        .and(path("/rest/v1/message_threads"))
        .respond_with(ResponseTemplate::new(200).set_body_json(vec![thread_row(
            thread_id,
            &[alice, bob],
            &[alice],
        )]))
        .mount(&server)
        .await;

    let service = service_for(&server);
    let result = service.get_thread_messages(thread_id, alice, "token").await;

    assert_matches!(result, Err(MessagingError::ThreadNotFound));
}
