// libs/messaging-cell/src/handlers.rs
use std::sync::Arc;

use axum::{
    extract::{Extension, Path, State},
    Json,
};
use axum_extra::TypedHeader;
use headers::{authorization::Bearer, Authorization};
use serde_json::{json, Value};
use uuid::Uuid;

use shared_config::AppConfig;
use shared_database::RecordStoreClient;
use shared_models::auth::User;
use shared_models::error::AppError;

use crate::models::{MessagingError, SendMessageRequest, StartThreadRequest};
use crate::services::notifications::NotificationService;
use crate::services::threads::ThreadService;

// ==============================================================================
// THREAD HANDLERS
// ==============================================================================

#[axum::debug_handler]
pub async fn list_threads(
    State(state): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
) -> Result<Json<Value>, AppError> {
    let token = auth.token();
    let user_id = user_uuid(&user)?;

    let service = thread_service(&state);
    let summaries = service
        .list_threads(user_id, token)
        .await
        .map_err(map_messaging_error)?;

    let count = summaries.len();

    Ok(Json(json!({
        "threads": summaries,
        "count": count
    })))
}

#[axum::debug_handler]
pub async fn start_thread(
    State(state): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
    Json(request): Json<StartThreadRequest>,
) -> Result<Json<Value>, AppError> {
    let token = auth.token();
    let user_id = user_uuid(&user)?;

    let service = thread_service(&state);
    let thread = service
        .start_thread(user_id, request, token)
        .await
        .map_err(map_messaging_error)?;

    Ok(Json(json!({
        "success": true,
        "thread": thread
    })))
}

#[axum::debug_handler]
pub async fn get_thread_messages(
    State(state): State<Arc<AppConfig>>,
    Path(thread_id): Path<Uuid>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
) -> Result<Json<Value>, AppError> {
    let token = auth.token();
    let user_id = user_uuid(&user)?;

    let service = thread_service(&state);
    let (thread, messages) = service
        .get_thread_messages(thread_id, user_id, token)
        .await
        .map_err(map_messaging_error)?;

    Ok(Json(json!({
        "thread": thread,
        "messages": messages
    })))
}

#[axum::debug_handler]
pub async fn send_message(
    State(state): State<Arc<AppConfig>>,
    Path(thread_id): Path<Uuid>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
    Json(request): Json<SendMessageRequest>,
) -> Result<Json<Value>, AppError> {
    let token = auth.token();
    let user_id = user_uuid(&user)?;

    let service = thread_service(&state);
    let message = service
        .send_message(thread_id, user_id, request, token)
        .await
        .map_err(map_messaging_error)?;

    Ok(Json(json!({
        "success": true,
        "message": message
    })))
}

#[axum::debug_handler]
pub async fn mark_thread_read(
    State(state): State<Arc<AppConfig>>,
    Path(thread_id): Path<Uuid>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
) -> Result<Json<Value>, AppError> {
    let token = auth.token();
    let user_id = user_uuid(&user)?;

    let service = thread_service(&state);
    let marked = service
        .mark_thread_read(thread_id, user_id, token)
        .await
        .map_err(map_messaging_error)?;

    Ok(Json(json!({
        "success": true,
        "marked_read": marked
    })))
}

#[axum::debug_handler]
pub async fn delete_thread(
    State(state): State<Arc<AppConfig>>,
    Path(thread_id): Path<Uuid>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
) -> Result<Json<Value>, AppError> {
    let token = auth.token();
    let user_id = user_uuid(&user)?;

    let service = thread_service(&state);
    service
        .delete_thread_for_user(thread_id, user_id, token)
        .await
        .map_err(map_messaging_error)?;

    Ok(Json(json!({
        "success": true,
        "message": "Thread removed from your inbox"
    })))
}

// ==============================================================================
// NOTIFICATION HANDLERS
// ==============================================================================

#[axum::debug_handler]
pub async fn list_notifications(
    State(state): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
) -> Result<Json<Value>, AppError> {
    let token = auth.token();
    let user_id = user_uuid(&user)?;

    let store = Arc::new(RecordStoreClient::new(&state));
    let service = NotificationService::new(store);

    let notifications = service
        .list_notifications(user_id, token)
        .await
        .map_err(map_messaging_error)?;

    let unread = notifications.iter().filter(|n| !n.is_read).count();

    Ok(Json(json!({
        "notifications": notifications,
        "unread_count": unread
    })))
}

#[axum::debug_handler]
pub async fn mark_notification_read(
    State(state): State<Arc<AppConfig>>,
    Path(notification_id): Path<Uuid>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
) -> Result<Json<Value>, AppError> {
    let token = auth.token();
    let user_id = user_uuid(&user)?;

    let store = Arc::new(RecordStoreClient::new(&state));
    let service = NotificationService::new(store);

    let notification = service
        .mark_read(notification_id, user_id, token)
        .await
        .map_err(map_messaging_error)?;

    Ok(Json(json!({
        "success": true,
        "notification": notification
    })))
}

// ==============================================================================
// HELPERS
// ==============================================================================

fn thread_service(state: &Arc<AppConfig>) -> ThreadService {
    let store = Arc::new(RecordStoreClient::new(state));
    ThreadService::new(store)
}

fn user_uuid(user: &User) -> Result<Uuid, AppError> {
    Uuid::parse_str(&user.id).map_err(|_| AppError::Auth("Invalid user id in token".to_string()))
}

fn map_messaging_error(error: MessagingError) -> AppError {
    match error {
        MessagingError::ThreadNotFound => AppError::NotFound("Thread not found".to_string()),
        MessagingError::NotificationNotFound => {
            AppError::NotFound("Notification not found".to_string())
        }
        MessagingError::NotParticipant => {
            AppError::Auth("Not a participant in this thread".to_string())
        }
        MessagingError::ValidationError(msg) => AppError::BadRequest(msg),
        MessagingError::DatabaseError(msg) => AppError::Database(msg),
    }
}
