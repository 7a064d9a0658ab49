// libs/client-cell/src/handlers.rs
use std::sync::Arc;

use axum::{
    extract::{Extension, Path, Query, State},
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

use crate::models::{
    ClientError, ClientSearchQuery, CreateClientRequest, CreateSessionNoteRequest,
    RecordAssessmentRequest, UpdateClientRequest,
};
use crate::services::clients::ClientService;

#[axum::debug_handler]
pub async fn create_client(
    State(state): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
    Json(request): Json<CreateClientRequest>,
) -> Result<Json<Value>, AppError> {
    require_staff(&user)?;

    let service = client_service(&state);
    let client = service
        .create_client(request, auth.token())
        .await
        .map_err(map_client_error)?;

    Ok(Json(json!({
        "success": true,
        "client": client
    })))
}

#[axum::debug_handler]
pub async fn get_client(
    State(state): State<Arc<AppConfig>>,
    Path(client_id): Path<Uuid>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
) -> Result<Json<Value>, AppError> {
    require_staff(&user)?;

    let service = client_service(&state);
    let client = service
        .get_client(client_id, auth.token())
        .await
        .map_err(map_client_error)?;

    Ok(Json(json!(client)))
}

#[axum::debug_handler]
pub async fn update_client(
    State(state): State<Arc<AppConfig>>,
    Path(client_id): Path<Uuid>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
    Json(request): Json<UpdateClientRequest>,
) -> Result<Json<Value>, AppError> {
    require_staff(&user)?;

    let service = client_service(&state);
    let client = service
        .update_client(client_id, request, auth.token())
        .await
        .map_err(map_client_error)?;

    Ok(Json(json!({
        "success": true,
        "client": client
    })))
}

#[axum::debug_handler]
pub async fn search_clients(
    State(state): State<Arc<AppConfig>>,
    Query(query): Query<ClientSearchQuery>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
) -> Result<Json<Value>, AppError> {
    require_staff(&user)?;

    let service = client_service(&state);
    let clients = service
        .search_clients(query, auth.token())
        .await
        .map_err(map_client_error)?;

    let count = clients.len();

    Ok(Json(json!({
        "clients": clients,
        "count": count
    })))
}

#[axum::debug_handler]
pub async fn add_session_note(
    State(state): State<Arc<AppConfig>>,
    Path(client_id): Path<Uuid>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
    Json(request): Json<CreateSessionNoteRequest>,
) -> Result<Json<Value>, AppError> {
    require_staff(&user)?;
    let clinician_id = user_uuid(&user)?;

    let service = client_service(&state);
    let note = service
        .add_session_note(client_id, clinician_id, request, auth.token())
        .await
        .map_err(map_client_error)?;

    Ok(Json(json!({
        "success": true,
        "note": note
    })))
}

#[axum::debug_handler]
pub async fn list_session_notes(
    State(state): State<Arc<AppConfig>>,
    Path(client_id): Path<Uuid>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
) -> Result<Json<Value>, AppError> {
    require_staff(&user)?;

    let service = client_service(&state);
    let notes = service
        .list_session_notes(client_id, auth.token())
        .await
        .map_err(map_client_error)?;

    let count = notes.len();

    Ok(Json(json!({
        "notes": notes,
        "count": count
    })))
}

#[axum::debug_handler]
pub async fn record_assessment(
    State(state): State<Arc<AppConfig>>,
    Path(client_id): Path<Uuid>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
    Json(request): Json<RecordAssessmentRequest>,
) -> Result<Json<Value>, AppError> {
    require_staff(&user)?;
    let clinician_id = user_uuid(&user)?;

    let service = client_service(&state);
    let assessment = service
        .record_assessment(client_id, clinician_id, request, auth.token())
        .await
        .map_err(map_client_error)?;

    Ok(Json(json!({
        "success": true,
        "assessment": assessment
    })))
}

#[axum::debug_handler]
pub async fn list_assessments(
    State(state): State<Arc<AppConfig>>,
    Path(client_id): Path<Uuid>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
) -> Result<Json<Value>, AppError> {
    require_staff(&user)?;

    let service = client_service(&state);
    let assessments = service
        .list_assessments(client_id, auth.token())
        .await
        .map_err(map_client_error)?;

    let count = assessments.len();

    Ok(Json(json!({
        "assessments": assessments,
        "count": count
    })))
}

// ==============================================================================
// HELPERS
// ==============================================================================

fn client_service(state: &Arc<AppConfig>) -> ClientService {
    let store = Arc::new(RecordStoreClient::new(state));
    ClientService::new(store)
}

fn require_staff(user: &User) -> Result<(), AppError> {
    if !user.is_staff() {
        return Err(AppError::Auth("Staff role required".to_string()));
    }
    Ok(())
}

fn user_uuid(user: &User) -> Result<Uuid, AppError> {
    Uuid::parse_str(&user.id).map_err(|_| AppError::Auth("Invalid user id in token".to_string()))
}

fn map_client_error(error: ClientError) -> AppError {
    match error {
        ClientError::NotFound => AppError::NotFound("Client not found".to_string()),
        ClientError::DuplicateEmail(email) => {
            AppError::Conflict(format!("Client with email {} already exists", email))
        }
        ClientError::ValidationError(msg) => AppError::BadRequest(msg),
        ClientError::DatabaseError(msg) => AppError::Database(msg),
    }
}
