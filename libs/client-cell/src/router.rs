// libs/client-cell/src/router.rs
use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};

use shared_config::AppConfig;
use shared_utils::extractor::auth_middleware;

use crate::handlers;

pub fn client_routes(state: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/", post(handlers::create_client))
        .route("/search", get(handlers::search_clients))
        .route("/{client_id}", get(handlers::get_client))
        .route("/{client_id}", put(handlers::update_client))
        .route("/{client_id}/notes", get(handlers::list_session_notes))
        .route("/{client_id}/notes", post(handlers::add_session_note))
        .route("/{client_id}/assessments", get(handlers::list_assessments))
        .route("/{client_id}/assessments", post(handlers::record_assessment))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware))
        .with_state(state)
}
