// libs/messaging-cell/src/router.rs
use std::sync::Arc;

use axum::{
    middleware,
    routing::{delete, get, post},
    Router,
};

use shared_config::AppConfig;
use shared_utils::extractor::auth_middleware;

use crate::handlers;

pub fn messaging_routes(state: Arc<AppConfig>) -> Router {
    let protected_routes = Router::new()
        .route("/", get(handlers::list_threads))
        .route("/", post(handlers::start_thread))
        .route("/{thread_id}", get(handlers::get_thread_messages))
        .route("/{thread_id}", delete(handlers::delete_thread))
        .route("/{thread_id}/messages", post(handlers::send_message))
        .route("/{thread_id}/read", post(handlers::mark_thread_read))
        .route("/notifications", get(handlers::list_notifications))
        .route("/notifications/{notification_id}/read", post(handlers::mark_notification_read))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    Router::new().merge(protected_routes).with_state(state)
}
