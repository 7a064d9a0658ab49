use std::sync::Arc;

use axum::{routing::get, Router};

use appointment_cell::router::appointment_routes;
use client_cell::router::client_routes;
use messaging_cell::router::messaging_routes;
use shared_config::AppConfig;

pub fn create_router(state: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/", get(|| async { "Caseload clinic API is running!" }))
        .nest("/clients", client_routes(state.clone()))
        .nest("/appointments", appointment_routes(state.clone()))
        .nest("/messages", messaging_routes(state.clone()))
}
