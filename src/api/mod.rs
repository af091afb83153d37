pub mod auth;
pub mod error;
mod reservations;
mod resources;
mod users;
mod validation;

use axum::{
    routing::{delete, get, post},
    Router,
};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::AppState;

/// Body for endpoints that only acknowledge an action
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

pub fn create_router(state: Arc<AppState>) -> Router {
    // Auth routes (login is public, profile authenticates via extractor)
    let auth_routes = Router::new()
        .route("/login", post(auth::login))
        .route("/profile", get(auth::profile));

    // Protected API routes (every handler takes the authenticated User)
    let api_routes = Router::new()
        // Resources
        .route("/resources", get(resources::list_resources))
        // Users (admin only)
        .route("/users", get(users::list_users))
        .route("/users", post(users::create_user))
        .route("/users/:id", delete(users::delete_user))
        // Reservations
        .route("/reservations", get(reservations::list_reservations))
        .route("/reservations", post(reservations::create_reservation))
        .route("/reservations/:id", delete(reservations::delete_reservation));

    let request_timeout = Duration::from_secs(state.config.server.request_timeout_secs);

    Router::new()
        .route("/health", get(health_check))
        .nest("/api/auth", auth_routes)
        .nest("/api", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(request_timeout))
        .with_state(state)
}

async fn health_check() -> &'static str {
    "OK"
}
