//! API routes module

pub mod health;
pub mod users;

use axum::{Router, routing::get};

use crate::state::AppState;

/// Create all API routes
pub fn routes(state: &AppState) -> Router {
    Router::new().nest("/users", users::router(state))
}

/// Readiness endpoint, mounted next to `/health`
pub fn ready_router(state: AppState) -> Router {
    Router::new()
        .route("/ready", get(health::ready_handler))
        .with_state(state)
}
