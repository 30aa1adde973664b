//! Users API routes

use axum::Router;
use domain_users::{
    InMemoryUserRepository, PgUserRepository, UserEndpoints, UserService, handlers,
};

use crate::state::AppState;

/// Create users router on the configured store
pub fn router(state: &AppState) -> Router {
    let paginator = state.config.paginator;

    match &state.db {
        Some(db) => {
            let repository = PgUserRepository::new(db.clone());
            handlers::router(UserEndpoints::new(UserService::new(repository), paginator))
        }
        None => {
            let repository = InMemoryUserRepository::new();
            handlers::router(UserEndpoints::new(UserService::new(repository), paginator))
        }
    }
}
