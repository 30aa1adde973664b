//! Users API - REST server

use axum_helpers::server::{close_postgres, create_production_app, health_router};
use core_config::tracing::{init_tracing, install_color_eyre};
use migration::Migrator;
use std::time::Duration;
use tracing::{info, warn};

mod api;
mod config;
mod openapi;
mod state;

use config::Config;
use state::AppState;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    // Install color-eyre first for colored error output (before any fallible operations)
    install_color_eyre();

    // A missing .env file is fine
    if let Err(e) = dotenvy::dotenv()
        && !e.not_found()
    {
        return Err(e.into());
    }

    let config = Config::from_env()?;

    // Initialize tracing with ErrorLayer for span trace capture
    init_tracing(&config.environment);

    let db = match &config.database {
        Some(pg_config) => {
            info!("Connecting to PostgreSQL");
            let db = database::postgres::connect_with_retry(pg_config.clone(), None).await?;
            database::postgres::run_migrations::<Migrator>(&db, config.app.name).await?;
            Some(db)
        }
        None => {
            warn!("Using the in-memory user store, records are lost on restart");
            None
        }
    };

    let state = AppState { config, db };

    let api_routes = api::routes(&state);

    // create_router adds the OpenAPI document and middleware to our composed routes
    let router = axum_helpers::create_router::<openapi::ApiDoc>(api_routes)?;

    // - /health: liveness check with app name/version
    // - /ready: readiness check that pings the database
    let app = router
        .merge(health_router(state.config.app))
        .merge(api::ready_router(state.clone()));

    info!(store = %state.config.store, "Starting Users API (30s shutdown timeout)");

    let server = state.config.server.clone();
    create_production_app(app, &server, Duration::from_secs(30), async move {
        if let Some(db) = state.db {
            close_postgres(db, "users").await;
        }
    })
    .await
    .map_err(|e| eyre::eyre!("Server error: {}", e))?;

    info!("Users API shutdown complete");
    Ok(())
}
