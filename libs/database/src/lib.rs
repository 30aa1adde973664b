//! PostgreSQL connection management for the services in this workspace.
//!
//! - [`postgres::PostgresConfig`] pool settings, loadable with `core_config::FromEnv`
//! - [`postgres::connect_with_retry`] exponential backoff on startup
//! - [`postgres::check_health`] readiness probe query
//! - [`postgres::run_migrations`] applies a SeaORM `MigratorTrait`
//!
//! ```ignore
//! use core_config::FromEnv;
//! use database::postgres::{self, PostgresConfig};
//! use migration::Migrator;
//!
//! let config = PostgresConfig::from_env()?;
//! let db = postgres::connect_with_retry(config, None).await?;
//! postgres::run_migrations::<Migrator>(&db, "users_api").await?;
//! ```

pub mod common;
pub mod postgres;

pub use common::{DatabaseError, DatabaseResult, RetryConfig};
