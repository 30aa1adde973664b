//! Configuration for Users API

use core_config::{
    AppInfo, ConfigError, FromEnv, app_info, env_parse, pagination::PaginatorConfig,
    server::ServerConfig,
};
use database::postgres::PostgresConfig;
use std::fmt;
use std::str::FromStr;

pub use core_config::Environment;

/// Backing store for user records, selected by `USERS_STORE`
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StoreKind {
    Postgres,
    Memory,
}

impl FromStr for StoreKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "postgres" => Ok(StoreKind::Postgres),
            "memory" => Ok(StoreKind::Memory),
            other => Err(format!("unknown store '{other}', expected 'postgres' or 'memory'")),
        }
    }
}

impl fmt::Display for StoreKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreKind::Postgres => f.write_str("postgres"),
            StoreKind::Memory => f.write_str("memory"),
        }
    }
}

/// Application configuration
#[derive(Clone, Debug)]
pub struct Config {
    pub app: AppInfo,
    pub environment: Environment,
    pub server: ServerConfig,
    pub paginator: PaginatorConfig,
    pub store: StoreKind,
    /// Present when `store` is [`StoreKind::Postgres`]
    pub database: Option<PostgresConfig>,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let environment = Environment::from_env();
        let server = ServerConfig::from_env()?;
        let paginator = PaginatorConfig::from_env()?;
        let store: StoreKind = env_parse("USERS_STORE", "postgres")?;

        let database = match store {
            StoreKind::Postgres => Some(PostgresConfig::from_env()?),
            StoreKind::Memory => None,
        };

        Ok(Self {
            app: app_info!(),
            environment,
            server,
            paginator,
            store,
            database,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_needs_no_database_url() {
        temp_env::with_vars(
            [
                ("USERS_STORE", Some("memory")),
                ("DATABASE_URL", None),
                ("PAGINATOR_LIMIT_DEFAULT", Some("25")),
            ],
            || {
                let config = Config::from_env().unwrap();
                assert_eq!(config.store, StoreKind::Memory);
                assert!(config.database.is_none());
                assert_eq!(config.paginator.default_limit, 25);
                assert_eq!(config.app.name, "users_api");
            },
        );
    }

    #[test]
    fn test_postgres_store_requires_database_url() {
        temp_env::with_vars([("USERS_STORE", None::<&str>), ("DATABASE_URL", None)], || {
            let err = Config::from_env().unwrap_err();
            assert!(matches!(err, ConfigError::MissingEnvVar(key) if key == "DATABASE_URL"));
        });
    }

    #[test]
    fn test_postgres_store_loads_database_config() {
        temp_env::with_vars(
            [
                ("USERS_STORE", Some("Postgres")),
                ("DATABASE_URL", Some("postgres://localhost/users")),
            ],
            || {
                let config = Config::from_env().unwrap();
                assert_eq!(config.store, StoreKind::Postgres);
                assert_eq!(
                    config.database.unwrap().url(),
                    "postgres://localhost/users"
                );
            },
        );
    }

    #[test]
    fn test_unknown_store_is_rejected() {
        temp_env::with_var("USERS_STORE", Some("redis"), || {
            let err = Config::from_env().unwrap_err();
            assert!(err.to_string().contains("USERS_STORE"));
        });
    }
}
