//! Users Domain
//!
//! CRUD over user records with filtered, paginated listing.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │  Handlers   │  ← HTTP transport (axum), envelope encoding
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │  Endpoints  │  ← Validation, pagination, error taxonomy
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Service   │  ← Entity construction, forwarding
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │ Repository  │  ← Data access (trait + in-memory and PostgreSQL)
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Models    │  ← Entities, filters, partial updates
//! └─────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use core_config::pagination::PaginatorConfig;
//! use domain_users::{
//!     handlers,
//!     endpoints::UserEndpoints,
//!     repository::InMemoryUserRepository,
//!     service::UserService,
//! };
//!
//! let repository = InMemoryUserRepository::new();
//! let service = UserService::new(repository);
//! let endpoints = UserEndpoints::new(service, PaginatorConfig::default());
//!
//! // Create Axum router
//! let router = handlers::router(endpoints);
//! ```

pub mod endpoints;
pub mod entity;
pub mod error;
pub mod handlers;
pub mod models;
pub mod pagination;
pub mod postgres;
pub mod repository;
pub mod service;

// Re-export commonly used types
pub use endpoints::{
    CreateRequest, DeleteRequest, GetAllRequest, GetRequest, Reply, ReplyStatus, UpdateRequest,
    UserEndpoints,
};
pub use error::{EndpointError, UserError, UserResult};
pub use handlers::{ApiDoc, Envelope};
pub use models::{NewUser, User, UserFilters, UserUpdate};
pub use pagination::{PageMeta, PageRequest, Pagination, PaginationError};
pub use postgres::PgUserRepository;
pub use repository::{InMemoryUserRepository, UserRepository};
pub use service::UserService;
