//! HTTP middleware module.
//!
//! # Example
//!
//! ```ignore
//! use axum_helpers::http::cors_layer_from_env;
//!
//! let mut app = Router::new();
//! if let Some(cors) = cors_layer_from_env()? {
//!     app = app.layer(cors);
//! }
//! ```

pub mod cors;

pub use cors::{create_cors_layer, cors_layer_from_env};
