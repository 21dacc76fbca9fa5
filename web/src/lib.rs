//! Axum building blocks for the todolist HTTP API.
//!
//! Everything here is independent of how todos are stored:
//!
//! - [`AppError`]: maps failures to `{code, message}` JSON responses
//! - [`middleware`]: request IDs, CORS and per-request metrics
//! - [`handlers::health_check`]: liveness check
//!
//! # Example
//!
//! ```ignore
//! use axum::{routing::get, Router};
//! use todolist_web::{handlers::health_check, middleware};
//!
//! let app = Router::new()
//!     .route("/health", get(health_check))
//!     .layer(middleware::cors_layer(&config.cors_allowed_origins))
//!     .layer(middleware::request_id_layer());
//! ```

#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod handlers;
pub mod middleware;

// Re-export key types for convenience
pub use error::AppError;
pub use middleware::{cors_layer, request_id_layer, RequestId, REQUEST_ID_HEADER};

/// Result type alias for web handlers.
pub type WebResult<T> = Result<T, AppError>;
