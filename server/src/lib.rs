//! REST API server for the todo list.
//!
//! # Endpoints
//!
//! | Method | Path | Result |
//! |---|---|---|
//! | `GET` | `/api/todos` | `200`, every todo in creation order |
//! | `POST` | `/api/todos` | `201`, the created todo |
//! | `PUT` | `/api/todos/:id` | `200`, the updated todo; `404` if unknown |
//! | `DELETE` | `/api/todos/:id` | `204`; `404` if unknown |
//! | `GET` | `/health` | `200 OK` |
//! | `GET` | `/metrics` | Prometheus text |
//!
//! Blank titles are rejected with `422`. Errors are JSON
//! `{"code": ..., "message": ...}`.
//!
//! # Quick Start
//!
//! ```no_run
//! use todolist_server::{Config, TodoServer};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let server = TodoServer::from_config(Config::from_env()).await?;
//! server.run().await?;
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod app;
pub mod config;
pub mod metrics;
pub mod repository;
pub mod server;

pub use app::{ServerError, TodoServer};
pub use config::Config;
#[cfg(feature = "postgres")]
pub use repository::PostgresTodoRepository;
pub use repository::{InMemoryTodoRepository, RepositoryError, TodoRepository};
pub use server::{build_router, AppState};
