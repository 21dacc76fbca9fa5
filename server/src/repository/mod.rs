//! Server-side todo storage.
//!
//! [`TodoRepository`] is the seam between HTTP handlers and persistence.
//! The in-memory implementation backs tests and database-less runs; the
//! `PostgreSQL` one is compiled with the `postgres` feature.

mod memory;
#[cfg(feature = "postgres")]
mod postgres;

pub use memory::InMemoryTodoRepository;
#[cfg(feature = "postgres")]
pub use postgres::PostgresTodoRepository;

use async_trait::async_trait;
use thiserror::Error;
use todolist_model::{NewTodo, Todo, TodoId, TodoPatch};

/// Errors from todo storage
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RepositoryError {
    /// No todo has this id
    #[error("todo {0} not found")]
    NotFound(TodoId),

    /// The backing store failed
    #[error("database error: {0}")]
    Database(String),
}

/// Persistence for todo records.
///
/// Implementations assign ids on `create` and never reuse them. `list`
/// returns todos in creation order.
#[async_trait]
pub trait TodoRepository: Send + Sync {
    /// Every todo, oldest first
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::Database`] if the store cannot be read.
    async fn list(&self) -> Result<Vec<Todo>, RepositoryError>;

    /// Stores a new todo and returns it with its assigned id
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::Database`] if the insert fails.
    async fn create(&self, new_todo: NewTodo) -> Result<Todo, RepositoryError>;

    /// Applies `patch` and returns the updated todo
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::NotFound`] for an unknown id.
    async fn update(&self, id: &TodoId, patch: TodoPatch) -> Result<Todo, RepositoryError>;

    /// Removes a todo
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::NotFound`] for an unknown id.
    async fn delete(&self, id: &TodoId) -> Result<(), RepositoryError>;
}
