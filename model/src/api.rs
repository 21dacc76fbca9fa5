//! Contract between the view model and the REST API.

use crate::todo::{NewTodo, Todo, TodoId, TodoPatch};
use async_trait::async_trait;
use thiserror::Error;

/// Why an API call failed.
///
/// The view model collapses every variant into one user-visible message per
/// action; the variant is kept for logs and tests.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// The request never produced a response (connection, DNS, timeout)
    #[error("network error: {0}")]
    Network(String),

    /// The server answered with a non-success status
    #[error("server returned {status}: {message}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Error message from the response body, if any
        message: String,
    },

    /// The response body could not be decoded
    #[error("invalid response body: {0}")]
    Decode(String),
}

/// Todo resource operations as seen by a client.
///
/// Implemented over HTTP by the client crate and by scripted mocks in tests.
#[async_trait]
pub trait TodoApi: Send + Sync {
    /// `GET /todos`: the full collection in store order
    async fn list(&self) -> Result<Vec<Todo>, ApiError>;

    /// `POST /todos`: returns the created record with its assigned id
    async fn create(&self, todo: NewTodo) -> Result<Todo, ApiError>;

    /// `PUT /todos/{id}`: the response body is not needed by callers
    async fn update(&self, id: &TodoId, patch: TodoPatch) -> Result<(), ApiError>;

    /// `DELETE /todos/{id}`
    async fn delete(&self, id: &TodoId) -> Result<(), ApiError>;
}
