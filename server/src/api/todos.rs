//! `/api/todos` handlers.
//!
//! Thin adapters: decode JSON, validate titles, call the repository, and map
//! [`RepositoryError`] onto [`AppError`].

use crate::repository::RepositoryError;
use crate::server::state::AppState;
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use todolist_model::{is_blank, NewTodo, Todo, TodoId, TodoPatch};
use todolist_web::AppError;

const TITLE_REQUIRED: &str = "Title is required";

impl From<RepositoryError> for AppError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound(id) => Self::not_found("Todo", id),
            other @ RepositoryError::Database(_) => {
                Self::internal("Failed to access todo storage").with_source(other.into())
            },
        }
    }
}

/// `GET /api/todos`
///
/// # Errors
///
/// 500 if storage fails.
pub async fn list_todos(State(state): State<AppState>) -> Result<Json<Vec<Todo>>, AppError> {
    let todos = state.repository.list().await?;
    tracing::debug!(count = todos.len(), "Listed todos");
    Ok(Json(todos))
}

/// `POST /api/todos`
///
/// Returns `201` with the stored todo, including its new id.
///
/// # Errors
///
/// 422 for a blank title, 400 for malformed JSON, 500 if storage fails.
pub async fn create_todo(
    State(state): State<AppState>,
    payload: Result<Json<NewTodo>, JsonRejection>,
) -> Result<(StatusCode, Json<Todo>), AppError> {
    let Json(new_todo) = payload?;
    if is_blank(&new_todo.title) {
        return Err(AppError::validation(TITLE_REQUIRED));
    }

    let todo = state.repository.create(new_todo).await?;
    tracing::info!(id = %todo.id, "Todo created");
    metrics::counter!("todos.created").increment(1);

    Ok((StatusCode::CREATED, Json(todo)))
}

/// `PUT /api/todos/:id`
///
/// Applies a partial update; absent fields keep their value.
///
/// # Errors
///
/// 404 for an unknown id, 422 for a blank title, 500 if storage fails.
pub async fn update_todo(
    State(state): State<AppState>,
    Path(id): Path<TodoId>,
    payload: Result<Json<TodoPatch>, JsonRejection>,
) -> Result<Json<Todo>, AppError> {
    let Json(patch) = payload?;
    if patch.title.as_deref().is_some_and(is_blank) {
        return Err(AppError::validation(TITLE_REQUIRED));
    }

    let todo = state.repository.update(&id, patch).await?;
    tracing::info!(%id, "Todo updated");
    metrics::counter!("todos.updated").increment(1);

    Ok(Json(todo))
}

/// `DELETE /api/todos/:id`
///
/// # Errors
///
/// 404 for an unknown id, 500 if storage fails.
pub async fn delete_todo(
    State(state): State<AppState>,
    Path(id): Path<TodoId>,
) -> Result<StatusCode, AppError> {
    state.repository.delete(&id).await?;
    tracing::info!(%id, "Todo deleted");
    metrics::counter!("todos.deleted").increment(1);

    Ok(StatusCode::NO_CONTENT)
}
