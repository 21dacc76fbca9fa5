//! `PostgreSQL` repository.

use super::{RepositoryError, TodoRepository};
use async_trait::async_trait;
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::{PgPool, Row};
use std::time::Duration;
use todolist_model::{NewTodo, Priority, Status, Todo, TodoId, TodoPatch};

/// Stores todos in a `todos` table.
///
/// Ids come from a `BIGSERIAL` column and are exposed as their decimal
/// string form.
#[derive(Debug, Clone)]
pub struct PostgresTodoRepository {
    pool: PgPool,
}

impl PostgresTodoRepository {
    /// Wraps an existing pool
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connects a pool to `url`
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::Database`] if no connection can be made.
    pub async fn connect(url: &str, max_connections: u32) -> Result<Self, RepositoryError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(Duration::from_secs(30))
            .connect(url)
            .await
            .map_err(database)?;
        Ok(Self::new(pool))
    }

    /// Creates the `todos` table if it does not exist yet
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::Database`] if the DDL fails.
    pub async fn migrate(&self) -> Result<(), RepositoryError> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS todos (
                id BIGSERIAL PRIMARY KEY,
                title TEXT NOT NULL,
                priority TEXT NOT NULL DEFAULT 'medium',
                status TEXT NOT NULL DEFAULT 'pending',
                created_at TIMESTAMPTZ NOT NULL DEFAULT now()
            )
            ",
        )
        .execute(&self.pool)
        .await
        .map_err(database)?;

        tracing::debug!("todos table ready");
        Ok(())
    }

    /// Ids that are not integers cannot exist in the table
    fn parse_id(id: &TodoId) -> Result<i64, RepositoryError> {
        id.as_str()
            .parse()
            .map_err(|_| RepositoryError::NotFound(id.clone()))
    }

    fn row_to_todo(row: &PgRow) -> Result<Todo, RepositoryError> {
        let id: i64 = row.try_get("id").map_err(database)?;
        let title: String = row.try_get("title").map_err(database)?;
        let priority: String = row.try_get("priority").map_err(database)?;
        let status: String = row.try_get("status").map_err(database)?;

        Ok(Todo::new(
            id.to_string(),
            title,
            priority
                .parse::<Priority>()
                .map_err(|e| RepositoryError::Database(e.to_string()))?,
            status
                .parse::<Status>()
                .map_err(|e| RepositoryError::Database(e.to_string()))?,
        ))
    }
}

#[allow(clippy::needless_pass_by_value)] // Used as a `map_err` adapter
fn database(e: sqlx::Error) -> RepositoryError {
    RepositoryError::Database(e.to_string())
}

#[async_trait]
impl TodoRepository for PostgresTodoRepository {
    async fn list(&self) -> Result<Vec<Todo>, RepositoryError> {
        let rows = sqlx::query("SELECT id, title, priority, status FROM todos ORDER BY id ASC")
            .fetch_all(&self.pool)
            .await
            .map_err(database)?;

        rows.iter().map(Self::row_to_todo).collect()
    }

    async fn create(&self, new_todo: NewTodo) -> Result<Todo, RepositoryError> {
        let row = sqlx::query(
            r"
            INSERT INTO todos (title, priority, status)
            VALUES ($1, $2, $3)
            RETURNING id, title, priority, status
            ",
        )
        .bind(&new_todo.title)
        .bind(new_todo.priority.as_str())
        .bind(new_todo.status.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(database)?;

        Self::row_to_todo(&row)
    }

    async fn update(&self, id: &TodoId, patch: TodoPatch) -> Result<Todo, RepositoryError> {
        let key = Self::parse_id(id)?;
        let row = sqlx::query(
            r"
            UPDATE todos
            SET title = COALESCE($2, title),
                priority = COALESCE($3, priority),
                status = COALESCE($4, status)
            WHERE id = $1
            RETURNING id, title, priority, status
            ",
        )
        .bind(key)
        .bind(patch.title.as_deref())
        .bind(patch.priority.map(Priority::as_str))
        .bind(patch.status.map(Status::as_str))
        .fetch_optional(&self.pool)
        .await
        .map_err(database)?
        .ok_or_else(|| RepositoryError::NotFound(id.clone()))?;

        Self::row_to_todo(&row)
    }

    async fn delete(&self, id: &TodoId) -> Result<(), RepositoryError> {
        let key = Self::parse_id(id)?;
        let result = sqlx::query("DELETE FROM todos WHERE id = $1")
            .bind(key)
            .execute(&self.pool)
            .await
            .map_err(database)?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound(id.clone()));
        }
        Ok(())
    }
}
