//! In-memory repository.

use super::{RepositoryError, TodoRepository};
use async_trait::async_trait;
use todolist_model::{NewTodo, Todo, TodoId, TodoPatch};
use tokio::sync::RwLock;

#[derive(Debug, Default)]
struct Inner {
    todos: Vec<Todo>,
    last_id: u64,
}

/// Keeps todos in a `Vec` behind a `tokio::sync::RwLock`.
///
/// Ids are decimal strings from a counter that only grows, so a deleted id
/// is never handed out again.
#[derive(Debug, Default)]
pub struct InMemoryTodoRepository {
    inner: RwLock<Inner>,
}

impl InMemoryTodoRepository {
    /// Creates an empty repository
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TodoRepository for InMemoryTodoRepository {
    async fn list(&self) -> Result<Vec<Todo>, RepositoryError> {
        Ok(self.inner.read().await.todos.clone())
    }

    async fn create(&self, new_todo: NewTodo) -> Result<Todo, RepositoryError> {
        let mut inner = self.inner.write().await;
        inner.last_id += 1;
        let todo = Todo::new(
            inner.last_id.to_string(),
            new_todo.title,
            new_todo.priority,
            new_todo.status,
        );
        inner.todos.push(todo.clone());
        Ok(todo)
    }

    async fn update(&self, id: &TodoId, patch: TodoPatch) -> Result<Todo, RepositoryError> {
        let mut inner = self.inner.write().await;
        let todo = inner
            .todos
            .iter_mut()
            .find(|t| &t.id == id)
            .ok_or_else(|| RepositoryError::NotFound(id.clone()))?;
        todo.apply(&patch);
        Ok(todo.clone())
    }

    async fn delete(&self, id: &TodoId) -> Result<(), RepositoryError> {
        let mut inner = self.inner.write().await;
        let index = inner
            .todos
            .iter()
            .position(|t| &t.id == id)
            .ok_or_else(|| RepositoryError::NotFound(id.clone()))?;
        inner.todos.remove(index);
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)] // Test code can use unwrap
mod tests {
    use super::*;
    use todolist_model::{Priority, Status};

    fn new_todo(title: &str) -> NewTodo {
        NewTodo::new(title, Priority::Medium, Status::Pending)
    }

    #[tokio::test]
    async fn lists_in_creation_order() {
        let repo = InMemoryTodoRepository::new();
        repo.create(new_todo("a")).await.unwrap();
        repo.create(new_todo("b")).await.unwrap();

        let titles: Vec<_> = repo.list().await.unwrap().into_iter().map(|t| t.title).collect();
        assert_eq!(titles, vec!["a", "b"]);
    }

    #[tokio::test]
    async fn deleted_ids_are_not_reused() {
        let repo = InMemoryTodoRepository::new();
        let first = repo.create(new_todo("a")).await.unwrap();
        repo.delete(&first.id).await.unwrap();

        let second = repo.create(new_todo("b")).await.unwrap();
        assert_ne!(first.id, second.id);
        assert_eq!(second.id.as_str(), "2");
    }

    #[tokio::test]
    async fn update_applies_only_present_fields() {
        let repo = InMemoryTodoRepository::new();
        let todo = repo
            .create(NewTodo::new("a", Priority::High, Status::Pending))
            .await
            .unwrap();

        let updated = repo
            .update(&todo.id, TodoPatch::status(Status::Completed))
            .await
            .unwrap();
        assert_eq!(updated.title, "a");
        assert_eq!(updated.priority, Priority::High);
        assert_eq!(updated.status, Status::Completed);
    }

    #[tokio::test]
    async fn unknown_ids_are_not_found() {
        let repo = InMemoryTodoRepository::new();
        let id = TodoId::new("nope");
        assert_eq!(
            repo.delete(&id).await,
            Err(RepositoryError::NotFound(id.clone()))
        );
        assert_eq!(
            repo.update(&id, TodoPatch::title("x")).await,
            Err(RepositoryError::NotFound(id))
        );
    }
}
