//! Presentation helpers.
//!
//! Rendering is left to the host UI; this module only projects state into
//! rows a list widget can draw directly.

use crate::types::TodoListState;
use todolist_model::{Priority, Status, TodoId};

/// One rendered line of the todo list
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TodoRow {
    /// Todo the row belongs to
    pub id: TodoId,
    /// Title, or the edit draft while the row is being edited
    pub title: String,
    /// Priority of the todo
    pub priority: Priority,
    /// Status of the todo
    pub status: Status,
    /// Whether the row shows an edit field
    pub editing: bool,
}

impl TodoRow {
    /// Secondary line, e.g. `low • pending`
    #[must_use]
    pub fn meta(&self) -> String {
        format!("{} • {}", self.priority, self.status)
    }

    /// Whether the title is drawn struck through
    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.status == Status::Completed
    }
}

/// Projects the list into rows, in display order
#[must_use]
pub fn rows(state: &TodoListState) -> Vec<TodoRow> {
    state
        .todos
        .iter()
        .map(|todo| {
            let editing = state.is_editing(&todo.id);
            TodoRow {
                id: todo.id.clone(),
                title: if editing {
                    state.editing_title.clone()
                } else {
                    todo.title.clone()
                },
                priority: todo.priority,
                status: todo.status,
                editing,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use todolist_model::Todo;

    #[test]
    fn rows_follow_list_order_and_edit_draft() {
        let mut state = TodoListState::with_todos(vec![
            Todo::new("1", "Buy milk", Priority::Low, Status::Pending),
            Todo::new("2", "Walk dog", Priority::High, Status::Completed),
        ]);
        state.editing_id = Some("2".into());
        state.editing_title = "Walk cat".into();

        let rows = rows(&state);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].meta(), "low • pending");
        assert!(!rows[0].editing);
        assert_eq!(rows[1].title, "Walk cat");
        assert!(rows[1].editing);
        assert!(rows[1].is_completed());
    }
}
