//! Reducer logic for the todo-list view model.
//!
//! Delete, toggle and title edits are applied locally as soon as the intent
//! arrives. When a request fails, its todo is rebuilt from the record before
//! its first outstanding change plus every change that has not failed, so a
//! failure on one field never disturbs a newer change to another. Add is the
//! exception: a todo only appears once the server has assigned its id.

use crate::environment::TodoListEnvironment;
use crate::types::{Change, ErrorKind, Rollback, TodoListAction, TodoListState};
use std::collections::HashSet;
use todolist_core::{effect::Effect, reducer::Reducer, smallvec, SmallVec};
use todolist_model::{is_blank, NewTodo, Todo, TodoId, TodoPatch};

type Effects = SmallVec<[Effect<TodoListAction>; 4]>;

/// Reducer for the todo-list screen
#[derive(Clone, Debug, Default)]
pub struct TodoListReducer;

impl TodoListReducer {
    /// Creates a new `TodoListReducer`
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    fn load(state: &mut TodoListState, env: &TodoListEnvironment) -> Effects {
        if state.loaded {
            tracing::debug!("Ignoring repeated load");
            return SmallVec::new();
        }
        state.loaded = true;

        let api = env.api.clone();
        smallvec![Effect::run(async move {
            match api.list().await {
                Ok(todos) => TodoListAction::TodosLoaded { todos },
                Err(error) => TodoListAction::LoadFailed { error },
            }
        })]
    }

    fn add(env: &TodoListEnvironment, new_todo: NewTodo) -> Effects {
        if is_blank(&new_todo.title) {
            return SmallVec::new();
        }

        let api = env.api.clone();
        smallvec![Effect::run(async move {
            match api.create(new_todo).await {
                Ok(todo) => TodoListAction::TodoAdded { todo },
                Err(error) => TodoListAction::AddFailed { error },
            }
        })]
    }

    fn delete(state: &mut TodoListState, env: &TodoListEnvironment, id: TodoId) -> Effects {
        let Some(index) = state.position(&id) else {
            tracing::debug!(%id, "Delete for unknown todo ignored");
            return SmallVec::new();
        };

        let removed = state.todos.remove(index);
        if state.is_editing(&id) {
            state.clear_edit();
        }
        let request = state.begin_request(&removed, Change::Remove);

        let api = env.api.clone();
        smallvec![Effect::run(async move {
            match api.delete(&id).await {
                Ok(()) => TodoListAction::TodoDeleted { id, request },
                Err(error) => TodoListAction::DeleteFailed {
                    id,
                    index,
                    request,
                    error,
                },
            }
        })]
    }

    fn toggle_status(state: &mut TodoListState, env: &TodoListEnvironment, id: TodoId) -> Effects {
        let Some(todo) = state.get_mut(&id) else {
            tracing::debug!(%id, "Toggle for unknown todo ignored");
            return SmallVec::new();
        };

        let before = todo.clone();
        let status = before.status.toggled();
        todo.status = status;
        let request = state.begin_request(&before, Change::Update(TodoPatch::status(status)));

        let api = env.api.clone();
        smallvec![Effect::run(async move {
            match api.update(&id, TodoPatch::status(status)).await {
                Ok(()) => TodoListAction::StatusUpdated {
                    id,
                    status,
                    request,
                },
                Err(error) => TodoListAction::StatusUpdateFailed { id, request, error },
            }
        })]
    }

    fn start_edit(state: &mut TodoListState, id: TodoId) {
        if let Some(title) = state.get(&id).map(|t| t.title.clone()) {
            state.editing_id = Some(id);
            state.editing_title = title;
        }
    }

    fn save_edit(state: &mut TodoListState, env: &TodoListEnvironment, id: TodoId) -> Effects {
        if is_blank(&state.editing_title) {
            return SmallVec::new();
        }

        let title = state.editing_title.clone();
        let Some(todo) = state.get_mut(&id) else {
            tracing::debug!(%id, "Save for unknown todo ignored");
            return SmallVec::new();
        };

        let before = todo.clone();
        todo.title.clone_from(&title);
        state.clear_edit();
        let request = state.begin_request(&before, Change::Update(TodoPatch::title(title.clone())));

        let api = env.api.clone();
        smallvec![Effect::run(async move {
            match api.update(&id, TodoPatch::title(title.clone())).await {
                Ok(()) => TodoListAction::TitleUpdated { id, title, request },
                Err(error) => TodoListAction::TitleUpdateFailed {
                    id,
                    attempted: title,
                    request,
                    error,
                },
            }
        })]
    }

    /// Shows the todo as its surviving requests leave it.
    ///
    /// A record that was removed locally goes back at `index`.
    fn roll_back(state: &mut TodoListState, id: &TodoId, rollback: Rollback, index: Option<usize>) {
        match rollback {
            Rollback::Show(todo) => {
                if let Some(current) = state.get_mut(id) {
                    *current = todo;
                } else if let Some(index) = index {
                    let index = index.min(state.todos.len());
                    state.todos.insert(index, todo);
                }
            },
            Rollback::Hide => state.todos.retain(|t| &t.id != id),
        }
    }

    fn set_error(state: &mut TodoListState, kind: ErrorKind) {
        state.error = Some(kind.into());
    }
}

/// Keeps the first occurrence of every id.
fn dedupe(todos: Vec<Todo>) -> Vec<Todo> {
    let mut seen = HashSet::new();
    todos
        .into_iter()
        .filter(|t| seen.insert(t.id.clone()))
        .collect()
}

impl Reducer for TodoListReducer {
    type State = TodoListState;
    type Action = TodoListAction;
    type Environment = TodoListEnvironment;

    #[allow(clippy::too_many_lines)] // One arm per action
    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> Effects {
        match action {
            // ========== Intents ==========
            TodoListAction::Load => Self::load(state, env),

            TodoListAction::SetDraftTitle(title) => {
                state.draft_title = title;
                SmallVec::new()
            },

            TodoListAction::SetDraftPriority(priority) => {
                state.draft_priority = priority;
                SmallVec::new()
            },

            TodoListAction::SetDraftStatus(status) => {
                state.draft_status = status;
                SmallVec::new()
            },

            TodoListAction::Add {
                title,
                priority,
                status,
            } => Self::add(env, NewTodo::new(title, priority, status)),

            TodoListAction::SubmitDraft => {
                let new_todo = NewTodo::new(
                    state.draft_title.clone(),
                    state.draft_priority,
                    state.draft_status,
                );
                Self::add(env, new_todo)
            },

            TodoListAction::Delete { id } => Self::delete(state, env, id),

            TodoListAction::ToggleStatus { id } => Self::toggle_status(state, env, id),

            TodoListAction::StartEdit { id } => {
                Self::start_edit(state, id);
                SmallVec::new()
            },

            TodoListAction::SetEditingTitle(title) => {
                state.editing_title = title;
                SmallVec::new()
            },

            TodoListAction::CancelEdit => {
                state.clear_edit();
                SmallVec::new()
            },

            TodoListAction::SaveEdit { id } => Self::save_edit(state, env, id),

            TodoListAction::DismissError => {
                state.error = None;
                SmallVec::new()
            },

            // ========== Results ==========
            TodoListAction::TodosLoaded { todos } => {
                tracing::debug!(count = todos.len(), "Todos loaded");
                state.todos = dedupe(todos);
                SmallVec::new()
            },

            TodoListAction::LoadFailed { error } => {
                tracing::warn!(%error, "Loading todos failed");
                Self::set_error(state, ErrorKind::Load);
                SmallVec::new()
            },

            TodoListAction::TodoAdded { todo } => {
                tracing::debug!(id = %todo.id, "Todo added");
                state.todos.retain(|t| t.id != todo.id);
                state.todos.insert(0, todo);
                state.reset_drafts();
                state.error = None;
                SmallVec::new()
            },

            TodoListAction::AddFailed { error } => {
                tracing::warn!(%error, "Adding todo failed");
                Self::set_error(state, ErrorKind::Add);
                SmallVec::new()
            },

            TodoListAction::TodoDeleted { id, request } => {
                tracing::debug!(%id, "Todo deleted");
                state.confirm(&id, request);
                SmallVec::new()
            },

            TodoListAction::DeleteFailed {
                id,
                index,
                request,
                error,
            } => {
                tracing::warn!(%id, %error, "Deleting todo failed");
                if let Some(rollback) = state.fail(&id, request) {
                    Self::roll_back(state, &id, rollback, Some(index));
                }
                Self::set_error(state, ErrorKind::Delete);
                SmallVec::new()
            },

            TodoListAction::StatusUpdated {
                id,
                status,
                request,
            } => {
                tracing::debug!(%id, %status, "Status confirmed");
                state.confirm(&id, request);
                SmallVec::new()
            },

            TodoListAction::StatusUpdateFailed { id, request, error } => {
                tracing::warn!(%id, %error, "Updating status failed");
                if let Some(rollback) = state.fail(&id, request) {
                    Self::roll_back(state, &id, rollback, None);
                }
                Self::set_error(state, ErrorKind::UpdateStatus);
                SmallVec::new()
            },

            TodoListAction::TitleUpdated { id, request, .. } => {
                tracing::debug!(%id, "Title confirmed");
                state.confirm(&id, request);
                SmallVec::new()
            },

            TodoListAction::TitleUpdateFailed {
                id,
                attempted,
                request,
                error,
            } => {
                tracing::warn!(%id, %error, "Updating title failed");
                let was_shown = state.get(&id).is_some_and(|t| t.title == attempted);
                if let Some(rollback) = state.fail(&id, request) {
                    Self::roll_back(state, &id, rollback, None);
                    // Reopen the editor with what the user typed if the
                    // rollback replaced it and no other edit is open
                    let reverted = state.get(&id).is_some_and(|t| t.title != attempted);
                    if was_shown && reverted && state.editing_id.is_none() {
                        state.editing_id = Some(id);
                        state.editing_title = attempted;
                    }
                }
                Self::set_error(state, ErrorKind::UpdateTitle);
                SmallVec::new()
            },
        }
    }
}
