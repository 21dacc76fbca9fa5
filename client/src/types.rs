//! View model state and actions.
//!
//! The state mirrors the server-side collection plus the UI-only fields a
//! todo screen needs: creation drafts, the current edit, and the last error.

use std::collections::HashMap;
use std::fmt;
use todolist_model::{ApiError, Priority, Status, Todo, TodoId, TodoPatch};

/// Which user action a failure belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Initial list fetch
    Load,
    /// Creating a todo
    Add,
    /// Deleting a todo
    Delete,
    /// Toggling a todo's status
    UpdateStatus,
    /// Saving an edited title
    UpdateTitle,
}

impl ErrorKind {
    /// Fixed user-facing message for this kind of failure
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::Load => "Failed to load todos",
            Self::Add => "Failed to add todo",
            Self::Delete => "Failed to delete todo",
            Self::UpdateStatus => "Failed to update status",
            Self::UpdateTitle => "Failed to update title",
        }
    }
}

/// The error surfaced to the user after a failed API call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ViewError {
    /// Which action failed
    pub kind: ErrorKind,
    /// Human-readable message
    pub message: String,
}

impl From<ErrorKind> for ViewError {
    fn from(kind: ErrorKind) -> Self {
        Self {
            kind,
            message: kind.message().to_string(),
        }
    }
}

impl fmt::Display for ViewError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Monotonic number identifying one mutation request.
pub type RequestOrdinal = u64;

/// An optimistic change to one todo.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum Change {
    /// Partial update of its fields
    Update(TodoPatch),
    /// Removal from the list
    Remove,
}

/// What the list should show for a todo after a failed request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum Rollback {
    /// Show this record, reinserting it if it was removed
    Show(Todo),
    /// A removal is still outstanding, keep the todo hidden
    Hide,
}

#[derive(Clone, Debug, PartialEq, Eq)]
struct Request {
    ordinal: RequestOrdinal,
    change: Change,
    acknowledged: bool,
}

/// Bookkeeping for a todo with at least one mutation awaiting a response.
///
/// Requests that failed are dropped; the rest stay in issue order until
/// every one of them has been acknowledged.
#[derive(Clone, Debug, PartialEq, Eq)]
struct InFlight {
    /// The todo before the first outstanding change
    base: Todo,
    requests: Vec<Request>,
}

impl InFlight {
    /// `base` with every surviving change applied in issue order
    fn rebuild(&self) -> Rollback {
        let mut todo = self.base.clone();
        for request in &self.requests {
            match &request.change {
                Change::Update(patch) => todo.apply(patch),
                Change::Remove => return Rollback::Hide,
            }
        }
        Rollback::Show(todo)
    }

    fn settled(&self) -> bool {
        self.requests.iter().all(|r| r.acknowledged)
    }
}

/// State of the todo-list screen
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TodoListState {
    /// Todos in display order, unique by id
    pub todos: Vec<Todo>,
    /// Title typed into the creation form
    pub draft_title: String,
    /// Priority selected in the creation form
    pub draft_priority: Priority,
    /// Status selected in the creation form
    pub draft_status: Status,
    /// Todo currently being edited
    pub editing_id: Option<TodoId>,
    /// Replacement title for the todo being edited
    pub editing_title: String,
    /// Last failure
    pub error: Option<ViewError>,
    /// Whether the initial load has been requested
    pub loaded: bool,
    next_request: RequestOrdinal,
    in_flight: HashMap<TodoId, InFlight>,
}

impl TodoListState {
    /// Creates an empty state with default drafts
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a state already holding `todos`, as if loaded
    #[must_use]
    pub fn with_todos(todos: Vec<Todo>) -> Self {
        Self {
            todos,
            loaded: true,
            ..Self::default()
        }
    }

    /// Returns a todo by ID
    #[must_use]
    pub fn get(&self, id: &TodoId) -> Option<&Todo> {
        self.todos.iter().find(|t| &t.id == id)
    }

    /// Checks if a todo is in the list
    #[must_use]
    pub fn contains(&self, id: &TodoId) -> bool {
        self.position(id).is_some()
    }

    /// Number of todos in the list
    #[must_use]
    pub fn count(&self) -> usize {
        self.todos.len()
    }

    /// Whether `id` is the todo being edited
    #[must_use]
    pub fn is_editing(&self, id: &TodoId) -> bool {
        self.editing_id.as_ref() == Some(id)
    }

    /// Number of todos with a mutation awaiting its response
    #[must_use]
    pub fn in_flight(&self) -> usize {
        self.in_flight.len()
    }

    pub(crate) fn position(&self, id: &TodoId) -> Option<usize> {
        self.todos.iter().position(|t| &t.id == id)
    }

    pub(crate) fn get_mut(&mut self, id: &TodoId) -> Option<&mut Todo> {
        self.todos.iter_mut().find(|t| &t.id == id)
    }

    /// Allocates the next ordinal for `change` to the todo `before`.
    ///
    /// `before` is the todo prior to the optimistic change. It becomes the
    /// rebuild base only if nothing else is outstanding for that todo.
    pub(crate) fn begin_request(&mut self, before: &Todo, change: Change) -> RequestOrdinal {
        self.next_request += 1;
        let ordinal = self.next_request;
        self.in_flight
            .entry(before.id.clone())
            .or_insert_with(|| InFlight {
                base: before.clone(),
                requests: Vec::new(),
            })
            .requests
            .push(Request {
                ordinal,
                change,
                acknowledged: false,
            });
        ordinal
    }

    /// Records that the server accepted `request`.
    ///
    /// Bookkeeping ends once every surviving request is acknowledged, or as
    /// soon as a removal is.
    pub(crate) fn confirm(&mut self, id: &TodoId, request: RequestOrdinal) {
        let Some(pending) = self.in_flight.get_mut(id) else {
            return;
        };
        let Some(entry) = pending.requests.iter_mut().find(|r| r.ordinal == request) else {
            return;
        };
        entry.acknowledged = true;
        let finished = entry.change == Change::Remove || pending.settled();
        if finished {
            self.in_flight.remove(id);
        }
    }

    /// Records a failed request and returns what the todo should look like
    /// without it.
    ///
    /// Returns `None` for requests that are no longer tracked.
    pub(crate) fn fail(&mut self, id: &TodoId, request: RequestOrdinal) -> Option<Rollback> {
        let pending = self.in_flight.get_mut(id)?;
        let index = pending.requests.iter().position(|r| r.ordinal == request)?;
        pending.requests.remove(index);

        let rollback = pending.rebuild();
        if pending.settled() {
            self.in_flight.remove(id);
        }
        Some(rollback)
    }

    pub(crate) fn reset_drafts(&mut self) {
        self.draft_title.clear();
        self.draft_priority = Priority::default();
        self.draft_status = Status::default();
    }

    pub(crate) fn clear_edit(&mut self) {
        self.editing_id = None;
        self.editing_title.clear();
    }
}

/// Actions for the todo-list view model
///
/// Intents come from the presentation layer. Results are produced by effects
/// once the API answers and are fed back through the reducer.
#[derive(Clone, Debug, PartialEq)]
pub enum TodoListAction {
    // ========== Intents ==========
    /// Fetch the list; only the first request per session does anything
    Load,

    /// Update the creation form title
    SetDraftTitle(String),

    /// Update the creation form priority
    SetDraftPriority(Priority),

    /// Update the creation form status
    SetDraftStatus(Status),

    /// Create a todo
    Add {
        /// Title of the new todo
        title: String,
        /// Priority of the new todo
        priority: Priority,
        /// Status of the new todo
        status: Status,
    },

    /// Create a todo from the current creation form
    SubmitDraft,

    /// Remove a todo
    Delete {
        /// Todo to delete
        id: TodoId,
    },

    /// Flip a todo between completed and pending
    ToggleStatus {
        /// Todo to toggle
        id: TodoId,
    },

    /// Enter edit mode for a todo
    StartEdit {
        /// Todo to edit
        id: TodoId,
    },

    /// Update the edit draft
    SetEditingTitle(String),

    /// Leave edit mode without saving
    CancelEdit,

    /// Persist the edit draft as the todo's title
    SaveEdit {
        /// Todo being saved
        id: TodoId,
    },

    /// Clear the error message
    DismissError,

    // ========== Results ==========
    /// The list was fetched
    TodosLoaded {
        /// Todos in store order
        todos: Vec<Todo>,
    },

    /// The list fetch failed
    LoadFailed {
        /// Cause
        error: ApiError,
    },

    /// The store created a todo
    TodoAdded {
        /// Created todo including its assigned id
        todo: Todo,
    },

    /// Creating a todo failed
    AddFailed {
        /// Cause
        error: ApiError,
    },

    /// The store deleted a todo
    TodoDeleted {
        /// Deleted todo
        id: TodoId,
        /// Request that produced this result
        request: RequestOrdinal,
    },

    /// Deleting a todo failed
    DeleteFailed {
        /// Todo that was removed locally
        id: TodoId,
        /// Its position before removal
        index: usize,
        /// Request that produced this result
        request: RequestOrdinal,
        /// Cause
        error: ApiError,
    },

    /// The store accepted a status change
    StatusUpdated {
        /// Updated todo
        id: TodoId,
        /// Status the store now holds
        status: Status,
        /// Request that produced this result
        request: RequestOrdinal,
    },

    /// A status change failed
    StatusUpdateFailed {
        /// Todo whose update failed
        id: TodoId,
        /// Request that produced this result
        request: RequestOrdinal,
        /// Cause
        error: ApiError,
    },

    /// The store accepted a title change
    TitleUpdated {
        /// Updated todo
        id: TodoId,
        /// Title the store now holds
        title: String,
        /// Request that produced this result
        request: RequestOrdinal,
    },

    /// A title change failed
    TitleUpdateFailed {
        /// Todo whose update failed
        id: TodoId,
        /// Title the user tried to save
        attempted: String,
        /// Request that produced this result
        request: RequestOrdinal,
        /// Cause
        error: ApiError,
    },
}

impl TodoListAction {
    /// Whether this action is an API result rather than a user intent
    #[must_use]
    pub const fn is_result(&self) -> bool {
        matches!(
            self,
            Self::TodosLoaded { .. }
                | Self::LoadFailed { .. }
                | Self::TodoAdded { .. }
                | Self::AddFailed { .. }
                | Self::TodoDeleted { .. }
                | Self::DeleteFailed { .. }
                | Self::StatusUpdated { .. }
                | Self::StatusUpdateFailed { .. }
                | Self::TitleUpdated { .. }
                | Self::TitleUpdateFailed { .. }
        )
    }
}
