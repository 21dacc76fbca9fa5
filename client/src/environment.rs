//! Dependencies injected into the view model reducer.

use std::sync::Arc;
use todolist_model::TodoApi;

/// Environment dependencies for the todo-list reducer
#[derive(Clone)]
pub struct TodoListEnvironment {
    /// REST API the view model mirrors
    pub api: Arc<dyn TodoApi>,
}

impl TodoListEnvironment {
    /// Creates a new `TodoListEnvironment`
    #[must_use]
    pub fn new(api: Arc<dyn TodoApi>) -> Self {
        Self { api }
    }
}

impl std::fmt::Debug for TodoListEnvironment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TodoListEnvironment").finish_non_exhaustive()
    }
}
