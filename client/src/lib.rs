//! Optimistic view model for the todo list.
//!
//! The view model is a [`Reducer`](todolist_core::reducer::Reducer) hosted
//! in a [`Store`]: presentation code sends intents, the reducer updates the
//! list right away, and API results flow back in as actions.
//!
//! # Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use todolist_client::{ClientConfig, HttpTodoApi, TodoListAction};
//! use todolist_model::{Priority, Status};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let api = HttpTodoApi::new(&ClientConfig::from_env())?;
//! let store = todolist_client::store(Arc::new(api));
//!
//! store.send(TodoListAction::Load).await?.wait().await;
//!
//! store
//!     .send(TodoListAction::Add {
//!         title: "Buy milk".to_string(),
//!         priority: Priority::Low,
//!         status: Status::Pending,
//!     })
//!     .await?
//!     .wait()
//!     .await;
//!
//! let count = store.state(|s| s.count()).await;
//! println!("Todos: {count}");
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod environment;
pub mod http;
pub mod reducer;
pub mod types;
pub mod view;

use std::sync::Arc;
use todolist_model::TodoApi;
use todolist_runtime::Store;

// Re-export commonly used types
pub use config::ClientConfig;
pub use environment::TodoListEnvironment;
pub use http::{HttpClientError, HttpTodoApi};
pub use reducer::TodoListReducer;
pub use types::{ErrorKind, RequestOrdinal, TodoListAction, TodoListState, ViewError};
pub use view::{rows, TodoRow};

/// A `Store` hosting the todo-list view model
pub type TodoListStore =
    Store<TodoListState, TodoListAction, TodoListEnvironment, TodoListReducer>;

/// Creates a store with an empty, not yet loaded list
#[must_use]
pub fn store(api: Arc<dyn TodoApi>) -> TodoListStore {
    Store::new(
        TodoListState::new(),
        TodoListReducer::new(),
        TodoListEnvironment::new(api),
    )
}
