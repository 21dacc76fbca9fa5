//! Shared domain types for the todolist server and client.
//!
//! - [`todo`]: the `Todo` entity, its enums, and request payloads
//! - [`api`]: the [`TodoApi`] contract the view model talks to

pub mod api;
pub mod todo;

pub use api::{ApiError, TodoApi};
pub use todo::{is_blank, NewTodo, ParseEnumError, Priority, Status, Todo, TodoId, TodoPatch};
