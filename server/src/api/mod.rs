//! REST handlers.

pub mod todos;
