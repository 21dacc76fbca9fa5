//! # Todolist Testing
//!
//! Testing utilities shared by the todolist crates.
//!
//! This crate provides:
//! - [`ReducerTest`], a Given-When-Then harness for reducers
//! - [`MockTodoApi`], an in-memory `TodoApi` whose responses can be failed
//!   or held back to simulate slow and out-of-order replies
//! - proptest strategies for todo data
//!
//! ## Example
//!
//! ```
//! use todolist_model::{NewTodo, Priority, Status, TodoApi};
//! use todolist_testing::MockTodoApi;
//!
//! # tokio_test::block_on(async {
//! let api = MockTodoApi::new();
//! let todo = api
//!     .create(NewTodo::new("Buy milk", Priority::Low, Status::Pending))
//!     .await
//!     .unwrap();
//! assert_eq!(todo.id.as_str(), "1");
//! # });
//! ```

pub mod mocks;

/// Test helpers and utilities
pub mod helpers {
    use todolist_core::effect::Effect;

    /// Installs a `tracing` subscriber that writes through the test harness.
    ///
    /// Safe to call from every test; only the first call installs anything.
    /// Honors `RUST_LOG`.
    pub fn init_tracing() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    }

    /// Runs effects to completion, one after another, and returns the
    /// actions they produce.
    ///
    /// `Parallel` groups are flattened in order. Useful for driving a
    /// reducer by hand without a `Store`.
    pub async fn run_effects<A, I>(effects: I) -> Vec<A>
    where
        A: Send + 'static,
        I: IntoIterator<Item = Effect<A>>,
    {
        let mut pending: Vec<Effect<A>> = effects.into_iter().collect();
        pending.reverse();

        let mut actions = Vec::new();
        while let Some(effect) = pending.pop() {
            match effect {
                Effect::None => {},
                Effect::Parallel(group) => pending.extend(group.into_iter().rev()),
                Effect::Future(fut) => actions.extend(fut.await),
            }
        }
        actions
    }
}

/// Property-based testing utilities
pub mod properties {
    use proptest::prelude::*;
    use todolist_model::{NewTodo, Priority, Status};

    /// Any priority
    pub fn priority() -> impl Strategy<Value = Priority> {
        prop_oneof![
            Just(Priority::Low),
            Just(Priority::Medium),
            Just(Priority::High)
        ]
    }

    /// Any status
    pub fn status() -> impl Strategy<Value = Status> {
        prop_oneof![
            Just(Status::Pending),
            Just(Status::InProgress),
            Just(Status::Completed)
        ]
    }

    /// Titles with at least one visible character
    pub fn title() -> impl Strategy<Value = String> {
        "[A-Za-z0-9][A-Za-z0-9 ]{0,24}"
    }

    /// Titles made only of whitespace, including the empty string
    pub fn blank_title() -> impl Strategy<Value = String> {
        "[ \t\n]{0,6}"
    }

    /// A valid creation payload
    pub fn new_todo() -> impl Strategy<Value = NewTodo> {
        (title(), priority(), status())
            .prop_map(|(title, priority, status)| NewTodo::new(title, priority, status))
    }
}

// Re-export commonly used items
pub use mocks::{ApiCall, MockTodoApi, Operation};
pub use reducer_test::{assertions, ReducerTest};

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)] // Test code can use unwrap/expect
mod tests {
    use super::helpers::run_effects;
    use todolist_core::effect::Effect;

    #[tokio::test]
    async fn run_effects_flattens_in_order() {
        let effects = vec![
            Effect::run(async { 1 }),
            Effect::None,
            Effect::merge(vec![Effect::run(async { 2 }), Effect::run(async { 3 })]),
            Effect::Future(Box::pin(async { None })),
            Effect::run(async { 4 }),
        ];
        assert_eq!(run_effects(effects).await, vec![1, 2, 3, 4]);
    }
}
