//! Mock implementations of environment dependencies.
//!
//! [`MockTodoApi`] keeps its todos in memory and assigns ids `"1"`, `"2"`,
//! ... the way a fresh server would. Two knobs make it useful for
//! view-model tests:
//!
//! - **Failure injection**: [`MockTodoApi::fail_next`] makes upcoming calls
//!   of one operation fail with a 500.
//! - **Holding**: after [`MockTodoApi::hold`], every call parks until the
//!   test releases it, so responses can be delivered late or out of order.
//!
//! Whether a call fails is decided when it is issued; its effect on the
//! stored todos is applied when it is released.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use todolist_model::{ApiError, NewTodo, Todo, TodoApi, TodoId, TodoPatch};
use tokio::sync::{oneshot, Mutex};

/// The four API operations, used to target failure injection
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Operation {
    /// `list`
    List,
    /// `create`
    Create,
    /// `update`
    Update,
    /// `delete`
    Delete,
}

/// A recorded call with its arguments
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ApiCall {
    /// `list()`
    List,
    /// `create(new_todo)`
    Create(NewTodo),
    /// `update(id, patch)`
    Update(TodoId, TodoPatch),
    /// `delete(id)`
    Delete(TodoId),
}

impl ApiCall {
    /// Operation this call belongs to
    #[must_use]
    pub const fn operation(&self) -> Operation {
        match self {
            Self::List => Operation::List,
            Self::Create(_) => Operation::Create,
            Self::Update(..) => Operation::Update,
            Self::Delete(_) => Operation::Delete,
        }
    }
}

#[derive(Debug, Default)]
struct Inner {
    todos: Vec<Todo>,
    next_id: u64,
    calls: Vec<ApiCall>,
    failures: HashMap<Operation, usize>,
    parked: Vec<(ApiCall, oneshot::Sender<()>)>,
}

impl Inner {
    fn take_failure(&mut self, operation: Operation) -> bool {
        match self.failures.get_mut(&operation) {
            Some(remaining) if *remaining > 0 => {
                *remaining -= 1;
                true
            },
            _ => false,
        }
    }
}

/// In-memory [`TodoApi`] for tests
#[derive(Clone, Debug, Default)]
pub struct MockTodoApi {
    inner: Arc<Mutex<Inner>>,
    holding: Arc<AtomicBool>,
}

impl MockTodoApi {
    /// Creates an empty mock
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a mock already holding `todos`.
    ///
    /// Newly created todos get ids after the highest numeric id present.
    #[must_use]
    pub fn with_todos(todos: Vec<Todo>) -> Self {
        let next_id = todos
            .iter()
            .filter_map(|t| t.id.as_str().parse::<u64>().ok())
            .max()
            .unwrap_or(0);
        Self {
            inner: Arc::new(Mutex::new(Inner {
                todos,
                next_id,
                ..Inner::default()
            })),
            holding: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Makes the next `count` calls of `operation` fail
    pub async fn fail_next(&self, operation: Operation, count: usize) {
        *self.inner.lock().await.failures.entry(operation).or_default() += count;
    }

    /// Parks every subsequent call until it is released
    pub fn hold(&self) {
        self.holding.store(true, Ordering::SeqCst);
    }

    /// Stops parking new calls and releases every parked one
    pub async fn resume(&self) {
        self.holding.store(false, Ordering::SeqCst);
        let parked = std::mem::take(&mut self.inner.lock().await.parked);
        for (_, release) in parked {
            let _ = release.send(());
        }
    }

    /// Number of calls currently parked
    pub async fn parked(&self) -> usize {
        self.inner.lock().await.parked.len()
    }

    /// Waits until at least `count` calls are parked.
    ///
    /// Returns `false` if that does not happen within `timeout`.
    pub async fn wait_for_parked(&self, count: usize, timeout: Duration) -> bool {
        let deadline = tokio::time::Instant::now() + timeout;
        loop {
            if self.parked().await >= count {
                return true;
            }
            if tokio::time::Instant::now() >= deadline {
                return false;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    }

    /// Releases the oldest parked call and returns it
    pub async fn release_oldest(&self) -> Option<ApiCall> {
        let mut inner = self.inner.lock().await;
        if inner.parked.is_empty() {
            return None;
        }
        let (call, release) = inner.parked.remove(0);
        drop(inner);
        let _ = release.send(());
        Some(call)
    }

    /// Releases the most recently parked call and returns it
    pub async fn release_newest(&self) -> Option<ApiCall> {
        let (call, release) = self.inner.lock().await.parked.pop()?;
        let _ = release.send(());
        Some(call)
    }

    /// Every call received so far, in order
    pub async fn calls(&self) -> Vec<ApiCall> {
        self.inner.lock().await.calls.clone()
    }

    /// Calls received for one operation, in order
    pub async fn calls_to(&self, operation: Operation) -> Vec<ApiCall> {
        self.inner
            .lock()
            .await
            .calls
            .iter()
            .filter(|c| c.operation() == operation)
            .cloned()
            .collect()
    }

    /// Todos as the mock server currently holds them
    pub async fn todos(&self) -> Vec<Todo> {
        self.inner.lock().await.todos.clone()
    }

    /// Records `call`, parks it if holding, and reports whether it should fail
    async fn begin(&self, call: ApiCall) -> bool {
        let operation = call.operation();
        let (failing, parked) = {
            let mut inner = self.inner.lock().await;
            inner.calls.push(call.clone());
            let failing = inner.take_failure(operation);
            if self.holding.load(Ordering::SeqCst) {
                let (tx, rx) = oneshot::channel();
                inner.parked.push((call, tx));
                (failing, Some(rx))
            } else {
                (failing, None)
            }
        };

        if let Some(rx) = parked {
            // A dropped sender means the mock itself went away
            let _ = rx.await;
        }
        failing
    }

    fn injected() -> ApiError {
        ApiError::Status {
            status: 500,
            message: "injected failure".to_string(),
        }
    }

    fn not_found() -> ApiError {
        ApiError::Status {
            status: 404,
            message: "Todo not found".to_string(),
        }
    }
}

#[async_trait]
impl TodoApi for MockTodoApi {
    async fn list(&self) -> Result<Vec<Todo>, ApiError> {
        if self.begin(ApiCall::List).await {
            return Err(Self::injected());
        }
        Ok(self.todos().await)
    }

    async fn create(&self, new_todo: NewTodo) -> Result<Todo, ApiError> {
        if self.begin(ApiCall::Create(new_todo.clone())).await {
            return Err(Self::injected());
        }
        let mut inner = self.inner.lock().await;
        inner.next_id += 1;
        let todo = Todo::new(
            inner.next_id.to_string(),
            new_todo.title,
            new_todo.priority,
            new_todo.status,
        );
        inner.todos.push(todo.clone());
        Ok(todo)
    }

    async fn update(&self, id: &TodoId, patch: TodoPatch) -> Result<(), ApiError> {
        if self.begin(ApiCall::Update(id.clone(), patch.clone())).await {
            return Err(Self::injected());
        }
        let mut inner = self.inner.lock().await;
        let todo = inner
            .todos
            .iter_mut()
            .find(|t| &t.id == id)
            .ok_or_else(Self::not_found)?;
        todo.apply(&patch);
        Ok(())
    }

    async fn delete(&self, id: &TodoId) -> Result<(), ApiError> {
        if self.begin(ApiCall::Delete(id.clone())).await {
            return Err(Self::injected());
        }
        let mut inner = self.inner.lock().await;
        let before = inner.todos.len();
        inner.todos.retain(|t| &t.id != id);
        if inner.todos.len() == before {
            return Err(Self::not_found());
        }
        Ok(())
    }
}
