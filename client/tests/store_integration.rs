//! Integration tests for the view model hosted in a `Store`
//!
//! API responses come from `MockTodoApi`; holding lets the tests observe
//! state before a response arrives and deliver responses out of order.

#![allow(clippy::unwrap_used, clippy::expect_used)] // Test code can use unwrap/expect

use proptest::prelude::*;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use todolist_client::{
    store, ErrorKind, TodoListAction, TodoListEnvironment, TodoListReducer, TodoListState,
    TodoListStore,
};
use todolist_model::{Priority, Status, Todo, TodoId, TodoPatch};
use todolist_runtime::Store;
use todolist_testing::{helpers, properties, ApiCall, MockTodoApi, Operation};

const WAIT: Duration = Duration::from_secs(5);

fn seeded(api: &MockTodoApi, todos: Vec<Todo>) -> TodoListStore {
    Store::new(
        TodoListState::with_todos(todos),
        TodoListReducer::new(),
        TodoListEnvironment::new(Arc::new(api.clone())),
    )
}

#[tokio::test]
async fn add_prepends_server_todo() {
    helpers::init_tracing();
    let api = MockTodoApi::new();
    let store = store(Arc::new(api.clone()));

    store
        .send(TodoListAction::Add {
            title: "Buy milk".into(),
            priority: Priority::Low,
            status: Status::Pending,
        })
        .await
        .unwrap()
        .wait_with_timeout(WAIT)
        .await
        .unwrap();

    let todos = store.state(|s| s.todos.clone()).await;
    assert_eq!(
        todos,
        vec![Todo::new("1", "Buy milk", Priority::Low, Status::Pending)]
    );
}

#[tokio::test]
async fn load_replaces_list_with_store_order() {
    let api = MockTodoApi::new();
    api.hold();
    let store = store(Arc::new(api.clone()));

    let pending = tokio::spawn({
        let store = store.clone();
        async move {
            store
                .send_and_wait_for(
                    TodoListAction::Load,
                    |a| matches!(a, TodoListAction::TodosLoaded { .. }),
                    WAIT,
                )
                .await
        }
    });

    assert!(api.wait_for_parked(1, WAIT).await);
    api.resume().await;

    let loaded = pending.await.unwrap().unwrap();
    assert_eq!(loaded, TodoListAction::TodosLoaded { todos: vec![] });
    assert!(store.state(|s| s.loaded).await);
}

#[tokio::test]
async fn toggle_completed_sends_pending() {
    let api = MockTodoApi::with_todos(vec![Todo::new(
        "1",
        "Buy milk",
        Priority::Low,
        Status::Completed,
    )]);
    let store = seeded(&api, api.todos().await);

    let mut handle = store
        .send(TodoListAction::ToggleStatus { id: "1".into() })
        .await
        .unwrap();
    assert_eq!(store.state(|s| s.todos[0].status).await, Status::Pending);
    handle.wait_with_timeout(WAIT).await.unwrap();

    assert_eq!(
        api.calls().await,
        vec![ApiCall::Update("1".into(), TodoPatch::status(Status::Pending))]
    );
    assert_eq!(store.state(|s| s.todos[0].status).await, Status::Pending);
    assert_eq!(store.state(|s| s.in_flight()).await, 0);
}

#[tokio::test]
async fn delete_is_visible_before_response() {
    let api = MockTodoApi::with_todos(vec![
        Todo::new("1", "Buy milk", Priority::Low, Status::Pending),
        Todo::new("2", "Walk dog", Priority::High, Status::Pending),
    ]);
    let store = seeded(&api, api.todos().await);
    api.hold();

    let mut handle = store
        .send(TodoListAction::Delete { id: "1".into() })
        .await
        .unwrap();
    let id = TodoId::new("1");
    assert!(!store.state(|s| s.contains(&id)).await);

    assert!(api.wait_for_parked(1, WAIT).await);
    assert!(!store.state(|s| s.contains(&id)).await);

    api.resume().await;
    handle.wait_with_timeout(WAIT).await.unwrap();
    assert_eq!(store.state(|s| s.count()).await, 1);
    assert_eq!(api.todos().await.len(), 1);
}

#[tokio::test]
async fn stale_toggle_failure_does_not_undo_newer_toggle() {
    let api = MockTodoApi::with_todos(vec![Todo::new(
        "1",
        "Buy milk",
        Priority::Low,
        Status::Pending,
    )]);
    let store = seeded(&api, api.todos().await);
    api.hold();
    api.fail_next(Operation::Update, 1).await;

    let mut first = store
        .send(TodoListAction::ToggleStatus { id: "1".into() })
        .await
        .unwrap();
    let mut second = store
        .send(TodoListAction::ToggleStatus { id: "1".into() })
        .await
        .unwrap();
    assert!(api.wait_for_parked(2, WAIT).await);

    api.release_newest().await;
    second.wait_with_timeout(WAIT).await.unwrap();
    api.release_oldest().await;
    first.wait_with_timeout(WAIT).await.unwrap();

    let state = store.state(Clone::clone).await;
    assert_eq!(state.todos[0].status, Status::Pending);
    assert_eq!(state.error.map(|e| e.kind), Some(ErrorKind::UpdateStatus));
}

#[tokio::test]
async fn stale_title_failure_keeps_newer_title() {
    let api = MockTodoApi::with_todos(vec![Todo::new(
        "1",
        "Walk dog",
        Priority::Medium,
        Status::Pending,
    )]);
    let store = seeded(&api, api.todos().await);
    api.hold();
    api.fail_next(Operation::Update, 1).await;

    let mut handles = Vec::new();
    for title in ["Walk cat", "Walk both"] {
        store.send(TodoListAction::StartEdit { id: "1".into() }).await.unwrap();
        store
            .send(TodoListAction::SetEditingTitle(title.into()))
            .await
            .unwrap();
        handles.push(
            store
                .send(TodoListAction::SaveEdit { id: "1".into() })
                .await
                .unwrap(),
        );
    }
    assert!(api.wait_for_parked(2, WAIT).await);

    // Second save succeeds first, then the first save's failure arrives
    api.release_newest().await;
    api.release_oldest().await;
    for handle in &mut handles {
        handle.wait_with_timeout(WAIT).await.unwrap();
    }

    let state = store.state(Clone::clone).await;
    assert_eq!(state.todos[0].title, "Walk both");
    assert_eq!(state.editing_id, None);
    assert_eq!(state.error.map(|e| e.kind), Some(ErrorKind::UpdateTitle));
    assert_eq!(api.todos().await[0].title, "Walk both");
}

#[tokio::test]
async fn failed_add_leaves_list_unchanged() {
    let api = MockTodoApi::new();
    api.fail_next(Operation::Create, 1).await;
    let store = store(Arc::new(api.clone()));

    store
        .send(TodoListAction::SetDraftTitle("Buy milk".into()))
        .await
        .unwrap();
    store
        .send(TodoListAction::SubmitDraft)
        .await
        .unwrap()
        .wait_with_timeout(WAIT)
        .await
        .unwrap();

    let state = store.state(Clone::clone).await;
    assert!(state.todos.is_empty());
    assert_eq!(state.draft_title, "Buy milk");
    assert_eq!(
        state.error.map(|e| e.message),
        Some("Failed to add todo".to_string())
    );
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn added_todos_have_unique_ids(
        adds in prop::collection::vec((properties::new_todo(), any::<bool>()), 0..12),
    ) {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        let (ids, expected) = runtime.block_on(async {
            let api = MockTodoApi::new();
            let store = store(Arc::new(api.clone()));
            let mut expected = 0;

            for (new_todo, fail) in adds {
                if fail {
                    api.fail_next(Operation::Create, 1).await;
                } else {
                    expected += 1;
                }
                store
                    .send(TodoListAction::Add {
                        title: new_todo.title,
                        priority: new_todo.priority,
                        status: new_todo.status,
                    })
                    .await
                    .unwrap()
                    .wait_with_timeout(WAIT)
                    .await
                    .unwrap();
            }

            let ids: Vec<TodoId> = store.state(|s| s.todos.iter().map(|t| t.id.clone()).collect()).await;
            (ids, expected)
        });

        let unique: HashSet<&TodoId> = ids.iter().collect();
        prop_assert_eq!(unique.len(), ids.len());
        prop_assert_eq!(ids.len(), expected);
    }

    #[test]
    fn blank_titles_never_reach_the_api(title in properties::blank_title()) {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        let calls = runtime.block_on(async {
            let api = MockTodoApi::new();
            let store = store(Arc::new(api.clone()));
            store
                .send(TodoListAction::Add {
                    title,
                    priority: Priority::Medium,
                    status: Status::Pending,
                })
                .await
                .unwrap()
                .wait_with_timeout(WAIT)
                .await
                .unwrap();
            api.calls().await
        });
        prop_assert!(calls.is_empty());
    }
}
