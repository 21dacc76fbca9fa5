//! End-to-end: the view model talks to a live server over HTTP.

#![allow(clippy::unwrap_used, clippy::expect_used)] // Test code can use unwrap/expect

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use todolist_client::{store, ClientConfig, HttpTodoApi, TodoListAction, TodoListStore};
use todolist_model::{ApiError, Priority, Status, TodoApi, TodoId, TodoPatch};
use todolist_server::{Config, InMemoryTodoRepository, TodoServer};
use todolist_testing::helpers;
use tokio::sync::oneshot;

const WAIT: Duration = Duration::from_secs(10);

async fn spawn_server() -> (SocketAddr, oneshot::Sender<()>) {
    let server =
        TodoServer::with_repository(Config::ephemeral(), Arc::new(InMemoryTodoRepository::new()));
    server.spawn().await.expect("Failed to spawn server")
}

fn api_for(addr: SocketAddr) -> HttpTodoApi {
    HttpTodoApi::new(&ClientConfig::with_api_url(format!("http://{addr}/api")))
        .expect("Failed to build HTTP client")
}

async fn dispatch(store: &TodoListStore, action: TodoListAction) {
    store
        .send(action)
        .await
        .expect("Store rejected action")
        .wait_with_timeout(WAIT)
        .await
        .expect("Effects did not finish");
}

#[tokio::test]
async fn view_model_round_trip() {
    helpers::init_tracing();
    let (addr, stop) = spawn_server().await;
    let api = api_for(addr);
    let store = store(Arc::new(api.clone()));

    dispatch(&store, TodoListAction::Load).await;
    assert!(store.state(|s| s.loaded && s.todos.is_empty()).await);

    for title in ["first", "second"] {
        dispatch(
            &store,
            TodoListAction::Add {
                title: title.to_string(),
                priority: Priority::High,
                status: Status::Pending,
            },
        )
        .await;
    }
    let titles = store
        .state(|s| s.todos.iter().map(|t| t.title.clone()).collect::<Vec<_>>())
        .await;
    assert_eq!(titles, vec!["second", "first"]);

    let first = TodoId::new("1");
    dispatch(&store, TodoListAction::ToggleStatus { id: first.clone() }).await;

    dispatch(&store, TodoListAction::StartEdit { id: first.clone() }).await;
    dispatch(&store, TodoListAction::SetEditingTitle("first, renamed".into())).await;
    dispatch(&store, TodoListAction::SaveEdit { id: first.clone() }).await;

    dispatch(&store, TodoListAction::Delete { id: TodoId::new("2") }).await;

    let local = store.state(|s| s.todos.clone()).await;
    let remote = api.list().await.unwrap();
    assert_eq!(local, remote);
    assert_eq!(remote.len(), 1);
    assert_eq!(remote[0].title, "first, renamed");
    assert_eq!(remote[0].status, Status::Completed);
    assert_eq!(remote[0].priority, Priority::High);
    assert!(store.state(|s| s.error.is_none() && s.in_flight() == 0).await);

    let _ = stop.send(());
}

#[tokio::test]
async fn missing_todo_rolls_back_and_reports() {
    let (addr, stop) = spawn_server().await;
    let api = api_for(addr);
    let store = store(Arc::new(api.clone()));

    dispatch(
        &store,
        TodoListAction::Add {
            title: "short-lived".into(),
            priority: Priority::Low,
            status: Status::Pending,
        },
    )
    .await;
    let id = TodoId::new("1");

    // Deleted behind the view model's back
    api.delete(&id).await.unwrap();

    dispatch(&store, TodoListAction::ToggleStatus { id: id.clone() }).await;

    let (todos, error) = store.state(|s| (s.todos.clone(), s.error.clone())).await;
    assert_eq!(todos.len(), 1);
    assert_eq!(todos[0].status, Status::Pending);
    assert_eq!(
        error.map(|e| e.message),
        Some("Failed to update status".to_string())
    );

    let _ = stop.send(());
}

#[tokio::test]
async fn http_client_maps_error_bodies() {
    let (addr, stop) = spawn_server().await;
    let api = api_for(addr);

    let err = api
        .update(&TodoId::new("99"), TodoPatch::status(Status::Completed))
        .await
        .unwrap_err();
    assert_eq!(
        err,
        ApiError::Status {
            status: 404,
            message: "Todo with id 99 not found".to_string(),
        }
    );

    let err = api
        .create(todolist_model::NewTodo::new(" ", Priority::Medium, Status::Pending))
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Status { status: 422, .. }));

    let _ = stop.send(());
}

#[tokio::test]
async fn stopped_server_surfaces_network_error() {
    let (addr, stop) = spawn_server().await;
    let api = api_for(addr);
    let _ = stop.send(());
    tokio::time::sleep(Duration::from_millis(200)).await;

    let err = api.list().await.unwrap_err();
    assert!(matches!(err, ApiError::Network(_)));
}
