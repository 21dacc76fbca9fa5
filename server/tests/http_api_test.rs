//! HTTP contract tests for `/api/todos`, run in-process with `axum-test`.

#![allow(clippy::unwrap_used, clippy::expect_used)] // Test code can use unwrap/expect

use axum::body::Bytes;
use axum::http::{HeaderName, HeaderValue, StatusCode};
use axum_test::TestServer;
use metrics_exporter_prometheus::PrometheusBuilder;
use proptest::prelude::*;
use serde_json::json;
use std::sync::Arc;
use todolist_model::{Priority, Status, Todo};
use todolist_server::{Config, InMemoryTodoRepository, TodoServer};
use todolist_testing::properties;

fn todo_server() -> TodoServer {
    TodoServer::with_repository(Config::ephemeral(), Arc::new(InMemoryTodoRepository::new()))
}

fn test_server() -> TestServer {
    TestServer::new(todo_server().router()).expect("Failed to start test server")
}

async fn create(server: &TestServer, title: &str) -> Todo {
    let response = server
        .post("/api/todos")
        .json(&json!({"title": title}))
        .await;
    response.assert_status(StatusCode::CREATED);
    response.json::<Todo>()
}

#[tokio::test]
async fn create_assigns_id_and_defaults() {
    let server = test_server();

    let response = server
        .post("/api/todos")
        .json(&json!({"title": "Buy milk", "priority": "high"}))
        .await;

    response.assert_status(StatusCode::CREATED);
    response.assert_json(&json!({
        "id": "1",
        "title": "Buy milk",
        "priority": "high",
        "status": "pending"
    }));
}

#[tokio::test]
async fn blank_title_is_rejected() {
    let server = test_server();

    let response = server
        .post("/api/todos")
        .json(&json!({"title": "   "}))
        .await;

    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    response.assert_json(&json!({
        "code": "VALIDATION_ERROR",
        "message": "Title is required"
    }));

    server.get("/api/todos").await.assert_json(&json!([]));
}

#[tokio::test]
async fn malformed_json_is_a_bad_request() {
    let server = test_server();

    let response = server
        .post("/api/todos")
        .bytes(Bytes::from_static(b"{\"title\":"))
        .content_type("application/json")
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<serde_json::Value>()["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn wrong_field_type_is_unprocessable() {
    let server = test_server();

    let response = server
        .post("/api/todos")
        .json(&json!({"title": "x", "status": "someday"}))
        .await;

    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn list_returns_creation_order() {
    let server = test_server();
    let first = create(&server, "first").await;
    let second = create(&server, "second").await;

    let listed = server.get("/api/todos").await.json::<Vec<Todo>>();

    assert_eq!(listed, vec![first, second]);
}

#[tokio::test]
async fn put_applies_partial_update() {
    let server = test_server();
    let todo = create(&server, "Walk dog").await;

    let response = server
        .put(&format!("/api/todos/{}", todo.id))
        .json(&json!({"status": "completed"}))
        .await;

    response.assert_status_ok();
    assert_eq!(
        response.json::<Todo>(),
        Todo::new(todo.id.clone(), "Walk dog", Priority::Medium, Status::Completed)
    );

    let response = server
        .put(&format!("/api/todos/{}", todo.id))
        .json(&json!({"title": "Walk the dog"}))
        .await;
    let updated = response.json::<Todo>();
    assert_eq!(updated.title, "Walk the dog");
    assert_eq!(updated.status, Status::Completed);
}

#[tokio::test]
async fn put_with_blank_title_keeps_old_title() {
    let server = test_server();
    let todo = create(&server, "Keep me").await;

    server
        .put(&format!("/api/todos/{}", todo.id))
        .json(&json!({"title": ""}))
        .await
        .assert_status(StatusCode::UNPROCESSABLE_ENTITY);

    let listed = server.get("/api/todos").await.json::<Vec<Todo>>();
    assert_eq!(listed[0].title, "Keep me");
}

#[tokio::test]
async fn unknown_id_is_not_found() {
    let server = test_server();

    let response = server
        .put("/api/todos/42")
        .json(&json!({"status": "completed"}))
        .await;
    response.assert_status(StatusCode::NOT_FOUND);
    response.assert_json(&json!({
        "code": "NOT_FOUND",
        "message": "Todo with id 42 not found"
    }));

    server
        .delete("/api/todos/42")
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn delete_removes_todo() {
    let server = test_server();
    let doomed = create(&server, "doomed").await;
    let kept = create(&server, "kept").await;

    server
        .delete(&format!("/api/todos/{}", doomed.id))
        .await
        .assert_status(StatusCode::NO_CONTENT);

    let listed = server.get("/api/todos").await.json::<Vec<Todo>>();
    assert_eq!(listed, vec![kept]);

    server
        .delete(&format!("/api/todos/{}", doomed.id))
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn ids_are_not_reused_after_delete() {
    let server = test_server();
    let first = create(&server, "a").await;
    server
        .delete(&format!("/api/todos/{}", first.id))
        .await
        .assert_status(StatusCode::NO_CONTENT);

    let next = create(&server, "b").await;
    assert_ne!(next.id, first.id);
}

#[tokio::test]
async fn health_reports_ok() {
    let server = test_server();
    let response = server.get("/health").await;
    response.assert_status_ok();
    response.assert_text("OK");
}

#[tokio::test]
async fn responses_carry_request_id() {
    let server = test_server();

    let generated = server.get("/api/todos").await;
    assert!(!generated.header("x-request-id").is_empty());

    let echoed = server
        .get("/api/todos")
        .add_header(
            HeaderName::from_static("x-request-id"),
            HeaderValue::from_static("trace-abc-123"),
        )
        .await;
    assert_eq!(echoed.header("x-request-id"), "trace-abc-123");
}

#[tokio::test]
async fn metrics_unavailable_without_recorder() {
    let server = test_server();
    server
        .get("/metrics")
        .await
        .assert_status(StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn metrics_rendered_with_handle() {
    let handle = PrometheusBuilder::new().build_recorder().handle();
    let server = TestServer::new(todo_server().with_metrics(handle).router()).unwrap();

    server.get("/metrics").await.assert_status_ok();
}

#[tokio::test]
async fn cors_allows_configured_origin() {
    let server = test_server();

    let response = server
        .get("/api/todos")
        .add_header(
            HeaderName::from_static("origin"),
            HeaderValue::from_static("http://localhost:5173"),
        )
        .await;

    assert_eq!(
        response.header("access-control-allow-origin"),
        "http://localhost:5173"
    );
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    #[test]
    fn stored_titles_round_trip(titles in prop::collection::vec(properties::title(), 1..6)) {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        let listed = runtime.block_on(async {
            let server = test_server();
            for title in &titles {
                create(&server, title).await;
            }
            server.get("/api/todos").await.json::<Vec<Todo>>()
        });

        let stored: Vec<String> = listed.iter().map(|t| t.title.clone()).collect();
        prop_assert_eq!(stored, titles);
        let ids: std::collections::HashSet<_> = listed.iter().map(|t| t.id.clone()).collect();
        prop_assert_eq!(ids.len(), listed.len());
    }
}
