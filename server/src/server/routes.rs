//! Router configuration.

use super::state::AppState;
use crate::api::todos;
use axum::{
    extract::State,
    routing::{get, put},
    Router,
};
use todolist_web::{handlers::health_check, AppError};

/// Build the complete Axum router.
///
/// - `GET /health`: liveness check
/// - `GET /metrics`: Prometheus exposition
/// - `/api/todos`: list and create
/// - `/api/todos/:id`: update and delete
///
/// Middleware is added by [`crate::app::TodoServer::router`].
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/todos", get(todos::list_todos).post(todos::create_todo))
        .route(
            "/todos/:id",
            put(todos::update_todo).delete(todos::delete_todo),
        );

    Router::new()
        .route("/health", get(health_check))
        .route("/metrics", get(render_metrics))
        .nest("/api", api_routes)
        .with_state(state)
}

/// `GET /metrics`
async fn render_metrics(State(state): State<AppState>) -> Result<String, AppError> {
    state
        .metrics
        .as_ref()
        .map(metrics_exporter_prometheus::PrometheusHandle::render)
        .ok_or_else(|| AppError::unavailable("Metrics recorder is not installed"))
}
