//! Health check endpoint.
//!
//! Used by load balancers and deployment checks to verify the process is up.

/// Liveness check.
///
/// Does not touch the database.
///
/// ```text
/// GET /health  →  200 OK
/// ```
#[allow(clippy::unused_async)]
pub async fn health_check() -> &'static str {
    "OK"
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)] // Test code can use unwrap/expect
mod tests {
    use super::*;
    use axum::{routing::get, Router};
    use axum_test::TestServer;

    #[tokio::test]
    async fn health_returns_ok_text() {
        assert_eq!(health_check().await, "OK");

        let server = TestServer::new(Router::new().route("/health", get(health_check))).unwrap();
        let response = server.get("/health").await;
        response.assert_status_ok();
        response.assert_text("OK");
    }
}
