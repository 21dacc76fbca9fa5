//! Server lifecycle: storage selection, middleware, serving, and shutdown.

use crate::config::{Config, ConfigError, DatabaseConfig};
use crate::repository::{InMemoryTodoRepository, RepositoryError, TodoRepository};
use crate::server::{build_router, AppState};
use axum::Router;
use metrics_exporter_prometheus::PrometheusHandle;
use std::future::{Future, IntoFuture};
use std::net::SocketAddr;
use std::sync::Arc;
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tower_http::trace::TraceLayer;
use todolist_web::{cors_layer, request_id_layer};

/// Errors starting or running the server
#[derive(Debug, Error)]
pub enum ServerError {
    /// Invalid configuration
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Storage could not be opened
    #[error("storage unavailable: {0}")]
    Repository(#[from] RepositoryError),

    /// Binding or serving failed
    #[error("server I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// The todo REST server
pub struct TodoServer {
    config: Config,
    state: AppState,
}

impl TodoServer {
    /// Opens the storage named by `config`.
    ///
    /// Without `DATABASE_URL` todos live in memory.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError`] if the database cannot be reached or
    /// migrated, or if a database is configured in a build without Postgres.
    pub async fn from_config(config: Config) -> Result<Self, ServerError> {
        let repository = open_repository(&config.database).await?;
        Ok(Self::with_repository(config, repository))
    }

    /// Uses `repository` instead of the configured storage
    #[must_use]
    pub fn with_repository(config: Config, repository: Arc<dyn TodoRepository>) -> Self {
        Self {
            config,
            state: AppState::new(repository),
        }
    }

    /// Serves `/metrics` from `handle`
    #[must_use]
    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.state = self.state.with_metrics(handle);
        self
    }

    /// The router with tracing, CORS and request-ID middleware applied
    pub fn router(&self) -> Router {
        build_router(self.state.clone())
            .layer(TraceLayer::new_for_http())
            .layer(cors_layer(&self.config.server.cors_allowed_origins))
            .layer(request_id_layer())
    }

    /// Binds the configured address
    ///
    /// # Errors
    ///
    /// Returns [`ServerError`] if the address is invalid or already in use.
    pub async fn bind(&self) -> Result<TcpListener, ServerError> {
        let addr = self.config.server.bind_address()?;
        let listener = TcpListener::bind(addr).await?;
        tracing::info!(addr = %listener.local_addr()?, "Listening");
        Ok(listener)
    }

    /// Binds the configured address and serves until Ctrl+C or SIGTERM
    ///
    /// # Errors
    ///
    /// Returns [`ServerError`] if binding or serving fails.
    pub async fn run(self) -> Result<(), ServerError> {
        let listener = self.bind().await?;
        self.serve(listener, shutdown_signal()).await
    }

    /// Serves on `listener` until `shutdown` resolves.
    ///
    /// In-flight requests get `SHUTDOWN_TIMEOUT` seconds to finish; after
    /// that the server stops without waiting for them.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::Io`] if the server fails.
    pub async fn serve<F>(self, listener: TcpListener, shutdown: F) -> Result<(), ServerError>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let grace = self.config.server.shutdown_timeout();
        let (signalled_tx, mut signalled_rx) = watch::channel(false);

        let graceful = async move {
            shutdown.await;
            tracing::info!("Shutdown signal received, draining connections");
            let _ = signalled_tx.send(true);
        };

        let server = axum::serve(listener, self.router())
            .with_graceful_shutdown(graceful)
            .into_future();

        let deadline = async move {
            let closed = signalled_rx.wait_for(|signalled| *signalled).await.is_err();
            if closed {
                std::future::pending::<()>().await;
            }
            tokio::time::sleep(grace).await;
        };

        tokio::select! {
            result = server => result?,
            () = deadline => {
                tracing::warn!(?grace, "Connections still open after shutdown timeout, stopping anyway");
            },
        }

        tracing::info!("Server stopped");
        Ok(())
    }

    /// Serves on an OS-assigned loopback port in a background task.
    ///
    /// Returns the bound address and a sender that stops the server.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::Io`] if no port can be bound.
    pub async fn spawn(self) -> Result<(SocketAddr, tokio::sync::oneshot::Sender<()>), ServerError> {
        let listener = TcpListener::bind(("127.0.0.1", 0)).await?;
        let addr = listener.local_addr()?;
        let (stop_tx, stop_rx) = tokio::sync::oneshot::channel::<()>();

        tokio::spawn(async move {
            let stop = async move {
                let _ = stop_rx.await;
            };
            if let Err(error) = self.serve(listener, stop).await {
                tracing::error!(%error, "Background server failed");
            }
        });

        Ok((addr, stop_tx))
    }
}

async fn open_repository(config: &DatabaseConfig) -> Result<Arc<dyn TodoRepository>, ServerError> {
    match &config.url {
        None => {
            tracing::info!("DATABASE_URL not set, keeping todos in memory");
            Ok(Arc::new(InMemoryTodoRepository::new()))
        },
        #[cfg(feature = "postgres")]
        Some(url) => {
            let repository =
                crate::repository::PostgresTodoRepository::connect(url, config.max_connections).await?;
            repository.migrate().await?;
            tracing::info!("Connected to PostgreSQL");
            Ok(Arc::new(repository))
        },
        #[cfg(not(feature = "postgres"))]
        Some(_) => Err(ConfigError::PostgresUnsupported.into()),
    }
}

/// Resolves on Ctrl+C or, on Unix, SIGTERM.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(error) = tokio::signal::ctrl_c().await {
            tracing::error!(%error, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
        tracing::info!("Received Ctrl+C");
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
                tracing::info!("Received SIGTERM");
            },
            Err(error) => {
                tracing::error!(%error, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            },
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)] // Test code can use unwrap
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn serve_stops_when_shutdown_resolves() {
        let server = TodoServer::with_repository(
            Config::ephemeral(),
            Arc::new(InMemoryTodoRepository::new()),
        );
        let listener = server.bind().await.unwrap();

        let result = tokio::time::timeout(
            Duration::from_secs(5),
            server.serve(listener, async {}),
        )
        .await;

        assert!(result.unwrap().is_ok());
    }

    #[cfg(not(feature = "postgres"))]
    #[tokio::test]
    async fn database_url_requires_postgres_feature() {
        let mut config = Config::ephemeral();
        config.database.url = Some("postgres://localhost/todos".to_string());

        let result = TodoServer::from_config(config).await;
        assert!(matches!(
            result,
            Err(ServerError::Config(ConfigError::PostgresUnsupported))
        ));
    }
}
