//! Todo API server binary.
//!
//! ```bash
//! # In-memory storage on port 8080
//! cargo run -p todolist-server
//!
//! # PostgreSQL storage
//! DATABASE_URL=postgres://localhost/todos cargo run -p todolist-server --features postgres
//! ```

use todolist_server::{Config, TodoServer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,todolist_server=debug,sqlx=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env();
    tracing::info!(
        host = %config.server.host,
        port = config.server.port,
        origins = ?config.server.cors_allowed_origins,
        persistent = config.database.url.is_some(),
        "Configuration loaded"
    );

    let metrics = todolist_server::metrics::install_recorder()?;

    TodoServer::from_config(config)
        .await?
        .with_metrics(metrics)
        .run()
        .await?;

    Ok(())
}
