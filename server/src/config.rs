//! Configuration management for the todo server.
//!
//! Loads configuration from environment variables with sensible defaults.

use std::env;
use std::net::SocketAddr;
use std::time::Duration;
use thiserror::Error;

/// Origins allowed to call the API from a browser when none are configured
pub const DEFAULT_CORS_ORIGINS: &[&str] =
    &["http://localhost:5173", "https://cicdtodotaskvite.vercel.app"];

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// `HOST`/`PORT` do not form a socket address
    #[error("invalid bind address {0}")]
    InvalidBindAddress(String),

    /// `DATABASE_URL` is set but the binary was built without Postgres
    #[error("DATABASE_URL is set but this build has no postgres support (enable the `postgres` feature)")]
    PostgresUnsupported,
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server configuration
    pub server: ServerConfig,
    /// Storage configuration
    pub database: DatabaseConfig,
}

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Host to bind to
    pub host: String,
    /// Port to bind to
    pub port: u16,
    /// Graceful shutdown timeout in seconds
    pub shutdown_timeout: u64,
    /// Browser origins allowed by CORS
    pub cors_allowed_origins: Vec<String>,
}

/// Storage configuration
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// `PostgreSQL` connection URL; `None` keeps todos in memory
    pub url: Option<String>,
    /// Maximum number of connections in the pool
    pub max_connections: u32,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Call `dotenvy::dotenv()` first to pick up a `.env` file.
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            server: ServerConfig {
                host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: env::var("PORT")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(8080),
                shutdown_timeout: env::var("SHUTDOWN_TIMEOUT")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(30),
                cors_allowed_origins: env::var("CORS_ALLOWED_ORIGINS")
                    .map_or_else(|_| default_origins(), |s| parse_origins(&s)),
            },
            database: DatabaseConfig {
                url: env::var("DATABASE_URL").ok().filter(|s| !s.trim().is_empty()),
                max_connections: env::var("DATABASE_MAX_CONNECTIONS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(5),
            },
        }
    }

    /// In-memory storage on `127.0.0.1` with an OS-assigned port.
    ///
    /// Used by tests and local demos.
    #[must_use]
    pub fn ephemeral() -> Self {
        Self {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 0,
                shutdown_timeout: 5,
                cors_allowed_origins: default_origins(),
            },
            database: DatabaseConfig {
                url: None,
                max_connections: 5,
            },
        }
    }
}

impl ServerConfig {
    /// Socket address to listen on
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidBindAddress`] if host and port do not parse.
    pub fn bind_address(&self) -> Result<SocketAddr, ConfigError> {
        let address = format!("{}:{}", self.host, self.port);
        address
            .parse()
            .map_err(|_| ConfigError::InvalidBindAddress(address))
    }

    /// How long in-flight requests get to finish after a shutdown signal
    #[must_use]
    pub const fn shutdown_timeout(&self) -> Duration {
        Duration::from_secs(self.shutdown_timeout)
    }
}

fn default_origins() -> Vec<String> {
    DEFAULT_CORS_ORIGINS.iter().map(ToString::to_string).collect()
}

/// Splits a comma-separated origin list, dropping blanks and trailing slashes
fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|origin| origin.trim().trim_end_matches('/'))
        .filter(|origin| !origin.is_empty())
        .map(str::to_string)
        .collect()
}
