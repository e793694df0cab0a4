//! Server configuration
//!
//! Loaded from environment variables with defaults for local development.

use std::env;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use crate::telemetry_store::DEFAULT_MAX_CONNECTIONS;

/// Server settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Order document file (JSON lines)
    pub orders_file_path: PathBuf,
    /// sqlx connection URL of the analytics database
    pub analytics_database_url: String,
    pub analytics_max_connections: u32,
    /// Development mode: GraphiQL and debug-level default logging
    pub dev: bool,
}

impl ServerConfig {
    pub const DEFAULT_PORT: u16 = 4447;

    /// Read configuration from the process environment
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Read configuration through `lookup`, falling back to defaults for
    /// missing or unparsable values
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let current_dir = env::current_dir().unwrap_or_else(|_| PathBuf::from("."));

        let orders_file_path = match lookup("ORDERS_FILE_PATH") {
            Some(path) if Path::new(&path).is_absolute() => PathBuf::from(path),
            Some(path) => current_dir.join(path),
            None => current_dir.join("orders.jsonl"),
        };

        Self {
            host: lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: lookup("PORT")
                .and_then(|s| s.parse().ok())
                .unwrap_or(Self::DEFAULT_PORT),
            orders_file_path,
            analytics_database_url: lookup("ANALYTICS_DATABASE_URL")
                .unwrap_or_else(|| "sqlite://analytics.db?mode=rwc".to_string()),
            analytics_max_connections: lookup("ANALYTICS_DB_MAX_CONNECTIONS")
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_MAX_CONNECTIONS),
            dev: lookup("DEV").is_some_and(|v| v == "true"),
        }
    }

    /// Address to bind; an unparsable host falls back to all interfaces
    pub fn socket_addr(&self) -> SocketAddr {
        format!("{}:{}", self.host, self.port)
            .parse()
            .unwrap_or_else(|_| SocketAddr::from(([0, 0, 0, 0], self.port)))
    }

    /// Default `RUST_LOG` directive when none is set
    pub fn default_log_filter(&self) -> &'static str {
        if self.dev {
            "order_admin=debug,tower_http=debug"
        } else {
            "order_admin=info,tower_http=info"
        }
    }
}
