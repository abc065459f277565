//! Configuration Module
//!
//! Handles loading and managing server configuration from environment variables.

use std::env;
use std::str::FromStr;
use std::time::Duration;

/// Which `UserStore` implementation the server runs against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    /// PostgreSQL through a `sqlx` connection pool
    Postgres,
    /// Process-local store, lost on restart
    Memory,
}

impl FromStr for StoreBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(Self::Postgres),
            "memory" => Ok(Self::Memory),
            other => Err(format!("unknown store backend: {}", other)),
        }
    }
}

/// Server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port
    pub server_port: u16,
    /// Store implementation to use
    pub store_backend: StoreBackend,
    /// Database connection settings
    pub database: DatabaseConfig,
}

/// Connection and pool settings for the PostgreSQL store.
#[derive(Clone)]
pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub name: String,
    /// Cap on simultaneously open connections
    pub max_connections: u32,
    /// Cap on connections kept open while idle
    pub max_idle_connections: u32,
    /// Idle connections above the cap are closed after this long
    pub idle_timeout_secs: u64,
    /// Connections older than this are closed and replaced
    pub max_lifetime_secs: u64,
    /// How long a caller waits for a free connection before failing
    pub acquire_timeout_secs: u64,
}

impl DatabaseConfig {
    /// Builds the PostgreSQL connection URL.
    pub fn url(&self) -> String {
        format!(
            "postgres://{}:{}@{}:{}/{}?sslmode=disable",
            self.user, self.password, self.host, self.port, self.name
        )
    }

    pub fn idle_timeout(&self) -> Duration {
        Duration::from_secs(self.idle_timeout_secs)
    }

    pub fn max_lifetime(&self) -> Duration {
        Duration::from_secs(self.max_lifetime_secs)
    }

    pub fn acquire_timeout(&self) -> Duration {
        Duration::from_secs(self.acquire_timeout_secs)
    }
}

// Password stays out of logs.
impl std::fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .field("name", &self.name)
            .field("max_connections", &self.max_connections)
            .field("max_idle_connections", &self.max_idle_connections)
            .field("idle_timeout_secs", &self.idle_timeout_secs)
            .field("max_lifetime_secs", &self.max_lifetime_secs)
            .field("acquire_timeout_secs", &self.acquire_timeout_secs)
            .finish()
    }
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `PORT` - HTTP server port (default: 8080)
    /// - `STORE_BACKEND` - `postgres` or `memory` (default: postgres)
    /// - `DB_HOST` - Database host (default: localhost)
    /// - `DB_PORT` - Database port (default: 5432)
    /// - `DB_USER` - Database user (default: postgres)
    /// - `DB_PASSWORD` - Database password (default: password)
    /// - `DB_NAME` - Database name (default: userservice)
    /// - `DB_MAX_CONNECTIONS` - Pool size cap (default: 10)
    /// - `DB_MAX_IDLE_CONNECTIONS` - Idle connection cap (default: 5)
    /// - `DB_IDLE_TIMEOUT_SECS` - Reap delay for idle connections above the cap (default: 600)
    /// - `DB_MAX_LIFETIME_SECS` - Connection max lifetime (default: 3600)
    /// - `DB_ACQUIRE_TIMEOUT_SECS` - Pool acquire timeout (default: 30)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let db = defaults.database;

        Self {
            server_port: parse_or("PORT", defaults.server_port),
            store_backend: parse_or("STORE_BACKEND", defaults.store_backend),
            database: DatabaseConfig {
                host: string_or("DB_HOST", db.host),
                port: parse_or("DB_PORT", db.port),
                user: string_or("DB_USER", db.user),
                password: string_or("DB_PASSWORD", db.password),
                name: string_or("DB_NAME", db.name),
                max_connections: parse_or("DB_MAX_CONNECTIONS", db.max_connections),
                max_idle_connections: parse_or("DB_MAX_IDLE_CONNECTIONS", db.max_idle_connections),
                idle_timeout_secs: parse_or("DB_IDLE_TIMEOUT_SECS", db.idle_timeout_secs),
                max_lifetime_secs: parse_or("DB_MAX_LIFETIME_SECS", db.max_lifetime_secs),
                acquire_timeout_secs: parse_or("DB_ACQUIRE_TIMEOUT_SECS", db.acquire_timeout_secs),
            },
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_port: 8080,
            store_backend: StoreBackend::Postgres,
            database: DatabaseConfig {
                host: "localhost".to_string(),
                port: 5432,
                user: "postgres".to_string(),
                password: "password".to_string(),
                name: "userservice".to_string(),
                max_connections: 10,
                max_idle_connections: 5,
                idle_timeout_secs: 600,
                max_lifetime_secs: 3600,
                acquire_timeout_secs: 30,
            },
        }
    }
}

fn parse_or<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn string_or(key: &str, default: String) -> String {
    env::var(key)
        .ok()
        .filter(|v| !v.is_empty())
        .unwrap_or(default)
}
