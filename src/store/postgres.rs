//! PostgreSQL store backed by a `sqlx` connection pool.
//!
//! Every statement binds its values as parameters.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::{PgPool, PgPoolOptions};
use tracing::{debug, info, warn};

use super::{Inserted, UserRow, UserStore};
use crate::config::DatabaseConfig;
use crate::error::StoreError;
use crate::models::UserRequest;

const CREATE_USERS_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS users (
        id BIGSERIAL PRIMARY KEY,
        username VARCHAR(50) UNIQUE NOT NULL,
        email VARCHAR(100) UNIQUE NOT NULL,
        bio TEXT,
        created TIMESTAMPTZ DEFAULT CURRENT_TIMESTAMP
    )
"#;

/// `UserStore` over a PostgreSQL pool.
#[derive(Clone)]
pub struct PgUserStore {
    pool: PgPool,
}

impl PgUserStore {
    /// Opens a pool sized by `config`.
    ///
    /// sqlx has no idle-count cap; idle connections above
    /// `max_idle_connections` are reaped after `idle_timeout_secs`.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, StoreError> {
        info!(
            host = %config.host,
            database = %config.name,
            max_connections = config.max_connections,
            "connecting to PostgreSQL"
        );

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.max_idle_connections.min(config.max_connections))
            .idle_timeout(Some(config.idle_timeout()))
            .max_lifetime(Some(config.max_lifetime()))
            .acquire_timeout(config.acquire_timeout())
            .connect(&config.url())
            .await
            .map_err(|e| {
                warn!(error = %e, "failed to connect to database");
                StoreError::ConnectionFailure(e.to_string())
            })?;

        info!("PostgreSQL connection pool established");
        Ok(Self { pool })
    }

    /// Wraps an existing pool.
    pub fn with_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Creates the `users` table when it does not exist yet.
    pub async fn ensure_schema(&self) -> Result<(), StoreError> {
        sqlx::query(CREATE_USERS_TABLE).execute(&self.pool).await?;
        debug!("users table ready");
        Ok(())
    }
}

/// Escapes LIKE metacharacters so `term` only ever matches literally.
fn like_pattern(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len() + 2);
    escaped.push('%');
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn insert(&self, user: &UserRequest) -> Result<Inserted, StoreError> {
        let (id, created): (i64, DateTime<Utc>) = sqlx::query_as(
            r#"
            INSERT INTO users (username, email, bio)
            VALUES ($1, $2, $3)
            RETURNING id, created
            "#,
        )
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.bio)
        .fetch_one(&self.pool)
        .await?;

        Ok(Inserted { id, created })
    }

    async fn fetch_by_id(&self, id: i64) -> Result<Option<UserRow>, StoreError> {
        let row = sqlx::query_as::<_, UserRow>(
            "SELECT id, username, email, bio, created FROM users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    async fn fetch_all(&self) -> Result<Vec<UserRow>, StoreError> {
        let rows = sqlx::query_as::<_, UserRow>(
            "SELECT id, username, email, bio, created FROM users ORDER BY created DESC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    async fn update(&self, id: i64, user: &UserRequest) -> Result<u64, StoreError> {
        let result = sqlx::query(
            "UPDATE users SET username = $1, email = $2, bio = $3 WHERE id = $4",
        )
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.bio)
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    async fn search(&self, term: &str) -> Result<Vec<UserRow>, StoreError> {
        let rows = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, username, email, bio, created
            FROM users
            WHERE LOWER(username) LIKE $1
               OR LOWER(email) LIKE $1
               OR LOWER(bio) LIKE $1
            ORDER BY id
            "#,
        )
        .bind(like_pattern(term))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    fn active_connections(&self) -> Option<u32> {
        Some(self.pool.size())
    }

    async fn close(&self) {
        info!("closing database connection pool");
        self.pool.close().await;
    }
}
