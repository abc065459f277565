//! Store Module
//!
//! The authoritative persistence seam. `UserStore` is implemented by a
//! PostgreSQL adapter and by a process-local store with the same
//! observable behavior.

mod memory;
mod postgres;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::StoreError;
use crate::models::{User, UserRequest};

pub use memory::MemoryUserStore;
pub use postgres::PgUserStore;

// == User Row ==
/// A `users` row as the store holds it.
///
/// `bio` and `created` are nullable in the schema; a row missing either
/// does not decode into a [`User`].
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct UserRow {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub bio: Option<String>,
    pub created: Option<DateTime<Utc>>,
}

impl TryFrom<UserRow> for User {
    type Error = StoreError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let bio = row
            .bio
            .ok_or_else(|| StoreError::QueryFailure(format!("user {} has NULL bio", row.id)))?;
        let created = row.created.ok_or_else(|| {
            StoreError::QueryFailure(format!("user {} has NULL created", row.id))
        })?;

        Ok(User {
            id: row.id,
            username: row.username,
            email: row.email,
            bio,
            created: Some(created),
        })
    }
}

/// Values the store assigns on insertion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Inserted {
    pub id: i64,
    pub created: DateTime<Utc>,
}

// == User Store ==
/// Authoritative storage for user profiles.
///
/// Username and email uniqueness is enforced here; a violating write fails
/// with [`StoreError::ConstraintViolation`].
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Inserts a new row, returning the assigned id and creation time.
    async fn insert(&self, user: &UserRequest) -> Result<Inserted, StoreError>;

    /// Fetches one row by id.
    async fn fetch_by_id(&self, id: i64) -> Result<Option<UserRow>, StoreError>;

    /// Fetches every row, newest first.
    async fn fetch_all(&self) -> Result<Vec<UserRow>, StoreError>;

    /// Replaces username, email and bio. Returns the number of rows
    /// affected, 0 when `id` does not exist.
    async fn update(&self, id: i64, user: &UserRequest) -> Result<u64, StoreError>;

    /// Rows whose lower-cased username, email or bio contains `term`,
    /// in insertion order. `term` is expected to be lower-case already.
    async fn search(&self, term: &str) -> Result<Vec<UserRow>, StoreError>;

    /// Open connections, for stores backed by a pool.
    fn active_connections(&self) -> Option<u32> {
        None
    }

    /// Releases store resources on shutdown.
    async fn close(&self) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(bio: Option<&str>, created: Option<DateTime<Utc>>) -> UserRow {
        UserRow {
            id: 3,
            username: "carol".to_string(),
            email: "carol@example.com".to_string(),
            bio: bio.map(str::to_string),
            created,
        }
    }

    #[test]
    fn test_complete_row_decodes() {
        let now = Utc::now();
        let user = User::try_from(row(Some("hi"), Some(now))).unwrap();
        assert_eq!(user.id, 3);
        assert_eq!(user.bio, "hi");
        assert_eq!(user.created, Some(now));
    }

    #[test]
    fn test_null_bio_fails_decode() {
        let result = User::try_from(row(None, Some(Utc::now())));
        assert!(matches!(result, Err(StoreError::QueryFailure(_))));
    }

    #[test]
    fn test_null_created_fails_decode() {
        let result = User::try_from(row(Some("hi"), None));
        assert!(matches!(result, Err(StoreError::QueryFailure(_))));
    }
}
