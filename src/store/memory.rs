//! Process-local `UserStore`.
//!
//! Assigns ids and creation times and enforces username/email uniqueness
//! the way the `users` table does. Contents are lost on restart.

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;

use super::{Inserted, UserRow, UserStore};
use crate::error::StoreError;
use crate::models::UserRequest;

#[derive(Debug, Default)]
struct Tables {
    /// Rows in insertion (id) order
    rows: Vec<UserRow>,
    next_id: i64,
}

impl Tables {
    fn check_unique(&self, user: &UserRequest, skip_id: Option<i64>) -> Result<(), StoreError> {
        for row in self.rows.iter().filter(|r| Some(r.id) != skip_id) {
            if row.username == user.username {
                return Err(StoreError::ConstraintViolation(format!(
                    "username '{}' already exists",
                    user.username
                )));
            }
            if row.email == user.email {
                return Err(StoreError::ConstraintViolation(format!(
                    "email '{}' already exists",
                    user.email
                )));
            }
        }
        Ok(())
    }
}

/// In-memory `UserStore`.
#[derive(Debug)]
pub struct MemoryUserStore {
    tables: Mutex<Tables>,
    available: AtomicBool,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self {
            tables: Mutex::new(Tables {
                rows: Vec::new(),
                next_id: 1,
            }),
            available: AtomicBool::new(true),
        }
    }

    /// Stores a row verbatim, bypassing id assignment and uniqueness.
    ///
    /// Lets callers seed rows the schema permits but `User` cannot decode,
    /// such as a NULL bio.
    pub async fn insert_row(&self, row: UserRow) {
        let mut tables = self.tables.lock().await;
        tables.next_id = tables.next_id.max(row.id + 1);
        tables.rows.push(row);
        tables.rows.sort_by_key(|r| r.id);
    }

    /// Simulates losing (`false`) or regaining (`true`) the store connection.
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    /// Number of rows held.
    pub async fn len(&self) -> usize {
        self.tables.lock().await.rows.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    fn ensure_available(&self) -> Result<(), StoreError> {
        if self.available.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(StoreError::ConnectionFailure(
                "in-memory store unavailable".to_string(),
            ))
        }
    }
}

impl Default for MemoryUserStore {
    fn default() -> Self {
        Self::new()
    }
}

fn matches_term(row: &UserRow, term: &str) -> bool {
    row.username.to_lowercase().contains(term)
        || row.email.to_lowercase().contains(term)
        || row
            .bio
            .as_deref()
            .is_some_and(|bio| bio.to_lowercase().contains(term))
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn insert(&self, user: &UserRequest) -> Result<Inserted, StoreError> {
        self.ensure_available()?;
        let mut tables = self.tables.lock().await;
        tables.check_unique(user, None)?;

        let id = tables.next_id;
        tables.next_id += 1;
        let created = Utc::now();
        tables.rows.push(UserRow {
            id,
            username: user.username.clone(),
            email: user.email.clone(),
            bio: Some(user.bio.clone()),
            created: Some(created),
        });

        Ok(Inserted { id, created })
    }

    async fn fetch_by_id(&self, id: i64) -> Result<Option<UserRow>, StoreError> {
        self.ensure_available()?;
        let tables = self.tables.lock().await;
        Ok(tables.rows.iter().find(|r| r.id == id).cloned())
    }

    async fn fetch_all(&self) -> Result<Vec<UserRow>, StoreError> {
        self.ensure_available()?;
        let tables = self.tables.lock().await;
        let mut rows = tables.rows.clone();
        // Newest first; id breaks ties between equal timestamps.
        rows.sort_by(|a, b| b.created.cmp(&a.created).then(b.id.cmp(&a.id)));
        Ok(rows)
    }

    async fn update(&self, id: i64, user: &UserRequest) -> Result<u64, StoreError> {
        self.ensure_available()?;
        let mut tables = self.tables.lock().await;
        if !tables.rows.iter().any(|r| r.id == id) {
            return Ok(0);
        }
        tables.check_unique(user, Some(id))?;

        let mut affected = 0;
        for row in tables.rows.iter_mut().filter(|r| r.id == id) {
            row.username = user.username.clone();
            row.email = user.email.clone();
            row.bio = Some(user.bio.clone());
            affected += 1;
        }
        Ok(affected)
    }

    async fn search(&self, term: &str) -> Result<Vec<UserRow>, StoreError> {
        self.ensure_available()?;
        let tables = self.tables.lock().await;
        Ok(tables
            .rows
            .iter()
            .filter(|row| matches_term(row, term))
            .cloned()
            .collect())
    }
}
