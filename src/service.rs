//! Profile Service
//!
//! Combines validation, the user cache and the authoritative store into the
//! create/get/list/update/search operations.
//!
//! # Cache policy
//! - `get`: read-through; a miss is fetched from the store and cached.
//! - `create`: the freshly inserted record is cached directly.
//! - `update`: the cached entry is removed, never rewritten.
//! - `list`: never reads the cache; backfills it after a complete fetch.
//! - `search`: never touches the cache.
//!
//! Reads return records with the bio normalized; cached and stored values
//! keep the bio as submitted.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::cache::UserCache;
use crate::error::{ProfileError, Result, ValidationError};
use crate::models::{User, UserRequest};
use crate::store::UserStore;
use crate::validation::{normalize_bio, validate_user};

/// Applies the read-path bio normalization to a copy of `user`.
fn present(mut user: User) -> User {
    user.bio = normalize_bio(&user.bio);
    user
}

// == Profile Service ==
/// Orchestrates profile operations over a shared cache and store.
///
/// One instance is built at startup and shared by every request.
pub struct ProfileService {
    store: Arc<dyn UserStore>,
    cache: UserCache,
    requests: AtomicU64,
}

impl ProfileService {
    pub fn new(store: Arc<dyn UserStore>) -> Self {
        Self {
            store,
            cache: UserCache::new(),
            requests: AtomicU64::new(0),
        }
    }

    pub fn cache(&self) -> &UserCache {
        &self.cache
    }

    pub fn store(&self) -> &dyn UserStore {
        self.store.as_ref()
    }

    /// Operations handled since construction.
    pub fn requests_served(&self) -> u64 {
        self.requests.load(Ordering::Relaxed)
    }

    fn count_request(&self) {
        self.requests.fetch_add(1, Ordering::Relaxed);
    }

    // == Create ==
    /// Validates and inserts a new profile, caching the stored record.
    pub async fn create(&self, candidate: UserRequest) -> Result<User> {
        self.count_request();
        validate_user(&candidate)?;

        let inserted = self.store.insert(&candidate).await?;
        let user = User::from_request(inserted.id, candidate, Some(inserted.created));

        self.cache.insert(user.clone()).await;
        info!(id = user.id, username = %user.username, "user created");
        Ok(user)
    }

    // == Get ==
    /// Returns one profile, from the cache when present.
    pub async fn get(&self, id: i64) -> Result<User> {
        self.count_request();

        if let Some(cached) = self.cache.get(id).await {
            debug!(id, "cache hit");
            return Ok(present(cached));
        }

        debug!(id, "cache miss");
        let row = self
            .store
            .fetch_by_id(id)
            .await?
            .ok_or(ProfileError::NotFound(id))?;
        let user = User::try_from(row)?;

        // A concurrent update's invalidation may already have run; this
        // populate can then cache the pre-update value.
        self.cache.insert(user.clone()).await;
        Ok(present(user))
    }

    // == List ==
    /// Returns every profile, newest first.
    ///
    /// Any row that fails to decode fails the whole call.
    pub async fn list(&self) -> Result<Vec<User>> {
        self.count_request();

        let users = self
            .store
            .fetch_all()
            .await?
            .into_iter()
            .map(User::try_from)
            .collect::<std::result::Result<Vec<_>, _>>()?;

        // One exclusive lock per key, so readers interleave with the backfill.
        for user in &users {
            self.cache.insert(user.clone()).await;
        }

        debug!(count = users.len(), "listed users");
        Ok(users.into_iter().map(present).collect())
    }

    // == Update ==
    /// Replaces username, email and bio of an existing profile.
    ///
    /// The returned record carries the submitted fields and `id`; `created`
    /// is not reloaded and is left unset.
    pub async fn update(&self, id: i64, candidate: UserRequest) -> Result<User> {
        self.count_request();
        validate_user(&candidate)?;

        let affected = self.store.update(id, &candidate).await?;
        if affected == 0 {
            return Err(ProfileError::NotFound(id));
        }

        self.cache.invalidate(id).await;
        info!(id, "user updated");
        Ok(User::from_request(id, candidate, None))
    }

    // == Search ==
    /// Case-insensitive substring search over username, email and bio.
    ///
    /// Rows that fail to decode are skipped.
    pub async fn search(&self, term: &str) -> Result<Vec<User>> {
        self.count_request();
        if term.is_empty() {
            return Err(ValidationError::MissingSearchTerm.into());
        }

        let term = term.to_lowercase();
        let rows = self.store.search(&term).await?;

        let users: Vec<User> = rows
            .into_iter()
            .filter_map(|row| {
                let id = row.id;
                match User::try_from(row) {
                    Ok(user) => Some(present(user)),
                    Err(e) => {
                        warn!(id, error = %e, "skipping undecodable search row");
                        None
                    }
                }
            })
            .collect();

        debug!(term = %term, count = users.len(), "search complete");
        Ok(users)
    }
}
