//! User Cache Module
//!
//! Process-local map from user id to record, shared by every request.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::RwLock;

use crate::cache::CacheStats;
use crate::models::User;

// == User Cache ==
/// Non-authoritative copies of user records keyed by id.
///
/// Lookups take the shared lock; inserts and invalidations take the
/// exclusive lock. tokio's `RwLock` queues waiters fairly, so a stream of
/// readers cannot starve a writer and vice versa. Counters are atomics so
/// a hit never needs the exclusive lock.
///
/// No eviction and no TTL: entries live until invalidated or the process
/// exits.
#[derive(Debug, Default)]
pub struct UserCache {
    entries: RwLock<HashMap<i64, User>>,
    hits: AtomicU64,
    misses: AtomicU64,
    invalidations: AtomicU64,
}

impl UserCache {
    // == Constructor ==
    pub fn new() -> Self {
        Self::default()
    }

    // == Get ==
    /// Returns a copy of the cached record, recording a hit or miss.
    pub async fn get(&self, id: i64) -> Option<User> {
        let found = self.entries.read().await.get(&id).cloned();
        let counter = if found.is_some() {
            &self.hits
        } else {
            &self.misses
        };
        counter.fetch_add(1, Ordering::Relaxed);
        found
    }

    // == Insert ==
    /// Stores `user` under its id, replacing any previous copy.
    pub async fn insert(&self, user: User) {
        self.entries.write().await.insert(user.id, user);
    }

    // == Invalidate ==
    /// Removes the entry for `id`. Returns whether one was present.
    pub async fn invalidate(&self, id: i64) -> bool {
        let removed = self.entries.write().await.remove(&id).is_some();
        if removed {
            self.invalidations.fetch_add(1, Ordering::Relaxed);
        }
        removed
    }

    // == Contains ==
    /// Checks for an entry without touching the hit/miss counters.
    pub async fn contains(&self, id: i64) -> bool {
        self.entries.read().await.contains_key(&id)
    }

    // == Length ==
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub async fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            invalidations: self.invalidations.load(Ordering::Relaxed),
            total_entries: self.len().await,
        }
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn user(id: i64, username: &str) -> User {
        User {
            id,
            username: username.to_string(),
            email: format!("{}@example.com", username),
            bio: "bio".to_string(),
            created: Some(chrono::Utc::now()),
        }
    }

    #[tokio::test]
    async fn test_cache_new() {
        let cache = UserCache::new();
        assert_eq!(cache.len().await, 0);
        assert!(cache.is_empty().await);
    }

    #[tokio::test]
    async fn test_insert_and_get() {
        let cache = UserCache::new();
        cache.insert(user(1, "alice")).await;

        let cached = cache.get(1).await.unwrap();
        assert_eq!(cached.username, "alice");
        assert_eq!(cache.len().await, 1);
    }

    #[tokio::test]
    async fn test_get_missing_records_miss() {
        let cache = UserCache::new();
        assert!(cache.get(42).await.is_none());

        let stats = cache.stats().await;
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.hits, 0);
    }

    #[tokio::test]
    async fn test_insert_overwrites() {
        let cache = UserCache::new();
        cache.insert(user(1, "alice")).await;
        cache.insert(user(1, "alicia")).await;

        assert_eq!(cache.len().await, 1);
        assert_eq!(cache.get(1).await.unwrap().username, "alicia");
    }

    #[tokio::test]
    async fn test_invalidate() {
        let cache = UserCache::new();
        cache.insert(user(1, "alice")).await;

        assert!(cache.invalidate(1).await);
        assert!(!cache.contains(1).await);
        assert!(!cache.invalidate(1).await);
        assert_eq!(cache.stats().await.invalidations, 1);
    }

    #[tokio::test]
    async fn test_contains_does_not_count() {
        let cache = UserCache::new();
        cache.insert(user(1, "alice")).await;
        assert!(cache.contains(1).await);
        assert!(!cache.contains(2).await);

        let stats = cache.stats().await;
        assert_eq!(stats.hits + stats.misses, 0);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_readers_and_writers() {
        let cache = Arc::new(UserCache::new());
        let mut handles = Vec::new();

        for id in 0..32 {
            let cache = cache.clone();
            handles.push(tokio::spawn(async move {
                cache.insert(user(id, &format!("user{}", id))).await;
                cache.get(id).await
            }));
        }

        for handle in handles {
            assert!(handle.await.unwrap().is_some());
        }
        assert_eq!(cache.len().await, 32);
        assert_eq!(cache.stats().await.hits, 32);
    }
}
