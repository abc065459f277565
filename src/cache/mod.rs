//! Cache Module
//!
//! Read-through, invalidate-on-update cache of user records in front of
//! the store.

mod stats;
mod user_cache;


// Re-export public types
pub use stats::CacheStats;
pub use user_cache::UserCache;
