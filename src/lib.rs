//! Profile Service - user profile records over PostgreSQL with an
//! in-memory read-through cache
//!
//! Provides create, fetch, list, update and substring search of user
//! profiles behind an HTTP API.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod service;
pub mod store;
pub mod telemetry;
pub mod validation;

pub use api::AppState;
pub use config::Config;
pub use service::ProfileService;
