//! API Module
//!
//! HTTP handlers and routing for the profile REST API.
//!
//! # Endpoints
//! - `POST /users` - Create a profile
//! - `GET /users` - List profiles
//! - `GET /users/search?q=` - Search profiles
//! - `GET /users/:id` - Fetch a profile
//! - `PUT /users/:id` - Update a profile
//! - `GET /health` - Health check endpoint
//! - `GET /metrics` - Prometheus metrics

pub mod handlers;
pub mod middleware;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
