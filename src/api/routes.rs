//! API Routes
//!
//! Configures the Axum router with all profile service endpoints.

use axum::{middleware, routing::get, Router};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    create_user_handler, get_user_handler, health_handler, list_users_handler, metrics_handler,
    search_users_handler, update_user_handler, AppState,
};
use super::middleware::track_metrics;

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `POST /users` - Create a profile
/// - `GET /users` - List profiles, newest first
/// - `GET /users/search?q=` - Substring search
/// - `GET /users/:id` - Fetch one profile
/// - `PUT /users/:id` - Replace a profile's mutable fields
/// - `GET /health` - Health probe
/// - `GET /metrics` - Prometheus exposition
///
/// # Middleware
/// - Metrics: per-route latency and status counts
/// - CORS: Allows any origin
/// - Tracing: Logs all requests
pub fn create_router(state: AppState) -> Router {
    // Configure CORS middleware
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/users", get(list_users_handler).post(create_user_handler))
        .route("/users/search", get(search_users_handler))
        .route("/users/:id", get(get_user_handler).put(update_user_handler))
        .route("/health", get(health_handler))
        .route("/metrics", get(metrics_handler))
        .route_layer(middleware::from_fn(track_metrics))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
