//! API Handlers
//!
//! HTTP request handlers for each profile endpoint.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use metrics_exporter_prometheus::PrometheusHandle;

use crate::error::{ProfileError, Result};
use crate::models::{HealthResponse, SearchQuery, User, UserRequest};
use crate::service::ProfileService;
use crate::telemetry::HealthMetrics;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// The single service instance
    pub service: Arc<ProfileService>,
    /// Prometheus render handle, when a recorder is installed
    pub metrics: Option<PrometheusHandle>,
}

impl AppState {
    /// Creates a new AppState around the given service.
    pub fn new(service: ProfileService) -> Self {
        Self {
            service: Arc::new(service),
            metrics: None,
        }
    }

    /// Attaches the handle used to serve `/metrics`.
    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }
}

/// Parses a path id, accepting only plain non-negative integers.
fn parse_id(raw: &str) -> Result<i64> {
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ProfileError::InvalidId(raw.to_string()));
    }
    raw.parse()
        .map_err(|_| ProfileError::InvalidId(raw.to_string()))
}

fn decode_body(payload: std::result::Result<Json<UserRequest>, JsonRejection>) -> Result<UserRequest> {
    payload
        .map(|Json(req)| req)
        .map_err(|rejection| ProfileError::Decode(rejection.body_text()))
}

/// Handler for POST /users
pub async fn create_user_handler(
    State(state): State<AppState>,
    payload: std::result::Result<Json<UserRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<User>)> {
    let request = decode_body(payload)?;
    let user = state.service.create(request).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// Handler for GET /users/:id
pub async fn get_user_handler(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<Json<User>> {
    let id = parse_id(&raw_id)?;
    Ok(Json(state.service.get(id).await?))
}

/// Handler for GET /users
pub async fn list_users_handler(State(state): State<AppState>) -> Result<Json<Vec<User>>> {
    Ok(Json(state.service.list().await?))
}

/// Handler for PUT /users/:id
///
/// The id is checked before the body, so a bad id wins over a bad body.
pub async fn update_user_handler(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    payload: std::result::Result<Json<UserRequest>, JsonRejection>,
) -> Result<Json<User>> {
    let id = parse_id(&raw_id)?;
    let request = decode_body(payload)?;
    Ok(Json(state.service.update(id, request).await?))
}

/// Handler for GET /users/search?q=
pub async fn search_users_handler(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Vec<User>>> {
    let term = query.q.unwrap_or_default();
    Ok(Json(state.service.search(&term).await?))
}

/// Handler for GET /health
///
/// Refreshes the connection and cache gauges as a side effect.
pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    let active_connections = state.service.store().active_connections();
    let cache_entries = state.service.cache().len().await;

    if let Some(count) = active_connections {
        HealthMetrics::set_active_connections(count);
    }
    HealthMetrics::set_cache_entries(cache_entries);

    Json(HealthResponse::healthy(
        active_connections,
        cache_entries,
        state.service.requests_served(),
    ))
}

/// Handler for GET /metrics
pub async fn metrics_handler(State(state): State<AppState>) -> Response {
    match &state.metrics {
        Some(handle) => (
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
            handle.render(),
        )
            .into_response(),
        None => (StatusCode::NOT_FOUND, "metrics recorder not installed").into_response(),
    }
}
