//! Request metrics middleware.

use std::time::Instant;

use axum::{
    extract::{MatchedPath, Request},
    middleware::Next,
    response::Response,
};

use crate::telemetry::RequestMetrics;

/// Records latency and status for each routed request, keyed by the
/// matched route template rather than the concrete path.
pub async fn track_metrics(req: Request, next: Next) -> Response {
    let start = Instant::now();
    let path = match req.extensions().get::<MatchedPath>() {
        Some(matched) => matched.as_str().to_owned(),
        None => req.uri().path().to_owned(),
    };
    let method = req.method().clone();

    let response = next.run(req).await;

    RequestMetrics::observe(
        &path,
        method.as_str(),
        response.status().as_u16(),
        start.elapsed(),
    );
    response
}
