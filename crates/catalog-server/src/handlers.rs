//! Service endpoints outside the versioned API.

use axum::{
    Json,
    extract::State,
    http::{StatusCode, header},
    response::IntoResponse,
};
use serde::Serialize;
use serde_json::json;

use crate::server::AppState;

#[derive(Serialize)]
pub struct HealthResponse<'a> {
    status: &'a str,
}

pub async fn root() -> impl IntoResponse {
    let body = json!({
        "service": "Catalog API",
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    });
    (StatusCode::OK, Json(body))
}

pub async fn healthz() -> impl IntoResponse {
    (StatusCode::OK, Json(HealthResponse { status: "ok" }))
}

/// Ready once the process serves requests. The cache is optional, so its
/// state is reported but never makes the instance unready.
pub async fn readyz(State(state): State<AppState>) -> impl IntoResponse {
    let cache = state.cache.mode();
    let redis = match cache {
        "redis" => Some(state.cache.backend().is_redis_available().await),
        _ => None,
    };
    let body = json!({
        "status": "ready",
        "cache": cache,
        "redisAvailable": redis,
    });
    (StatusCode::OK, Json(body))
}

pub async fn metrics() -> impl IntoResponse {
    match crate::metrics::render_metrics() {
        Some(text) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
            text,
        )
            .into_response(),
        None => (StatusCode::NOT_FOUND, "metrics exporter not installed").into_response(),
    }
}
