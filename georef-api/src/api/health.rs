//! Health check and service metadata endpoints

use axum::{
    http::{header, StatusCode},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use georef_common::api::{HealthResponse, VersionResponse};

use crate::AppState;

/// Module name reported by the health endpoint
pub const MODULE_NAME: &str = "georef-api";

/// GET /health
///
/// Health check endpoint for monitoring. Not rate limited.
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse::ok(MODULE_NAME, env!("CARGO_PKG_VERSION")))
}

/// GET /
pub async fn version() -> Json<VersionResponse> {
    Json(VersionResponse {
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// GET /api/
///
/// 302 Found to the region listing.
pub async fn api_index() -> impl IntoResponse {
    (StatusCode::FOUND, [(header::LOCATION, "/api/regions")])
}

/// Build health check routes
pub fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
