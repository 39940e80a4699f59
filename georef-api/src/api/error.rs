//! HTTP error mapping
//!
//! Lookup misses are ordinary outcomes; they become a 404 with the shared
//! error body rather than propagating as faults.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use georef_common::api::ErrorResponse;

/// Errors surfaced by the query handlers
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// Identifier did not resolve, or resolved to an id with no data
    RegionNotFound,
    /// Global rate limit exhausted
    TooManyRequests,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::RegionNotFound => (StatusCode::NOT_FOUND, ErrorResponse::region_not_found()),
            ApiError::TooManyRequests => (
                StatusCode::TOO_MANY_REQUESTS,
                ErrorResponse::too_many_requests(),
            ),
        };

        (status, Json(body)).into_response()
    }
}
