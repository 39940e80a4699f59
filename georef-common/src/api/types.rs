//! Shared API request/response types
//!
//! Response bodies that are not data records: errors, health and version.

use serde::{Deserialize, Serialize};

// ========================================
// Error Response Types
// ========================================

/// Error body returned for every non-2xx response
///
/// # Examples
///
/// ```
/// use georef_common::api::types::ErrorResponse;
///
/// let error = ErrorResponse::region_not_found();
/// assert_eq!(error.error, "Region not found");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ErrorResponse {
    /// Human-readable error message
    pub error: String,
}

impl ErrorResponse {
    /// Create new error response
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }

    /// The 404 body shared by region and commune lookups
    pub fn region_not_found() -> Self {
        Self::new("Region not found")
    }

    /// The 429 body returned when the rate limit is exhausted
    pub fn too_many_requests() -> Self {
        Self::new("Too many requests")
    }
}

// ========================================
// Service Metadata Types
// ========================================

/// Health check response
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub module: String,
    pub version: String,
}

impl HealthResponse {
    pub fn ok(module: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            status: "ok".to_string(),
            module: module.into(),
            version: version.into(),
        }
    }
}

/// Root endpoint response
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct VersionResponse {
    pub version: String,
}

// ========================================
// Tests
// ========================================
