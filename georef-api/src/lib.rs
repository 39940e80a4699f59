//! georef-api library - Regions and communes reference service
//!
//! Serves read-only geographic reference data loaded once at startup.
//! Regions and communes are looked up by numeric id or alias.

use axum::{
    http::{header, HeaderValue},
    middleware,
    routing::get,
    Router,
};
use georef_common::config::RateLimitConfig;
use governor::DefaultDirectRateLimiter;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, set_header::SetResponseHeaderLayer, trace::TraceLayer};

pub mod api;
pub mod data;

use data::GeoData;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Indices built at startup, read-only afterwards
    pub data: Arc<GeoData>,
    /// Global limiter for the data routes (None = unlimited)
    pub rate_limiter: Option<Arc<DefaultDirectRateLimiter>>,
}

impl AppState {
    /// Create new application state without rate limiting
    pub fn new(data: GeoData) -> Self {
        Self {
            data: Arc::new(data),
            rate_limiter: None,
        }
    }

    /// Attach a rate limiter built from `config`
    pub fn with_rate_limit(mut self, config: &RateLimitConfig) -> Self {
        self.rate_limiter = api::build_limiter(config).map(Arc::new);
        self
    }
}

/// Build application router
///
/// Data routes sit behind the rate limiter; `/health` does not.
/// Every response carries CORS and security headers.
pub fn build_router(state: AppState) -> Router {
    let data_routes = Router::new()
        .route("/", get(api::version))
        .route("/api/", get(api::api_index))
        .route("/api/regions", get(api::list_regions))
        .route("/api/regions/:identifier", get(api::get_region))
        .route("/api/communes/:identifier", get(api::get_communes))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            api::rate_limit_middleware,
        ));

    Router::new()
        .merge(data_routes)
        .merge(api::health_routes())
        .with_state(state)
        .layer(SetResponseHeaderLayer::overriding(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::X_FRAME_OPTIONS,
            HeaderValue::from_static("DENY"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::REFERRER_POLICY,
            HeaderValue::from_static("no-referrer"),
        ))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}
