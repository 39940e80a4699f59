//! HTTP API handlers for georef-api

pub mod communes;
pub mod error;
pub mod health;
pub mod rate_limit;
pub mod regions;

pub use communes::get_communes;
pub use error::ApiError;
pub use health::{api_index, health_routes, version};
pub use rate_limit::{build_limiter, rate_limit_middleware};
pub use regions::{get_region, list_regions};
