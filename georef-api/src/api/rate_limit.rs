//! Global request rate limiting
//!
//! A single token bucket shared by every client. Requests over quota get a
//! 429 with the shared error body. Disabled when the configured rate is 0.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use georef_common::config::RateLimitConfig;
use governor::{DefaultDirectRateLimiter, Quota, RateLimiter};
use std::num::NonZeroU32;
use tracing::warn;

use super::ApiError;
use crate::AppState;

/// Build the limiter for a config, or `None` when rate limiting is off
///
/// A burst of 0 is treated as a burst equal to the sustained rate.
pub fn build_limiter(config: &RateLimitConfig) -> Option<DefaultDirectRateLimiter> {
    let rate = NonZeroU32::new(config.requests_per_second)?;
    let burst = NonZeroU32::new(config.burst).unwrap_or(rate);

    Some(RateLimiter::direct(Quota::per_second(rate).allow_burst(burst)))
}

/// Rate limiting middleware
///
/// Applied to the data routes only; `/health` bypasses it.
pub async fn rate_limit_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    if let Some(limiter) = &state.rate_limiter {
        if limiter.check().is_err() {
            warn!("Rate limit exceeded for {}", request.uri().path());
            return ApiError::TooManyRequests.into_response();
        }
    }

    next.run(request).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_rate_disables_limiter() {
        let config = RateLimitConfig {
            requests_per_second: 0,
            burst: 10,
        };
        assert!(build_limiter(&config).is_none());
    }

    #[test]
    fn test_burst_is_enforced() {
        let config = RateLimitConfig {
            requests_per_second: 1,
            burst: 2,
        };
        let limiter = build_limiter(&config).unwrap();

        assert!(limiter.check().is_ok());
        assert!(limiter.check().is_ok());
        assert!(limiter.check().is_err());
    }
}
