//! Rate limiting middleware using governor and `tower_governor`.
//!
//! The Pi SDK payment callbacks are the only rate limited endpoints: each one
//! turns into a call against the Pi Platform API, which has its own quota.

use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

use axum::extract::ConnectInfo;
use axum::http::Request;
use governor::clock::QuantaInstant;
use governor::middleware::NoOpMiddleware;
use tower_governor::{GovernorError, GovernorLayer, governor::GovernorConfigBuilder};

// =============================================================================
// Client IP Key Extractor
// =============================================================================

/// Key extractor that prefers proxy headers and falls back to the peer address.
#[derive(Clone, Copy)]
pub struct ClientIpKeyExtractor;

impl ClientIpKeyExtractor {
    fn header_ip<T>(req: &Request<T>, name: &str) -> Option<IpAddr> {
        req.headers()
            .get(name)
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.split(',').next())
            .and_then(|s| s.trim().parse::<IpAddr>().ok())
    }
}

impl tower_governor::key_extractor::KeyExtractor for ClientIpKeyExtractor {
    type Key = IpAddr;

    fn extract<T>(&self, req: &Request<T>) -> Result<Self::Key, GovernorError> {
        // X-Forwarded-For holds a chain; the first entry is the client
        if let Some(ip) = Self::header_ip(req, "x-forwarded-for") {
            return Ok(ip);
        }

        if let Some(ip) = Self::header_ip(req, "x-real-ip") {
            return Ok(ip);
        }

        // Direct connection (requires `into_make_service_with_connect_info`)
        req.extensions()
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| addr.ip())
            .ok_or(GovernorError::UnableToExtractKey)
    }
}

// =============================================================================
// Rate Limiter Configuration
// =============================================================================

/// Rate limiter layer type for Axum.
pub type RateLimiterLayer =
    GovernorLayer<ClientIpKeyExtractor, NoOpMiddleware<QuantaInstant>, axum::body::Body>;

/// Create rate limiter for payment callbacks: ~30 requests per minute per IP.
///
/// Configuration: 1 request every 2 seconds (replenish), burst of 10.
///
/// # Panics
///
/// This function will not panic. The configuration uses only valid positive
/// integers (`per_second(2)` and `burst_size(10)`), which are always accepted
/// by `GovernorConfigBuilder`.
#[must_use]
pub fn payments_rate_limiter() -> RateLimiterLayer {
    let config = GovernorConfigBuilder::default()
        .key_extractor(ClientIpKeyExtractor)
        .per_second(2) // Replenish 1 token every 2 seconds
        .burst_size(10)
        .finish()
        .expect("rate limiter config with per_second(2) and burst_size(10) is valid");
    GovernorLayer::new(Arc::new(config))
}
