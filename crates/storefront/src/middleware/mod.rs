//! HTTP middleware stack for storefront.
//!
//! # Middleware Order (bottom to top in Router)
//!
//! 1. Sentry layer (capture errors)
//! 2. Request ID (tower-http `SetRequestIdLayer`, then `TraceLayer` with the
//!    ID on the span, then `PropagateRequestIdLayer`)
//! 3. Session layer (tower-sessions with in-memory store)
//! 4. Security headers (CSP, etc.)
//! 5. Rate limiting (governor, payment callbacks only)

pub mod rate_limit;
pub mod request_id;
pub mod security_headers;
pub mod session;
pub mod wallet;

pub use rate_limit::payments_rate_limiter;
pub use request_id::with_request_id;
pub use security_headers::security_headers_middleware;
pub use session::create_session_layer;
pub use wallet::{OptionalWallet, RequireWallet, clear_pi_user, session_keys, set_pi_user};
