//! Endpoint-class request throttling for convo services
//!
//! Fixed-window counters keyed by caller IP or, for verification
//! endpoints, by the verification identifier in the request body. The
//! limiter is composed upstream of authentication; exceeding a window
//! yields 429 with a Retry-After duration.

mod layer;
mod limiter;

pub use layer::{client_key, limit_by_ip, limit_verification, RateLimitLayerState};
pub use limiter::{EndpointClass, RateLimitConfig, RateLimiter, RetryAfter};
