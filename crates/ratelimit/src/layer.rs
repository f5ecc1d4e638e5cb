//! Axum middleware wiring for the limiter

use std::sync::Arc;

use axum::{
    body::Body,
    extract::{Request, State},
    http::{HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::limiter::{EndpointClass, RateLimiter, RetryAfter};

/// Bodies larger than this are not inspected for a verification id
const MAX_INSPECTED_BODY_BYTES: usize = 64 * 1024;

/// State for one throttled route group
#[derive(Clone)]
pub struct RateLimitLayerState {
    pub limiter: Arc<RateLimiter>,
    pub class: EndpointClass,
}

/// Caller key for IP-keyed classes. Proxy headers first, then unknown;
/// unknown callers share one bucket rather than bypassing the limiter.
pub fn client_key(headers: &HeaderMap) -> String {
    if let Some(forwarded) = headers.get("x-forwarded-for") {
        if let Ok(value) = forwarded.to_str() {
            if let Some(first) = value.split(',').next() {
                return first.trim().to_string();
            }
        }
    }
    if let Some(real_ip) = headers.get("x-real-ip") {
        if let Ok(value) = real_ip.to_str() {
            return value.to_string();
        }
    }
    "unknown".to_string()
}

fn too_many_requests(retry: RetryAfter) -> Response {
    let mut response = (
        StatusCode::TOO_MANY_REQUESTS,
        Json(json!({
            "code": "RATE_LIMIT_EXCEEDED",
            "message": "Rate limit exceeded",
        })),
    )
        .into_response();

    let secs = retry.0.as_secs().max(1);
    if let Ok(value) = secs.to_string().parse() {
        response.headers_mut().insert("retry-after", value);
    }
    response
}

/// Throttle by caller IP (login, signup, password-reset classes)
pub async fn limit_by_ip(
    State(state): State<RateLimitLayerState>,
    request: Request,
    next: Next,
) -> Response {
    let key = client_key(request.headers());
    match state.limiter.check(state.class, &key) {
        Ok(()) => next.run(request).await,
        Err(retry) => too_many_requests(retry),
    }
}

/// Throttle verification endpoints by the verification identifier in the
/// request body, falling back to the caller IP when absent
pub async fn limit_verification(
    State(state): State<RateLimitLayerState>,
    request: Request,
    next: Next,
) -> Response {
    let (parts, body) = request.into_parts();

    let bytes = match axum::body::to_bytes(body, MAX_INSPECTED_BODY_BYTES).await {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::warn!(error = %e, "Failed to buffer verification body");
            return StatusCode::BAD_REQUEST.into_response();
        }
    };

    let key = serde_json::from_slice::<serde_json::Value>(&bytes)
        .ok()
        .and_then(|v| v.get("verificationId").and_then(|id| id.as_str().map(String::from)))
        .unwrap_or_else(|| client_key(&parts.headers));

    let request = Request::from_parts(parts, Body::from(bytes));
    match state.limiter.check(state.class, &key) {
        Ok(()) => next.run(request).await,
        Err(retry) => too_many_requests(retry),
    }
}
