//! Limiter middleware over a minimal router

use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    middleware,
    routing::post,
    Router,
};
use convo_ratelimit::{
    limit_by_ip, limit_verification, EndpointClass, RateLimitConfig, RateLimitLayerState,
    RateLimiter,
};
use tower::ServiceExt;

use crate::common::body_json;

fn throttled_router(class: EndpointClass, max_requests: u32) -> Router {
    let state = RateLimitLayerState {
        limiter: Arc::new(RateLimiter::new(RateLimitConfig {
            max_requests,
            window: Duration::from_secs(60),
        })),
        class,
    };
    let routes = Router::new().route("/v1/login", post(|| async { "ok" }));
    match class {
        EndpointClass::Verification => {
            routes.layer(middleware::from_fn_with_state(state, limit_verification))
        }
        _ => routes.layer(middleware::from_fn_with_state(state, limit_by_ip)),
    }
}

fn login_request(ip: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/v1/login")
        .header("x-forwarded-for", ip)
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn test_requests_over_limit_get_429() {
    let app = throttled_router(EndpointClass::Login, 2);

    for _ in 0..2 {
        let response = app.clone().oneshot(login_request("198.51.100.7", "")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    let response = app.oneshot(login_request("198.51.100.7", "")).await.unwrap();
    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
    assert!(response.headers().contains_key("retry-after"));

    let body = body_json(response).await;
    assert_eq!(body["code"], "RATE_LIMIT_EXCEEDED");
}

#[tokio::test]
async fn test_other_callers_are_unaffected() {
    let app = throttled_router(EndpointClass::Login, 1);

    let response = app.clone().oneshot(login_request("198.51.100.7", "")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let response = app.clone().oneshot(login_request("198.51.100.7", "")).await.unwrap();
    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);

    let response = app.oneshot(login_request("203.0.113.4", "")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_verification_is_keyed_by_identifier() {
    let app = throttled_router(EndpointClass::Verification, 1);

    // Same verification id from different IPs shares one bucket
    let body = r#"{"verificationId":"v-42"}"#;
    let response = app.clone().oneshot(login_request("198.51.100.7", body)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let response = app.clone().oneshot(login_request("203.0.113.4", body)).await.unwrap();
    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);

    // A different id is a fresh bucket
    let other = r#"{"verificationId":"v-43"}"#;
    let response = app.oneshot(login_request("198.51.100.7", other)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_verification_without_identifier_falls_back_to_ip() {
    let app = throttled_router(EndpointClass::Verification, 1);

    let response = app.clone().oneshot(login_request("198.51.100.7", "{}")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let response = app.oneshot(login_request("198.51.100.7", "{}")).await.unwrap();
    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
}
