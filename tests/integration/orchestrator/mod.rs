//! Credential selection across the two trust mechanisms

use convo_auth::{X_SIGNATURE, X_TIMESTAMP, X_UID};
use serde_json::json;
use tower::ServiceExt;

use crate::common::{
    body_json, make_token, signed_request, test_router, TEST_PRIVATE_PEM, TEST_UID,
};

const OTHER_UID: &str = "00000000-0000-0000-0000-000000000001";

#[tokio::test]
async fn test_no_credentials_is_rejected() {
    let app = test_router();
    let request = axum::http::Request::builder()
        .uri("/v1/account")
        .body(axum::body::Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), 401);
    assert_eq!(body_json(response).await["code"], "MISSING_CREDENTIAL");
}

#[tokio::test]
async fn test_signature_headers_take_precedence_over_bearer() {
    let app = test_router();
    let token = make_token(TEST_PRIVATE_PEM, 3600, json!({"uid": OTHER_UID}));

    let mut request = signed_request("GET", "/v1/account", b"{}", TEST_UID);
    request
        .headers_mut()
        .insert("authorization", format!("Bearer {token}").parse().unwrap());

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), 200);
    // The signed identity wins, not the token's
    assert_eq!(body_json(response).await["userId"], TEST_UID);
}

#[tokio::test]
async fn test_failed_signature_does_not_fall_through_to_bearer() {
    let app = test_router();
    let token = make_token(TEST_PRIVATE_PEM, 3600, json!({"uid": OTHER_UID}));

    let mut request = signed_request("GET", "/v1/account", b"{}", TEST_UID);
    request
        .headers_mut()
        .insert(X_SIGNATURE, "sha256=deadbeef".parse().unwrap());
    request
        .headers_mut()
        .insert("authorization", format!("Bearer {token}").parse().unwrap());

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), 401);
    assert_eq!(body_json(response).await["code"], "INVALID_SIGNATURE");
}

#[tokio::test]
async fn test_partial_signature_set_falls_back_to_bearer() {
    let app = test_router();
    let token = make_token(TEST_PRIVATE_PEM, 3600, json!({"uid": OTHER_UID}));

    // Only two of the three signature headers present, so this is not a
    // signed request at all and the bearer token is the credential.
    let request = axum::http::Request::builder()
        .uri("/v1/account")
        .header(X_UID, TEST_UID)
        .header(X_TIMESTAMP, chrono::Utc::now().timestamp().to_string())
        .header("authorization", format!("Bearer {token}"))
        .body(axum::body::Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), 200);
    assert_eq!(body_json(response).await["userId"], OTHER_UID);
}

#[tokio::test]
async fn test_health_route_is_not_protected() {
    let app = test_router();
    let request = axum::http::Request::builder()
        .uri("/health")
        .body(axum::body::Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), 200);
}
