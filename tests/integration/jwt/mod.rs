//! Bearer-token requests against the protected routes

use axum::{body::Body, http::Request};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde_json::json;
use tower::ServiceExt;

use crate::common::{
    bearer_request, body_json, make_token, test_router, OTHER_PRIVATE_PEM, TEST_PRIVATE_PEM,
    TEST_PUBLIC_PEM, TEST_UID,
};

#[tokio::test]
async fn test_valid_token_yields_identity() {
    let app = test_router();
    let token = make_token(
        TEST_PRIVATE_PEM,
        3600,
        json!({"uid": TEST_UID, "username": "kim@example.com"}),
    );

    let response = app.oneshot(bearer_request(&token)).await.unwrap();
    assert_eq!(response.status(), 200);

    let body = body_json(response).await;
    assert_eq!(body["userId"], TEST_UID);
    assert_eq!(body["username"], "kim@example.com");
}

#[tokio::test]
async fn test_expired_token_is_rejected() {
    let app = test_router();
    let token = make_token(TEST_PRIVATE_PEM, -10, json!({"uid": TEST_UID}));

    let response = app.oneshot(bearer_request(&token)).await.unwrap();
    assert_eq!(response.status(), 401);

    let body = body_json(response).await;
    assert_eq!(body["code"], "TOKEN_EXPIRED");
    assert_eq!(body["message"], "Authentication failed");
}

#[tokio::test]
async fn test_wrong_algorithm_is_rejected() {
    let app = test_router();
    // HS256 token keyed on the public PEM bytes, the classic confusion attack
    let token = encode(
        &Header::new(Algorithm::HS256),
        &json!({"uid": TEST_UID, "exp": 4102444800i64}),
        &EncodingKey::from_secret(TEST_PUBLIC_PEM.as_bytes()),
    )
    .unwrap();

    let response = app.oneshot(bearer_request(&token)).await.unwrap();
    assert_eq!(response.status(), 401);
    assert_eq!(body_json(response).await["code"], "UNSUPPORTED_ALGORITHM");
}

#[tokio::test]
async fn test_token_signed_with_other_key_is_rejected() {
    let app = test_router();
    let token = make_token(OTHER_PRIVATE_PEM, 3600, json!({"uid": TEST_UID}));

    let response = app.oneshot(bearer_request(&token)).await.unwrap();
    assert_eq!(response.status(), 401);
    assert_eq!(body_json(response).await["code"], "INVALID_SIGNATURE");
}

#[tokio::test]
async fn test_missing_identity_claim_is_rejected() {
    let app = test_router();
    // Valid signature and exp, but no nested identity object
    let now = chrono::Utc::now().timestamp();
    let token = encode(
        &Header::new(Algorithm::ES256),
        &json!({"sub": TEST_UID, "iat": now, "exp": now + 3600}),
        &EncodingKey::from_ec_pem(TEST_PRIVATE_PEM.as_bytes()).unwrap(),
    )
    .unwrap();

    let response = app.oneshot(bearer_request(&token)).await.unwrap();
    assert_eq!(response.status(), 401);
    assert_eq!(body_json(response).await["code"], "MISSING_CLAIM");
}

#[tokio::test]
async fn test_malformed_authorization_header_is_rejected() {
    let app = test_router();
    let request = Request::builder()
        .uri("/v1/account")
        .header("authorization", "Token abc")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), 401);
    assert_eq!(body_json(response).await["code"], "MALFORMED_AUTH_HEADER");
}
