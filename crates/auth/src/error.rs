//! Authentication errors
//!
//! Every variant maps to 401 with a machine-readable code. The response
//! message is the same generic string for all variants; the detailed
//! failure reason goes to the logs, never to the caller.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Authentication error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthError {
    /// A required credential header is absent, or no credential at all
    MissingCredential,
    /// Signature mismatch, unverifiable signature, or unreadable signed body
    InvalidSignature,
    /// The verified identity field is not a valid UUID
    InvalidIdentity,
    /// Signed timestamp outside the configured freshness window
    StaleTimestamp,
    /// No Authorization header on a bearer-token request
    MissingAuthHeader,
    /// Authorization header present but not `Bearer <token>`
    MalformedAuthHeader,
    /// Token declares an algorithm other than the configured ES256
    UnsupportedAlgorithm,
    /// Token declares a key id other than the configured one
    UnknownKeyId,
    /// Token `exp` is in the past
    TokenExpired,
    /// Expected claim (exp, or the nested identity object) is absent
    MissingClaim,
}

impl AuthError {
    /// Machine-readable error code carried in the response body
    pub fn code(&self) -> &'static str {
        match self {
            AuthError::MissingCredential => "MISSING_CREDENTIAL",
            AuthError::InvalidSignature => "INVALID_SIGNATURE",
            AuthError::InvalidIdentity => "INVALID_IDENTITY",
            AuthError::StaleTimestamp => "STALE_TIMESTAMP",
            AuthError::MissingAuthHeader => "MISSING_AUTH_HEADER",
            AuthError::MalformedAuthHeader => "MALFORMED_AUTH_HEADER",
            AuthError::UnsupportedAlgorithm => "UNSUPPORTED_ALGORITHM",
            AuthError::UnknownKeyId => "UNKNOWN_KEY_ID",
            AuthError::TokenExpired => "TOKEN_EXPIRED",
            AuthError::MissingClaim => "MISSING_CLAIM",
        }
    }
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

impl std::error::Error for AuthError {}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        tracing::debug!(code = self.code(), "Authentication rejected");

        let body = Json(json!({
            "code": self.code(),
            "message": "Authentication failed",
        }));

        (StatusCode::UNAUTHORIZED, body).into_response()
    }
}
