//! Dual-auth orchestrator
//!
//! One middleware entry point for every protected route group. The
//! credential scheme is picked from the headers alone; a failed attempt
//! never falls through to the other scheme, so failure behavior cannot be
//! used as an oracle to probe which credential a request was missing.

use std::sync::Arc;

use axum::{
    body::Body,
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::Response,
};

use crate::error::AuthError;
use crate::hmac::{HmacValidator, X_SIGNATURE, X_TIMESTAMP, X_UID};
use crate::jwt::JwtValidator;

/// Largest body accepted on the signed service-to-service path. Service
/// callers send small JSON payloads; anything bigger cannot be buffered
/// for digest computation.
const MAX_SIGNED_BODY_BYTES: usize = 2 * 1024 * 1024;

/// Immutable per-process validator state, cheap to clone into the router
#[derive(Clone)]
pub struct AuthState {
    pub hmac: Arc<HmacValidator>,
    pub jwt: Arc<JwtValidator>,
}

impl AuthState {
    pub fn new(hmac: HmacValidator, jwt: JwtValidator) -> Self {
        Self {
            hmac: Arc::new(hmac),
            jwt: Arc::new(jwt),
        }
    }
}

/// Which credential scheme a request presents.
///
/// Kept as a tagged union and matched exhaustively so a future scheme is
/// a compiler-checked addition, not another nested conditional.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Credential {
    /// Full HMAC credential set: signature + uid + timestamp headers
    Hmac,
    /// An Authorization header, whatever its scheme
    Bearer,
    /// Nothing usable
    None,
}

impl Credential {
    /// Detect the scheme. The HMAC set takes precedence when both are
    /// present; a partial HMAC set does not count as one.
    pub fn detect(headers: &HeaderMap) -> Self {
        let hmac_set = headers.contains_key(X_SIGNATURE)
            && headers.contains_key(X_UID)
            && headers.contains_key(X_TIMESTAMP);

        if hmac_set {
            Credential::Hmac
        } else if headers.contains_key(AUTHORIZATION) {
            Credential::Bearer
        } else {
            Credential::None
        }
    }
}

/// Authentication middleware for protected route groups.
///
/// On success the verified [`crate::UserContext`] is inserted into the
/// request extensions; handlers consume it through
/// [`crate::CurrentUser`] and never parse credential headers themselves.
pub async fn authenticate(
    State(state): State<AuthState>,
    request: Request,
    next: Next,
) -> Result<Response, AuthError> {
    match Credential::detect(request.headers()) {
        Credential::Hmac => {
            let (parts, body) = request.into_parts();

            // The signature covers the body digest, so the raw bytes are
            // buffered here and handed back to the handler unchanged.
            let bytes = axum::body::to_bytes(body, MAX_SIGNED_BODY_BYTES)
                .await
                .map_err(|e| {
                    tracing::warn!(error = %e, "Failed to buffer signed request body");
                    AuthError::InvalidSignature
                })?;

            let context = state.hmac.verify(
                parts.method.as_str(),
                parts.uri.path(),
                parts.uri.query().unwrap_or(""),
                &bytes,
                &parts.headers,
            )?;

            let mut request = Request::from_parts(parts, Body::from(bytes));
            request.extensions_mut().insert(context);
            Ok(next.run(request).await)
        }
        Credential::Bearer => {
            let context = state.jwt.verify_bearer(request.headers())?;

            let mut request = request;
            request.extensions_mut().insert(context);
            Ok(next.run(request).await)
        }
        Credential::None => Err(AuthError::MissingCredential),
    }
}
