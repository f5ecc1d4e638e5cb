//! HMAC canonical validator for service-to-service requests
//!
//! Verifies `HMAC-SHA256(secret, canonical)` carried in the signature
//! header as `sha256=<hex>`. Pure bounded-time computation; the shared
//! secret is read-only after construction.

use ::hmac::{Hmac, Mac};
use axum::http::HeaderMap;
use chrono::Utc;
use sha2::Sha256;
use uuid::Uuid;

use crate::canonical::CanonicalMessage;
use crate::config::HmacConfig;
use crate::context::UserContext;
use crate::error::AuthError;

type HmacSha256 = Hmac<Sha256>;

/// Signed headers. All three are required; a missing one is an immediate
/// rejection, never defaulted.
pub const X_SIGNATURE: &str = "x-signature";
pub const X_UID: &str = "x-uid";
pub const X_TIMESTAMP: &str = "x-timestamp";

/// Unsigned profile headers. Advisory display metadata only - they are
/// not part of the canonical message and carry no trust.
pub const X_USERNAME: &str = "x-username";
pub const X_DISPLAY_NAME: &str = "x-display-name";
pub const X_SOCIAL_NAME: &str = "x-social-name";
pub const X_SYSTEM_ROLE: &str = "x-system-role";

const SIGNATURE_PREFIX: &str = "sha256=";

/// Compute the signature header value for a canonical message.
///
/// Used by internal callers signing outbound requests and by tests; the
/// verifier recomputes exactly this value.
pub fn sign_canonical(secret: &[u8], message: &CanonicalMessage<'_>) -> String {
    let mut mac = HmacSha256::new_from_slice(secret).expect("HMAC accepts any key length");
    mac.update(message.render().as_bytes());
    format!("{}{}", SIGNATURE_PREFIX, hex::encode(mac.finalize().into_bytes()))
}

/// Verifies signed service-to-service requests against the shared secret
pub struct HmacValidator {
    config: HmacConfig,
}

impl HmacValidator {
    pub fn new(config: HmacConfig) -> Self {
        Self { config }
    }

    /// Verify one request. `query` is the raw query string and `body` the
    /// raw body bytes - both exactly as received on the wire.
    pub fn verify(
        &self,
        method: &str,
        path: &str,
        query: &str,
        body: &[u8],
        headers: &HeaderMap,
    ) -> Result<UserContext, AuthError> {
        let signature = required_header(headers, X_SIGNATURE)?;
        let uid = required_header(headers, X_UID)?;
        let timestamp = required_header(headers, X_TIMESTAMP)?;

        let message = CanonicalMessage {
            method,
            path,
            query,
            body,
            uid,
            timestamp,
        };
        self.verify_signature(signature, &message)?;
        self.verify_freshness(timestamp)?;

        let user_id = Uuid::parse_str(uid).map_err(|_| {
            tracing::warn!(uid, "Signed request carried a malformed uid");
            AuthError::InvalidIdentity
        })?;

        let mut context = UserContext::new(user_id);
        context.username = optional_header(headers, X_USERNAME);
        context.display_name = optional_header(headers, X_DISPLAY_NAME);
        context.social_name = optional_header(headers, X_SOCIAL_NAME);
        context.system_role = optional_header(headers, X_SYSTEM_ROLE);

        Ok(context)
    }

    fn verify_signature(
        &self,
        supplied: &str,
        message: &CanonicalMessage<'_>,
    ) -> Result<(), AuthError> {
        let hex_mac = supplied
            .strip_prefix(SIGNATURE_PREFIX)
            .ok_or(AuthError::InvalidSignature)?;
        let supplied_mac = hex::decode(hex_mac).map_err(|_| AuthError::InvalidSignature)?;

        let mut mac = HmacSha256::new_from_slice(self.config.secret())
            .expect("HMAC accepts any key length");
        mac.update(message.render().as_bytes());

        // verify_slice is constant-time
        mac.verify_slice(&supplied_mac).map_err(|_| {
            tracing::debug!(
                method = message.method,
                path = message.path,
                "Canonical signature mismatch"
            );
            AuthError::InvalidSignature
        })
    }

    /// Reject timestamps outside the configured window. With the window
    /// disabled any syntactically valid timestamp is accepted.
    fn verify_freshness(&self, timestamp: &str) -> Result<(), AuthError> {
        let Some(window) = self.config.freshness() else {
            return Ok(());
        };

        let claimed: i64 = timestamp.parse().map_err(|_| AuthError::StaleTimestamp)?;
        let skew = (Utc::now().timestamp() - claimed).unsigned_abs();
        if skew > window.as_secs() {
            tracing::warn!(claimed, skew, "Signed timestamp outside freshness window");
            return Err(AuthError::StaleTimestamp);
        }
        Ok(())
    }
}

/// A required header that is missing or not valid UTF-8 counts as absent
fn required_header<'a>(headers: &'a HeaderMap, name: &str) -> Result<&'a str, AuthError> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .ok_or(AuthError::MissingCredential)
}

fn optional_header(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string())
}
