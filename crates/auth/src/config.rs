//! Validator configuration
//!
//! Configuration objects are constructed once at process start and are
//! read-only thereafter; validators receive them by constructor
//! injection. A key that fails to parse is fatal - a service that cannot
//! verify tokens must never start and silently accept unverifiable ones.

use std::time::Duration;

use jsonwebtoken::DecodingKey;

use crate::jwks;

/// Default claim key under which identity fields are nested
pub const DEFAULT_CLAIM_KEY: &str = "urn:convo:identity";

/// Startup-time key material errors. Always fatal.
#[derive(Debug, thiserror::Error)]
pub enum KeyError {
    #[error("invalid EC public key PEM: {0}")]
    InvalidPem(#[from] jsonwebtoken::errors::Error),

    #[error("failed to fetch remote key set: {0}")]
    JwksFetch(String),

    #[error("no usable key in remote key set")]
    NoMatchingKey,
}

/// Shared-secret configuration for the service-to-service HMAC path
#[derive(Clone)]
pub struct HmacConfig {
    secret: Vec<u8>,
    freshness: Option<Duration>,
}

impl HmacConfig {
    /// `freshness` bounds the accepted clock skew of the signed timestamp
    /// in both directions; `None` disables the check and accepts replays
    /// of previously signed requests verbatim.
    pub fn new(secret: impl Into<Vec<u8>>, freshness: Option<Duration>) -> Self {
        Self {
            secret: secret.into(),
            freshness,
        }
    }

    pub fn secret(&self) -> &[u8] {
        &self.secret
    }

    pub fn freshness(&self) -> Option<Duration> {
        self.freshness
    }
}

impl std::fmt::Debug for HmacConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Never print the secret
        f.debug_struct("HmacConfig")
            .field("freshness", &self.freshness)
            .finish_non_exhaustive()
    }
}

/// Parsed verification material for the bearer-token path
#[derive(Clone)]
pub struct JwtConfig {
    decoding_key: DecodingKey,
    expected_kid: Option<String>,
    claim_key: String,
}

impl JwtConfig {
    /// Parse an EC public key PEM once at startup
    pub fn from_pem(
        pem: &[u8],
        claim_key: impl Into<String>,
        expected_kid: Option<String>,
    ) -> Result<Self, KeyError> {
        let decoding_key = DecodingKey::from_ec_pem(pem)?;
        Ok(Self {
            decoding_key,
            expected_kid,
            claim_key: claim_key.into(),
        })
    }

    /// Fetch a remote key set once at startup and select the verification
    /// key. Verification itself never performs I/O.
    pub async fn from_jwks(
        jwks_url: &str,
        claim_key: impl Into<String>,
        expected_kid: Option<String>,
    ) -> Result<Self, KeyError> {
        let decoding_key = jwks::fetch_decoding_key(jwks_url, expected_kid.as_deref()).await?;
        Ok(Self {
            decoding_key,
            expected_kid,
            claim_key: claim_key.into(),
        })
    }

    pub fn decoding_key(&self) -> &DecodingKey {
        &self.decoding_key
    }

    pub fn expected_kid(&self) -> Option<&str> {
        self.expected_kid.as_deref()
    }

    pub fn claim_key(&self) -> &str {
        &self.claim_key
    }
}

impl std::fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtConfig")
            .field("expected_kid", &self.expected_kid)
            .field("claim_key", &self.claim_key)
            .finish_non_exhaustive()
    }
}
