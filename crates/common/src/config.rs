//! Configuration management following 12-factor app principles
//!
//! All configuration is loaded from environment variables to ensure
//! clean separation between code and config. Everything here is read
//! once at process start and immutable afterwards.

use anyhow::Result;
use std::env;

#[derive(Clone)]
pub struct Config {
    /// Shared secret for service-to-service HMAC signatures
    pub hmac_secret: String,

    /// Timestamp freshness window for signed requests, in seconds.
    /// `0` disables the check entirely.
    pub hmac_freshness_secs: u64,

    /// PEM-encoded EC public key for bearer token verification.
    /// Optional only when `jwt_jwks_url` is set.
    pub jwt_public_key: Option<String>,

    /// Remote key-set URL, fetched once at startup
    pub jwt_jwks_url: Option<String>,

    /// Expected key identifier; tokens declaring a different `kid` are rejected
    pub jwt_key_id: Option<String>,

    /// Claim key under which identity fields are nested
    pub jwt_claim_key: String,

    /// Runtime configuration
    pub log_level: String,
    pub port: u16,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // Load .env file if it exists

        let jwt_public_key = env::var("JWT_PUBLIC_KEY").ok();
        let jwt_jwks_url = env::var("JWT_JWKS_URL").ok();

        if jwt_public_key.is_none() && jwt_jwks_url.is_none() {
            anyhow::bail!("either JWT_PUBLIC_KEY or JWT_JWKS_URL is required");
        }

        let config = Self {
            hmac_secret: env::var("CONVO_HMAC_SECRET")
                .map_err(|_| anyhow::anyhow!("CONVO_HMAC_SECRET is required"))?,

            hmac_freshness_secs: env::var("HMAC_FRESHNESS_SECS")
                .unwrap_or_else(|_| "300".to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("HMAC_FRESHNESS_SECS must be an integer"))?,

            jwt_public_key,
            jwt_jwks_url,
            jwt_key_id: env::var("JWT_KEY_ID").ok(),
            jwt_claim_key: env::var("JWT_CLAIM_KEY")
                .unwrap_or_else(|_| "urn:convo:identity".to_string()),

            log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .unwrap_or(3000),
        };

        Ok(config)
    }
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Never print the HMAC secret
        f.debug_struct("Config")
            .field("hmac_freshness_secs", &self.hmac_freshness_secs)
            .field("jwt_jwks_url", &self.jwt_jwks_url)
            .field("jwt_key_id", &self.jwt_key_id)
            .field("jwt_claim_key", &self.jwt_claim_key)
            .field("log_level", &self.log_level)
            .field("port", &self.port)
            .finish_non_exhaustive()
    }
}
