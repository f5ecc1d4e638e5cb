//! Authentication middleware for convo services
//!
//! Two independent trust mechanisms behind one middleware contract:
//! canonical-message HMAC signatures for service-to-service calls and
//! ES256 bearer tokens for user-facing calls. Both produce the same
//! [`UserContext`], attached to the request for downstream handlers.

mod canonical;
mod claims;
mod config;
mod context;
mod error;
mod extractors;
mod hmac;
mod jwks;
mod jwt;
mod orchestrator;

pub use canonical::{body_digest, CanonicalMessage};
pub use claims::IdentityClaims;
pub use config::{HmacConfig, JwtConfig, KeyError, DEFAULT_CLAIM_KEY};
pub use context::UserContext;
pub use error::AuthError;
pub use extractors::CurrentUser;
pub use hmac::{
    sign_canonical, HmacValidator, X_DISPLAY_NAME, X_SIGNATURE, X_SOCIAL_NAME, X_SYSTEM_ROLE,
    X_TIMESTAMP, X_UID, X_USERNAME,
};
pub use jwt::JwtValidator;
pub use orchestrator::{authenticate, AuthState, Credential};
