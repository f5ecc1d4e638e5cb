//! convo application composition root
//!
//! Builds the immutable validator state from configuration and composes
//! the protected route groups behind the dual-auth middleware.

use std::time::Duration;

use axum::{middleware, routing::get, Json, Router};
use convo_auth::{
    authenticate, AuthState, CurrentUser, HmacConfig, HmacValidator, JwtConfig, JwtValidator,
    UserContext,
};
use convo_common::Config;

/// Application state built once at process start
#[derive(Clone)]
pub struct AppState {
    pub auth: AuthState,
}

/// Create the main application router with all routes and middleware
pub async fn create_app(config: &Config) -> Result<Router, anyhow::Error> {
    let freshness = match config.hmac_freshness_secs {
        0 => None,
        secs => Some(Duration::from_secs(secs)),
    };
    let hmac_config = HmacConfig::new(config.hmac_secret.as_bytes().to_vec(), freshness);

    // A service that cannot verify tokens must refuse to start
    let jwt_config = match (&config.jwt_jwks_url, &config.jwt_public_key) {
        (Some(url), _) => {
            JwtConfig::from_jwks(url, &config.jwt_claim_key, config.jwt_key_id.clone())
                .await
                .map_err(|e| anyhow::anyhow!("failed to load remote key set: {e}"))?
        }
        (None, Some(pem)) => JwtConfig::from_pem(
            pem.as_bytes(),
            &config.jwt_claim_key,
            config.jwt_key_id.clone(),
        )
        .map_err(|e| anyhow::anyhow!("failed to parse JWT public key: {e}"))?,
        (None, None) => anyhow::bail!("no JWT verification key configured"),
    };

    let state = AppState {
        auth: AuthState::new(HmacValidator::new(hmac_config), JwtValidator::new(jwt_config)),
    };

    Ok(router(state))
}

/// Build the router from prepared state. Split out so tests can inject
/// fixture keys without touching the environment.
pub fn router(state: AppState) -> Router {
    let protected = Router::new()
        .route("/v1/account", get(get_account))
        .layer(middleware::from_fn_with_state(
            state.auth.clone(),
            authenticate,
        ));

    Router::new()
        .route("/health", get(health_check))
        .route("/", get(|| async { "convo API v0.1.0" }))
        .merge(protected)
}

/// Echo the verified identity of the caller
async fn get_account(CurrentUser(user): CurrentUser) -> Json<UserContext> {
    Json(user)
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}
