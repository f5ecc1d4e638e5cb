//! Axum extractor for the verified identity
//!
//! Works on any route behind the [`crate::authenticate`] middleware.
//! Handlers never parse credential headers themselves.

use axum::{extract::FromRequestParts, http::request::Parts};

use crate::context::UserContext;
use crate::error::AuthError;

/// Verified identity of the current request
#[derive(Debug)]
pub struct CurrentUser(pub UserContext);

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> std::result::Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<UserContext>()
            .cloned()
            .map(CurrentUser)
            // Only reachable on a route that skipped the middleware
            .ok_or(AuthError::MissingCredential)
    }
}
