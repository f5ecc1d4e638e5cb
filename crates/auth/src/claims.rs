//! Typed identity claims nested under the configured claim key
//!
//! The identity payload is a nested object, deliberately not top-level
//! registered claims, so it cannot collide with standard JWT fields.

use serde::Deserialize;
use uuid::Uuid;

use crate::context::UserContext;
use crate::error::AuthError;

/// Identity fields carried inside the token payload.
///
/// `uid` is the only required field. Everything else is optional and
/// copied into the [`UserContext`] verbatim.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentityClaims {
    pub uid: String,
    /// Some issuers put the email here instead
    #[serde(alias = "email")]
    pub username: Option<String>,
    pub display_name: Option<String>,
    pub social_name: Option<String>,
    pub avatar: Option<String>,
    pub banner: Option<String>,
    pub tag_line: Option<String>,
    pub role: Option<String>,
    /// Numeric; converted to integer unix seconds
    pub created_date: Option<f64>,
}

impl IdentityClaims {
    /// Convert into the downstream identity record. The uid must be a
    /// syntactically valid UUID.
    pub fn into_context(self) -> Result<UserContext, AuthError> {
        let user_id = Uuid::parse_str(&self.uid).map_err(|_| {
            tracing::warn!(uid = %self.uid, "Token carried a malformed uid claim");
            AuthError::InvalidIdentity
        })?;

        let mut context = UserContext::new(user_id);
        context.username = self.username;
        context.display_name = self.display_name;
        context.social_name = self.social_name;
        context.avatar = self.avatar;
        context.banner = self.banner;
        context.tag_line = self.tag_line;
        context.system_role = self.role;
        context.created_date = self.created_date.map(|d| d as i64);
        Ok(context)
    }
}
