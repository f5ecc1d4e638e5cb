//! Verified identity record consumed by all downstream handlers

use serde::Serialize;
use uuid::Uuid;

/// Identity record produced by either validator.
///
/// Constructed fresh per request and discarded at request end. `user_id`
/// is only ever populated from a field that passed signature or token
/// verification. On the HMAC path the profile fields come from unsigned
/// headers and are advisory display metadata only; authorization
/// decisions must key off `user_id` and `system_role` from a verified
/// source.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserContext {
    pub user_id: Uuid,
    pub username: Option<String>,
    pub display_name: Option<String>,
    pub social_name: Option<String>,
    pub avatar: Option<String>,
    pub banner: Option<String>,
    pub tag_line: Option<String>,
    pub system_role: Option<String>,
    /// Unix seconds
    pub created_date: Option<i64>,
}

impl UserContext {
    /// Create a context carrying only the verified user id
    pub fn new(user_id: Uuid) -> Self {
        Self {
            user_id,
            username: None,
            display_name: None,
            social_name: None,
            avatar: None,
            banner: None,
            tag_line: None,
            system_role: None,
            created_date: None,
        }
    }
}
