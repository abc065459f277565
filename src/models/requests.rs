//! Request DTOs for the profile API
//!
//! Defines the structure of incoming HTTP request bodies and query strings.

use serde::Deserialize;

/// Request body for create (POST /users) and update (PUT /users/:id).
///
/// Any `id` or `created` in the body is ignored; both belong to the store.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UserRequest {
    pub username: String,
    pub email: String,
    /// Missing bio is treated as empty
    #[serde(default)]
    pub bio: String,
}

/// Query string for GET /users/search
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: Option<String>,
}
