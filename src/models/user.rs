//! User Entity
//!
//! The single record type managed by the service.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::UserRequest;

// == User ==
/// A user profile.
///
/// `id` and `created` are assigned once by the store on insertion.
/// `created` is `None` only on the body echoed back by an update, which
/// does not reload it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub bio: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<DateTime<Utc>>,
}

impl User {
    /// Builds a record from submitted fields and store-assigned values.
    pub fn from_request(id: i64, request: UserRequest, created: Option<DateTime<Utc>>) -> Self {
        Self {
            id,
            username: request.username,
            email: request.email,
            bio: request.bio,
            created,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> UserRequest {
        UserRequest {
            username: "alice".to_string(),
            email: "alice@example.com".to_string(),
            bio: "hello".to_string(),
        }
    }

    #[test]
    fn test_from_request_keeps_fields() {
        let now = Utc::now();
        let user = User::from_request(4, request(), Some(now));
        assert_eq!(user.id, 4);
        assert_eq!(user.username, "alice");
        assert_eq!(user.email, "alice@example.com");
        assert_eq!(user.bio, "hello");
        assert_eq!(user.created, Some(now));
    }

    #[test]
    fn test_created_serialized_as_rfc3339() {
        let created = DateTime::parse_from_rfc3339("2024-05-01T12:30:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let user = User::from_request(1, request(), Some(created));
        let json = serde_json::to_value(&user).unwrap();
        assert_eq!(json["created"], "2024-05-01T12:30:00Z");
    }

    #[test]
    fn test_unknown_created_is_omitted() {
        let user = User::from_request(1, request(), None);
        let json = serde_json::to_value(&user).unwrap();
        assert!(json.get("created").is_none());
        assert_eq!(json["id"], 1);
    }
}
