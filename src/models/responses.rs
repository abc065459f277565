//! Response DTOs for the profile API
//!
//! Defines the structure of outgoing HTTP response bodies that are not a
//! plain `User` or list of users.

use serde::Serialize;

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
    /// Open store connections, when the store has a pool
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active_connections: Option<u32>,
    /// Records currently held by the cache
    pub cache_entries: usize,
    /// Service operations handled since startup
    pub requests_served: u64,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy(
        active_connections: Option<u32>,
        cache_entries: usize,
        requests_served: u64,
    ) -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
            active_connections,
            cache_entries,
            requests_served,
        }
    }
}

/// Error response body for all error conditions
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Error message describing what went wrong
    pub error: String,
}

impl ErrorResponse {
    /// Creates a new ErrorResponse
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_health_response_serialize() {
        let resp = HealthResponse::healthy(Some(3), 12, 40);
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["status"], "healthy");
        assert!(json.get("timestamp").is_some());
        assert_eq!(json["active_connections"], 3);
        assert_eq!(json["cache_entries"], 12);
        assert_eq!(json["requests_served"], 40);
    }

    #[test]
    fn test_health_response_without_pool() {
        let resp = HealthResponse::healthy(None, 0, 0);
        let json = serde_json::to_value(&resp).unwrap();
        assert!(json.get("active_connections").is_none());
    }

    #[test]
    fn test_error_response_serialize() {
        let resp = ErrorResponse::new("Something went wrong");
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("error"));
        assert!(json.contains("Something went wrong"));
    }
}
