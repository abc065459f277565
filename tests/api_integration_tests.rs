//! Integration Tests for API Endpoints
//!
//! Tests full request/response cycle for each endpoint against the
//! in-memory store.

use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use profile_service::{api::create_router, store::MemoryUserStore, AppState, ProfileService};
use serde_json::Value;
use tower::ServiceExt;

// == Helper Functions ==

fn create_test_app() -> Router {
    let service = ProfileService::new(Arc::new(MemoryUserStore::new()));
    create_router(AppState::new(service))
}

async fn body_to_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn json_request(method: &str, uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get_request(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

async fn create_user(app: &Router, username: &str, bio: &str) -> Value {
    let body = serde_json::json!({
        "username": username,
        "email": format!("{}@example.com", username),
        "bio": bio,
    })
    .to_string();
    let response = app
        .clone()
        .oneshot(json_request("POST", "/users", &body))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    body_to_json(response.into_body()).await
}

// == Create Endpoint Tests ==

#[tokio::test]
async fn test_create_endpoint_success() {
    let app = create_test_app();

    let json = create_user(&app, "alice", "hello").await;

    assert!(json["id"].as_i64().is_some());
    assert_eq!(json["username"], "alice");
    assert_eq!(json["email"], "alice@example.com");
    assert_eq!(json["bio"], "hello");
    assert!(json["created"].as_str().is_some());
}

#[tokio::test]
async fn test_create_endpoint_malformed_json() {
    let app = create_test_app();

    let response = app
        .oneshot(json_request("POST", "/users", "{not json"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_to_json(response.into_body()).await;
    assert!(json["error"].as_str().is_some());
}

#[tokio::test]
async fn test_create_endpoint_validation_failure() {
    let app = create_test_app();

    let response = app
        .oneshot(json_request(
            "POST",
            "/users",
            r#"{"username":"ab","email":"ab@example.com","bio":""}"#,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_create_endpoint_duplicate_username() {
    let app = create_test_app();
    create_user(&app, "alice", "").await;

    let response = app
        .oneshot(json_request(
            "POST",
            "/users",
            r#"{"username":"alice","email":"other@example.com","bio":""}"#,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["error"], "Database error");
}

// == Get Endpoint Tests ==

#[tokio::test]
async fn test_get_endpoint_success() {
    let app = create_test_app();
    let created = create_user(&app, "bob", "  spaced \t out ").await;
    let id = created["id"].as_i64().unwrap();

    let response = app
        .oneshot(get_request(&format!("/users/{}", id)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["username"], "bob");
    assert_eq!(json["bio"], "spaced out");
}

#[tokio::test]
async fn test_get_endpoint_not_found() {
    let app = create_test_app();

    let response = app.oneshot(get_request("/users/424242")).await.unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_get_endpoint_malformed_id() {
    let app = create_test_app();

    for uri in ["/users/abc", "/users/-4"] {
        let response = app.clone().oneshot(get_request(uri)).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "uri {}", uri);
    }
}

// == List Endpoint Tests ==

#[tokio::test]
async fn test_list_endpoint_newest_first() {
    let app = create_test_app();
    create_user(&app, "first", "").await;
    create_user(&app, "second", "").await;

    let response = app.oneshot(get_request("/users")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    let names: Vec<&str> = json
        .as_array()
        .unwrap()
        .iter()
        .map(|u| u["username"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["second", "first"]);
}

// == Update Endpoint Tests ==

#[tokio::test]
async fn test_update_endpoint_success() {
    let app = create_test_app();
    let created = create_user(&app, "carol", "before").await;
    let id = created["id"].as_i64().unwrap();

    let response = app
        .clone()
        .oneshot(json_request(
            "PUT",
            &format!("/users/{}", id),
            r#"{"username":"carol2","email":"carol2@example.com","bio":"after"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["id"], id);
    assert_eq!(json["username"], "carol2");
    assert!(json.get("created").is_none());

    let response = app
        .oneshot(get_request(&format!("/users/{}", id)))
        .await
        .unwrap();
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["username"], "carol2");
    assert_eq!(json["bio"], "after");
    assert!(json["created"].as_str().is_some());
}

#[tokio::test]
async fn test_update_endpoint_not_found() {
    let app = create_test_app();

    let response = app
        .oneshot(json_request(
            "PUT",
            "/users/999999",
            r#"{"username":"ghost","email":"ghost@example.com","bio":""}"#,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_update_endpoint_rejects_spam() {
    let app = create_test_app();
    let created = create_user(&app, "dave", "").await;
    let id = created["id"].as_i64().unwrap();

    let response = app
        .oneshot(json_request(
            "PUT",
            &format!("/users/{}", id),
            r#"{"username":"dave","email":"dave@example.com","bio":"buy spam now"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// == Search Endpoint Tests ==

#[tokio::test]
async fn test_search_endpoint_matches_bio() {
    let app = create_test_app();
    create_user(&app, "alice", "no match").await;
    create_user(&app, "bob", "user profile").await;

    let response = app
        .oneshot(get_request("/users/search?q=USER"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    let results = json.as_array().unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0]["username"], "bob");
}

#[tokio::test]
async fn test_search_endpoint_missing_query() {
    let app = create_test_app();

    for uri in ["/users/search", "/users/search?q="] {
        let response = app.clone().oneshot(get_request(uri)).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "uri {}", uri);
    }
}

#[tokio::test]
async fn test_search_endpoint_no_results_is_empty_array() {
    let app = create_test_app();
    create_user(&app, "alice", "").await;

    let response = app
        .oneshot(get_request("/users/search?q=zzz"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json, serde_json::json!([]));
}

// == Health Endpoint Tests ==

#[tokio::test]
async fn test_health_endpoint() {
    let app = create_test_app();
    create_user(&app, "erin", "").await;

    let response = app.oneshot(get_request("/health")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["cache_entries"], 1);
    assert_eq!(json["requests_served"], 1);
}
