//! Caller identity tests

use axum::{
    body::Body,
    http::{Request, StatusCode},
};

use crate::common::{test_settings, TestApp};

#[tokio::test]
async fn test_missing_identity_is_unauthorized() {
    let app = TestApp::new();
    let response = app.get("/friends").await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.json()["code"], 10003);
}

#[tokio::test]
async fn test_bearer_token_identifies_caller() {
    let app = TestApp::new();
    app.make_friends("alice", "bob").await;

    let response = app.get_with_token("alice", "/friends").await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.json()[0]["friendId"], "bob");
}

#[tokio::test]
async fn test_invalid_token_is_rejected_even_with_header() {
    let app = TestApp::new();
    let request = Request::builder()
        .uri("/friends")
        .header("Authorization", "Bearer not-a-token")
        .header("UserId", "alice")
        .body(Body::empty())
        .unwrap();

    assert_eq!(app.send(request).await.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_header_ignored_when_untrusted() {
    let mut settings = test_settings();
    settings.auth.trust_user_id_header = false;
    let app = TestApp::with_settings(settings);

    assert_eq!(app.get_as("alice", "/friends").await.status, StatusCode::UNAUTHORIZED);
    assert_eq!(app.get_with_token("alice", "/friends").await.status, StatusCode::OK);
}

#[tokio::test]
async fn test_blank_header_is_rejected() {
    let app = TestApp::new();
    assert_eq!(app.get_as("  ", "/friends").await.status, StatusCode::UNAUTHORIZED);
}
