//! Health Check API Tests

use axum::http::StatusCode;

use crate::common::TestApp;

#[tokio::test]
async fn test_health_check_returns_ok() {
    let app = TestApp::new();
    let response = app.get("/health").await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.json()["status"], "healthy");
}

#[tokio::test]
async fn test_liveness_probe() {
    let app = TestApp::new();
    let response = app.get("/health/live").await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.json()["status"], "alive");
}

#[tokio::test]
async fn test_readiness_without_external_dependencies() {
    let app = TestApp::new();
    let response = app.get("/health/ready").await;

    assert_eq!(response.status, StatusCode::OK);
    let body = response.json();
    assert_eq!(body["status"], "healthy");
    assert!(body["checks"].as_object().unwrap().is_empty());
}

#[tokio::test]
async fn test_metrics_endpoint_is_text() {
    let app = TestApp::new();
    app.get("/health").await;

    let response = app.get("/metrics").await;
    assert_eq!(response.status, StatusCode::OK);
    assert!(response.content_type.unwrap().starts_with("text/plain"));
}
