//! Friend request, relation and playlist API tests

use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::json;

use crate::common::TestApp;

fn request_body(target: &str) -> Option<serde_json::Value> {
    Some(json!({ "targetUserId": target }))
}

#[tokio::test]
async fn test_request_accept_and_list_friends() {
    let app = TestApp::new();

    let sent = app.post_as("alice", "/friend-request", request_body("bob")).await;
    assert_eq!(sent.status, StatusCode::OK);
    assert!(sent.body.is_empty());

    let received = app.get_as("bob", "/friend-requests").await;
    assert_eq!(received.status, StatusCode::OK);
    let received = received.json();
    assert_eq!(received.as_array().unwrap().len(), 1);
    assert_eq!(received[0]["requesterId"], "alice");

    let accepted = app.post_as("bob", "/acceptance/alice", None).await;
    assert_eq!(accepted.status, StatusCode::OK);
    assert!(accepted.body.is_empty());

    let friends = app.get_as("alice", "/friends").await.json();
    assert_eq!(friends[0]["friendId"], "bob");
    let friends_of_bob = app.get_as("bob", "/friends").await.json();
    assert_eq!(friends_of_bob[0]["friendId"], "alice");

    // No longer pending on either side
    assert_eq!(app.get_as("bob", "/friend-requests").await.json(), json!([]));
    assert_eq!(app.get_as("alice", "/requests/friends").await.json(), json!([]));
}

#[tokio::test]
async fn test_received_requests_keep_receipt_order() {
    let app = TestApp::new();

    for requester in ["carol", "alice", "dave"] {
        let sent = app.post_as(requester, "/friend-request", request_body("bob")).await;
        assert_eq!(sent.status, StatusCode::OK);
    }

    let received = app.get_as("bob", "/friend-requests").await.json();
    let requesters: Vec<&str> = received
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["requesterId"].as_str().unwrap())
        .collect();
    assert_eq!(requesters, vec!["carol", "alice", "dave"]);
}

#[tokio::test]
async fn test_outgoing_request_targets() {
    let app = TestApp::new();
    app.post_as("alice", "/friend-request", request_body("bob")).await;
    app.post_as("alice", "/friend-request", request_body("carol")).await;

    let targets = app.get_as("alice", "/requests/friends").await;
    assert_eq!(targets.status, StatusCode::OK);
    assert_eq!(targets.json(), json!(["bob", "carol"]));
}

#[tokio::test]
async fn test_decline_removes_request() {
    let app = TestApp::new();
    app.post_as("alice", "/friend-request", request_body("bob")).await;

    let declined = app.post_as("bob", "/decline/alice", None).await;
    assert_eq!(declined.status, StatusCode::OK);
    assert_eq!(app.get_as("bob", "/friend-requests").await.json(), json!([]));
    assert_eq!(app.get_as("alice", "/friends").await.json(), json!([]));

    // The pair is back to no relation, so a fresh request is allowed
    let again = app.post_as("alice", "/friend-request", request_body("bob")).await;
    assert_eq!(again.status, StatusCode::OK);
}

#[tokio::test]
async fn test_self_request_is_rejected() {
    let app = TestApp::new();
    let response = app.post_as("alice", "/friend-request", request_body("alice")).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.json()["code"], 10002);
}

#[tokio::test]
async fn test_duplicate_and_reverse_requests_conflict() {
    let app = TestApp::new();
    app.post_as("alice", "/friend-request", request_body("bob")).await;

    let duplicate = app.post_as("alice", "/friend-request", request_body("bob")).await;
    assert_eq!(duplicate.status, StatusCode::CONFLICT);

    let reverse = app.post_as("bob", "/friend-request", request_body("alice")).await;
    assert_eq!(reverse.status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_request_between_friends_conflicts() {
    let app = TestApp::new();
    app.make_friends("alice", "bob").await;

    let response = app.post_as("bob", "/friend-request", request_body("alice")).await;
    assert_eq!(response.status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_only_recipient_can_accept() {
    let app = TestApp::new();
    app.post_as("alice", "/friend-request", request_body("bob")).await;

    // alice has no request from bob to accept
    let response = app.post_as("alice", "/acceptance/bob", None).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_only_recipient_can_decline() {
    let app = TestApp::new();
    app.post_as("alice", "/friend-request", request_body("bob")).await;

    // alice cannot withdraw through the recipient's decline path
    let response = app.post_as("alice", "/decline/bob", None).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);

    let pending = app.get_as("bob", "/friend-requests").await.json();
    assert_eq!(pending.as_array().unwrap().len(), 1);
    assert_eq!(pending[0]["requesterId"], "alice");
}

#[tokio::test]
async fn test_second_accept_conflicts() {
    let app = TestApp::new();
    app.make_friends("alice", "bob").await;

    let response = app.post_as("bob", "/acceptance/alice", None).await;
    assert_eq!(response.status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_decline_without_request_is_not_found() {
    let app = TestApp::new();
    let response = app.post_as("bob", "/decline/alice", None).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_malformed_body_is_bad_request() {
    let app = TestApp::new();

    let missing_field = app.post_as("alice", "/friend-request", Some(json!({ "target": "bob" }))).await;
    assert_eq!(missing_field.status, StatusCode::BAD_REQUEST);

    let empty_target = app.post_as("alice", "/friend-request", request_body("")).await;
    assert_eq!(empty_target.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_relation_lookup() {
    let app = TestApp::new();
    let relation_id = app.make_friends("alice", "bob").await;

    let found = app.get(&format!("/relation/{}", relation_id)).await;
    assert_eq!(found.status, StatusCode::OK);
    assert_eq!(
        found.json(),
        json!({ "userAId": "alice", "userBId": "bob", "status": "friends" })
    );
}

#[tokio::test]
async fn test_unknown_relation_is_empty_not_found() {
    let app = TestApp::new();

    let missing = app.get("/relation/123456789").await;
    assert_eq!(missing.status, StatusCode::NOT_FOUND);
    assert!(missing.body.is_empty());

    let invalid = app.get("/relation/not-a-number").await;
    assert_eq!(invalid.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_playlist_host_binding() {
    let app = TestApp::new();
    let body = Some(json!({ "playlistId": "pl-1", "hostId": "alice" }));

    let registered = app.request(axum::http::Method::POST, "/common-playlist", None, body.clone()).await;
    assert_eq!(registered.status, StatusCode::OK);

    // Same binding again is a no-op
    let repeated = app.request(axum::http::Method::POST, "/common-playlist", None, body).await;
    assert_eq!(repeated.status, StatusCode::OK);

    let host = app.get("/host/pl-1").await;
    assert_eq!(host.status, StatusCode::OK);
    assert_eq!(host.text(), "alice");
    assert!(host.content_type.unwrap().starts_with("text/plain"));
}

#[tokio::test]
async fn test_playlist_host_conflict_and_missing() {
    let app = TestApp::new();
    app.request(
        axum::http::Method::POST,
        "/common-playlist",
        None,
        Some(json!({ "playlistId": "pl-1", "hostId": "alice" })),
    )
    .await;

    let rebound = app
        .request(
            axum::http::Method::POST,
            "/common-playlist",
            None,
            Some(json!({ "playlistId": "pl-1", "hostId": "bob" })),
        )
        .await;
    assert_eq!(rebound.status, StatusCode::CONFLICT);
    assert_eq!(app.get("/host/pl-1").await.text(), "alice");

    let missing = app.get("/host/unknown").await;
    assert_eq!(missing.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_blank_ids_are_rejected() {
    let app = TestApp::new();

    let blank_target = app.post_as("alice", "/friend-request", request_body("   ")).await;
    assert_eq!(blank_target.status, StatusCode::BAD_REQUEST);
    assert_eq!(app.get_as("alice", "/requests/friends").await.json(), json!([]));

    let blank_playlist = app
        .request(
            axum::http::Method::POST,
            "/common-playlist",
            None,
            Some(json!({ "playlistId": "  ", "hostId": "alice" })),
        )
        .await;
    assert_eq!(blank_playlist.status, StatusCode::BAD_REQUEST);

    let blank_host = app
        .request(
            axum::http::Method::POST,
            "/common-playlist",
            None,
            Some(json!({ "playlistId": "pl-1", "hostId": " " })),
        )
        .await;
    assert_eq!(blank_host.status, StatusCode::BAD_REQUEST);
    assert_eq!(app.get("/host/pl-1").await.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_host_lookup_trims_like_registration() {
    let app = TestApp::new();
    app.request(
        axum::http::Method::POST,
        "/common-playlist",
        None,
        Some(json!({ "playlistId": " pl-2 ", "hostId": "alice" })),
    )
    .await;

    let host = app.get("/host/%20pl-2%20").await;
    assert_eq!(host.status, StatusCode::OK);
    assert_eq!(host.text(), "alice");
}
