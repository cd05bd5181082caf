//! Chat room API tests

use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::json;

use crate::common::TestApp;

#[tokio::test]
async fn test_open_room_registers_participant() {
    let app = TestApp::new();
    let relation_id = app.make_friends("alice", "bob").await;

    let room = app.get_as("alice", &format!("/chats/{}", relation_id)).await;
    assert_eq!(room.status, StatusCode::OK);
    let room = room.json();
    assert_eq!(room["relationId"], relation_id.as_str());
    assert_eq!(room["participants"], json!(["alice"]));
    assert_eq!(room["messages"], json!([]));
}

#[tokio::test]
async fn test_entering_twice_is_idempotent() {
    let app = TestApp::new();
    let relation_id = app.make_friends("alice", "bob").await;
    let entry = format!("/chats/{}/entry", relation_id);

    assert_eq!(app.post_as("alice", &entry, None).await.status, StatusCode::NO_CONTENT);
    assert_eq!(app.post_as("alice", &entry, None).await.status, StatusCode::NO_CONTENT);
    assert_eq!(app.post_as("bob", &entry, None).await.status, StatusCode::NO_CONTENT);

    let history = app.get_as("bob", &format!("/chats/{}/history", relation_id)).await.json();
    assert_eq!(history["participants"], json!(["alice", "bob"]));
}

#[tokio::test]
async fn test_history_has_no_side_effects() {
    let app = TestApp::new();
    let relation_id = app.make_friends("alice", "bob").await;

    let history = app.get_as("alice", &format!("/chats/{}/history", relation_id)).await;
    assert_eq!(history.status, StatusCode::OK);
    assert_eq!(history.json()["participants"], json!([]));
    assert_eq!(app.get_as("alice", "/my-chats").await.json(), json!([]));
}

#[tokio::test]
async fn test_leave_and_reenter_updates_presence() {
    let app = TestApp::new();
    let relation_id = app.make_friends("alice", "bob").await;
    app.get_as("alice", &format!("/chats/{}", relation_id)).await;

    let rooms = app.get_as("alice", "/my-chats").await.json();
    assert_eq!(rooms[0]["relationId"], relation_id.as_str());
    assert_eq!(rooms[0]["chatRoom"]["friendId"], "bob");
    assert_eq!(rooms[0]["chatRoom"]["active"], true);

    let left = app.delete_as("alice", &format!("/chat-out/{}", relation_id)).await;
    assert_eq!(left.status, StatusCode::OK);
    assert!(left.body.is_empty());

    // Membership survives leaving
    let rooms = app.get_as("alice", "/my-chats").await.json();
    assert_eq!(rooms.as_array().unwrap().len(), 1);
    assert_eq!(rooms[0]["chatRoom"]["active"], false);

    app.post_as("alice", &format!("/chats/{}/entry", relation_id), None).await;
    let rooms = app.get_as("alice", "/my-chats").await.json();
    assert_eq!(rooms[0]["chatRoom"]["active"], true);
}

#[tokio::test]
async fn test_messages_are_kept_in_order() {
    let app = TestApp::new();
    let relation_id = app.make_friends("alice", "bob").await;
    let messages = format!("/chats/{}/messages", relation_id);

    let first = app.post_as("alice", &messages, Some(json!({ "content": "hi bob" }))).await;
    assert_eq!(first.status, StatusCode::CREATED);
    assert_eq!(first.json()["senderId"], "alice");
    app.post_as("bob", &messages, Some(json!({ "content": "hey alice" }))).await;

    let history = app.get_as("bob", &format!("/chats/{}/history", relation_id)).await.json();
    let contents: Vec<&str> = history["messages"]
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["content"].as_str().unwrap())
        .collect();
    assert_eq!(contents, vec!["hi bob", "hey alice"]);

    app.post_as("alice", &format!("/chats/{}/entry", relation_id), None).await;
    let rooms = app.get_as("alice", "/my-chats").await.json();
    assert_eq!(rooms[0]["chatRoom"]["messageCount"], 2);
    assert_eq!(rooms[0]["chatRoom"]["lastMessage"]["content"], "hey alice");
}

#[tokio::test]
async fn test_empty_message_is_rejected() {
    let app = TestApp::new();
    let relation_id = app.make_friends("alice", "bob").await;

    let response = app
        .post_as("alice", &format!("/chats/{}/messages", relation_id), Some(json!({ "content": "" })))
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_stranger_is_forbidden() {
    let app = TestApp::new();
    let relation_id = app.make_friends("alice", "bob").await;

    let response = app.get_as("mallory", &format!("/chats/{}", relation_id)).await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);

    let response = app.delete_as("mallory", &format!("/chat-out/{}", relation_id)).await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_pending_request_has_no_chat() {
    let app = TestApp::new();
    app.post_as("alice", "/friend-request", Some(json!({ "targetUserId": "bob" })))
        .await;
    let pending = app.get_as("bob", "/friend-requests").await.json();
    let relation_id = pending[0]["relationId"].as_str().unwrap().to_string();

    let response = app.post_as("alice", &format!("/chats/{}/entry", relation_id), None).await;
    assert_eq!(response.status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_unknown_room_is_not_found() {
    let app = TestApp::new();
    assert_eq!(app.get_as("alice", "/chats/987654321").await.status, StatusCode::NOT_FOUND);
    assert_eq!(app.get_as("alice", "/chats/abc").await.status, StatusCode::BAD_REQUEST);
}
