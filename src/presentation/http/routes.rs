//! Route Configuration
//!
//! Configures all HTTP routes for the API.

use axum::{
    response::IntoResponse,
    routing::{delete, get, post},
    Router,
};

use super::handlers;
use crate::infrastructure::metrics;
use crate::startup::AppState;

/// Create the main API router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .merge(social_routes())
        .merge(chat_routes())
        // Health check endpoints
        .route("/health", get(handlers::health::health_check))
        .route("/health/live", get(handlers::health::liveness))
        .route("/health/ready", get(handlers::health::readiness))
        // Prometheus metrics endpoint
        .route("/metrics", get(metrics_handler))
        .with_state(state)
}

/// Prometheus metrics endpoint handler
async fn metrics_handler() -> impl IntoResponse {
    let metrics = metrics::gather_metrics();
    (
        [(
            axum::http::header::CONTENT_TYPE,
            "text/plain; version=0.0.4; charset=utf-8",
        )],
        metrics,
    )
}

/// Friend requests, friends, relations and common playlists
fn social_routes() -> Router<AppState> {
    Router::new()
        .route("/friend-request", post(handlers::social::send_friend_request))
        .route("/friend-requests", get(handlers::social::received_friend_requests))
        .route("/requests/friends", get(handlers::social::sent_friend_requests))
        .route("/acceptance/{user_id}", post(handlers::social::accept_friend_request))
        .route("/decline/{user_id}", post(handlers::social::decline_friend_request))
        .route("/friends", get(handlers::social::list_friends))
        .route("/relation/{relation_id}", get(handlers::social::get_relation))
        .route("/common-playlist", post(handlers::social::register_common_playlist))
        .route("/host/{playlist_id}", get(handlers::social::get_playlist_host))
}

/// Chat rooms between friends
fn chat_routes() -> Router<AppState> {
    Router::new()
        .route("/chats/{relation_id}", get(handlers::chat::open_chat_room))
        .route("/chats/{relation_id}/entry", post(handlers::chat::enter_chat_room))
        .route("/chats/{relation_id}/history", get(handlers::chat::get_chat_history))
        .route("/chats/{relation_id}/messages", post(handlers::chat::send_chat_message))
        .route("/chat-out/{relation_id}", delete(handlers::chat::leave_chat_room))
        .route("/my-chats", get(handlers::chat::my_chat_rooms))
}
