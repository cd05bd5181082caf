//! Request DTOs
//!
//! Data structures for API request bodies.

use serde::Deserialize;
use validator::Validate;

use crate::shared::validation::not_blank;

/// Body of `POST /friend-request`
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct FriendRequestBody {
    #[validate(
        length(min = 1, max = 64, message = "Target user id must be 1-64 characters"),
        custom(function = "not_blank")
    )]
    pub target_user_id: String,
}

/// Body of `POST /common-playlist`
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistBindingRequest {
    #[validate(
        length(min = 1, max = 128, message = "Playlist id must be 1-128 characters"),
        custom(function = "not_blank")
    )]
    pub playlist_id: String,

    #[validate(
        length(min = 1, max = 64, message = "Host id must be 1-64 characters"),
        custom(function = "not_blank")
    )]
    pub host_id: String,
}

/// Body of `POST /chats/{relationId}/messages`
#[derive(Debug, Deserialize, Validate)]
pub struct SendMessageRequest {
    #[validate(length(min = 1, max = 2000, message = "Message must be 1-2000 characters"))]
    pub content: String,
}
