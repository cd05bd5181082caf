//! Response DTOs
//!
//! Data structures for API response bodies. Snowflake ids are rendered as
//! strings so JavaScript clients do not lose precision.

use serde::Serialize;

use crate::application::services::{ChatRoomListItemDto, FriendDto, ReceivedRequestDto, RelationMembersDto};
use crate::domain::{ChatMessage, ChatRoom};

/// Entry of `GET /friend-requests`
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceivedFriendRequestResponse {
    pub requester_id: String,
    pub relation_id: String,
    pub requested_at: String,
}

impl From<ReceivedRequestDto> for ReceivedFriendRequestResponse {
    fn from(dto: ReceivedRequestDto) -> Self {
        Self {
            requester_id: dto.requester_id,
            relation_id: dto.relation_id.to_string(),
            requested_at: dto.requested_at.to_rfc3339(),
        }
    }
}

/// Entry of `GET /friends`
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FriendResponse {
    pub relation_id: String,
    pub friend_id: String,
    pub since: String,
}

impl From<FriendDto> for FriendResponse {
    fn from(dto: FriendDto) -> Self {
        Self {
            relation_id: dto.relation_id.to_string(),
            friend_id: dto.friend_id,
            since: dto.since.to_rfc3339(),
        }
    }
}

/// Body of `GET /relation/{relationId}`
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RelationResponse {
    pub user_a_id: String,
    pub user_b_id: String,
    pub status: &'static str,
}

impl From<RelationMembersDto> for RelationResponse {
    fn from(dto: RelationMembersDto) -> Self {
        Self {
            user_a_id: dto.user_a_id,
            user_b_id: dto.user_b_id,
            status: dto.status.as_str(),
        }
    }
}

/// Chat message
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessageResponse {
    pub id: String,
    pub sender_id: String,
    pub content: String,
    pub sent_at: String,
}

impl From<ChatMessage> for ChatMessageResponse {
    fn from(message: ChatMessage) -> Self {
        Self {
            id: message.id.to_string(),
            sender_id: message.sender_id,
            content: message.content,
            sent_at: message.sent_at.to_rfc3339(),
        }
    }
}

/// Full chat room record
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRoomResponse {
    pub relation_id: String,
    pub participants: Vec<String>,
    pub messages: Vec<ChatMessageResponse>,
}

impl From<ChatRoom> for ChatRoomResponse {
    fn from(room: ChatRoom) -> Self {
        Self {
            relation_id: room.relation_id.to_string(),
            participants: room.participants,
            messages: room.messages.into_iter().map(ChatMessageResponse::from).collect(),
        }
    }
}

/// Room summary inside `GET /my-chats`
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRoomSummary {
    pub friend_id: String,
    pub participants: Vec<String>,
    pub last_message: Option<ChatMessageResponse>,
    pub message_count: i64,
    pub active: bool,
}

/// Entry of `GET /my-chats`
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MyChatRoomResponse {
    pub relation_id: String,
    pub chat_room: ChatRoomSummary,
}

impl From<ChatRoomListItemDto> for MyChatRoomResponse {
    fn from(dto: ChatRoomListItemDto) -> Self {
        Self {
            relation_id: dto.relation_id.to_string(),
            chat_room: ChatRoomSummary {
                friend_id: dto.friend_id,
                participants: dto.participants,
                last_message: dto.last_message.map(ChatMessageResponse::from),
                message_count: dto.message_count,
                active: dto.active,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::RelationStatus;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_relation_response_shape() {
        let response = RelationResponse::from(RelationMembersDto {
            user_a_id: "alice".into(),
            user_b_id: "bob".into(),
            status: RelationStatus::Friends,
        });
        assert_eq!(
            serde_json::to_value(response).unwrap(),
            json!({"userAId": "alice", "userBId": "bob", "status": "friends"})
        );
    }

    #[test]
    fn test_large_ids_are_strings() {
        let room = ChatRoomResponse::from(ChatRoom::empty(i64::MAX));
        let value = serde_json::to_value(room).unwrap();
        assert_eq!(value["relationId"], json!(i64::MAX.to_string()));
    }
}
