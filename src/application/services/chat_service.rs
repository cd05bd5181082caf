//! Chat Service
//!
//! Chat room membership, presence and history for accepted friendships.
//!
//! Entering a room (command) and reading its history (query) are separate
//! operations; `open_room` composes them for clients that want both.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tracing::debug;

use crate::domain::{
    ChatMessage, ChatPresenceStore, ChatRoom, ChatRoomRepository, FriendRelation, RelationRepository,
};
use crate::shared::snowflake::SnowflakeGenerator;

/// Maximum chat message length in characters
pub const MAX_MESSAGE_LENGTH: usize = 2000;

/// Chat service trait
#[async_trait]
pub trait ChatService: Send + Sync {
    /// Register the caller as participant and mark them present
    async fn enter_room(&self, caller_id: &str, relation_id: i64) -> Result<(), ChatError>;

    /// Room membership and history, without side effects
    async fn room_history(&self, caller_id: &str, relation_id: i64) -> Result<ChatRoom, ChatError>;

    /// Enter the room, then return its history
    async fn open_room(&self, caller_id: &str, relation_id: i64) -> Result<ChatRoom, ChatError> {
        self.enter_room(caller_id, relation_id).await?;
        self.room_history(caller_id, relation_id).await
    }

    /// Clear the caller's presence marker. Membership is kept.
    async fn leave_room(&self, caller_id: &str, relation_id: i64) -> Result<(), ChatError>;

    /// Rooms the caller participates in
    async fn my_rooms(&self, caller_id: &str) -> Result<Vec<ChatRoomListItemDto>, ChatError>;

    /// Append a message to the room history
    async fn send_message(&self, caller_id: &str, relation_id: i64, content: &str) -> Result<ChatMessage, ChatError>;
}

/// Room entry in the caller's room list
#[derive(Debug, Clone, PartialEq)]
pub struct ChatRoomListItemDto {
    pub relation_id: i64,
    pub friend_id: String,
    pub participants: Vec<String>,
    pub last_message: Option<ChatMessage>,
    pub message_count: i64,
    /// Whether the caller currently has the room open
    pub active: bool,
}

/// Chat service errors
#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    #[error("Chat room not found")]
    RoomNotFound,

    #[error("Not a member of this chat room")]
    NotMember,

    #[error("Friend request has not been accepted yet")]
    NotFriends,

    #[error("Message must be between 1 and {} characters", MAX_MESSAGE_LENGTH)]
    InvalidMessage,

    #[error("Internal error: {0}")]
    Internal(String),
}

fn internal(e: impl std::fmt::Display) -> ChatError {
    ChatError::Internal(e.to_string())
}

/// ChatService implementation
pub struct ChatServiceImpl<R, C, P>
where
    R: RelationRepository,
    C: ChatRoomRepository,
    P: ChatPresenceStore + ?Sized,
{
    relation_repo: Arc<R>,
    room_repo: Arc<C>,
    presence: Arc<P>,
    id_generator: Arc<SnowflakeGenerator>,
}

impl<R, C, P> ChatServiceImpl<R, C, P>
where
    R: RelationRepository,
    C: ChatRoomRepository,
    P: ChatPresenceStore + ?Sized,
{
    pub fn new(
        relation_repo: Arc<R>,
        room_repo: Arc<C>,
        presence: Arc<P>,
        id_generator: Arc<SnowflakeGenerator>,
    ) -> Self {
        Self {
            relation_repo,
            room_repo,
            presence,
            id_generator,
        }
    }

    /// Load the relation behind a room and check the caller belongs to it.
    async fn authorize(&self, caller_id: &str, relation_id: i64) -> Result<FriendRelation, ChatError> {
        let relation = self
            .relation_repo
            .find_by_id(relation_id)
            .await
            .map_err(internal)?
            .ok_or(ChatError::RoomNotFound)?;

        if !relation.involves(caller_id) {
            return Err(ChatError::NotMember);
        }

        Ok(relation)
    }

    async fn authorize_friends(&self, caller_id: &str, relation_id: i64) -> Result<FriendRelation, ChatError> {
        let relation = self.authorize(caller_id, relation_id).await?;
        if !relation.is_friendship() {
            return Err(ChatError::NotFriends);
        }
        Ok(relation)
    }
}

#[async_trait]
impl<R, C, P> ChatService for ChatServiceImpl<R, C, P>
where
    R: RelationRepository + 'static,
    C: ChatRoomRepository + 'static,
    P: ChatPresenceStore + ?Sized + 'static,
{
    async fn enter_room(&self, caller_id: &str, relation_id: i64) -> Result<(), ChatError> {
        self.authorize_friends(caller_id, relation_id).await?;

        let joined = self
            .room_repo
            .add_participant(relation_id, caller_id)
            .await
            .map_err(internal)?;
        self.presence
            .enter(relation_id, caller_id)
            .await
            .map_err(internal)?;

        debug!(relation_id, user = %caller_id, first_entry = joined, "Entered chat room");
        Ok(())
    }

    async fn room_history(&self, caller_id: &str, relation_id: i64) -> Result<ChatRoom, ChatError> {
        self.authorize(caller_id, relation_id).await?;

        let room = self.room_repo.find(relation_id).await.map_err(internal)?;
        Ok(room.unwrap_or_else(|| ChatRoom::empty(relation_id)))
    }

    async fn leave_room(&self, caller_id: &str, relation_id: i64) -> Result<(), ChatError> {
        self.authorize(caller_id, relation_id).await?;

        self.presence
            .leave(relation_id, caller_id)
            .await
            .map_err(internal)?;

        debug!(relation_id, user = %caller_id, "Left chat room");
        Ok(())
    }

    async fn my_rooms(&self, caller_id: &str) -> Result<Vec<ChatRoomListItemDto>, ChatError> {
        let overviews = self
            .room_repo
            .list_for_participant(caller_id)
            .await
            .map_err(internal)?;

        let mut rooms = Vec::with_capacity(overviews.len());
        for overview in overviews {
            let Some(relation) = self
                .relation_repo
                .find_by_id(overview.relation_id)
                .await
                .map_err(internal)?
            else {
                continue;
            };
            let Some(friend_id) = relation.counterpart(caller_id) else {
                continue;
            };
            let active = self
                .presence
                .is_present(overview.relation_id, caller_id)
                .await
                .map_err(internal)?;

            rooms.push(ChatRoomListItemDto {
                relation_id: overview.relation_id,
                friend_id: friend_id.to_string(),
                participants: overview.participants,
                last_message: overview.last_message,
                message_count: overview.message_count,
                active,
            });
        }

        Ok(rooms)
    }

    async fn send_message(&self, caller_id: &str, relation_id: i64, content: &str) -> Result<ChatMessage, ChatError> {
        let content = content.trim();
        if content.is_empty() || content.chars().count() > MAX_MESSAGE_LENGTH {
            return Err(ChatError::InvalidMessage);
        }

        self.authorize_friends(caller_id, relation_id).await?;

        let message = ChatMessage {
            id: self.id_generator.generate(),
            relation_id,
            sender_id: caller_id.to_string(),
            content: content.to_string(),
            sent_at: Utc::now(),
        };
        self.room_repo
            .append_message(&message)
            .await
            .map_err(internal)?;

        debug!(relation_id, message_id = message.id, sender = %caller_id, "Chat message stored");
        Ok(message)
    }
}
