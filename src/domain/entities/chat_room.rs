//! Chat room entities, repository trait and presence store.
//!
//! A chat room is tied 1:1 to a friend relation and shares its id.
//! Maps to the `chat_rooms`, `chat_participants` and `chat_messages` tables.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::shared::error::AppError;

/// A single chat message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Snowflake ID
    pub id: i64,
    pub relation_id: i64,
    pub sender_id: String,
    pub content: String,
    pub sent_at: DateTime<Utc>,
}

/// Full chat room record: membership plus ordered history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatRoom {
    pub relation_id: i64,

    /// Users that have entered the room, in join order. Never contains duplicates.
    pub participants: Vec<String>,

    /// Messages, oldest first
    pub messages: Vec<ChatMessage>,
}

impl ChatRoom {
    /// A room nobody has entered yet.
    pub fn empty(relation_id: i64) -> Self {
        Self {
            relation_id,
            participants: Vec::new(),
            messages: Vec::new(),
        }
    }
}

/// Room summary used for listings.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatRoomOverview {
    pub relation_id: i64,
    pub participants: Vec<String>,
    pub last_message: Option<ChatMessage>,
    pub message_count: i64,
}

/// Repository trait for chat rooms.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ChatRoomRepository: Send + Sync {
    /// Load a room with its full history. `None` if no one has entered it yet.
    async fn find(&self, relation_id: i64) -> Result<Option<ChatRoom>, AppError>;

    /// Register a participant, creating the room on first entry.
    /// Returns `false` if the user was already a participant.
    async fn add_participant(&self, relation_id: i64, user_id: &str) -> Result<bool, AppError>;

    /// Append a message, creating the room if needed.
    async fn append_message(&self, message: &ChatMessage) -> Result<(), AppError>;

    /// Rooms the user participates in, ordered by relation id.
    async fn list_for_participant(&self, user_id: &str) -> Result<Vec<ChatRoomOverview>, AppError>;
}

/// Tracks which users currently have a chat room open.
///
/// Presence is volatile state, separate from durable membership.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ChatPresenceStore: Send + Sync {
    /// Mark the user as in the room. Idempotent.
    async fn enter(&self, relation_id: i64, user_id: &str) -> Result<(), AppError>;

    /// Clear the user's marker. Idempotent.
    async fn leave(&self, relation_id: i64, user_id: &str) -> Result<(), AppError>;

    async fn is_present(&self, relation_id: i64, user_id: &str) -> Result<bool, AppError>;
}
