use std::collections::BTreeMap;

use async_trait::async_trait;
use parking_lot::RwLock;

use crate::domain::{ChatMessage, ChatRoom, ChatRoomOverview, ChatRoomRepository};
use crate::shared::error::AppError;

/// Chat rooms keyed by relation id.
#[derive(Default)]
pub struct MemoryChatRoomRepository {
    rooms: RwLock<BTreeMap<i64, ChatRoom>>,
}

impl MemoryChatRoomRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ChatRoomRepository for MemoryChatRoomRepository {
    async fn find(&self, relation_id: i64) -> Result<Option<ChatRoom>, AppError> {
        Ok(self.rooms.read().get(&relation_id).cloned())
    }

    async fn add_participant(&self, relation_id: i64, user_id: &str) -> Result<bool, AppError> {
        let mut rooms = self.rooms.write();
        let room = rooms
            .entry(relation_id)
            .or_insert_with(|| ChatRoom::empty(relation_id));

        if room.participants.iter().any(|p| p == user_id) {
            return Ok(false);
        }
        room.participants.push(user_id.to_string());
        Ok(true)
    }

    async fn append_message(&self, message: &ChatMessage) -> Result<(), AppError> {
        self.rooms
            .write()
            .entry(message.relation_id)
            .or_insert_with(|| ChatRoom::empty(message.relation_id))
            .messages
            .push(message.clone());
        Ok(())
    }

    async fn list_for_participant(&self, user_id: &str) -> Result<Vec<ChatRoomOverview>, AppError> {
        Ok(self
            .rooms
            .read()
            .values()
            .filter(|room| room.participants.iter().any(|p| p == user_id))
            .map(|room| ChatRoomOverview {
                relation_id: room.relation_id,
                participants: room.participants.clone(),
                last_message: room.messages.last().cloned(),
                message_count: room.messages.len() as i64,
            })
            .collect())
    }
}
