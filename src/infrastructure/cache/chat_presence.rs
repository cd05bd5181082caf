//! Chat Presence Stores
//!
//! Redis-backed and process-local implementations of `ChatPresenceStore`.

use std::collections::HashSet;

use async_trait::async_trait;
use dashmap::DashMap;
use redis::aio::ConnectionManager;
use redis::AsyncCommands;

use super::keys;
use crate::domain::ChatPresenceStore;
use crate::shared::error::AppError;

/// Presence kept in a Redis set per room
#[derive(Clone)]
pub struct RedisChatPresence {
    redis: ConnectionManager,
}

impl RedisChatPresence {
    pub fn new(redis: ConnectionManager) -> Self {
        Self { redis }
    }

    fn room_key(relation_id: i64) -> String {
        format!("{}{}", keys::CHAT_PRESENCE, relation_id)
    }
}

#[async_trait]
impl ChatPresenceStore for RedisChatPresence {
    async fn enter(&self, relation_id: i64, user_id: &str) -> Result<(), AppError> {
        let mut conn = self.redis.clone();
        conn.sadd::<_, _, ()>(Self::room_key(relation_id), user_id).await?;
        Ok(())
    }

    async fn leave(&self, relation_id: i64, user_id: &str) -> Result<(), AppError> {
        let mut conn = self.redis.clone();
        conn.srem::<_, _, ()>(Self::room_key(relation_id), user_id).await?;
        Ok(())
    }

    async fn is_present(&self, relation_id: i64, user_id: &str) -> Result<bool, AppError> {
        let mut conn = self.redis.clone();
        let present: bool = conn.sismember(Self::room_key(relation_id), user_id).await?;
        Ok(present)
    }
}

/// Presence kept in this process only
#[derive(Default)]
pub struct LocalChatPresence {
    rooms: DashMap<i64, HashSet<String>>,
}

impl LocalChatPresence {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ChatPresenceStore for LocalChatPresence {
    async fn enter(&self, relation_id: i64, user_id: &str) -> Result<(), AppError> {
        self.rooms
            .entry(relation_id)
            .or_default()
            .insert(user_id.to_string());
        Ok(())
    }

    async fn leave(&self, relation_id: i64, user_id: &str) -> Result<(), AppError> {
        if let Some(mut users) = self.rooms.get_mut(&relation_id) {
            users.remove(user_id);
        }
        // Drop empty rooms so the map does not grow with every room ever opened
        self.rooms.remove_if(&relation_id, |_, users| users.is_empty());
        Ok(())
    }

    async fn is_present(&self, relation_id: i64, user_id: &str) -> Result<bool, AppError> {
        Ok(self
            .rooms
            .get(&relation_id)
            .map(|users| users.contains(user_id))
            .unwrap_or(false))
    }
}
