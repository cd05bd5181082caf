//! Chat Room Repository Implementation
//!
//! PostgreSQL implementation of the ChatRoomRepository trait.
//! Rooms are created lazily on first entry or first message.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, Transaction};

use crate::domain::{ChatMessage, ChatRoom, ChatRoomOverview, ChatRoomRepository};
use crate::shared::error::AppError;

#[derive(Debug, sqlx::FromRow)]
struct MessageRow {
    id: i64,
    relation_id: i64,
    sender_id: String,
    content: String,
    sent_at: DateTime<Utc>,
}

impl MessageRow {
    fn into_message(self) -> ChatMessage {
        ChatMessage {
            id: self.id,
            relation_id: self.relation_id,
            sender_id: self.sender_id,
            content: self.content,
            sent_at: self.sent_at,
        }
    }
}

/// One row per room the user participates in, with its latest message joined in.
#[derive(Debug, sqlx::FromRow)]
struct OverviewRow {
    relation_id: i64,
    message_count: i64,
    last_id: Option<i64>,
    last_sender_id: Option<String>,
    last_content: Option<String>,
    last_sent_at: Option<DateTime<Utc>>,
}

impl OverviewRow {
    fn into_overview(self, participants: Vec<String>) -> ChatRoomOverview {
        let last_message = match (self.last_id, self.last_sender_id, self.last_content, self.last_sent_at) {
            (Some(id), Some(sender_id), Some(content), Some(sent_at)) => Some(ChatMessage {
                id,
                relation_id: self.relation_id,
                sender_id,
                content,
                sent_at,
            }),
            _ => None,
        };

        ChatRoomOverview {
            relation_id: self.relation_id,
            participants,
            last_message,
            message_count: self.message_count,
        }
    }
}

/// PostgreSQL chat room repository implementation.
#[derive(Clone)]
pub struct PgChatRoomRepository {
    pool: PgPool,
}

impl PgChatRoomRepository {
    /// Create a new PgChatRoomRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn ensure_room(tx: &mut Transaction<'_, Postgres>, relation_id: i64) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO chat_rooms (relation_id, created_at)
            VALUES ($1, NOW())
            ON CONFLICT (relation_id) DO NOTHING
            "#,
        )
        .bind(relation_id)
        .execute(&mut **tx)
        .await?;
        Ok(())
    }

    async fn participants_of(&self, relation_ids: &[i64]) -> Result<HashMap<i64, Vec<String>>, AppError> {
        let rows = sqlx::query_as::<_, (i64, String)>(
            r#"
            SELECT relation_id, user_id
            FROM chat_participants
            WHERE relation_id = ANY($1)
            ORDER BY joined_at ASC, user_id ASC
            "#,
        )
        .bind(relation_ids)
        .fetch_all(&self.pool)
        .await?;

        let mut participants: HashMap<i64, Vec<String>> = HashMap::new();
        for (relation_id, user_id) in rows {
            participants.entry(relation_id).or_default().push(user_id);
        }
        Ok(participants)
    }
}

#[async_trait]
impl ChatRoomRepository for PgChatRoomRepository {
    async fn find(&self, relation_id: i64) -> Result<Option<ChatRoom>, AppError> {
        let exists = sqlx::query_scalar::<_, i64>("SELECT relation_id FROM chat_rooms WHERE relation_id = $1")
            .bind(relation_id)
            .fetch_optional(&self.pool)
            .await?;
        if exists.is_none() {
            return Ok(None);
        }

        let participants = self
            .participants_of(&[relation_id])
            .await?
            .remove(&relation_id)
            .unwrap_or_default();

        let messages = sqlx::query_as::<_, MessageRow>(
            r#"
            SELECT id, relation_id, sender_id, content, sent_at
            FROM chat_messages
            WHERE relation_id = $1
            ORDER BY id ASC
            "#,
        )
        .bind(relation_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(Some(ChatRoom {
            relation_id,
            participants,
            messages: messages.into_iter().map(MessageRow::into_message).collect(),
        }))
    }

    async fn add_participant(&self, relation_id: i64, user_id: &str) -> Result<bool, AppError> {
        let mut tx = self.pool.begin().await?;
        Self::ensure_room(&mut tx, relation_id).await?;

        let result = sqlx::query(
            r#"
            INSERT INTO chat_participants (relation_id, user_id, joined_at)
            VALUES ($1, $2, NOW())
            ON CONFLICT (relation_id, user_id) DO NOTHING
            "#,
        )
        .bind(relation_id)
        .bind(user_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(result.rows_affected() == 1)
    }

    async fn append_message(&self, message: &ChatMessage) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;
        Self::ensure_room(&mut tx, message.relation_id).await?;

        sqlx::query(
            r#"
            INSERT INTO chat_messages (id, relation_id, sender_id, content, sent_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(message.id)
        .bind(message.relation_id)
        .bind(&message.sender_id)
        .bind(&message.content)
        .bind(message.sent_at)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(())
    }

    async fn list_for_participant(&self, user_id: &str) -> Result<Vec<ChatRoomOverview>, AppError> {
        let rows = sqlx::query_as::<_, OverviewRow>(
            r#"
            SELECT cp.relation_id,
                   (SELECT COUNT(*) FROM chat_messages m WHERE m.relation_id = cp.relation_id) AS message_count,
                   lm.id AS last_id,
                   lm.sender_id AS last_sender_id,
                   lm.content AS last_content,
                   lm.sent_at AS last_sent_at
            FROM chat_participants cp
            LEFT JOIN LATERAL (
                SELECT id, sender_id, content, sent_at
                FROM chat_messages
                WHERE relation_id = cp.relation_id
                ORDER BY id DESC
                LIMIT 1
            ) lm ON TRUE
            WHERE cp.user_id = $1
            ORDER BY cp.relation_id ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        let relation_ids: Vec<i64> = rows.iter().map(|r| r.relation_id).collect();
        let mut participants = self.participants_of(&relation_ids).await?;

        Ok(rows
            .into_iter()
            .map(|row| {
                let members = participants.remove(&row.relation_id).unwrap_or_default();
                row.into_overview(members)
            })
            .collect())
    }
}
