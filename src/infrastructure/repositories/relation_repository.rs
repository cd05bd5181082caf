//! Relation Repository Implementation
//!
//! PostgreSQL implementation of the RelationRepository trait.
//! State transitions are single conditional statements, so a concurrent
//! accept and decline of the same request cannot both succeed.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::domain::{FriendRelation, RelationRepository, RelationStatus};
use crate::shared::error::AppError;

const RELATION_COLUMNS: &str = "id, requester_id, recipient_id, status, requested_at, accepted_at";

/// Database row representation of the friend_relations table.
#[derive(Debug, sqlx::FromRow)]
struct RelationRow {
    id: i64,
    requester_id: String,
    recipient_id: String,
    status: String,
    requested_at: DateTime<Utc>,
    accepted_at: Option<DateTime<Utc>>,
}

impl RelationRow {
    fn into_relation(self) -> FriendRelation {
        FriendRelation {
            id: self.id,
            requester_id: self.requester_id,
            recipient_id: self.recipient_id,
            status: RelationStatus::from_column(&self.status),
            requested_at: self.requested_at,
            accepted_at: self.accepted_at,
        }
    }
}

/// PostgreSQL relation repository implementation.
#[derive(Clone)]
pub struct PgRelationRepository {
    pool: PgPool,
}

impl PgRelationRepository {
    /// Create a new PgRelationRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RelationRepository for PgRelationRepository {
    async fn find_by_id(&self, id: i64) -> Result<Option<FriendRelation>, AppError> {
        let row = sqlx::query_as::<_, RelationRow>(&format!(
            "SELECT {} FROM friend_relations WHERE id = $1",
            RELATION_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(RelationRow::into_relation))
    }

    async fn find_between(&self, a: &str, b: &str) -> Result<Option<FriendRelation>, AppError> {
        let row = sqlx::query_as::<_, RelationRow>(&format!(
            r#"
            SELECT {}
            FROM friend_relations
            WHERE (requester_id = $1 AND recipient_id = $2)
               OR (requester_id = $2 AND recipient_id = $1)
            "#,
            RELATION_COLUMNS
        ))
        .bind(a)
        .bind(b)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(RelationRow::into_relation))
    }

    async fn create(&self, relation: &FriendRelation) -> Result<bool, AppError> {
        // The pair index makes a concurrent duplicate a no-op instead of an error
        let result = sqlx::query(
            r#"
            INSERT INTO friend_relations (id, requester_id, recipient_id, status, requested_at)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(relation.id)
        .bind(&relation.requester_id)
        .bind(&relation.recipient_id)
        .bind(relation.status.as_str())
        .bind(relation.requested_at)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    async fn accept_pending(
        &self,
        requester_id: &str,
        recipient_id: &str,
    ) -> Result<Option<FriendRelation>, AppError> {
        let row = sqlx::query_as::<_, RelationRow>(&format!(
            r#"
            UPDATE friend_relations
            SET status = 'friends', accepted_at = NOW()
            WHERE requester_id = $1 AND recipient_id = $2 AND status = 'requested'
            RETURNING {}
            "#,
            RELATION_COLUMNS
        ))
        .bind(requester_id)
        .bind(recipient_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(RelationRow::into_relation))
    }

    async fn delete_pending(&self, requester_id: &str, recipient_id: &str) -> Result<bool, AppError> {
        let result = sqlx::query(
            r#"
            DELETE FROM friend_relations
            WHERE requester_id = $1 AND recipient_id = $2 AND status = 'requested'
            "#,
        )
        .bind(requester_id)
        .bind(recipient_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn find_pending_received(&self, recipient_id: &str) -> Result<Vec<FriendRelation>, AppError> {
        let rows = sqlx::query_as::<_, RelationRow>(&format!(
            r#"
            SELECT {}
            FROM friend_relations
            WHERE recipient_id = $1 AND status = 'requested'
            ORDER BY requested_at ASC, id ASC
            "#,
            RELATION_COLUMNS
        ))
        .bind(recipient_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(RelationRow::into_relation).collect())
    }

    async fn find_pending_sent(&self, requester_id: &str) -> Result<Vec<FriendRelation>, AppError> {
        let rows = sqlx::query_as::<_, RelationRow>(&format!(
            r#"
            SELECT {}
            FROM friend_relations
            WHERE requester_id = $1 AND status = 'requested'
            ORDER BY requested_at ASC, id ASC
            "#,
            RELATION_COLUMNS
        ))
        .bind(requester_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(RelationRow::into_relation).collect())
    }

    async fn find_friendships(&self, user_id: &str) -> Result<Vec<FriendRelation>, AppError> {
        let rows = sqlx::query_as::<_, RelationRow>(&format!(
            r#"
            SELECT {}
            FROM friend_relations
            WHERE (requester_id = $1 OR recipient_id = $1) AND status = 'friends'
            ORDER BY accepted_at ASC NULLS LAST, id ASC
            "#,
            RELATION_COLUMNS
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(RelationRow::into_relation).collect())
    }
}
