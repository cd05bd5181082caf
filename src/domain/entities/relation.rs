//! Friend relation entity and repository trait.
//!
//! Maps to the `friend_relations` table. A relation exists for at most one
//! unordered pair of users; its id also names the pair's chat room.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::shared::error::AppError;

/// Lifecycle state of a relation.
///
/// `NONE -> Requested -> Friends`, or `Requested -> NONE` on decline
/// (the row is deleted, so there is no terminal "declined" state).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RelationStatus {
    Requested,
    Friends,
}

impl RelationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RelationStatus::Requested => "requested",
            RelationStatus::Friends => "friends",
        }
    }

    /// Parse the stored column value. Unknown values are treated as pending.
    pub fn from_column(s: &str) -> Self {
        match s {
            "friends" => RelationStatus::Friends,
            _ => RelationStatus::Requested,
        }
    }
}

/// A friend relation between two users.
///
/// Maps to the `friend_relations` table:
/// - id: BIGINT PRIMARY KEY (Snowflake ID)
/// - requester_id: VARCHAR(64) NOT NULL
/// - recipient_id: VARCHAR(64) NOT NULL
/// - status: VARCHAR(16) NOT NULL
/// - requested_at: TIMESTAMPTZ NOT NULL
/// - accepted_at: TIMESTAMPTZ NULL
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FriendRelation {
    /// Snowflake ID (primary key, also the chat room id)
    pub id: i64,

    /// User who sent the friend request
    pub requester_id: String,

    /// User who received the friend request
    pub recipient_id: String,

    pub status: RelationStatus,

    pub requested_at: DateTime<Utc>,

    /// Set once the recipient accepts
    pub accepted_at: Option<DateTime<Utc>>,
}

impl FriendRelation {
    /// Create a new pending request.
    pub fn request(id: i64, requester_id: impl Into<String>, recipient_id: impl Into<String>) -> Self {
        Self {
            id,
            requester_id: requester_id.into(),
            recipient_id: recipient_id.into(),
            status: RelationStatus::Requested,
            requested_at: Utc::now(),
            accepted_at: None,
        }
    }

    /// Whether the user is one side of this relation.
    pub fn involves(&self, user_id: &str) -> bool {
        self.requester_id == user_id || self.recipient_id == user_id
    }

    /// The other side of the relation, if `user_id` is part of it.
    pub fn counterpart(&self, user_id: &str) -> Option<&str> {
        if self.requester_id == user_id {
            Some(&self.recipient_id)
        } else if self.recipient_id == user_id {
            Some(&self.requester_id)
        } else {
            None
        }
    }

    pub fn is_pending(&self) -> bool {
        self.status == RelationStatus::Requested
    }

    pub fn is_friendship(&self) -> bool {
        self.status == RelationStatus::Friends
    }
}

/// Repository trait for friend relations.
///
/// Transitions (`accept_pending`, `delete_pending`) must be atomic: when an
/// accept and a decline race on the same request, exactly one of them wins.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RelationRepository: Send + Sync {
    /// Find a relation by its Snowflake ID.
    async fn find_by_id(&self, id: i64) -> Result<Option<FriendRelation>, AppError>;

    /// Find the relation between two users regardless of direction.
    async fn find_between(&self, a: &str, b: &str) -> Result<Option<FriendRelation>, AppError>;

    /// Insert a new pending request. Returns `false` if the pair already has a relation.
    async fn create(&self, relation: &FriendRelation) -> Result<bool, AppError>;

    /// Move the pending request `requester -> recipient` to `Friends`.
    /// Returns `None` if no such pending request exists.
    async fn accept_pending(
        &self,
        requester_id: &str,
        recipient_id: &str,
    ) -> Result<Option<FriendRelation>, AppError>;

    /// Delete the pending request `requester -> recipient`.
    /// Returns `false` if no such pending request exists.
    async fn delete_pending(&self, requester_id: &str, recipient_id: &str) -> Result<bool, AppError>;

    /// Pending requests received by a user, oldest first (ties broken by id).
    async fn find_pending_received(&self, recipient_id: &str) -> Result<Vec<FriendRelation>, AppError>;

    /// Pending requests sent by a user, oldest first.
    async fn find_pending_sent(&self, requester_id: &str) -> Result<Vec<FriendRelation>, AppError>;

    /// Accepted friendships of a user, oldest first.
    async fn find_friendships(&self, user_id: &str) -> Result<Vec<FriendRelation>, AppError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counterpart() {
        let relation = FriendRelation::request(1, "alice", "bob");
        assert_eq!(relation.counterpart("alice"), Some("bob"));
        assert_eq!(relation.counterpart("bob"), Some("alice"));
        assert_eq!(relation.counterpart("carol"), None);
        assert!(relation.involves("bob"));
        assert!(!relation.involves("carol"));
    }

    #[test]
    fn test_new_request_is_pending() {
        let relation = FriendRelation::request(1, "alice", "bob");
        assert!(relation.is_pending());
        assert!(!relation.is_friendship());
        assert!(relation.accepted_at.is_none());
    }

    #[test]
    fn test_status_column_roundtrip() {
        for status in [RelationStatus::Requested, RelationStatus::Friends] {
            assert_eq!(RelationStatus::from_column(status.as_str()), status);
        }
    }
}
