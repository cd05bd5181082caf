use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::RwLock;

use crate::domain::{FriendRelation, RelationRepository, RelationStatus};
use crate::shared::error::AppError;

/// Relations keyed by id.
#[derive(Default)]
pub struct MemoryRelationRepository {
    relations: RwLock<BTreeMap<i64, FriendRelation>>,
}

impl MemoryRelationRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn select<F>(&self, filter: F) -> Vec<FriendRelation>
    where
        F: Fn(&FriendRelation) -> bool,
    {
        let mut selected: Vec<FriendRelation> = self
            .relations
            .read()
            .values()
            .filter(|r| filter(r))
            .cloned()
            .collect();
        selected.sort_by(|a, b| a.requested_at.cmp(&b.requested_at).then(a.id.cmp(&b.id)));
        selected
    }
}

fn same_pair(relation: &FriendRelation, a: &str, b: &str) -> bool {
    (relation.requester_id == a && relation.recipient_id == b)
        || (relation.requester_id == b && relation.recipient_id == a)
}

#[async_trait]
impl RelationRepository for MemoryRelationRepository {
    async fn find_by_id(&self, id: i64) -> Result<Option<FriendRelation>, AppError> {
        Ok(self.relations.read().get(&id).cloned())
    }

    async fn find_between(&self, a: &str, b: &str) -> Result<Option<FriendRelation>, AppError> {
        Ok(self
            .relations
            .read()
            .values()
            .find(|r| same_pair(r, a, b))
            .cloned())
    }

    async fn create(&self, relation: &FriendRelation) -> Result<bool, AppError> {
        let mut relations = self.relations.write();
        let taken = relations.contains_key(&relation.id)
            || relations
                .values()
                .any(|r| same_pair(r, &relation.requester_id, &relation.recipient_id));
        if taken {
            return Ok(false);
        }
        relations.insert(relation.id, relation.clone());
        Ok(true)
    }

    async fn accept_pending(
        &self,
        requester_id: &str,
        recipient_id: &str,
    ) -> Result<Option<FriendRelation>, AppError> {
        let mut relations = self.relations.write();
        let pending = relations.values_mut().find(|r| {
            r.requester_id == requester_id && r.recipient_id == recipient_id && r.is_pending()
        });

        Ok(pending.map(|relation| {
            relation.status = RelationStatus::Friends;
            relation.accepted_at = Some(Utc::now());
            relation.clone()
        }))
    }

    async fn delete_pending(&self, requester_id: &str, recipient_id: &str) -> Result<bool, AppError> {
        let mut relations = self.relations.write();
        let id = relations
            .values()
            .find(|r| r.requester_id == requester_id && r.recipient_id == recipient_id && r.is_pending())
            .map(|r| r.id);

        Ok(id.and_then(|id| relations.remove(&id)).is_some())
    }

    async fn find_pending_received(&self, recipient_id: &str) -> Result<Vec<FriendRelation>, AppError> {
        Ok(self.select(|r| r.recipient_id == recipient_id && r.is_pending()))
    }

    async fn find_pending_sent(&self, requester_id: &str) -> Result<Vec<FriendRelation>, AppError> {
        Ok(self.select(|r| r.requester_id == requester_id && r.is_pending()))
    }

    async fn find_friendships(&self, user_id: &str) -> Result<Vec<FriendRelation>, AppError> {
        let mut friendships = self.select(|r| r.involves(user_id) && r.is_friendship());
        friendships.sort_by(|a, b| a.accepted_at.cmp(&b.accepted_at).then(a.id.cmp(&b.id)));
        Ok(friendships)
    }
}
