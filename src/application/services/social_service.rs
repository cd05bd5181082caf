//! Social Service
//!
//! Friend request lifecycle, friend lists, relation lookups and common
//! playlist host bindings.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tracing::{debug, info};

use crate::domain::{
    FriendRelation, PlaylistBinding, PlaylistRepository, RelationRepository, RelationStatus,
};
use crate::shared::snowflake::SnowflakeGenerator;

/// Social service trait
#[async_trait]
pub trait SocialService: Send + Sync {
    /// Send a friend request from `caller_id` to `target_id`
    async fn send_friend_request(&self, caller_id: &str, target_id: &str) -> Result<FriendRelation, SocialError>;

    /// Pending requests the caller has received, oldest first
    async fn received_requests(&self, caller_id: &str) -> Result<Vec<ReceivedRequestDto>, SocialError>;

    /// Accept the pending request sent by `requester_id` to the caller
    async fn accept_friend_request(&self, caller_id: &str, requester_id: &str) -> Result<FriendRelation, SocialError>;

    /// Decline the pending request sent by `requester_id` to the caller
    async fn decline_friend_request(&self, caller_id: &str, requester_id: &str) -> Result<(), SocialError>;

    /// Users the caller has requested who have not answered yet
    async fn sent_request_targets(&self, caller_id: &str) -> Result<Vec<String>, SocialError>;

    /// The caller's friends
    async fn friends(&self, caller_id: &str) -> Result<Vec<FriendDto>, SocialError>;

    /// Bind a common playlist to its host
    async fn register_playlist(&self, playlist_id: &str, host_id: &str) -> Result<PlaylistBinding, SocialError>;

    /// Host user of a common playlist
    async fn playlist_host(&self, playlist_id: &str) -> Result<String, SocialError>;

    /// The two users of a relation, in stored order (requester first)
    async fn relation_members(&self, relation_id: i64) -> Result<RelationMembersDto, SocialError>;
}

/// Pending request as seen by its recipient
#[derive(Debug, Clone, PartialEq)]
pub struct ReceivedRequestDto {
    pub relation_id: i64,
    pub requester_id: String,
    pub requested_at: DateTime<Utc>,
}

/// Friend summary from the caller's point of view
#[derive(Debug, Clone, PartialEq)]
pub struct FriendDto {
    pub relation_id: i64,
    pub friend_id: String,
    pub since: DateTime<Utc>,
}

/// Both sides of a relation
#[derive(Debug, Clone, PartialEq)]
pub struct RelationMembersDto {
    pub user_a_id: String,
    pub user_b_id: String,
    pub status: RelationStatus,
}

impl From<FriendRelation> for RelationMembersDto {
    fn from(relation: FriendRelation) -> Self {
        Self {
            user_a_id: relation.requester_id,
            user_b_id: relation.recipient_id,
            status: relation.status,
        }
    }
}

/// Social service errors
#[derive(Debug, thiserror::Error)]
pub enum SocialError {
    #[error("Cannot send a friend request to yourself")]
    SelfRequest,

    #[error("Friend request already sent")]
    AlreadyRequested,

    #[error("This user already sent you a friend request")]
    ReverseRequestPending,

    #[error("Already friends")]
    AlreadyFriends,

    #[error("Friend request not found")]
    RequestNotFound,

    #[error("Relation not found")]
    RelationNotFound,

    #[error("Playlist not found")]
    PlaylistNotFound,

    #[error("Playlist is already bound to another host")]
    HostConflict,

    #[error("Internal error: {0}")]
    Internal(String),
}

/// SocialService implementation
pub struct SocialServiceImpl<R, P>
where
    R: RelationRepository,
    P: PlaylistRepository,
{
    relation_repo: Arc<R>,
    playlist_repo: Arc<P>,
    id_generator: Arc<SnowflakeGenerator>,
}

impl<R, P> SocialServiceImpl<R, P>
where
    R: RelationRepository,
    P: PlaylistRepository,
{
    pub fn new(relation_repo: Arc<R>, playlist_repo: Arc<P>, id_generator: Arc<SnowflakeGenerator>) -> Self {
        Self {
            relation_repo,
            playlist_repo,
            id_generator,
        }
    }

    /// Explain why a pair cannot get a new request.
    fn existing_relation_error(existing: &FriendRelation, caller_id: &str) -> SocialError {
        match existing.status {
            RelationStatus::Friends => SocialError::AlreadyFriends,
            RelationStatus::Requested if existing.requester_id == caller_id => SocialError::AlreadyRequested,
            RelationStatus::Requested => SocialError::ReverseRequestPending,
        }
    }
}

fn internal(e: impl std::fmt::Display) -> SocialError {
    SocialError::Internal(e.to_string())
}

#[async_trait]
impl<R, P> SocialService for SocialServiceImpl<R, P>
where
    R: RelationRepository + 'static,
    P: PlaylistRepository + 'static,
{
    async fn send_friend_request(&self, caller_id: &str, target_id: &str) -> Result<FriendRelation, SocialError> {
        if caller_id == target_id {
            return Err(SocialError::SelfRequest);
        }

        if let Some(existing) = self
            .relation_repo
            .find_between(caller_id, target_id)
            .await
            .map_err(internal)?
        {
            return Err(Self::existing_relation_error(&existing, caller_id));
        }

        let relation = FriendRelation::request(self.id_generator.generate(), caller_id, target_id);
        let created = self.relation_repo.create(&relation).await.map_err(internal)?;
        if !created {
            // Lost a race with a concurrent request for the same pair
            let existing = self
                .relation_repo
                .find_between(caller_id, target_id)
                .await
                .map_err(internal)?;
            return Err(existing
                .map(|e| Self::existing_relation_error(&e, caller_id))
                .unwrap_or(SocialError::AlreadyRequested));
        }

        info!(relation_id = relation.id, requester = %caller_id, recipient = %target_id, "Friend request sent");
        Ok(relation)
    }

    async fn received_requests(&self, caller_id: &str) -> Result<Vec<ReceivedRequestDto>, SocialError> {
        let pending = self
            .relation_repo
            .find_pending_received(caller_id)
            .await
            .map_err(internal)?;

        Ok(pending
            .into_iter()
            .map(|r| ReceivedRequestDto {
                relation_id: r.id,
                requester_id: r.requester_id,
                requested_at: r.requested_at,
            })
            .collect())
    }

    async fn accept_friend_request(&self, caller_id: &str, requester_id: &str) -> Result<FriendRelation, SocialError> {
        if let Some(relation) = self
            .relation_repo
            .accept_pending(requester_id, caller_id)
            .await
            .map_err(internal)?
        {
            info!(relation_id = relation.id, requester = %requester_id, recipient = %caller_id, "Friend request accepted");
            return Ok(relation);
        }

        match self
            .relation_repo
            .find_between(caller_id, requester_id)
            .await
            .map_err(internal)?
        {
            Some(existing) if existing.is_friendship() => Err(SocialError::AlreadyFriends),
            _ => Err(SocialError::RequestNotFound),
        }
    }

    async fn decline_friend_request(&self, caller_id: &str, requester_id: &str) -> Result<(), SocialError> {
        let removed = self
            .relation_repo
            .delete_pending(requester_id, caller_id)
            .await
            .map_err(internal)?;

        if !removed {
            return Err(SocialError::RequestNotFound);
        }

        info!(requester = %requester_id, recipient = %caller_id, "Friend request declined");
        Ok(())
    }

    async fn sent_request_targets(&self, caller_id: &str) -> Result<Vec<String>, SocialError> {
        let pending = self
            .relation_repo
            .find_pending_sent(caller_id)
            .await
            .map_err(internal)?;

        Ok(pending.into_iter().map(|r| r.recipient_id).collect())
    }

    async fn friends(&self, caller_id: &str) -> Result<Vec<FriendDto>, SocialError> {
        let friendships = self
            .relation_repo
            .find_friendships(caller_id)
            .await
            .map_err(internal)?;

        Ok(friendships
            .into_iter()
            .filter_map(|r| {
                let friend_id = r.counterpart(caller_id)?.to_string();
                Some(FriendDto {
                    relation_id: r.id,
                    friend_id,
                    since: r.accepted_at.unwrap_or(r.requested_at),
                })
            })
            .collect())
    }

    async fn register_playlist(&self, playlist_id: &str, host_id: &str) -> Result<PlaylistBinding, SocialError> {
        let binding = PlaylistBinding::new(playlist_id, host_id);
        let stored = self
            .playlist_repo
            .insert_if_absent(&binding)
            .await
            .map_err(internal)?;

        // Re-registering the same pair is a no-op; a different host is not.
        if stored.host_id != host_id {
            return Err(SocialError::HostConflict);
        }

        debug!(playlist_id = %playlist_id, host_id = %host_id, "Playlist host registered");
        Ok(stored)
    }

    async fn playlist_host(&self, playlist_id: &str) -> Result<String, SocialError> {
        self.playlist_repo
            .find(playlist_id)
            .await
            .map_err(internal)?
            .map(|b| b.host_id)
            .ok_or(SocialError::PlaylistNotFound)
    }

    async fn relation_members(&self, relation_id: i64) -> Result<RelationMembersDto, SocialError> {
        self.relation_repo
            .find_by_id(relation_id)
            .await
            .map_err(internal)?
            .map(RelationMembersDto::from)
            .ok_or(SocialError::RelationNotFound)
    }
}
