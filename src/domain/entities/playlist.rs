//! Common playlist binding entity and repository trait.
//!
//! Maps to the `common_playlists` table. Written by the playlist service
//! when a shared playlist is created, read back to find its host.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::shared::error::AppError;

/// Association between a common playlist and the user hosting it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaylistBinding {
    pub playlist_id: String,
    pub host_id: String,
    pub created_at: DateTime<Utc>,
}

impl PlaylistBinding {
    pub fn new(playlist_id: impl Into<String>, host_id: impl Into<String>) -> Self {
        Self {
            playlist_id: playlist_id.into(),
            host_id: host_id.into(),
            created_at: Utc::now(),
        }
    }
}

/// Repository trait for playlist bindings.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PlaylistRepository: Send + Sync {
    async fn find(&self, playlist_id: &str) -> Result<Option<PlaylistBinding>, AppError>;

    /// Store the binding unless the playlist is already bound.
    /// Returns the binding that is stored after the call.
    async fn insert_if_absent(&self, binding: &PlaylistBinding) -> Result<PlaylistBinding, AppError>;
}
