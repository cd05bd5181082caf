use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::RwLock;

use crate::domain::{PlaylistBinding, PlaylistRepository};
use crate::shared::error::AppError;

/// Playlist bindings keyed by playlist id.
#[derive(Default)]
pub struct MemoryPlaylistRepository {
    bindings: RwLock<HashMap<String, PlaylistBinding>>,
}

impl MemoryPlaylistRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PlaylistRepository for MemoryPlaylistRepository {
    async fn find(&self, playlist_id: &str) -> Result<Option<PlaylistBinding>, AppError> {
        Ok(self.bindings.read().get(playlist_id).cloned())
    }

    async fn insert_if_absent(&self, binding: &PlaylistBinding) -> Result<PlaylistBinding, AppError> {
        Ok(self
            .bindings
            .write()
            .entry(binding.playlist_id.clone())
            .or_insert_with(|| binding.clone())
            .clone())
    }
}
