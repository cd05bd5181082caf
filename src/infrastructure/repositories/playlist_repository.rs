//! Playlist Repository Implementation
//!
//! PostgreSQL implementation of the PlaylistRepository trait.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::domain::{PlaylistBinding, PlaylistRepository};
use crate::shared::error::AppError;

#[derive(Debug, sqlx::FromRow)]
struct PlaylistRow {
    playlist_id: String,
    host_id: String,
    created_at: DateTime<Utc>,
}

impl PlaylistRow {
    fn into_binding(self) -> PlaylistBinding {
        PlaylistBinding {
            playlist_id: self.playlist_id,
            host_id: self.host_id,
            created_at: self.created_at,
        }
    }
}

/// PostgreSQL playlist binding repository implementation.
#[derive(Clone)]
pub struct PgPlaylistRepository {
    pool: PgPool,
}

impl PgPlaylistRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PlaylistRepository for PgPlaylistRepository {
    async fn find(&self, playlist_id: &str) -> Result<Option<PlaylistBinding>, AppError> {
        let row = sqlx::query_as::<_, PlaylistRow>(
            "SELECT playlist_id, host_id, created_at FROM common_playlists WHERE playlist_id = $1",
        )
        .bind(playlist_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(PlaylistRow::into_binding))
    }

    async fn insert_if_absent(&self, binding: &PlaylistBinding) -> Result<PlaylistBinding, AppError> {
        // The no-op update makes RETURNING yield the existing row on conflict
        let row = sqlx::query_as::<_, PlaylistRow>(
            r#"
            INSERT INTO common_playlists (playlist_id, host_id, created_at)
            VALUES ($1, $2, $3)
            ON CONFLICT (playlist_id) DO UPDATE SET playlist_id = EXCLUDED.playlist_id
            RETURNING playlist_id, host_id, created_at
            "#,
        )
        .bind(&binding.playlist_id)
        .bind(&binding.host_id)
        .bind(binding.created_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into_binding())
    }
}
