//! Cache Module
//!
//! Redis connection management and chat presence storage.
//!
//! Presence ("who has this chat room open right now") is volatile and
//! shared between service instances, so production deployments keep it in
//! Redis. Without a configured Redis URL a process-local store is used.
//!
//! # Example
//!
//! ```rust,ignore
//! use tunemate_social::infrastructure::cache::{create_redis_client, RedisChatPresence};
//!
//! let conn = create_redis_client("redis://localhost:6379").await?;
//! let presence = RedisChatPresence::new(conn);
//! presence.enter(42, "alice").await?;
//! ```

mod chat_presence;

pub use chat_presence::{LocalChatPresence, RedisChatPresence};

use redis::aio::ConnectionManager;
use redis::Client;
use tracing::{info, instrument};

/// Cache key prefixes
pub mod keys {
    /// Set of users currently inside a chat room: `chat:presence:{relation_id}`
    pub const CHAT_PRESENCE: &str = "chat:presence:";
}

/// Creates a Redis connection manager with automatic reconnection.
///
/// # Errors
/// Returns `redis::RedisError` if the URL is invalid or the server is unreachable.
#[instrument(skip(url))]
pub async fn create_redis_client(url: &str) -> Result<ConnectionManager, redis::RedisError> {
    info!("Connecting to Redis...");
    let client = Client::open(url)?;
    let manager = ConnectionManager::new(client).await?;
    info!("Redis connection established");
    Ok(manager)
}
