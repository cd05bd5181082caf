//! Repository Implementations
//!
//! PostgreSQL implementations of domain repository traits.
//!
//! ## Available Repositories
//!
//! - **PgRelationRepository** - Friend requests and friendships
//! - **PgChatRoomRepository** - Chat room membership and message history
//! - **PgPlaylistRepository** - Common playlist host bindings
//!
//! ## Usage Example
//!
//! ```rust,ignore
//! use sqlx::PgPool;
//! use tunemate_social::infrastructure::repositories::{
//!     PgChatRoomRepository, PgPlaylistRepository, PgRelationRepository,
//! };
//!
//! async fn setup_repositories(pool: PgPool) {
//!     let relation_repo = PgRelationRepository::new(pool.clone());
//!     let room_repo = PgChatRoomRepository::new(pool.clone());
//!     let playlist_repo = PgPlaylistRepository::new(pool);
//! }
//! ```

pub mod chat_room_repository;
pub mod playlist_repository;
pub mod relation_repository;

pub use chat_room_repository::PgChatRoomRepository;
pub use playlist_repository::PgPlaylistRepository;
pub use relation_repository::PgRelationRepository;
