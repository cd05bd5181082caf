//! # Domain Entities
//!
//! Core domain entities of the social service.
//!
//! - **FriendRelation**: a directed friend request that becomes a mutual friendship
//! - **ChatRoom**: membership and history of the room attached to a relation
//! - **PlaylistBinding**: which user hosts a common playlist
//!
//! ## Repository Traits
//!
//! Each entity has an associated repository trait defining data access operations.
//! These traits are implemented in the infrastructure layer, following the
//! dependency inversion principle.

mod chat_room;
mod playlist;
mod relation;

pub use relation::{FriendRelation, RelationRepository, RelationStatus};

pub use chat_room::{ChatMessage, ChatPresenceStore, ChatRoom, ChatRoomOverview, ChatRoomRepository};

pub use playlist::{PlaylistBinding, PlaylistRepository};

#[cfg(test)]
pub use relation::MockRelationRepository;

#[cfg(test)]
pub use chat_room::{MockChatPresenceStore, MockChatRoomRepository};

#[cfg(test)]
pub use playlist::MockPlaylistRepository;
