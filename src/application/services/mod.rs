//! Application Services
//!
//! Business logic services that coordinate domain operations.
//!
//! ## Available Services
//!
//! - **SocialService**: Friend requests, friend lists, relation and playlist host lookups
//! - **ChatService**: Chat room entry/exit, room listings and history

pub mod chat_service;
pub mod social_service;

// Re-export social service types
pub use social_service::{
    FriendDto, ReceivedRequestDto, RelationMembersDto, SocialError, SocialService, SocialServiceImpl,
};

// Re-export chat service types
pub use chat_service::{ChatError, ChatRoomListItemDto, ChatService, ChatServiceImpl, MAX_MESSAGE_LENGTH};
