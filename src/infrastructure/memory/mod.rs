//! In-Memory Repositories
//!
//! Process-local implementations of the domain repository traits, selected
//! with `storage.backend = "memory"`. State is lost on restart and is not
//! shared between instances. Each repository guards its state with a single
//! lock, so every operation is atomic with respect to the others.

mod chat_room;
mod playlist;
mod relation;

pub use chat_room::MemoryChatRoomRepository;
pub use playlist::MemoryPlaylistRepository;
pub use relation::MemoryRelationRepository;
