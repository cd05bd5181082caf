//! # Domain Layer
//!
//! Friend relations, chat rooms and playlist bindings, independent of any
//! storage or transport concerns.
//!
//! ## Design Principles
//!
//! - No dependencies on infrastructure or presentation layers
//! - Repository traits define data access contracts
//! - Entities encapsulate domain behavior

pub mod entities;

// Re-export commonly used types
pub use entities::*;
