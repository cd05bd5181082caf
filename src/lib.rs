//! # TuneMate Social Library
//!
//! Friend and chat backend for the TuneMate music service:
//! - Friend requests, friend lists and relation lookups
//! - One chat room per friendship, with presence tracking
//! - Common playlist host bindings
//! - PostgreSQL (or in-memory) storage and Redis (or local) presence
//!
//! ## Architecture
//!
//! The crate follows Clean Architecture principles:
//!
//! - **Domain Layer**: Entities and repository traits
//! - **Application Layer**: Social and chat services, DTOs
//! - **Infrastructure Layer**: Database, memory and presence implementations
//! - **Presentation Layer**: HTTP handlers, extractors and middleware
//!
//! ## Module Structure
//!
//! ```text
//! tunemate_social/
//! +-- config/         Configuration management
//! +-- domain/         Entities and repository traits
//! +-- application/    Application services and DTOs
//! +-- infrastructure/ Storage, presence, metrics and probes
//! +-- presentation/   HTTP routes, handlers and middleware
//! +-- shared/         Common utilities (errors, snowflake IDs)
//! ```

// Configuration module
pub mod config;

// Domain layer - Core business logic
pub mod domain;

// Application layer - Business services
pub mod application;

// Infrastructure layer - External implementations
pub mod infrastructure;

// Presentation layer - HTTP handlers
pub mod presentation;

// Shared utilities
pub mod shared;

// Application startup and state management
pub mod startup;

// Telemetry and observability
pub mod telemetry;
