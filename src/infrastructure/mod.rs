//! Infrastructure Layer
//!
//! Contains implementations for external services including:
//! - Database repositories (PostgreSQL) and their in-memory counterparts
//! - Chat presence stores (Redis or process-local)
//! - Prometheus metrics and dependency probes

pub mod cache;
pub mod database;
pub mod memory;
pub mod metrics;
pub mod probe;
pub mod repositories;
