//! Middleware
//!
//! Tower middleware for request processing.

pub mod auth;
pub mod cors;
pub mod logging;
pub mod metrics;

pub use auth::{issue_token, verify_token, Claims};
pub use metrics::track_metrics;
