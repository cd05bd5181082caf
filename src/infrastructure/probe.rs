//! Dependency Probes
//!
//! Connectivity checks for the readiness endpoint.

use std::time::Instant;

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use sqlx::PgPool;

/// Outcome of a single probe
#[derive(Debug, Clone)]
pub struct ProbeReport {
    pub reachable: bool,
    pub latency_ms: Option<u64>,
    pub message: Option<String>,
}

impl ProbeReport {
    fn ok(started: Instant) -> Self {
        Self {
            reachable: true,
            latency_ms: Some(started.elapsed().as_millis() as u64),
            message: None,
        }
    }

    fn failed(message: String) -> Self {
        Self {
            reachable: false,
            latency_ms: None,
            message: Some(message),
        }
    }
}

/// A backing service the readiness check pings
#[async_trait]
pub trait DependencyProbe: Send + Sync {
    /// Name reported in the readiness body
    fn name(&self) -> &'static str;

    /// An unreachable critical dependency makes the instance not ready
    fn critical(&self) -> bool;

    /// Latency above which the dependency counts as degraded
    fn degraded_after_ms(&self) -> u64;

    async fn check(&self) -> ProbeReport;
}

/// PostgreSQL probe
pub struct PostgresProbe {
    pool: PgPool,
}

impl PostgresProbe {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DependencyProbe for PostgresProbe {
    fn name(&self) -> &'static str {
        "database"
    }

    fn critical(&self) -> bool {
        true
    }

    fn degraded_after_ms(&self) -> u64 {
        100
    }

    async fn check(&self) -> ProbeReport {
        let start = Instant::now();
        match sqlx::query("SELECT 1").execute(&self.pool).await {
            Ok(_) => ProbeReport::ok(start),
            Err(e) => ProbeReport::failed(format!("Database connection failed: {}", e)),
        }
    }
}

/// Redis probe. Presence loss only degrades the service.
pub struct RedisProbe {
    redis: ConnectionManager,
}

impl RedisProbe {
    pub fn new(redis: ConnectionManager) -> Self {
        Self { redis }
    }
}

#[async_trait]
impl DependencyProbe for RedisProbe {
    fn name(&self) -> &'static str {
        "redis"
    }

    fn critical(&self) -> bool {
        false
    }

    fn degraded_after_ms(&self) -> u64 {
        50
    }

    async fn check(&self) -> ProbeReport {
        let start = Instant::now();
        let mut conn = self.redis.clone();
        match redis::cmd("PING").query_async::<String>(&mut conn).await {
            Ok(_) => ProbeReport::ok(start),
            Err(e) => ProbeReport::failed(format!("Redis connection failed: {}", e)),
        }
    }
}
