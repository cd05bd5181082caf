//! Health Check Handlers
//!
//! Liveness and readiness probes.
//!
//! # Endpoints
//! - `GET /health` - Basic health check
//! - `GET /health/live` - Liveness probe (is the server running?)
//! - `GET /health/ready` - Readiness probe (are storage and presence reachable?)

use std::collections::BTreeMap;
use std::time::Instant;

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use chrono::{DateTime, Utc};
use futures::future::join_all;
use once_cell::sync::Lazy;
use serde::Serialize;

use crate::infrastructure::probe::{DependencyProbe, ProbeReport};
use crate::startup::AppState;

/// Server start time for uptime calculation
static SERVER_START: Lazy<Instant> = Lazy::new(Instant::now);
static SERVER_START_TIME: Lazy<DateTime<Utc>> = Lazy::new(Utc::now);

/// Pin the start time (call during startup)
pub fn init_server_start() {
    Lazy::force(&SERVER_START);
    Lazy::force(&SERVER_START_TIME);
}

/// Basic health response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

/// Detailed readiness response
#[derive(Debug, Serialize)]
pub struct DetailedHealthResponse {
    pub status: HealthStatus,
    pub version: &'static str,
    pub uptime_seconds: u64,
    pub started_at: String,
    pub checks: BTreeMap<&'static str, ServiceHealth>,
}

/// Health of one dependency
#[derive(Debug, Serialize)]
pub struct ServiceHealth {
    pub status: HealthStatus,
    #[serde(skip)]
    pub critical: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latency_ms: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Overall health status
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Degraded,
    Unhealthy,
}

/// Simple liveness response
#[derive(Debug, Serialize)]
pub struct LivenessResponse {
    pub status: &'static str,
}

/// Basic health check endpoint
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Liveness probe. 200 while the process serves requests.
pub async fn liveness() -> Json<LivenessResponse> {
    Json(LivenessResponse { status: "alive" })
}

/// Readiness probe. 503 when a critical dependency is unreachable.
pub async fn readiness(State(state): State<AppState>) -> impl IntoResponse {
    let reports = join_all(state.probes.iter().map(|probe| async move {
        let report = probe.check().await;
        (probe.name(), assess(probe.as_ref(), report))
    }))
    .await;

    let checks: BTreeMap<_, _> = reports.into_iter().collect();
    let overall_status = determine_overall_status(checks.values());

    let response = DetailedHealthResponse {
        status: overall_status,
        version: env!("CARGO_PKG_VERSION"),
        uptime_seconds: SERVER_START.elapsed().as_secs(),
        started_at: SERVER_START_TIME.to_rfc3339(),
        checks,
    };

    let status_code = match overall_status {
        HealthStatus::Healthy | HealthStatus::Degraded => StatusCode::OK,
        HealthStatus::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
    };

    (status_code, Json(response))
}

fn assess(probe: &dyn DependencyProbe, report: ProbeReport) -> ServiceHealth {
    let status = match (report.reachable, report.latency_ms) {
        (false, _) => HealthStatus::Unhealthy,
        (true, Some(ms)) if ms >= probe.degraded_after_ms() => HealthStatus::Degraded,
        (true, _) => HealthStatus::Healthy,
    };

    ServiceHealth {
        status,
        critical: probe.critical(),
        latency_ms: report.latency_ms,
        message: report.message,
    }
}

/// Unhealthy if a critical dependency is down, degraded if anything else is off
fn determine_overall_status<'a>(checks: impl IntoIterator<Item = &'a ServiceHealth>) -> HealthStatus {
    let mut overall = HealthStatus::Healthy;

    for check in checks {
        match check.status {
            HealthStatus::Unhealthy if check.critical => return HealthStatus::Unhealthy,
            HealthStatus::Healthy => {}
            _ => overall = HealthStatus::Degraded,
        }
    }

    overall
}

#[cfg(test)]
mod tests {
    use super::*;

    fn health(status: HealthStatus, critical: bool) -> ServiceHealth {
        ServiceHealth {
            status,
            critical,
            latency_ms: None,
            message: None,
        }
    }

    #[test]
    fn test_health_status_serialization() {
        let json = serde_json::to_string(&HealthStatus::Healthy).unwrap();
        assert_eq!(json, "\"healthy\"");
    }

    #[test]
    fn test_determine_overall_status() {
        let db_ok = health(HealthStatus::Healthy, true);
        let db_slow = health(HealthStatus::Degraded, true);
        let db_down = health(HealthStatus::Unhealthy, true);
        let redis_down = health(HealthStatus::Unhealthy, false);

        assert_eq!(determine_overall_status([&db_ok]), HealthStatus::Healthy);
        assert_eq!(determine_overall_status([&db_slow]), HealthStatus::Degraded);
        assert_eq!(determine_overall_status([&db_ok, &redis_down]), HealthStatus::Degraded);
        assert_eq!(determine_overall_status([&redis_down, &db_down]), HealthStatus::Unhealthy);
    }

    #[test]
    fn test_no_dependencies_is_healthy() {
        assert_eq!(determine_overall_status(std::iter::empty::<&ServiceHealth>()), HealthStatus::Healthy);
    }
}
