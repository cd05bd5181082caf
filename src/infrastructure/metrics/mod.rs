//! Prometheus Metrics Module
//!
//! Provides application-wide metrics collection using Prometheus.
//!
//! # Metrics Collected
//! - HTTP request counts by method, path, and status
//! - HTTP request latency histograms
//! - Friend request lifecycle events (sent, accepted, declined)
//! - Chat room entries and exits

use once_cell::sync::Lazy;
use prometheus::{Encoder, HistogramOpts, HistogramVec, IntCounterVec, Opts, Registry, TextEncoder};

const NAMESPACE: &str = "tunemate_social";

/// Global metrics registry
pub static REGISTRY: Lazy<Registry> = Lazy::new(|| {
    let registry = Registry::new();
    register_metrics(&registry);
    registry
});

/// HTTP request counter - tracks total requests by method, path, and status code
pub static HTTP_REQUESTS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("http_requests_total", "Total number of HTTP requests").namespace(NAMESPACE),
        &["method", "path", "status"],
    )
    .expect("Failed to create HTTP_REQUESTS_TOTAL metric")
});

/// HTTP request latency histogram - tracks request duration in seconds
pub static HTTP_REQUEST_DURATION_SECONDS: Lazy<HistogramVec> = Lazy::new(|| {
    let buckets = vec![0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0];
    HistogramVec::new(
        HistogramOpts::new("http_request_duration_seconds", "HTTP request latency in seconds")
            .namespace(NAMESPACE)
            .buckets(buckets),
        &["method", "path"],
    )
    .expect("Failed to create HTTP_REQUEST_DURATION_SECONDS metric")
});

/// Friend request lifecycle counter
pub static FRIEND_REQUEST_EVENTS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("friend_request_events_total", "Friend request lifecycle events").namespace(NAMESPACE),
        &["event"], // "sent", "accepted", "declined"
    )
    .expect("Failed to create FRIEND_REQUEST_EVENTS_TOTAL metric")
});

/// Chat room entry/exit counter
pub static CHAT_ROOM_EVENTS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("chat_room_events_total", "Chat room entries, exits and messages").namespace(NAMESPACE),
        &["event"], // "entered", "left", "message"
    )
    .expect("Failed to create CHAT_ROOM_EVENTS_TOTAL metric")
});

/// Register all metrics with the registry
fn register_metrics(registry: &Registry) {
    registry
        .register(Box::new(HTTP_REQUESTS_TOTAL.clone()))
        .expect("Failed to register HTTP_REQUESTS_TOTAL");
    registry
        .register(Box::new(HTTP_REQUEST_DURATION_SECONDS.clone()))
        .expect("Failed to register HTTP_REQUEST_DURATION_SECONDS");
    registry
        .register(Box::new(FRIEND_REQUEST_EVENTS_TOTAL.clone()))
        .expect("Failed to register FRIEND_REQUEST_EVENTS_TOTAL");
    registry
        .register(Box::new(CHAT_ROOM_EVENTS_TOTAL.clone()))
        .expect("Failed to register CHAT_ROOM_EVENTS_TOTAL");
}

/// Collect and encode all metrics as Prometheus text format
pub fn gather_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        tracing::error!("Failed to encode metrics: {}", e);
        return String::new();
    }
    String::from_utf8(buffer).unwrap_or_default()
}

/// Helper to record HTTP request metrics
pub fn record_http_request(method: &str, path: &str, status: u16, duration_secs: f64) {
    HTTP_REQUESTS_TOTAL
        .with_label_values(&[method, path, &status.to_string()])
        .inc();
    HTTP_REQUEST_DURATION_SECONDS
        .with_label_values(&[method, path])
        .observe(duration_secs);
}

/// Helper to record a friend request transition
pub fn record_friend_request_event(event: &str) {
    FRIEND_REQUEST_EVENTS_TOTAL.with_label_values(&[event]).inc();
}

/// Helper to record chat room activity
pub fn record_chat_room_event(event: &str) {
    CHAT_ROOM_EVENTS_TOTAL.with_label_values(&[event]).inc();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_registration() {
        // Force lazy initialization
        let _ = &*REGISTRY;
        let _ = &*HTTP_REQUESTS_TOTAL;
        let _ = &*FRIEND_REQUEST_EVENTS_TOTAL;
    }

    #[test]
    fn test_record_http_request() {
        record_http_request("GET", "/friends", 200, 0.001);
        let metrics = gather_metrics();
        assert!(metrics.contains("tunemate_social_http_requests_total"));
    }

    #[test]
    fn test_record_domain_events() {
        record_friend_request_event("sent");
        record_chat_room_event("entered");
        let metrics = gather_metrics();
        assert!(metrics.contains("friend_request_events_total"));
        assert!(metrics.contains("chat_room_events_total"));
    }
}
