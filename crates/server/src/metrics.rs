//! Prometheus metrics for observability.
//!
//! This module provides metrics for monitoring the library server:
//! - HTTP request metrics (latency, counts, in flight)
//! - Authentication failures by reason
//! - Catalog writes and current record counts (collected on scrape)

use once_cell::sync::Lazy;
use prometheus::{
    self, Encoder, HistogramOpts, HistogramVec, IntCounterVec, IntGauge, Opts, Registry,
    TextEncoder,
};
use tracing::warn;

use crate::state::AppState;

/// Global metrics registry.
pub static REGISTRY: Lazy<Registry> = Lazy::new(|| {
    let registry = Registry::new();
    register_metrics(&registry);
    registry
});

// =============================================================================
// HTTP Request Metrics
// =============================================================================

/// HTTP request duration in seconds.
pub static HTTP_REQUEST_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "libris_http_request_duration_seconds",
            "HTTP request duration in seconds",
        )
        .buckets(vec![
            0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0,
        ]),
        &["method", "path", "status"],
    )
    .unwrap()
});

/// HTTP requests total count.
pub static HTTP_REQUESTS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("libris_http_requests_total", "Total HTTP requests"),
        &["method", "path", "status"],
    )
    .unwrap()
});

/// HTTP requests currently in flight.
pub static HTTP_REQUESTS_IN_FLIGHT: Lazy<IntGauge> = Lazy::new(|| {
    IntGauge::new(
        "libris_http_requests_in_flight",
        "Number of HTTP requests currently being processed",
    )
    .unwrap()
});

/// Authentication failures.
pub static AUTH_FAILURES_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("libris_auth_failures_total", "Total authentication failures"),
        &["reason"],
    )
    .unwrap()
});

// =============================================================================
// Library Metrics
// =============================================================================

/// Successful catalog writes.
pub static LIBRARY_WRITES_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "libris_library_writes_total",
            "Successful catalog writes by entity and operation",
        ),
        &["entity", "operation"],
    )
    .unwrap()
});

/// Authors in the catalog (collected dynamically).
pub static AUTHORS: Lazy<IntGauge> =
    Lazy::new(|| IntGauge::new("libris_authors", "Number of authors").unwrap());

/// Categories in the catalog (collected dynamically).
pub static CATEGORIES: Lazy<IntGauge> =
    Lazy::new(|| IntGauge::new("libris_categories", "Number of categories").unwrap());

/// Books in the catalog (collected dynamically).
pub static BOOKS: Lazy<IntGauge> =
    Lazy::new(|| IntGauge::new("libris_books", "Number of books").unwrap());

// =============================================================================
// Registration
// =============================================================================

fn register_metrics(registry: &Registry) {
    // HTTP
    registry
        .register(Box::new(HTTP_REQUEST_DURATION.clone()))
        .unwrap();
    registry
        .register(Box::new(HTTP_REQUESTS_TOTAL.clone()))
        .unwrap();
    registry
        .register(Box::new(HTTP_REQUESTS_IN_FLIGHT.clone()))
        .unwrap();
    registry
        .register(Box::new(AUTH_FAILURES_TOTAL.clone()))
        .unwrap();

    // Library
    registry
        .register(Box::new(LIBRARY_WRITES_TOTAL.clone()))
        .unwrap();
    registry.register(Box::new(AUTHORS.clone())).unwrap();
    registry.register(Box::new(CATEGORIES.clone())).unwrap();
    registry.register(Box::new(BOOKS.clone())).unwrap();
}

/// Count a successful write, e.g. `record_write("book", "update")`.
pub fn record_write(entity: &str, operation: &str) {
    LIBRARY_WRITES_TOTAL
        .with_label_values(&[entity, operation])
        .inc();
}

/// Encode all metrics as Prometheus text format.
pub fn encode_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        warn!(error = %e, "Failed to encode metrics");
    }
    String::from_utf8_lossy(&buffer).into_owned()
}

/// Refresh the record-count gauges from the store.
///
/// Called before encoding so a scrape always sees current counts.
pub fn collect_dynamic_metrics(state: &AppState) {
    match state.library().counts() {
        Ok(counts) => {
            AUTHORS.set(counts.authors as i64);
            CATEGORIES.set(counts.categories as i64);
            BOOKS.set(counts.books as i64);
        }
        Err(e) => warn!(error = %e, "Failed to collect library counts"),
    }
}

/// Normalize a path for metric labels (replace IDs with placeholders).
pub fn normalize_path(path: &str) -> String {
    static NUMERIC: Lazy<regex_lite::Regex> =
        Lazy::new(|| regex_lite::Regex::new(r"/\d+(/|$)").unwrap());

    NUMERIC.replace_all(path, "/{id}$1").into_owned()
}
