//! Metrics definitions for the token service.
//!
//! All metrics follow Prometheus naming conventions:
//! - `token_` prefix
//! - `_total` suffix for counters
//! - `_seconds` suffix for duration histograms
//!
//! # Cardinality
//!
//! - `status`: success, error (timeout for HTTP)
//! - `error_category`: none, client, configuration, internal
//! - `endpoint`: the fixed route set plus `/other`
//! - `method`: HTTP verbs

use crate::observability::ErrorCategory;
use metrics::{counter, histogram};
use metrics_exporter_prometheus::{Matcher, PrometheusBuilder, PrometheusHandle};
use std::time::Duration;

/// Initialize the Prometheus recorder and return the handle used by `/metrics`.
///
/// # Errors
///
/// Returns error if the recorder cannot be installed (e.g., already installed).
pub fn init_metrics_recorder() -> Result<PrometheusHandle, String> {
    metrics_builder()?
        .install_recorder()
        .map_err(|e| format!("Failed to install Prometheus recorder: {e}"))
}

/// Builder with the service's histogram buckets, not yet installed.
pub fn metrics_builder() -> Result<PrometheusBuilder, String> {
    PrometheusBuilder::new()
        .set_buckets_for_metric(
            Matcher::Prefix("token_http_request".to_string()),
            &[
                0.001, 0.005, 0.010, 0.025, 0.050, 0.100, 0.250, 0.500, 1.000,
            ],
        )
        .map_err(|e| format!("Failed to set HTTP request buckets: {e}"))?
        // Signing is an HMAC over a few hundred bytes
        .set_buckets_for_metric(
            Matcher::Prefix("token_issuance".to_string()),
            &[0.0001, 0.0005, 0.001, 0.002, 0.005, 0.010, 0.050],
        )
        .map_err(|e| format!("Failed to set token issuance buckets: {e}"))
}

// ============================================================================
// Token Metrics
// ============================================================================

/// Record token issuance duration and outcome
///
/// Metric: `token_issuance_duration_seconds`, `token_issuance_total`
/// Labels: `status`, `error_category`
pub fn record_token_issuance(error_category: Option<ErrorCategory>, duration: Duration) {
    let status = if error_category.is_some() {
        "error"
    } else {
        "success"
    };
    let category = error_category.map_or("none", |c| c.as_str());

    histogram!("token_issuance_duration_seconds", "status" => status)
        .record(duration.as_secs_f64());

    counter!("token_issuance_total", "status" => status, "error_category" => category)
        .increment(1);
}

// ============================================================================
// HTTP Request Metrics
// ============================================================================

/// Record HTTP request completion
///
/// Metric: `token_http_requests_total`, `token_http_request_duration_seconds`
/// Labels: `method`, `endpoint`, `status` / `status_code`
pub fn record_http_request(method: &str, endpoint: &str, status_code: u16, duration: Duration) {
    let normalized_endpoint = normalize_endpoint(endpoint);
    let status = categorize_status_code(status_code);

    histogram!("token_http_request_duration_seconds",
        "method" => method.to_string(),
        "endpoint" => normalized_endpoint,
        "status" => status
    )
    .record(duration.as_secs_f64());

    counter!("token_http_requests_total",
        "method" => method.to_string(),
        "endpoint" => normalized_endpoint,
        "status_code" => status_code.to_string()
    )
    .increment(1);
}

fn categorize_status_code(status_code: u16) -> &'static str {
    match status_code {
        200..=299 => "success",
        408 | 504 => "timeout",
        _ => "error",
    }
}

/// Unknown paths collapse to `/other` to bound cardinality.
fn normalize_endpoint(path: &str) -> &'static str {
    match path {
        "/api/token" => "/api/token",
        "/health" => "/health",
        "/ready" => "/ready",
        "/metrics" => "/metrics",
        _ => "/other",
    }
}
