//! Metrics collection and exposition.
//!
//! # Metrics
//! - `launcher_requests_total` (counter): requests by method, status
//! - `launcher_request_duration_seconds` (histogram): latency distribution
//! - `launcher_in_flight_requests` (gauge): requests currently processed
//! - `launcher_lifecycle_state` (gauge): numeric lifecycle state
//!
//! The Prometheus text is served by the HTTP server at `/metrics` on the
//! main listener; no second socket is opened.

use std::sync::OnceLock;
use std::time::Instant;

use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

use crate::lifecycle::LifecycleState;

static PROMETHEUS: OnceLock<Option<PrometheusHandle>> = OnceLock::new();

/// Install the Prometheus recorder once per process and return its handle.
///
/// Returns `None` if another recorder was installed first.
pub fn init_metrics() -> Option<PrometheusHandle> {
    PROMETHEUS
        .get_or_init(|| match PrometheusBuilder::new().install_recorder() {
            Ok(handle) => Some(handle),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to install metrics recorder");
                None
            }
        })
        .clone()
}

/// Record a completed request.
pub fn record_request(method: &str, status: u16, start: Instant) {
    let duration = start.elapsed().as_secs_f64();
    let method = method.to_string();
    let status = status.to_string();

    counter!("launcher_requests_total", "method" => method.clone(), "status" => status.clone())
        .increment(1);
    histogram!("launcher_request_duration_seconds", "method" => method, "status" => status)
        .record(duration);
}

pub fn record_in_flight(count: u64) {
    gauge!("launcher_in_flight_requests").set(count as f64);
}

pub fn record_lifecycle_state(state: LifecycleState) {
    gauge!("launcher_lifecycle_state").set(f64::from(state.code()));
}
