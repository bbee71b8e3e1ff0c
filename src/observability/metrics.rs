//! Metrics collection and exposition.
//!
//! # Metrics
//! - `session_gate_decisions_total` (counter): gate decisions by `outcome`
//!   (`forwarded`, `missing_token`, `rejected`, `errored`)
//! - `session_gate_backend_duration_seconds` (histogram): validation call
//!   latency by `outcome` (`valid`, `invalid`, `expired`, `timeout`, ...)

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

pub const DECISIONS_TOTAL: &str = "session_gate_decisions_total";
pub const BACKEND_DURATION: &str = "session_gate_backend_duration_seconds";

/// Install the Prometheus recorder and its scrape endpoint on `addr`.
///
/// Must be called from within a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

pub fn record_decision(outcome: &'static str) {
    ::metrics::counter!(DECISIONS_TOTAL, "outcome" => outcome).increment(1);
}

pub fn record_backend_call(outcome: &'static str, start: Instant) {
    ::metrics::histogram!(BACKEND_DURATION, "outcome" => outcome)
        .record(start.elapsed().as_secs_f64());
}
