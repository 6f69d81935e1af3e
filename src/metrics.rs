//! Prometheus metrics for upstream calls and advice fallbacks.
//!
//! None of these values influence a response; they only record what the
//! advisor saw while producing it.

use std::time::Instant;

use metrics::{counter, describe_counter, describe_histogram, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};
use tracing::debug;

// === Metric Name Constants ===

/// Upstream call latency metric name.
pub const METRIC_UPSTREAM_LATENCY: &str = "upstream_latency_ms";
/// Upstream calls attempted counter metric name.
pub const METRIC_UPSTREAM_REQUESTS: &str = "upstream_requests_total";
/// Upstream calls without a usable result counter metric name.
pub const METRIC_UPSTREAM_FAILURES: &str = "upstream_failures_total";
/// Fee advice served from the default heuristic counter metric name.
pub const METRIC_FEE_FALLBACKS: &str = "fee_advice_fallbacks_total";

/// Label value for the bitcoind JSON-RPC upstream.
pub const UPSTREAM_BITCOIND: &str = "bitcoind";
/// Label value for the LND REST upstream.
pub const UPSTREAM_LND: &str = "lnd";

/// Initialize all metric descriptions.
/// Call this once at startup to register metrics with descriptions.
pub fn init_metrics() {
    describe_histogram!(
        METRIC_UPSTREAM_LATENCY,
        "Upstream call latency in milliseconds"
    );
    describe_counter!(
        METRIC_UPSTREAM_REQUESTS,
        "Total number of upstream calls attempted"
    );
    describe_counter!(
        METRIC_UPSTREAM_FAILURES,
        "Total number of upstream calls that produced no usable result"
    );
    describe_counter!(
        METRIC_FEE_FALLBACKS,
        "Total number of fee advice responses served from the default heuristic"
    );

    debug!("Metrics initialized");
}

/// Install the global Prometheus recorder and return a handle for rendering.
pub fn install_recorder() -> Result<PrometheusHandle, BuildError> {
    let handle = PrometheusBuilder::new().install_recorder()?;
    init_metrics();
    Ok(handle)
}

/// Increment upstream request counter.
pub fn inc_upstream_requests(upstream: &'static str) {
    counter!(METRIC_UPSTREAM_REQUESTS, "upstream" => upstream).increment(1);
}

/// Increment upstream failure counter.
pub fn inc_upstream_failures(upstream: &'static str, reason: &'static str) {
    counter!(METRIC_UPSTREAM_FAILURES, "upstream" => upstream, "reason" => reason).increment(1);
}

/// Increment fee fallback counter.
pub fn inc_fee_fallbacks() {
    counter!(METRIC_FEE_FALLBACKS).increment(1);
}

/// RAII guard for timing operations.
/// Automatically records latency when dropped.
pub struct LatencyTimer {
    start: Instant,
    upstream: &'static str,
}

impl LatencyTimer {
    /// Create a new latency timer for the given upstream.
    pub fn new(upstream: &'static str) -> Self {
        Self {
            start: Instant::now(),
            upstream,
        }
    }

    /// Get elapsed time in milliseconds (without recording).
    pub fn elapsed_ms(&self) -> f64 {
        self.start.elapsed().as_secs_f64() * 1000.0
    }
}

impl Drop for LatencyTimer {
    fn drop(&mut self) {
        histogram!(METRIC_UPSTREAM_LATENCY, "upstream" => self.upstream).record(self.elapsed_ms());
    }
}

/// Start timing one upstream call.
pub fn timer_upstream(upstream: &'static str) -> LatencyTimer {
    inc_upstream_requests(upstream);
    LatencyTimer::new(upstream)
}
