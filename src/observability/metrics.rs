//! Metrics collection.
//!
//! # Metrics
//! - `dispatch_requests_total` (counter): calls by outcome (`success`/`failure`)
//! - `dispatch_failures_total` (counter): failures by error kind
//! - `dispatch_duration_seconds` (histogram): end-to-end dispatch latency
//! - `registry_handlers` (gauge): handlers registered at startup
//!
//! # Design Decisions
//! - Recorded through the `metrics` facade; without an installed recorder
//!   these are no-ops
//! - [`install_prometheus`] installs an in-process recorder with no listener;
//!   the caller decides where the rendered text goes

use std::time::Duration;

use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};

use crate::error::ErrorKind;

pub fn record_success(duration: Duration) {
    counter!("dispatch_requests_total", "outcome" => "success").increment(1);
    histogram!("dispatch_duration_seconds").record(duration.as_secs_f64());
}

pub fn record_failure(kind: ErrorKind, duration: Duration) {
    counter!("dispatch_requests_total", "outcome" => "failure").increment(1);
    counter!("dispatch_failures_total", "kind" => kind.as_str()).increment(1);
    histogram!("dispatch_duration_seconds").record(duration.as_secs_f64());
}

pub fn set_registered_handlers(count: usize) {
    gauge!("registry_handlers").set(count as f64);
}

/// Install a process-wide Prometheus recorder and return its render handle.
pub fn install_prometheus() -> Result<PrometheusHandle, BuildError> {
    let handle = PrometheusBuilder::new().install_recorder()?;
    tracing::debug!("Prometheus recorder installed");
    Ok(handle)
}
