//! Prometheus wiring.
//!
//! The pipeline and cache emit `aggregate_runs_total`,
//! `source_fetch_errors_total`, `cache_hits_total`,
//! `cache_refreshes_total` and the `source_fetch_ms` histogram; this
//! module installs the recorder those land in, describes them so the
//! series show up with help text, and serves the exposition endpoint.

use anyhow::{Context, Result};
use axum::{routing::get, Router};
use metrics::{describe_counter, describe_gauge, describe_histogram, gauge};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

/// Install the process-wide recorder. Call once at startup, before the
/// first request; the configured cache TTL is published as a static
/// gauge so dashboards can relate hit rates to it.
pub fn install(cache_ttl_secs: u64) -> Result<PrometheusHandle> {
    let handle = PrometheusBuilder::new()
        .install_recorder()
        .context("installing prometheus recorder")?;

    describe_counter!("aggregate_runs_total", "Aggregation requests served.");
    describe_counter!(
        "source_fetch_errors_total",
        "Per-source fetches that ended in an inline error."
    );
    describe_counter!("cache_hits_total", "Cache reads answered within the TTL.");
    describe_counter!("cache_refreshes_total", "Successful cache refreshes.");
    describe_histogram!(
        "source_fetch_ms",
        "Per-source fetch plus windowing time in milliseconds."
    );
    describe_gauge!("source_cache_ttl_secs", "Configured per-source cache TTL.");
    gauge!("source_cache_ttl_secs").set(cache_ttl_secs as f64);

    Ok(handle)
}

/// Router serving `/metrics` in the Prometheus exposition format.
pub fn router(handle: PrometheusHandle) -> Router {
    Router::new().route(
        "/metrics",
        get(move || {
            let handle = handle.clone();
            async move { handle.render() }
        }),
    )
}
