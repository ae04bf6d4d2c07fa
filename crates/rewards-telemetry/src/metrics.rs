//! # Prometheus Metrics
//!
//! Counters for the rewards subsystems. Every metric registers itself into
//! [`REGISTRY`] the first time it is touched.
//!
//! ## Metric Naming Convention
//!
//! All metrics follow: `rw_<subsystem>_<metric>_<unit>`

use lazy_static::lazy_static;
use prometheus::{
    core::Collector, Encoder, Histogram, HistogramOpts, IntCounter, IntCounterVec, Opts, Registry,
    TextEncoder,
};

use crate::TelemetryError;

lazy_static! {
    /// Registry holding every rewards metric.
    pub static ref REGISTRY: Registry = Registry::new();

    // =========================================================================
    // BLOCK LOCATOR
    // =========================================================================

    /// Execution headers fetched by the locator (cache misses only)
    pub static ref LOCATOR_HEADER_FETCHES: IntCounter = register(
        IntCounter::new(
            "rw_locator_header_fetches_total",
            "Execution headers fetched while locating a block"
        ).expect("metric creation failed")
    );

    // =========================================================================
    // CLAIM BITMAP
    // =========================================================================

    /// Claim status queries served
    pub static ref CLAIM_STATUS_QUERIES: IntCounter = register(
        IntCounter::new(
            "rw_claim_status_queries_total",
            "Claim status queries served"
        ).expect("metric creation failed")
    );

    // =========================================================================
    // REWARD TREE
    // =========================================================================

    /// Tree generations by outcome (success, failure, rejected)
    pub static ref TREE_GENERATIONS: IntCounterVec = register(
        IntCounterVec::new(
            Opts::new("rw_tree_generations_total", "Rewards tree generations"),
            &["outcome"]
        ).expect("metric creation failed")
    );

    /// Wall time of a full tree generation
    pub static ref TREE_GENERATION_SECONDS: Histogram = register(
        Histogram::with_opts(
            HistogramOpts::new(
                "rw_tree_generation_seconds",
                "Time spent generating one rewards tree"
            ).buckets(vec![1.0, 5.0, 15.0, 60.0, 300.0, 900.0, 3600.0])
        ).expect("metric creation failed")
    );

    // =========================================================================
    // ARTIFACT DISTRIBUTOR
    // =========================================================================

    /// Artifact download attempts by source kind and outcome
    pub static ref ARTIFACT_DOWNLOADS: IntCounterVec = register(
        IntCounterVec::new(
            Opts::new("rw_artifact_downloads_total", "Rewards artifact download attempts"),
            &["source", "outcome"]
        ).expect("metric creation failed")
    );
}

fn register<C: Collector + Clone + 'static>(collector: C) -> C {
    // Duplicate registration only happens if a metric name is reused.
    let _ = REGISTRY.register(Box::new(collector.clone()));
    collector
}

/// Render every registered metric in the Prometheus text format.
pub fn gather_text() -> Result<String, TelemetryError> {
    let encoder = TextEncoder::new();
    let mut buffer = Vec::new();
    encoder
        .encode(&REGISTRY.gather(), &mut buffer)
        .map_err(|e| TelemetryError::MetricsEncode(e.to_string()))?;
    String::from_utf8(buffer).map_err(|e| TelemetryError::MetricsEncode(e.to_string()))
}
