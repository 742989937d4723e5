//! Prometheus metrics for the formatter.
//!
//! This module provides:
//! - Blob metrics (formatted by summary kind, skipped by reason)
//! - Template metrics (unresolved field references, render latency)

mod helpers;

pub use helpers::{encode_metrics, BlobMetrics, RenderMetrics};

use lazy_static::lazy_static;
use prometheus::{
    register_histogram, register_int_counter, register_int_counter_vec, Histogram, IntCounter,
    IntCounterVec,
};

/// Prefix for all metrics
const METRIC_PREFIX: &str = "kjf";

lazy_static! {
    // ============================================================================
    // Blob Metrics
    // ============================================================================

    /// Blobs turned into a summary, by summary kind
    pub static ref BLOBS_FORMATTED_TOTAL: IntCounterVec = register_int_counter_vec!(
        format!("{}_blobs_formatted_total", METRIC_PREFIX),
        "Total JSON blobs formatted",
        &["summary"]
    ).unwrap();

    /// Lines left untouched, by reason
    pub static ref LINES_SKIPPED_TOTAL: IntCounterVec = register_int_counter_vec!(
        format!("{}_lines_skipped_total", METRIC_PREFIX),
        "Total lines that were not formatted",
        &["reason"]
    ).unwrap();

    // ============================================================================
    // Template Metrics
    // ============================================================================

    /// Field references that resolved to nothing
    pub static ref FIELDS_UNRESOLVED_TOTAL: IntCounter = register_int_counter!(
        format!("{}_fields_unresolved_total", METRIC_PREFIX),
        "Total template field references that did not resolve"
    ).unwrap();

    /// Time spent rendering one document
    pub static ref RENDER_DURATION: Histogram = register_histogram!(
        format!("{}_render_duration_seconds", METRIC_PREFIX),
        "Template render duration in seconds",
        vec![0.000001, 0.00001, 0.0001, 0.001, 0.01, 0.1]
    ).unwrap();
}
