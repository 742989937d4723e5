//! Metrics helper structs for convenient metric recording

use std::time::Duration;

use prometheus::{Encoder, TextEncoder};

use super::{BLOBS_FORMATTED_TOTAL, FIELDS_UNRESOLVED_TOTAL, LINES_SKIPPED_TOTAL, RENDER_DURATION};

/// Encode all metrics to Prometheus text format
pub fn encode_metrics() -> Result<String, prometheus::Error> {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    encoder.encode(&metric_families, &mut buffer)?;
    Ok(String::from_utf8(buffer).unwrap_or_default())
}

/// Helper struct for recording blob outcomes
pub struct BlobMetrics;

impl BlobMetrics {
    /// Record a formatted blob; `summary` is `template`, `fields` or `placeholder`
    pub fn record_formatted(summary: &str) {
        BLOBS_FORMATTED_TOTAL.with_label_values(&[summary]).inc();
    }

    /// Record a skipped line; `reason` is `not_json`, `parse_error` or `invalid_utf8`
    pub fn record_skipped(reason: &str) {
        LINES_SKIPPED_TOTAL.with_label_values(&[reason]).inc();
    }
}

/// Helper struct for recording template rendering
pub struct RenderMetrics;

impl RenderMetrics {
    pub fn record_unresolved(count: usize) {
        FIELDS_UNRESOLVED_TOTAL.inc_by(count as u64);
    }

    pub fn observe_render(elapsed: Duration) {
        RENDER_DURATION.observe(elapsed.as_secs_f64());
    }
}
