//! Detection and formatting of JSON blobs found in log output.
//!
//! Mirrors what the log viewer integration does for each candidate element: cheap
//! sniff for `{`/`[`, full parse, then a summary and a pretty-printed body.

mod entry;

pub use entry::FormattedEntry;

use std::time::Instant;

use serde_json::Value;

use crate::metrics::{BlobMetrics, RenderMetrics};
use crate::profile::SummaryProfile;
use crate::summary::{summarize_fields, Summary, SummaryConfig};
use crate::template::{CompiledTemplate, RenderOptions};

/// Quick check before attempting a parse
pub fn looks_like_json(text: &str) -> bool {
    let trimmed = text.trim_start();
    trimmed.starts_with('{') || trimmed.starts_with('[')
}

/// Summarizes blobs with one compiled configuration
#[derive(Debug, Clone)]
pub struct Formatter {
    template: Option<CompiledTemplate>,
    fields: Vec<String>,
    options: RenderOptions,
}

impl Formatter {
    pub fn new(config: &SummaryConfig, options: RenderOptions) -> Self {
        let template = config
            .template
            .as_deref()
            .and_then(CompiledTemplate::compile);

        let configured = config
            .template
            .as_deref()
            .is_some_and(|t| !t.trim().is_empty());
        if configured && template.is_none() {
            tracing::warn!("Summary template has no recognised references; using field list");
        }

        Self {
            template,
            fields: config.fields.clone(),
            options,
        }
    }

    pub fn from_profile(profile: &SummaryProfile, options: RenderOptions) -> Self {
        Self::new(&profile.summary_config(), options)
    }

    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    /// True when summaries come from a template rather than the field list
    pub fn has_template(&self) -> bool {
        self.template.is_some()
    }

    /// Summarize an already parsed document, recording render metrics
    pub fn summarize(&self, doc: &Value) -> Summary {
        let Some(template) = &self.template else {
            return Summary::Rows(summarize_fields(doc, &self.fields));
        };

        let started = Instant::now();
        let rendered = template.render_detailed(doc, &self.options);
        RenderMetrics::observe_render(started.elapsed());
        RenderMetrics::record_unresolved(rendered.unresolved);

        Summary::Template(rendered.text)
    }

    /// Format a text blob if it is JSON
    pub fn format_blob(&self, text: &str) -> Option<FormattedEntry> {
        let trimmed = text.trim();
        if !looks_like_json(trimmed) {
            BlobMetrics::record_skipped("not_json");
            return None;
        }

        let document: Value = match serde_json::from_str(trimmed) {
            Ok(document) => document,
            Err(e) => {
                tracing::debug!(error = %e, "Blob looked like JSON but did not parse");
                BlobMetrics::record_skipped("parse_error");
                return None;
            }
        };

        let summary = self.summarize(&document);
        BlobMetrics::record_formatted(summary.kind());

        let details =
            serde_json::to_string_pretty(&document).unwrap_or_else(|_| trimmed.to_string());

        Some(FormattedEntry {
            summary,
            document,
            details,
        })
    }
}
