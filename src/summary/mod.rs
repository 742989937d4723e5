//! Document summaries.
//!
//! A summary is either the rendered template line or, when no template is in effect,
//! a `key: value` row for each configured top-level field.

mod fallback;
mod types;

pub use fallback::summarize_fields;
pub use types::{
    default_summary_fields, parse_field_list, Summary, SummaryConfig, SummaryRow, PLACEHOLDER_LABEL,
};

use serde_json::Value;

use crate::template::{CompiledTemplate, RenderOptions};

/// Summarize a document with the template if one applies, else with the field list
pub fn summarize(doc: &Value, config: &SummaryConfig, options: &RenderOptions) -> Summary {
    match config.template.as_deref().and_then(CompiledTemplate::compile) {
        Some(template) => Summary::Template(template.render(doc, options)),
        None => Summary::Rows(summarize_fields(doc, &config.fields)),
    }
}
