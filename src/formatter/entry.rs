//! Presentation of a formatted blob

use std::fmt::Write;

use serde::Serialize;
use serde_json::Value;

use crate::summary::{Summary, SummaryRow};
use crate::template::escape_markup;

const TOGGLE_LABEL: &str = "▶ Show Full JSON";

/// A JSON blob with its summary and pretty-printed body
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FormattedEntry {
    pub summary: Summary,
    #[serde(skip)]
    pub document: Value,
    /// Two-space indented JSON
    pub details: String,
}

impl FormattedEntry {
    /// Markup for the summary block followed by the collapsible details block.
    ///
    /// Template summaries are inserted as rendered, so they should come from a formatter
    /// running in HTML mode. Row text and details are escaped here.
    pub fn to_html(&self) -> String {
        let mut html = String::from(r#"<div class="kibana-json-summary">"#);

        match &self.summary {
            Summary::Template(line) => {
                let _ = write!(
                    html,
                    r#"<div class="kibana-json-summary-row kibana-json-template">{}</div>"#,
                    line
                );
            }
            Summary::Rows(rows) => {
                for row in rows {
                    html.push_str(&row_html(row));
                }
            }
        }

        let _ = write!(
            html,
            concat!(
                r#"</div><div class="kibana-json-details">"#,
                r#"<span class="kibana-json-toggle">{}</span>"#,
                r#"<pre class="kibana-json-parsed">{}</pre></div>"#
            ),
            TOGGLE_LABEL,
            escape_markup(&self.details)
        );

        html
    }

    /// Terminal rendering: the summary, then the indented JSON when requested
    pub fn to_text(&self, show_details: bool) -> String {
        let mut text = match &self.summary {
            Summary::Template(line) => line.clone(),
            Summary::Rows(rows) => rows.iter().map(row_text).collect::<Vec<_>>().join("\n"),
        };

        if show_details {
            for line in self.details.lines() {
                text.push_str("\n  ");
                text.push_str(line);
            }
        }

        text
    }
}

fn row_html(row: &SummaryRow) -> String {
    match &row.value {
        Some(value) => format!(
            concat!(
                r#"<div class="kibana-json-summary-row">"#,
                r#"<span class="kibana-json-key">{}:</span>"#,
                r#"<span class="kibana-json-value">{}</span></div>"#
            ),
            escape_markup(&row.key),
            escape_markup(value)
        ),
        None => format!(
            r#"<div class="kibana-json-summary-row"><span class="kibana-json-key">{}</span></div>"#,
            escape_markup(&row.key)
        ),
    }
}

fn row_text(row: &SummaryRow) -> String {
    match &row.value {
        Some(value) => format!("{}: {}", row.key, value),
        None => row.key.clone(),
    }
}
