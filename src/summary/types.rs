//! Summary configuration and result types

use serde::{Deserialize, Serialize};

/// Label of the row emitted when none of the configured fields are present
pub const PLACEHOLDER_LABEL: &str = "JSON Object";

/// Fields shown when no template is configured
pub fn default_summary_fields() -> Vec<String> {
    ["message", "msg", "level", "error"]
        .into_iter()
        .map(String::from)
        .collect()
}

/// Split a comma-separated field list as typed in a settings form
pub fn parse_field_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

/// What a summary should show, passed explicitly into every summarize call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryConfig {
    /// Summary template; blank or absent means "use the field list"
    #[serde(default)]
    pub template: Option<String>,

    /// Top-level keys shown in order when no template applies
    #[serde(default = "default_summary_fields")]
    pub fields: Vec<String>,
}

impl Default for SummaryConfig {
    fn default() -> Self {
        Self {
            template: None,
            fields: default_summary_fields(),
        }
    }
}

impl SummaryConfig {
    pub fn with_template(template: impl Into<String>) -> Self {
        Self {
            template: Some(template.into()),
            ..Self::default()
        }
    }

    pub fn with_fields<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            template: None,
            fields: fields.into_iter().map(Into::into).collect(),
        }
    }
}

/// One `key: value` line of a field-list summary
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SummaryRow {
    pub key: String,
    /// `None` only for the placeholder row
    pub value: Option<String>,
}

impl SummaryRow {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: Some(value.into()),
        }
    }

    pub fn placeholder() -> Self {
        Self {
            key: PLACEHOLDER_LABEL.to_string(),
            value: None,
        }
    }

    pub fn is_placeholder(&self) -> bool {
        self.value.is_none()
    }
}

/// Result of summarizing one document
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "summary", rename_all = "lowercase")]
pub enum Summary {
    /// Rendered template line
    Template(String),
    /// Field-list rows, never empty
    Rows(Vec<SummaryRow>),
}

impl Summary {
    /// Metric label for this summary
    pub fn kind(&self) -> &'static str {
        match self {
            Summary::Template(_) => "template",
            Summary::Rows(rows) if rows.iter().all(SummaryRow::is_placeholder) => "placeholder",
            Summary::Rows(_) => "fields",
        }
    }
}
