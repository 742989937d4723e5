//! Token and option types shared by the scanner, resolver and renderer

use serde::Deserialize;
use smallvec::SmallVec;

/// Default recursion cap for path resolution
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Output decoration attached to a field reference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Marker {
    /// `wrap['path']`, rendered inside square brackets
    Wrap,
    /// `doc['path']` or the legacy call form, rendered as-is
    Doc,
    /// `error['path']`, rendered inside an error span
    Error,
}

impl Marker {
    /// Keyword that introduces this marker in template source
    pub fn keyword(&self) -> &'static str {
        match self {
            Marker::Wrap => "wrap",
            Marker::Doc => "doc",
            Marker::Error => "error",
        }
    }

    pub(crate) fn from_keyword(ident: &str) -> Option<Self> {
        match ident {
            "wrap" => Some(Marker::Wrap),
            "doc" => Some(Marker::Doc),
            "error" => Some(Marker::Error),
            _ => None,
        }
    }
}

/// One unit of a scanned template
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// Verbatim text, with `\n` already decoded to a line break
    Literal { text: String },
    /// Reference to a document field, path kept exactly as written
    FieldRef { marker: Marker, path: String },
}

impl Token {
    pub fn literal(text: impl Into<String>) -> Self {
        Token::Literal { text: text.into() }
    }

    pub fn field(marker: Marker, path: impl Into<String>) -> Self {
        Token::FieldRef {
            marker,
            path: path.into(),
        }
    }
}

/// Ordered tokens produced by a single scan
pub type TokenSequence = SmallVec<[Token; 8]>;

/// Result of scanning a template
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanOutput {
    pub tokens: TokenSequence,
    /// True iff any recognised form matched, even if it produced no output
    pub had_any_match: bool,
}

/// Where rendered text is headed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputMode {
    /// Markup-bearing output: values are escaped, errors get a styled span
    #[default]
    Html,
    /// Terminal output: values verbatim, errors between `!!` delimiters
    Plain,
}

/// Caller-supplied rendering parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    pub mode: OutputMode,
    /// Maximum nesting the resolver will descend through
    pub max_depth: usize,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            mode: OutputMode::default(),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl RenderOptions {
    pub fn plain() -> Self {
        Self {
            mode: OutputMode::Plain,
            ..Self::default()
        }
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}
