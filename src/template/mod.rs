//! Summary template engine.
//!
//! This module provides:
//! - A tokenizer for the summary template language (`scanner`)
//! - Dotted path resolution with flattened-key and case-insensitive fallbacks (`resolver`)
//! - Rendering of token sequences into one display line (`renderer`)
//!
//! # Example
//!
//! ```
//! use kibana_json_formatter::template::{render, RenderOptions};
//! use serde_json::json;
//!
//! let doc = json!({"log": {"level": "WARN"}, "message": "disk almost full"});
//! let line = render(
//!     "wrap['log.level'] + ' ' + doc['message']",
//!     &doc,
//!     &RenderOptions::default(),
//! );
//! assert_eq!(line.as_deref(), Some("[WARN] disk almost full"));
//! ```
//!
//! Rendering never fails. A blank template, or one in which no reference or literal is
//! recognised, renders to `None`, which callers treat as "use the field list instead".

mod escape;
mod renderer;
mod resolver;
mod scanner;
mod types;

pub use escape::escape_markup;
pub use renderer::{
    render, CompiledTemplate, Rendered, ERROR_SPAN_CLOSE, ERROR_SPAN_OPEN, PLAIN_ERROR_DELIMITER,
};
pub use resolver::{
    display_value, lookup, lookup_with_depth, normalize_path, resolve, resolve_with_depth,
};
pub use scanner::{scan, strip_function_definitions};
pub use types::{
    Marker, OutputMode, RenderOptions, ScanOutput, Token, TokenSequence, DEFAULT_MAX_DEPTH,
};
