//! Token walking and output decoration

use serde_json::Value;

use super::escape::escape_markup;
use super::resolver::resolve_with_depth;
use super::scanner::scan;
use super::types::{Marker, OutputMode, RenderOptions, ScanOutput, Token};

/// Opening tag wrapped around `error[...]` values in markup output
pub const ERROR_SPAN_OPEN: &str = r#"<span class="kibana-json-error">"#;

/// Closing tag for [`ERROR_SPAN_OPEN`]
pub const ERROR_SPAN_CLOSE: &str = "</span>";

/// Delimiter placed on both sides of `error[...]` values in plain output
pub const PLAIN_ERROR_DELIMITER: &str = "!!";

/// Output of one render plus the references that resolved to nothing
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Rendered {
    pub text: String,
    pub unresolved: usize,
}

/// A template scanned once and rendered against any number of documents
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledTemplate {
    scan: ScanOutput,
}

impl CompiledTemplate {
    /// Scan a template.
    ///
    /// Returns `None` when there is effectively no template: the source is blank or no
    /// recognised form appears anywhere in it.
    pub fn compile(template: &str) -> Option<Self> {
        if template.trim().is_empty() {
            return None;
        }

        let scan = scan(template);
        tracing::trace!(
            tokens = scan.tokens.len(),
            had_any_match = scan.had_any_match,
            "Template scanned"
        );

        if !scan.had_any_match {
            return None;
        }

        Some(Self { scan })
    }

    pub fn tokens(&self) -> &[Token] {
        &self.scan.tokens
    }

    /// Render against one document. Unresolved references contribute nothing.
    pub fn render(&self, doc: &Value, options: &RenderOptions) -> String {
        self.render_detailed(doc, options).text
    }

    /// Like [`render`](Self::render), also counting unresolved references
    pub fn render_detailed(&self, doc: &Value, options: &RenderOptions) -> Rendered {
        let mut output = String::new();
        let mut unresolved = 0;

        for token in self.tokens() {
            match token {
                Token::Literal { text } => output.push_str(text),
                Token::FieldRef { marker, path } => {
                    match resolve_with_depth(doc, path, options.max_depth) {
                        Some(value) => decorate(&mut output, *marker, &value, options.mode),
                        None => unresolved += 1,
                    }
                }
            }
        }

        Rendered {
            text: output.trim().to_string(),
            unresolved,
        }
    }
}

/// Render a template against a document, or `None` to signal the field-list fallback
pub fn render(template: &str, doc: &Value, options: &RenderOptions) -> Option<String> {
    CompiledTemplate::compile(template).map(|compiled| compiled.render(doc, options))
}

fn decorate(output: &mut String, marker: Marker, value: &str, mode: OutputMode) {
    let value = match mode {
        OutputMode::Html => escape_markup(value),
        OutputMode::Plain => value.into(),
    };

    match (marker, mode) {
        (Marker::Doc, _) => output.push_str(&value),
        (Marker::Wrap, _) => {
            output.push('[');
            output.push_str(&value);
            output.push(']');
        }
        (Marker::Error, OutputMode::Html) => {
            output.push_str(ERROR_SPAN_OPEN);
            output.push_str(&value);
            output.push_str(ERROR_SPAN_CLOSE);
        }
        (Marker::Error, OutputMode::Plain) => {
            output.push_str(PLAIN_ERROR_DELIMITER);
            output.push_str(&value);
            output.push_str(PLAIN_ERROR_DELIMITER);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn html(template: &str, doc: &Value) -> Option<String> {
        render(template, doc, &RenderOptions::default())
    }

    #[test]
    fn test_empty_template_is_none() {
        assert_eq!(html("", &json!({"a": 1})), None);
        assert_eq!(html("   \n\t", &json!({"a": 1})), None);
    }

    #[test]
    fn test_inert_template_is_none() {
        assert_eq!(html("message + level", &json!({"message": "x"})), None);
    }

    #[test]
    fn test_missing_field_is_omitted() {
        assert_eq!(
            html("'A:' + doc['missing']", &json!({})),
            Some("A:".to_string())
        );
    }

    #[test]
    fn test_missing_leading_field_is_trimmed() {
        let doc = json!({"message": "boot ok"});
        assert_eq!(
            html("wrap['metadata.Cpu'] + ' ' + doc['message']", &doc),
            Some("boot ok".to_string())
        );
    }

    #[test]
    fn test_all_markers_html() {
        let doc = json!({"level": "ERROR", "msg": "disk <full>", "err": "E42"});
        assert_eq!(
            html("wrap['level'] + ' ' + doc['msg'] + ' ' + error['err']", &doc),
            Some(r#"[ERROR] disk &lt;full&gt; <span class="kibana-json-error">E42</span>"#.to_string())
        );
    }

    #[test]
    fn test_all_markers_plain() {
        let doc = json!({"level": "ERROR", "msg": "disk <full>", "err": "E42"});
        assert_eq!(
            render(
                "wrap['level'] + ' ' + doc['msg'] + ' ' + error['err']",
                &doc,
                &RenderOptions::plain()
            ),
            Some("[ERROR] disk <full> !!E42!!".to_string())
        );
    }

    #[test]
    fn test_literals_are_not_escaped() {
        let doc = json!({"a": "&"});
        assert_eq!(
            html("'<b>' + doc['a'] + '</b>'", &doc),
            Some("<b>&amp;</b>".to_string())
        );
    }

    #[test]
    fn test_chained_index_does_not_leak_into_output() {
        assert_eq!(
            html("'A' + doc['a']['b']", &json!({"a": "x"})),
            Some("Ax".to_string())
        );
    }

    #[test]
    fn test_literal_newline_decoded() {
        let doc = json!({"a": 1, "b": 2});
        assert_eq!(
            html(r"doc['a'] + '\n' + doc['b']", &doc),
            Some("1\n2".to_string())
        );
    }

    #[test]
    fn test_all_references_missing_renders_empty() {
        assert_eq!(html("doc['x'] + wrap['y']", &json!({})), Some(String::new()));
    }

    #[test]
    fn test_null_renders_as_text() {
        assert_eq!(
            html("'err=' + doc['error']", &json!({"error": null})),
            Some("err=null".to_string())
        );
    }

    #[test]
    fn test_legacy_template_with_boilerplate() {
        let template = "String getValue(def v) { return v == null ? '' : v; } \
                        getValue(doc['log.level']).value + ' | ' + getValue(doc['message'])";
        let doc = json!({"log": {"level": "info"}, "message": "started"});
        assert_eq!(html(template, &doc), Some("info | started".to_string()));
    }

    #[test]
    fn test_compiled_template_reused() {
        let compiled = CompiledTemplate::compile("doc['n']").unwrap();
        let options = RenderOptions::default();
        assert_eq!(compiled.render(&json!({"n": 1}), &options), "1");
        assert_eq!(compiled.render(&json!({"n": 2}), &options), "2");
        assert_eq!(compiled.tokens().len(), 1);
    }

    #[test]
    fn test_render_detailed_counts_unresolved() {
        let compiled =
            CompiledTemplate::compile("doc['a'] + ' ' + wrap['b'] + error['c.d']").unwrap();
        let options = RenderOptions::default();
        let rendered = compiled.render_detailed(&json!({"a": 1, "c": {}}), &options);
        assert_eq!(
            rendered,
            Rendered {
                text: "1".to_string(),
                unresolved: 2,
            }
        );

        let all_found = compiled.render_detailed(
            &json!({"a": 1, "b": 2, "c": {"d": 3}}),
            &RenderOptions::plain(),
        );
        assert_eq!(all_found.text, "1 [2]!!3!!");
        assert_eq!(all_found.unresolved, 0);
    }

    #[test]
    fn test_render_is_idempotent() {
        let doc = json!({"Log": {"Level": "INFO"}, "message": "m"});
        let template = "wrap['log.level'] + ' ' + doc['message']";
        let first = html(template, &doc);
        assert_eq!(first, Some("[INFO] m".to_string()));
        assert_eq!(html(template, &doc), first);
    }
}
