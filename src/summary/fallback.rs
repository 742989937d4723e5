//! Fixed field-list summary used when no template applies

use serde_json::Value;

use super::types::SummaryRow;
use crate::template::display_value;

/// One row per listed field present as a direct top-level key, in list order.
/// Emits the placeholder row when none are present.
pub fn summarize_fields<S: AsRef<str>>(doc: &Value, fields: &[S]) -> Vec<SummaryRow> {
    let rows: Vec<SummaryRow> = match doc.as_object() {
        Some(obj) => fields
            .iter()
            .filter_map(|field| {
                let key = field.as_ref();
                obj.get(key)
                    .map(|value| SummaryRow::new(key, display_value(value)))
            })
            .collect(),
        None => Vec::new(),
    };

    if rows.is_empty() {
        return vec![SummaryRow::placeholder()];
    }
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_rows_follow_field_order() {
        let doc = json!({"level": "ERROR", "message": "x"});
        let rows = summarize_fields(&doc, &["message", "msg", "level", "error"]);
        assert_eq!(
            rows,
            vec![SummaryRow::new("message", "x"), SummaryRow::new("level", "ERROR")]
        );
    }

    #[test]
    fn test_placeholder_when_nothing_matches() {
        let doc = json!({"other": 1});
        assert_eq!(
            summarize_fields(&doc, &["message"]),
            vec![SummaryRow::placeholder()]
        );
    }

    #[test]
    fn test_no_path_traversal() {
        let doc = json!({"log": {"level": "INFO"}});
        assert_eq!(
            summarize_fields(&doc, &["log.level"]),
            vec![SummaryRow::placeholder()]
        );
    }

    #[test]
    fn test_exact_key_only() {
        let doc = json!({"Message": "x"});
        assert_eq!(
            summarize_fields(&doc, &["message"]),
            vec![SummaryRow::placeholder()]
        );
    }

    #[test]
    fn test_arrays_get_placeholder() {
        let doc = json!([{"message": "x"}]);
        assert_eq!(
            summarize_fields(&doc, &["message"]),
            vec![SummaryRow::placeholder()]
        );
    }

    #[test]
    fn test_non_string_values() {
        let doc = json!({"error": null, "code": 500});
        assert_eq!(
            summarize_fields(&doc, &["code", "error"]),
            vec![SummaryRow::new("code", "500"), SummaryRow::new("error", "null")]
        );
    }
}
