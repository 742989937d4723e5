//! Dotted path resolution against arbitrary JSON documents
//!
//! Log backends store the same field either nested (`{"log": {"level": ..}}`) or
//! flattened (`{"log.level": ..}`), sometimes both, and users copy paths without
//! knowing which. Resolution order:
//!
//! 1. A top-level key equal to the whole path wins outright.
//! 2. Otherwise descend segment by segment. At each level candidate keys are built from
//!    the shortest prefix of the remaining segments up to all of them, so dotted keys
//!    are found at any depth. For each candidate the exact key is tried before keys
//!    that only match case-insensitively. Dead ends backtrack to the next candidate.

use serde_json::{Map, Value};

use super::scanner::parse_reference;
use super::types::DEFAULT_MAX_DEPTH;

/// Resolve a path to its display string
pub fn resolve(doc: &Value, raw_path: &str) -> Option<String> {
    resolve_with_depth(doc, raw_path, DEFAULT_MAX_DEPTH)
}

/// Resolve a path to its display string with an explicit recursion cap
pub fn resolve_with_depth(doc: &Value, raw_path: &str, max_depth: usize) -> Option<String> {
    lookup_with_depth(doc, raw_path, max_depth).map(display_value)
}

/// Resolve a path to the JSON value it names
pub fn lookup<'a>(doc: &'a Value, raw_path: &str) -> Option<&'a Value> {
    lookup_with_depth(doc, raw_path, DEFAULT_MAX_DEPTH)
}

pub fn lookup_with_depth<'a>(
    doc: &'a Value,
    raw_path: &str,
    max_depth: usize,
) -> Option<&'a Value> {
    let path = normalize_path(raw_path);

    if let Some(value) = doc.as_object().and_then(|obj| obj.get(path)) {
        return Some(value);
    }

    let segments: Vec<&str> = path.split('.').collect();
    let found = descend(doc, &segments, 0, max_depth);
    if found.is_none() {
        tracing::trace!(path = %path, "Path did not resolve");
    }
    found
}

/// Strip `doc['...']`-style wrappers and surrounding whitespace
pub fn normalize_path(raw_path: &str) -> &str {
    let trimmed = raw_path.trim();
    match parse_reference(trimmed) {
        Some((_, inner)) => inner.trim(),
        None => trimmed,
    }
}

/// Display form of a resolved value
pub fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        // Numbers, booleans, null, and containers use their JSON text
        other => other.to_string(),
    }
}

fn descend<'a>(
    value: &'a Value,
    segments: &[&str],
    depth: usize,
    max_depth: usize,
) -> Option<&'a Value> {
    if segments.is_empty() {
        return Some(value);
    }
    if depth >= max_depth {
        tracing::debug!(max_depth, "Path resolution depth limit reached");
        return None;
    }

    match value {
        Value::Object(obj) => descend_object(obj, segments, depth, max_depth),
        Value::Array(items) => {
            let index: usize = segments[0].parse().ok()?;
            descend(items.get(index)?, &segments[1..], depth + 1, max_depth)
        }
        _ => None,
    }
}

fn descend_object<'a>(
    obj: &'a Map<String, Value>,
    segments: &[&str],
    depth: usize,
    max_depth: usize,
) -> Option<&'a Value> {
    for len in 1..=segments.len() {
        let candidate = segments[..len].join(".");
        let remaining = &segments[len..];

        if let Some(child) = obj.get(&candidate) {
            if let Some(found) = descend(child, remaining, depth + 1, max_depth) {
                return Some(found);
            }
        }

        let folded = candidate.to_lowercase();
        let case_insensitive = obj
            .iter()
            .filter(|(key, _)| key.as_str() != candidate && key.to_lowercase() == folded);
        for (_, child) in case_insensitive {
            if let Some(found) = descend(child, remaining, depth + 1, max_depth) {
                return Some(found);
            }
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_direct_key_beats_traversal() {
        let doc = json!({"a.b": 1, "a": {"b": 2}});
        assert_eq!(resolve(&doc, "a.b"), Some("1".to_string()));
    }

    #[test]
    fn test_dotted_key_below_top_level() {
        let doc = json!({"a": {"b.c": 5}});
        assert_eq!(resolve(&doc, "a.b.c"), Some("5".to_string()));
    }

    #[test]
    fn test_nested_traversal() {
        let doc = json!({"kubernetes": {"pod": {"name": "api-7f9"}}});
        assert_eq!(
            resolve(&doc, "kubernetes.pod.name"),
            Some("api-7f9".to_string())
        );
    }

    #[test]
    fn test_case_insensitive_fallback() {
        let doc = json!({"Log": {"Level": "INFO"}});
        assert_eq!(resolve(&doc, "log.level"), Some("INFO".to_string()));
    }

    #[test]
    fn test_exact_case_preferred() {
        let doc = json!({"log": {"Level": "X"}, "Log": {"Level": "Y"}});
        assert_eq!(resolve(&doc, "log.level"), Some("X".to_string()));
    }

    #[test]
    fn test_backtracks_from_dead_end() {
        // `a` exists but has no `b.c`; the flattened `a.b` key does
        let doc = json!({"a": {"x": 1}, "a.b": {"c": "deep"}, "z": 0});
        assert_eq!(resolve(&doc, "a.b.c"), Some("deep".to_string()));
    }

    #[test]
    fn test_backtracks_from_exact_to_case_insensitive() {
        let doc = json!({"meta": {}, "META": {"host": "h1"}});
        assert_eq!(resolve(&doc, "meta.host"), Some("h1".to_string()));
    }

    #[test]
    fn test_shorter_candidate_tried_first() {
        let doc = json!({"a": {"b": {"c": "nested"}, "b.c": "flat"}});
        assert_eq!(resolve(&doc, "a.b.c"), Some("nested".to_string()));
    }

    #[test]
    fn test_null_is_a_value() {
        let doc = json!({"error": null});
        assert_eq!(resolve(&doc, "error"), Some("null".to_string()));
    }

    #[test]
    fn test_missing_is_none() {
        let doc = json!({"a": {"b": 1}});
        assert_eq!(resolve(&doc, "a.c"), None);
        assert_eq!(resolve(&doc, "a.b.c"), None);
        assert_eq!(resolve(&json!("scalar"), "a"), None);
    }

    #[test]
    fn test_scalar_display_forms() {
        let doc = json!({"n": 3.5, "t": true, "s": "text", "o": {"k": [1, 2]}});
        assert_eq!(resolve(&doc, "n"), Some("3.5".to_string()));
        assert_eq!(resolve(&doc, "t"), Some("true".to_string()));
        assert_eq!(resolve(&doc, "s"), Some("text".to_string()));
        assert_eq!(resolve(&doc, "o"), Some(r#"{"k":[1,2]}"#.to_string()));
    }

    #[test]
    fn test_array_index_segments() {
        let doc = json!({"items": [{"name": "first"}, {"name": "second"}]});
        assert_eq!(resolve(&doc, "items.1.name"), Some("second".to_string()));
        assert_eq!(resolve(&doc, "items.2.name"), None);
        assert_eq!(resolve(&doc, "items.x"), None);
    }

    #[test]
    fn test_accepts_wrapped_paths() {
        let doc = json!({"log": {"level": "WARN"}});
        assert_eq!(resolve(&doc, "  doc['log.level']  "), Some("WARN".to_string()));
        assert_eq!(resolve(&doc, "doc[\"log.level\"].value"), Some("WARN".to_string()));
        assert_eq!(resolve(&doc, "getValue(doc['log.level'])"), Some("WARN".to_string()));
        assert_eq!(resolve(&doc, " log.level "), Some("WARN".to_string()));
    }

    #[test]
    fn test_depth_limit() {
        let doc = json!({"a": {"b": {"c": {"d": 1}}}});
        assert_eq!(resolve_with_depth(&doc, "a.b.c.d", 4), Some("1".to_string()));
        assert_eq!(resolve_with_depth(&doc, "a.b.c.d", 3), None);
    }

    #[test]
    fn test_lookup_returns_value() {
        let doc = json!({"a": {"b": [1, 2]}});
        assert_eq!(lookup(&doc, "a.b"), Some(&json!([1, 2])));
    }

    #[test]
    fn test_resolution_is_deterministic() {
        let doc = json!({"Host": {"Name": "a"}, "HOST": {"Name": "b"}});
        let first = resolve(&doc, "host.name");
        assert!(first.is_some());
        for _ in 0..10 {
            assert_eq!(resolve(&doc, "host.name"), first);
        }
    }
}
