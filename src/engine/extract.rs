//! Structural extractors.
//!
//! Each function here recognizes one shape in a [`NestedValue`] tree and
//! returns what it found. They never fail: a node that does not have the
//! expected shape (a `dependencies` field that is not a list, a `{min, max}`
//! pair with a string bound, ...) is simply not collected.
//!
//! ```text
//! NestedValue ──┬─ extract_key_paths              -> ["style", "style.indent"]
//!               ├─ extract_references             -> ["style.indent"]   (from "${style.indent}")
//!               ├─ extract_dependency_identifiers -> ["copilot:base.yml"]
//!               └─ extract_named_ranges           -> [("line-length", [80-120])]
//! ```

use crate::NestedValue;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// A closed numeric interval declared as `{min: <n>, max: <n>}`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NamedRange {
    pub min: f64,
    pub max: f64,
}

impl NamedRange {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Match a `{min, max}` node: a mapping with exactly those two fields,
    /// both numeric.
    fn from_node(value: &NestedValue) -> Option<Self> {
        let map = value.as_mapping()?;
        if map.len() != 2 {
            return None;
        }
        let min = map.get("min")?.as_f64()?;
        let max = map.get("max")?.as_f64()?;
        Some(Self { min, max })
    }
}

impl fmt::Display for NamedRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}-{}]", format_bound(self.min), format_bound(self.max))
    }
}

/// Whole numbers print without a trailing `.0`.
fn format_bound(v: f64) -> String {
    if v.fract() == 0.0 && v.abs() < i64::MAX as f64 { format!("{}", v as i64) } else { format!("{}", v) }
}

/// Closed-interval overlap test. Symmetric in its arguments.
pub fn ranges_overlap(a: &NamedRange, b: &NamedRange) -> bool {
    a.min <= b.max && b.min <= a.max
}

fn join_path(prefix: &str, key: &str) -> String {
    if prefix.is_empty() { key.to_string() } else { format!("{prefix}.{key}") }
}

/// Depth-first, pre-order list of dot-joined key paths.
///
/// Both intermediate and leaf keys are emitted. Only mappings are descended
/// into; sequences and scalars end a branch. A value that is not a mapping at
/// the top level has no key paths.
pub fn extract_key_paths(value: &NestedValue) -> Vec<String> {
    let mut keys = Vec::new();
    if let Some(map) = value.as_mapping() {
        collect_keys(map, "", &mut keys);
    }
    keys
}

fn collect_keys(map: &BTreeMap<String, NestedValue>, prefix: &str, keys: &mut Vec<String>) {
    for (key, child) in map {
        let path = join_path(prefix, key);
        keys.push(path.clone());
        if let Some(child_map) = child.as_mapping() {
            collect_keys(child_map, &path, keys);
        }
    }
}

/// `${...}` tokens found in the canonical text of `value`, left to right.
///
/// The first `}` closes a token and empty `${}` placeholders are ignored, so
/// `${a${b}}` yields `a${b`.
pub fn extract_references(value: &NestedValue) -> Vec<String> {
    let text = value.to_canonical_string();
    regex!(r"\$\{([^}]+)\}")
        .captures_iter(&text)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .collect()
}

/// String elements of the top-level `dependencies` list, first occurrence
/// order, without repeats.
pub fn extract_dependency_identifiers(value: &NestedValue) -> Vec<String> {
    let Some(items) = value.get("dependencies").and_then(NestedValue::as_sequence) else {
        return Vec::new();
    };

    let mut deps: Vec<String> = Vec::new();
    for dep in items.iter().filter_map(NestedValue::as_str) {
        if !deps.iter().any(|d| d == dep) {
            deps.push(dep.to_string());
        }
    }
    deps
}

/// Every `{min, max}` node keyed by its path.
///
/// A range node is never searched for nested ranges.
pub fn extract_named_ranges(value: &NestedValue) -> Vec<(String, NamedRange)> {
    let mut ranges = Vec::new();
    if let Some(map) = value.as_mapping() {
        collect_ranges(map, "", &mut ranges);
    }
    ranges
}

fn collect_ranges(map: &BTreeMap<String, NestedValue>, prefix: &str, ranges: &mut Vec<(String, NamedRange)>) {
    for (key, child) in map {
        let path = join_path(prefix, key);
        if let Some(range) = NamedRange::from_node(child) {
            ranges.push((path, range));
        } else if let Some(child_map) = child.as_mapping() {
            collect_ranges(child_map, &path, ranges);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn value(v: serde_json::Value) -> NestedValue {
        NestedValue::from(v)
    }

    #[test]
    fn key_paths_include_intermediate_and_leaf_keys() {
        let doc = value(json!({"style": {"indent": 2, "quotes": {"kind": "single"}}, "name": "x"}));
        assert_eq!(
            extract_key_paths(&doc),
            vec!["name", "style", "style.indent", "style.quotes", "style.quotes.kind"]
        );
    }

    #[test]
    fn key_paths_do_not_descend_into_sequences() {
        let doc = value(json!({"list": [{"inner": 1}], "n": null}));
        assert_eq!(extract_key_paths(&doc), vec!["list", "n"]);
        assert!(extract_key_paths(&value(json!([{"a": 1}]))).is_empty());
        assert!(extract_key_paths(&value(json!("scalar"))).is_empty());
    }

    #[test]
    fn references_are_scanned_left_to_right() {
        let doc = value(json!({"a": "use ${style.indent} and ${naming}", "b": ["${x}"]}));
        assert_eq!(extract_references(&doc), vec!["style.indent", "naming", "x"]);
    }

    #[test]
    fn first_closing_brace_ends_a_reference() {
        let doc = value(json!({"a": "${outer${inner}}", "b": "${}"}));
        assert_eq!(extract_references(&doc), vec!["outer${inner"]);
    }

    #[test]
    fn references_in_keys_are_found_too() {
        let doc = value(json!({"${key}": 1}));
        assert_eq!(extract_references(&doc), vec!["key"]);
    }

    #[test]
    fn dependencies_keep_only_strings() {
        let doc = value(json!({"dependencies": ["a", 3, "b", {"c": 1}, "a"]}));
        assert_eq!(extract_dependency_identifiers(&doc), vec!["a", "b"]);
    }

    #[test]
    fn dependencies_must_be_a_top_level_list() {
        assert!(extract_dependency_identifiers(&value(json!({"dependencies": "a"}))).is_empty());
        assert!(extract_dependency_identifiers(&value(json!({"nested": {"dependencies": ["a"]}}))).is_empty());
        assert!(extract_dependency_identifiers(&value(json!(["a"]))).is_empty());
    }

    #[test]
    fn ranges_are_found_at_any_depth() {
        let doc = value(json!({
            "line-length": {"min": 80, "max": 120},
            "limits": {"depth": {"min": 1.5, "max": 3}},
        }));
        assert_eq!(
            extract_named_ranges(&doc),
            vec![
                ("limits.depth".to_string(), NamedRange::new(1.5, 3.0)),
                ("line-length".to_string(), NamedRange::new(80.0, 120.0)),
            ]
        );
    }

    #[test]
    fn range_nodes_must_have_exactly_two_numeric_bounds() {
        let doc = value(json!({
            "extra": {"min": 1, "max": 2, "step": 1},
            "text": {"min": "1", "max": 2},
            "half": {"min": 1},
        }));
        assert!(extract_named_ranges(&doc).is_empty());
    }

    #[test]
    fn range_nodes_are_not_searched_further() {
        let doc = value(json!({"outer": {"min": 0, "max": 10}}));
        assert_eq!(extract_named_ranges(&doc).len(), 1);
    }

    #[test]
    fn overlap_is_symmetric_and_closed() {
        let a = NamedRange::new(10.0, 20.0);
        let b = NamedRange::new(15.0, 25.0);
        let c = NamedRange::new(21.0, 30.0);
        let touching = NamedRange::new(20.0, 22.0);

        assert!(ranges_overlap(&a, &b));
        assert!(ranges_overlap(&b, &a));
        assert!(!ranges_overlap(&a, &c));
        assert!(!ranges_overlap(&c, &a));
        assert!(ranges_overlap(&a, &touching));
    }

    #[test]
    fn range_display_drops_trailing_zero() {
        assert_eq!(NamedRange::new(80.0, 120.0).to_string(), "[80-120]");
        assert_eq!(NamedRange::new(0.5, 2.0).to_string(), "[0.5-2]");
    }
}
