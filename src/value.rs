use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Generic nested value produced by every format parser.
///
/// YAML, JSON and the sectioned Markdown format all land in this shape, so the
/// engine never needs to know which format a document came from. Mapping key
/// order is not significant; a `BTreeMap` keeps iteration deterministic.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NestedValue {
    #[default]
    Null,
    Bool(bool),
    Number(serde_json::Number),
    String(String),
    Sequence(Vec<NestedValue>),
    Mapping(BTreeMap<String, NestedValue>),
}

impl NestedValue {
    pub fn as_mapping(&self) -> Option<&BTreeMap<String, NestedValue>> {
        match self {
            NestedValue::Mapping(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_sequence(&self) -> Option<&[NestedValue]> {
        match self {
            NestedValue::Sequence(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            NestedValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            NestedValue::Number(n) => n.as_f64(),
            _ => None,
        }
    }

    /// Look up a direct child of a mapping node.
    pub fn get(&self, key: &str) -> Option<&NestedValue> {
        self.as_mapping().and_then(|map| map.get(key))
    }

    /// Compact JSON text of the value.
    ///
    /// Reference tokens are scanned from this text, so it has to be stable for
    /// equal values: mappings serialize in key order and numbers keep the form
    /// they were parsed with.
    pub fn to_canonical_string(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }
}

impl From<serde_json::Value> for NestedValue {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => NestedValue::Null,
            serde_json::Value::Bool(b) => NestedValue::Bool(b),
            serde_json::Value::Number(n) => NestedValue::Number(n),
            serde_json::Value::String(s) => NestedValue::String(s),
            serde_json::Value::Array(items) => NestedValue::Sequence(items.into_iter().map(Into::into).collect()),
            serde_json::Value::Object(map) => {
                NestedValue::Mapping(map.into_iter().map(|(k, v)| (k, v.into())).collect())
            }
        }
    }
}

/// YAML is richer than JSON: mapping keys of any scalar type become their
/// string form (`1: low` is keyed `"1"`), non-finite floats become strings,
/// and tags are dropped.
impl From<serde_yaml::Value> for NestedValue {
    fn from(value: serde_yaml::Value) -> Self {
        match value {
            serde_yaml::Value::Null => NestedValue::Null,
            serde_yaml::Value::Bool(b) => NestedValue::Bool(b),
            serde_yaml::Value::Number(n) => yaml_number(&n),
            serde_yaml::Value::String(s) => NestedValue::String(s),
            serde_yaml::Value::Sequence(items) => NestedValue::Sequence(items.into_iter().map(Into::into).collect()),
            serde_yaml::Value::Mapping(map) => {
                NestedValue::Mapping(map.into_iter().map(|(k, v)| (yaml_key(k), v.into())).collect())
            }
            serde_yaml::Value::Tagged(tagged) => tagged.value.into(),
        }
    }
}

fn yaml_number(n: &serde_yaml::Number) -> NestedValue {
    let number = if let Some(u) = n.as_u64() {
        Some(serde_json::Number::from(u))
    } else if let Some(i) = n.as_i64() {
        Some(serde_json::Number::from(i))
    } else {
        n.as_f64().and_then(serde_json::Number::from_f64)
    };
    number.map(NestedValue::Number).unwrap_or_else(|| NestedValue::String(n.to_string()))
}

fn yaml_key(key: serde_yaml::Value) -> String {
    match key {
        serde_yaml::Value::String(s) => s,
        serde_yaml::Value::Null => "null".to_string(),
        serde_yaml::Value::Bool(b) => b.to_string(),
        serde_yaml::Value::Number(n) => n.to_string(),
        serde_yaml::Value::Tagged(tagged) => yaml_key(tagged.value),
        complex => NestedValue::from(complex).to_canonical_string(),
    }
}

impl From<&str> for NestedValue {
    fn from(value: &str) -> Self {
        NestedValue::String(value.to_string())
    }
}

impl From<String> for NestedValue {
    fn from(value: String) -> Self {
        NestedValue::String(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn yaml_and_json_land_in_the_same_shape() {
        let yaml: serde_yaml::Value = serde_yaml::from_str("style:\n  indent: 2\n  tabs: false\n").unwrap();
        let from_yaml = NestedValue::from(yaml);
        let from_json: NestedValue = serde_json::from_str(r#"{"style":{"tabs":false,"indent":2}}"#).unwrap();

        assert_eq!(from_yaml, from_json);
        assert_eq!(from_yaml.get("style").and_then(|s| s.get("indent")).and_then(NestedValue::as_f64), Some(2.0));
    }

    #[test]
    fn canonical_text_is_key_ordered_json() {
        let value = NestedValue::from(json!({"b": [1, "x"], "a": null}));
        assert_eq!(value.to_canonical_string(), r#"{"a":null,"b":[1,"x"]}"#);
    }

    #[test]
    fn yaml_scalar_keys_become_strings() {
        let yaml: serde_yaml::Value = serde_yaml::from_str("1: low\ntrue: on\n~: none\n2.5: half\n").unwrap();
        assert_eq!(
            NestedValue::from(yaml),
            NestedValue::from(json!({"1": "low", "true": "on", "null": "none", "2.5": "half"}))
        );
    }

    #[test]
    fn non_finite_yaml_floats_become_strings() {
        let yaml: serde_yaml::Value = serde_yaml::from_str("a: .inf\nb: -.inf\nc: .nan\nd: -3\n").unwrap();
        let value = NestedValue::from(yaml);

        assert_eq!(value.get("a").and_then(NestedValue::as_str), Some(".inf"));
        assert_eq!(value.get("b").and_then(NestedValue::as_str), Some("-.inf"));
        assert_eq!(value.get("c").and_then(NestedValue::as_str), Some(".nan"));
        assert_eq!(value.get("d").and_then(NestedValue::as_f64), Some(-3.0));
    }
}
