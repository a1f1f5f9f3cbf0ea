// SPDX-License-Identifier: MIT

//! Override value types

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Flat `path -> value` overrides for one node, in insertion order
pub type OverrideMap = IndexMap<String, Value>;

/// What a scope holds: either flat path overrides or one opaque string
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum OverrideValue {
    /// Flat path overrides, rebuilt into a nested object on demand
    Flat(OverrideMap),
    /// A raw value that bypasses reconstruction entirely
    Opaque(String),
}

impl OverrideValue {
    /// An empty flat map
    pub fn empty() -> Self {
        Self::Flat(OverrideMap::new())
    }

    /// True for an empty flat map. Opaque strings are never empty scopes,
    /// even when the string itself is empty.
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Flat(map) if map.is_empty())
    }

    /// Look up a single path override
    pub fn get(&self, path: &str) -> Option<&Value> {
        match self {
            Self::Flat(map) => map.get(path),
            Self::Opaque(_) => None,
        }
    }

    /// The flat map, if this is not an opaque value
    pub fn as_flat(&self) -> Option<&OverrideMap> {
        match self {
            Self::Flat(map) => Some(map),
            Self::Opaque(_) => None,
        }
    }
}

impl Default for OverrideValue {
    fn default() -> Self {
        Self::empty()
    }
}

impl From<OverrideMap> for OverrideValue {
    fn from(map: OverrideMap) -> Self {
        Self::Flat(map)
    }
}

impl From<String> for OverrideValue {
    fn from(text: String) -> Self {
        Self::Opaque(text)
    }
}

impl From<&str> for OverrideValue {
    fn from(text: &str) -> Self {
        Self::Opaque(text.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_deserialize_flat() {
        let value: OverrideValue =
            serde_json::from_value(json!({"b": 1, "a.c": "x"})).unwrap();
        let map = value.as_flat().unwrap();
        let keys: Vec<&str> = map.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["b", "a.c"]);
        assert_eq!(value.get("a.c"), Some(&json!("x")));
    }

    #[test]
    fn test_deserialize_opaque() {
        let value: OverrideValue = serde_json::from_value(json!("raw text")).unwrap();
        assert_eq!(value, OverrideValue::Opaque("raw text".to_string()));
        assert!(value.get("anything").is_none());
        assert!(!value.is_empty());
    }

    #[test]
    fn test_serialize_roundtrip_shape() {
        let mut map = OverrideMap::new();
        map.insert("a[0]".to_string(), json!(1));
        let value = OverrideValue::from(map);
        assert_eq!(serde_json::to_value(&value).unwrap(), json!({"a[0]": 1}));
        assert_eq!(
            serde_json::to_value(OverrideValue::from("s")).unwrap(),
            json!("s")
        );
    }

    #[test]
    fn test_default_is_empty_flat() {
        assert!(OverrideValue::default().is_empty());
    }
}
