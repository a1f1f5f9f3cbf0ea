// SPDX-License-Identifier: MIT

//! Deep merge of nested override structures
//!
//! Objects are unioned recursively, arrays are reconciled element by element
//! and scalars from the source overwrite whatever the target holds.

use serde_json::{Map, Value};

use super::builder::Fragment;
use super::sanitize::sanitize_key;

/// Merge `source` into a copy of `target`, leaving `target` untouched
pub fn merge_objects(
    target: &Map<String, Value>,
    source: &Map<String, Value>,
) -> Map<String, Value> {
    let mut result = target.clone();
    merge_into(&mut result, source.clone());
    result
}

/// Merge `source` into `target` in place
pub fn merge_into(target: &mut Map<String, Value>, source: Map<String, Value>) {
    for (key, incoming) in source {
        let slot = target.entry(sanitize_key(&key)).or_insert(Value::Null);
        merge_value(slot, incoming);
    }
}

/// Merge a builder fragment into `target` under `key`. Padding slots leave
/// existing array elements as they are.
pub(crate) fn merge_fragment(target: &mut Map<String, Value>, key: String, fragment: Fragment) {
    let slot = target.entry(key).or_insert(Value::Null);
    apply_fragment(slot, fragment);
}

fn apply_fragment(slot: &mut Value, fragment: Fragment) {
    match fragment {
        Fragment::Leaf(value) => merge_value(slot, value),
        Fragment::Object(key, inner) => {
            if !slot.is_object() {
                *slot = empty_object();
            }
            if let Value::Object(existing) = slot {
                let child = existing.entry(key).or_insert(Value::Null);
                apply_fragment(child, *inner);
            }
        }
        Fragment::Array(items) => match slot {
            Value::Array(existing) => {
                if existing.len() < items.len() {
                    existing.resize_with(items.len(), empty_object);
                }
                for (element, item) in existing.iter_mut().zip(items) {
                    if let Some(item) = item {
                        apply_fragment(element, item);
                    }
                }
            }
            other => *other = detach(Fragment::Array(items).into_value()),
        },
    }
}

fn merge_value(slot: &mut Value, incoming: Value) {
    match incoming {
        Value::Object(object) => {
            if !slot.is_object() {
                *slot = empty_object();
            }
            if let Value::Object(existing) = slot {
                merge_into(existing, object);
            }
        }
        Value::Array(items) => match slot {
            Value::Array(existing) => merge_arrays(existing, items),
            other => *other = detach(Value::Array(items)),
        },
        scalar => *slot = scalar,
    }
}

/// Pad `existing` to the source length, then merge element by element.
/// Nested arrays are reconciled the same way instead of being replaced.
fn merge_arrays(existing: &mut Vec<Value>, items: Vec<Value>) {
    if existing.len() < items.len() {
        existing.resize_with(items.len(), empty_object);
    }
    for (slot, item) in existing.iter_mut().zip(items) {
        merge_value(slot, item);
    }
}

/// Copy a value wholesale while still routing every object key through the
/// sanitizer.
fn detach(value: Value) -> Value {
    match value {
        Value::Object(object) => {
            let mut clean = Map::new();
            merge_into(&mut clean, object);
            Value::Object(clean)
        }
        Value::Array(items) => Value::Array(items.into_iter().map(detach).collect()),
        scalar => scalar,
    }
}

fn empty_object() -> Value {
    Value::Object(Map::new())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn obj(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            other => panic!("expected object, got {}", other),
        }
    }

    fn merged(target: Value, source: Value) -> Value {
        Value::Object(merge_objects(&obj(target), &obj(source)))
    }

    #[test]
    fn test_scalar_overwrite() {
        assert_eq!(merged(json!({"a": 1}), json!({"a": 2})), json!({"a": 2}));
    }

    #[test]
    fn test_disjoint_keys_union() {
        assert_eq!(
            merged(json!({"a": 1}), json!({"b": 2})),
            json!({"a": 1, "b": 2})
        );
    }

    #[test]
    fn test_nested_objects_merge() {
        assert_eq!(
            merged(
                json!({"parent": {"child": "x"}}),
                json!({"parent": {"other": "y"}})
            ),
            json!({"parent": {"child": "x", "other": "y"}})
        );
    }

    #[test]
    fn test_object_replaces_scalar() {
        assert_eq!(
            merged(json!({"a": 1}), json!({"a": {"b": 2}})),
            json!({"a": {"b": 2}})
        );
    }

    #[test]
    fn test_object_replaces_array() {
        assert_eq!(
            merged(json!({"a": [1, 2]}), json!({"a": {"b": 2}})),
            json!({"a": {"b": 2}})
        );
    }

    #[test]
    fn test_scalar_replaces_object() {
        assert_eq!(
            merged(json!({"a": {"b": 2}}), json!({"a": null})),
            json!({"a": null})
        );
    }

    #[test]
    fn test_array_extension() {
        assert_eq!(
            merged(
                json!({"x": [{"a": 1}]}),
                json!({"x": [{}, {}, {"b": 2}]})
            ),
            json!({"x": [{"a": 1}, {}, {"b": 2}]})
        );
    }

    #[test]
    fn test_array_elements_merge() {
        assert_eq!(
            merged(
                json!({"x": [{"a": 1}, {"c": 3}]}),
                json!({"x": [{"b": 2}]})
            ),
            json!({"x": [{"a": 1, "b": 2}, {"c": 3}]})
        );
    }

    #[test]
    fn test_elements_overwrite_by_position() {
        assert_eq!(
            merged(json!({"x": ["a", "b"]}), json!({"x": [{}, "z"]})),
            json!({"x": [{}, "z"]})
        );
    }

    #[test]
    fn test_nested_arrays_reconcile() {
        assert_eq!(
            merged(
                json!({"g": [[{"a": 1}], "keep"]}),
                json!({"g": [[{"b": 2}, 3]]})
            ),
            json!({"g": [[{"a": 1, "b": 2}, 3], "keep"]})
        );
    }

    #[test]
    fn test_fragment_padding_keeps_scalars() {
        let mut target = obj(json!({"tags": ["a"]}));
        let fragment = Fragment::Array(vec![None, Some(Fragment::Leaf(json!("b")))]);
        merge_fragment(&mut target, "tags".to_string(), fragment);
        assert_eq!(Value::Object(target), json!({"tags": ["a", "b"]}));
    }

    #[test]
    fn test_fragment_replaces_non_array_wholesale() {
        let mut target = obj(json!({"x": 5}));
        let fragment = Fragment::Array(vec![None, Some(Fragment::Leaf(json!(1)))]);
        merge_fragment(&mut target, "x".to_string(), fragment);
        assert_eq!(Value::Object(target), json!({"x": [{}, 1]}));
    }

    #[test]
    fn test_array_replaces_non_array() {
        assert_eq!(
            merged(json!({"x": {"k": 1}}), json!({"x": [1, 2]})),
            json!({"x": [1, 2]})
        );
    }

    #[test]
    fn test_target_not_mutated() {
        let target = obj(json!({"a": {"b": 1}, "x": [1]}));
        let snapshot = target.clone();
        let _ = merge_objects(&target, &obj(json!({"a": {"c": 2}, "x": [5, 6]})));
        assert_eq!(target, snapshot);
    }

    #[test]
    fn test_forbidden_keys_sanitized() {
        let result = merged(
            json!({}),
            json!({"__proto__": {"polluted": true}, "list": [{"constructor": 1}]}),
        );
        assert_eq!(
            result,
            json!({"___proto__": {"polluted": true}, "list": [{"_constructor": 1}]})
        );
    }
}
