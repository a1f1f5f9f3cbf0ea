// SPDX-License-Identifier: MIT

//! Rebuild nested parameter objects from flat overrides

use serde_json::{Map, Value};

use super::builder::build_tree;
use super::merge::merge_fragment;
use super::overrides::{OverrideMap, OverrideValue};
use super::path::parse_path;

/// Reconstruct the parameter object for one scope.
///
/// Opaque strings are returned unchanged; flat maps are folded into a nested
/// object in iteration order, so later entries win on exact collisions.
pub fn reconstruct(overrides: &OverrideValue) -> Value {
    match overrides {
        OverrideValue::Opaque(text) => Value::String(text.clone()),
        OverrideValue::Flat(map) => Value::Object(reconstruct_map(map)),
    }
}

/// Fold every `path -> value` entry into one nested object
pub fn reconstruct_map(map: &OverrideMap) -> Map<String, Value> {
    map.iter().fold(Map::new(), |mut acc, (path, value)| {
        if let Some((key, fragment)) = build_tree(&parse_path(path), value.clone()) {
            merge_fragment(&mut acc, key, fragment);
        }
        acc
    })
}
