// SPDX-License-Identifier: MIT

//! Fragment builder
//!
//! Builds the minimal nested structure holding a single override value at the
//! depth described by its path segments. Whether a level is an object or an
//! array is decided by looking ahead: a level whose next segment is an index
//! becomes an array, padded up to that index.

use serde_json::{Map, Value};

use super::sanitize::sanitize_key;

/// Largest index that creates array context. Bigger numbers are kept as
/// ordinary object keys so a single path cannot force a huge allocation.
pub const MAX_ARRAY_INDEX: usize = 10_000;

/// Single-path structure produced for one override entry.
///
/// Array slots before the written index are `None`. Padding is kept apart
/// from real values so merging it never disturbs an existing element.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Fragment {
    Object(String, Box<Fragment>),
    Array(Vec<Option<Fragment>>),
    Leaf(Value),
}

impl Fragment {
    /// Plain JSON form; padding becomes an empty object
    pub(crate) fn into_value(self) -> Value {
        match self {
            Fragment::Object(key, inner) => {
                let mut map = Map::new();
                map.insert(key, inner.into_value());
                Value::Object(map)
            }
            Fragment::Array(items) => Value::Array(
                items
                    .into_iter()
                    .map(|item| {
                        item.map_or_else(|| Value::Object(Map::new()), Fragment::into_value)
                    })
                    .collect(),
            ),
            Fragment::Leaf(value) => value,
        }
    }
}

/// Interpret a segment as an array index.
///
/// Only non-empty runs of ASCII digits up to [`MAX_ARRAY_INDEX`] count.
/// Larger numbers return `None`, so they are used as plain object keys.
pub fn array_index(segment: &str) -> Option<usize> {
    if segment.is_empty() || !segment.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    match segment.parse::<usize>() {
        Ok(index) if index <= MAX_ARRAY_INDEX => Some(index),
        _ => {
            log::warn!(
                "Index {} exceeds {}, treating it as an object key",
                segment,
                MAX_ARRAY_INDEX
            );
            None
        }
    }
}

/// Build a single-path fragment. The root is always an object keyed by the
/// first segment; an empty segment list yields an empty object. Array
/// padding is filled with empty objects.
pub fn build_fragment(segments: &[String], value: Value) -> Map<String, Value> {
    let mut root = Map::new();
    if let Some((key, node)) = build_tree(segments, value) {
        root.insert(key, node.into_value());
    }
    root
}

/// Build the root key and the tagged fragment stored under it
pub(crate) fn build_tree(segments: &[String], value: Value) -> Option<(String, Fragment)> {
    let (first, rest) = segments.split_first()?;

    // Wrap from the innermost level outwards
    let node = rest
        .iter()
        .rev()
        .fold(Fragment::Leaf(value), |inner, segment| wrap(segment, inner));

    Some((sanitize_key(first), node))
}

/// Create the container that holds `inner` under `segment`
fn wrap(segment: &str, inner: Fragment) -> Fragment {
    match array_index(segment) {
        Some(index) => {
            let mut items: Vec<Option<Fragment>> = (0..index).map(|_| None).collect();
            items.push(Some(inner));
            Fragment::Array(items)
        }
        None => Fragment::Object(sanitize_key(segment), Box::new(inner)),
    }
}
