// SPDX-License-Identifier: MIT

//! Override path parser
//!
//! Turns paths like `parent.array[0].value` into flat segment lists:
//! `["parent", "array", "0", "value"]`. Parsing is permissive and never fails;
//! bracket syntax that is not properly closed is kept as a literal key.

use super::sanitize::sanitize_key;

/// Parse a dotted/bracketed path into sanitized segments
pub fn parse_path(path: &str) -> Vec<String> {
    let mut segments = Vec::new();

    for part in path.split('.') {
        match split_brackets(part) {
            Some((name, indices)) => {
                if !name.is_empty() {
                    segments.push(sanitize_key(name));
                }
                segments.extend(indices.into_iter().map(index_segment));
            }
            None => segments.push(sanitize_key(part)),
        }
    }

    segments
}

/// Split `name[a][b]` into `("name", ["a", "b"])`.
///
/// Returns `None` when the part has no brackets or when any bracket group is
/// malformed, in which case the caller treats the whole part as a literal.
fn split_brackets(part: &str) -> Option<(&str, Vec<&str>)> {
    let open = part.find('[')?;
    let name = &part[..open];

    let mut indices = Vec::new();
    let mut rest = &part[open..];
    while !rest.is_empty() {
        let inner = rest.strip_prefix('[')?;
        let close = inner.find(']')?;
        let index = &inner[..close];
        if index.contains('[') {
            return None;
        }
        indices.push(index);
        rest = &inner[close + 1..];
    }

    Some((name, indices))
}

/// Bracket contents are normally numeric and used verbatim. Anything else is
/// treated like a property name.
fn index_segment(index: &str) -> String {
    if !index.is_empty() && index.bytes().all(|b| b.is_ascii_digit()) {
        index.to_string()
    } else {
        sanitize_key(index)
    }
}
