// SPDX-License-Identifier: MIT

//! Key sanitizing for dynamically keyed containers

/// Segment names that alias shared prototype or metaprogramming hooks when
/// used as live property accessors by consumers of the reconstructed object.
pub const FORBIDDEN_SEGMENTS: [&str; 3] = ["__proto__", "constructor", "prototype"];

/// Returns true if `segment` is exactly one of [`FORBIDDEN_SEGMENTS`]
pub fn is_forbidden(segment: &str) -> bool {
    FORBIDDEN_SEGMENTS.contains(&segment)
}

/// Rewrite a forbidden segment name into a disjoint, harmless key.
///
/// Forbidden names get a leading underscore. Everything else is returned
/// unchanged, so the function is idempotent.
pub fn sanitize_key(segment: &str) -> String {
    if is_forbidden(segment) {
        format!("_{}", segment)
    } else {
        segment.to_string()
    }
}
