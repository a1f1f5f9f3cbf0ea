// SPDX-License-Identifier: MIT

//! Path parsing and nested parameter reconstruction
//!
//! This module provides:
//! - `sanitize_key` - neutralizes prototype-aliasing key names
//! - `parse_path` - tokenizes `a.b[0].c` style paths
//! - `build_fragment` - builds a single-path nested fragment
//! - `merge_objects` / `merge_into` - deep merge of fragments
//! - `reconstruct` - folds a whole override map into one object

mod builder;
mod merge;
mod overrides;
mod path;
mod request;
mod sanitize;

pub use builder::{array_index, build_fragment, MAX_ARRAY_INDEX};
pub use merge::{merge_into, merge_objects};
pub use overrides::{OverrideMap, OverrideValue};
pub use path::parse_path;
pub use request::{reconstruct, reconstruct_map};
pub use sanitize::{is_forbidden, sanitize_key, FORBIDDEN_SEGMENTS};
