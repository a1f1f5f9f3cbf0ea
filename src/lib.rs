// SPDX-License-Identifier: MIT

//! Per-node parameter overrides for workflow editing sessions.
//!
//! Overrides are stored as flat `path -> value` maps (for example
//! `"parent.array[0].value" -> "x"`) and rebuilt into nested parameter
//! objects on demand by [`params::reconstruct`].

pub mod error;
pub mod params;
pub mod store;

pub use error::{OverrideError, Result};
