// SPDX-License-Identifier: MIT

//! Workflow/node scope identifiers

use std::fmt;

use crate::error::{OverrideError, Result};

/// Longest accepted workflow or node identifier
pub const MAX_IDENTIFIER_LEN: usize = 128;

/// One independent override map: a node inside a workflow
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Scope {
    pub(super) workflow_id: String,
    pub(super) node_id: String,
}

impl Scope {
    /// Create a scope after validating both identifiers
    pub fn new(workflow_id: impl Into<String>, node_id: impl Into<String>) -> Result<Self> {
        let workflow_id = workflow_id.into();
        let node_id = node_id.into();
        validate_identifier("workflow", &workflow_id)?;
        validate_identifier("node", &node_id)?;
        Ok(Self {
            workflow_id,
            node_id,
        })
    }

    pub fn workflow_id(&self) -> &str {
        &self.workflow_id
    }

    pub fn node_id(&self) -> &str {
        &self.node_id
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.workflow_id, self.node_id)
    }
}

/// Check that an identifier is safe to use as a storage key.
///
/// Accepts 1..=128 ASCII alphanumerics, `-`, `_`, `.` and `:`.
pub fn validate_identifier(kind: &'static str, value: &str) -> Result<()> {
    if value.is_empty() {
        return Err(OverrideError::invalid_identifier(kind, value, "is empty"));
    }
    if value.len() > MAX_IDENTIFIER_LEN {
        return Err(OverrideError::invalid_identifier(
            kind,
            value,
            format!("longer than {} characters", MAX_IDENTIFIER_LEN),
        ));
    }
    if let Some(c) = value
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | ':')))
    {
        return Err(OverrideError::invalid_identifier(
            kind,
            value,
            format!("contains invalid character {:?}", c),
        ));
    }
    Ok(())
}
