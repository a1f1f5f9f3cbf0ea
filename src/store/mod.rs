// SPDX-License-Identifier: MIT

//! Override storage for workflow editing sessions
//!
//! This module provides:
//! - `Scope` - a validated (workflow, node) pair
//! - `OverrideStore` - per-scope flat overrides with get/set/clear operations
//! - `StorageBackend` - the durable key-value store snapshots are written to
//! - `StoreConfig` - where snapshots live

mod backend;
mod config;
mod scope;

pub use backend::{FileBackend, MemoryBackend, StorageBackend};
pub use config::{StoreConfig, DIR_ENV, KEY_ENV};
pub use scope::{validate_identifier, Scope, MAX_IDENTIFIER_LEN};

use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::error::{OverrideError, Result};
use crate::params::{self, OverrideMap, OverrideValue};

/// Persisted layout: workflow id -> node id -> overrides
pub type Snapshot = BTreeMap<String, BTreeMap<String, OverrideValue>>;

/// In-memory override state with out-of-band persistence.
///
/// All reads and writes are synchronous. Mutations only mark the store dirty;
/// [`OverrideStore::persist`] writes the snapshot to the backend.
pub struct OverrideStore {
    workflows: Snapshot,
    backend: Arc<dyn StorageBackend>,
    key: String,
    dirty: bool,
}

impl OverrideStore {
    /// Create an empty store that persists under `key`
    pub fn new(backend: Arc<dyn StorageBackend>, key: impl Into<String>) -> Self {
        Self {
            workflows: Snapshot::new(),
            backend,
            key: key.into(),
            dirty: false,
        }
    }

    /// Load the snapshot stored under `key`, or start empty if there is none
    pub async fn load(
        backend: Arc<dyn StorageBackend>,
        key: impl Into<String>,
    ) -> Result<Self> {
        let mut store = Self::new(backend, key);
        let stored = store.backend.get(&store.key).await?;
        if let Some(value) = stored {
            store.workflows = decode_snapshot(&store.key, value)?;
            log::debug!(
                "Loaded overrides for {} workflows from {} backend",
                store.workflows.len(),
                store.backend.name()
            );
        }
        Ok(store)
    }

    /// Write the snapshot if anything changed since the last load/persist.
    /// Returns whether a write happened.
    pub async fn persist(&mut self) -> Result<bool> {
        if !self.dirty {
            return Ok(false);
        }
        if self.workflows.is_empty() {
            self.backend.clear(&self.key).await?;
        } else {
            let value = serde_json::to_value(&self.workflows)?;
            self.backend.set(&self.key, value).await?;
        }
        self.dirty = false;
        log::debug!("Persisted overrides to {} backend", self.backend.name());
        Ok(true)
    }

    /// True when there are changes not yet written by `persist`
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Key the snapshot is stored under in the backend
    pub fn storage_key(&self) -> &str {
        &self.key
    }

    /// Current overrides for a scope
    pub fn get(&self, scope: &Scope) -> Option<&OverrideValue> {
        self.workflows
            .get(scope.workflow_id())
            .and_then(|nodes| nodes.get(scope.node_id()))
    }

    /// Flat map view of a scope, if it holds path overrides
    pub fn flat(&self, scope: &Scope) -> Option<&OverrideMap> {
        self.get(scope).and_then(OverrideValue::as_flat)
    }

    /// A single path override
    pub fn get_override(&self, scope: &Scope, path: &str) -> Option<&Value> {
        self.get(scope).and_then(|value| value.get(path))
    }

    /// Set one path override. Last write for a path wins. A scope holding an
    /// opaque string is replaced by a fresh flat map.
    pub fn set_override(&mut self, scope: &Scope, path: impl Into<String>, value: Value) {
        let path = path.into();
        log::debug!("Setting override {} on {}", path, scope);

        let slot = self.slot_mut(scope);
        if let OverrideValue::Opaque(_) = slot {
            log::debug!("Replacing opaque value on {} with path overrides", scope);
            *slot = OverrideValue::empty();
        }
        if let OverrideValue::Flat(map) = slot {
            map.insert(path, value);
        }
        self.dirty = true;
    }

    /// Replace everything stored for a scope
    pub fn set_overrides(&mut self, scope: &Scope, overrides: impl Into<OverrideValue>) {
        *self.slot_mut(scope) = overrides.into();
        self.dirty = true;
    }

    /// Remove one path override, keeping the order of the rest
    pub fn remove_override(&mut self, scope: &Scope, path: &str) -> Option<Value> {
        let removed = self
            .workflows
            .get_mut(scope.workflow_id())
            .and_then(|nodes| nodes.get_mut(scope.node_id()))
            .and_then(|value| match value {
                OverrideValue::Flat(map) => map.shift_remove(path),
                OverrideValue::Opaque(_) => None,
            });
        if removed.is_some() {
            self.dirty = true;
        }
        removed
    }

    /// Reset a scope to an empty flat map
    pub fn clear(&mut self, scope: &Scope) {
        log::debug!("Clearing overrides on {}", scope);
        *self.slot_mut(scope) = OverrideValue::empty();
        self.dirty = true;
    }

    /// Drop every node scope of a workflow
    pub fn clear_workflow(&mut self, workflow_id: &str) -> Result<()> {
        validate_identifier("workflow", workflow_id)?;
        if self.workflows.remove(workflow_id).is_some() {
            log::debug!("Cleared all overrides of workflow {}", workflow_id);
            self.dirty = true;
        }
        Ok(())
    }

    /// All scopes that have an entry, in sorted order
    pub fn scopes(&self) -> impl Iterator<Item = Scope> + '_ {
        self.workflows.iter().flat_map(|(workflow_id, nodes)| {
            nodes.keys().map(move |node_id| Scope {
                workflow_id: workflow_id.clone(),
                node_id: node_id.clone(),
            })
        })
    }

    /// Rebuild the nested parameter object for a scope. Unknown scopes
    /// reconstruct to an empty object.
    pub fn reconstruct(&self, scope: &Scope) -> Value {
        match self.get(scope) {
            Some(value) => params::reconstruct(value),
            None => Value::Object(Map::new()),
        }
    }

    fn slot_mut(&mut self, scope: &Scope) -> &mut OverrideValue {
        self.workflows
            .entry(scope.workflow_id().to_string())
            .or_default()
            .entry(scope.node_id().to_string())
            .or_default()
    }
}

/// Decode a persisted snapshot. Entries with invalid identifiers are skipped.
fn decode_snapshot(key: &str, value: Value) -> Result<Snapshot> {
    let Value::Object(workflows) = value else {
        return Err(OverrideError::corrupt(key, "expected a JSON object"));
    };

    let mut snapshot = Snapshot::new();
    for (workflow_id, nodes) in workflows {
        let Value::Object(nodes) = nodes else {
            return Err(OverrideError::corrupt(
                key,
                format!("workflow '{}' is not an object", workflow_id),
            ));
        };
        let mut decoded = BTreeMap::new();
        for (node_id, overrides) in nodes {
            if let Err(e) = Scope::new(workflow_id.as_str(), node_id.as_str()) {
                log::warn!("Skipping persisted overrides: {}", e);
                continue;
            }
            let overrides: OverrideValue = serde_json::from_value(overrides).map_err(|e| {
                OverrideError::corrupt(key, format!("{}/{}: {}", workflow_id, node_id, e))
            })?;
            decoded.insert(node_id, overrides);
        }
        if !decoded.is_empty() {
            snapshot.insert(workflow_id, decoded);
        }
    }
    Ok(snapshot)
}
