// SPDX-License-Identifier: MIT

//! Typed error handling for node-overrides
//!
//! The path and merge functions in [`crate::params`] are total and never
//! fail. Errors only arise at the edges: identifier validation, configuration
//! and the durable storage collaborator.

use thiserror::Error;

/// Convenience alias used throughout the store layer
pub type Result<T> = std::result::Result<T, OverrideError>;

/// Top-level error type for node-overrides
#[derive(Debug, Error)]
pub enum OverrideError {
    /// A workflow or node identifier failed validation
    #[error("Invalid {kind} identifier '{value}': {reason}")]
    InvalidIdentifier {
        kind: &'static str,
        value: String,
        reason: String,
    },

    /// Configuration errors (unreadable config file, bad env values)
    #[error("Configuration error: {0}")]
    Config(String),

    /// The storage backend rejected an operation
    #[error("Storage error from {backend}: {message}")]
    Storage { backend: String, message: String },

    /// A persisted snapshot did not have the expected shape
    #[error("Corrupt override snapshot under key '{key}': {message}")]
    CorruptSnapshot { key: String, message: String },

    /// I/O errors
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),
}

impl OverrideError {
    /// Create an identifier validation error
    pub fn invalid_identifier(
        kind: &'static str,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidIdentifier {
            kind,
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a storage error
    pub fn storage(backend: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Storage {
            backend: backend.into(),
            message: message.into(),
        }
    }

    /// Create a corrupt snapshot error
    pub fn corrupt(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self::CorruptSnapshot {
            key: key.into(),
            message: message.into(),
        }
    }
}
