// SPDX-License-Identifier: MIT

//! Store configuration
//!
//! Loaded from an optional YAML file, then overridden by environment
//! variables (`NODE_OVERRIDES_DIR`, `NODE_OVERRIDES_KEY`).

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use super::backend::FileBackend;
use crate::error::{OverrideError, Result};

pub const DIR_ENV: &str = "NODE_OVERRIDES_DIR";
pub const KEY_ENV: &str = "NODE_OVERRIDES_KEY";

/// Where and under which key the override snapshot is persisted
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct StoreConfig {
    /// Directory holding the snapshot file
    #[serde(default = "default_storage_dir")]
    pub storage_dir: PathBuf,
    /// Storage key of the snapshot
    #[serde(default = "default_storage_key")]
    pub storage_key: String,
}

fn default_storage_dir() -> PathBuf {
    PathBuf::from(".node-overrides")
}

fn default_storage_key() -> String {
    "node-overrides".to_string()
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            storage_dir: default_storage_dir(),
            storage_key: default_storage_key(),
        }
    }
}

impl StoreConfig {
    /// Parse a configuration from a YAML string
    pub fn parse_yaml(content: &str) -> Result<Self> {
        let config: StoreConfig = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            OverrideError::config(format!("cannot read {}: {}", path.display(), e))
        })?;
        Self::parse_yaml(&content)
    }

    /// Load from `path` (or defaults) and apply environment overrides
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let base = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        base.with_env()
    }

    /// Apply `NODE_OVERRIDES_DIR` / `NODE_OVERRIDES_KEY` if set
    pub fn with_env(mut self) -> Result<Self> {
        if let Ok(dir) = env::var(DIR_ENV) {
            self.storage_dir = PathBuf::from(dir);
        }
        if let Ok(key) = env::var(KEY_ENV) {
            self.storage_key = key;
        }
        self.validate()?;
        Ok(self)
    }

    fn validate(&self) -> Result<()> {
        if self.storage_key.trim().is_empty() {
            return Err(OverrideError::config("storage_key must not be empty"));
        }
        if self.storage_dir.as_os_str().is_empty() {
            return Err(OverrideError::config("storage_dir must not be empty"));
        }
        Ok(())
    }

    /// File backend rooted at `storage_dir`
    pub fn file_backend(&self) -> FileBackend {
        FileBackend::new(self.storage_dir.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Serializes tests that touch process environment variables
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    #[test]
    fn test_defaults() {
        let config = StoreConfig::parse_yaml("{}").unwrap();
        assert_eq!(config, StoreConfig::default());
        assert_eq!(config.storage_key, "node-overrides");
    }

    #[test]
    fn test_parse_yaml() {
        let yaml = r#"
            storage_dir: /var/lib/overrides
            storage_key: session-a
        "#;
        let config = StoreConfig::parse_yaml(yaml).unwrap();
        assert_eq!(config.storage_dir, PathBuf::from("/var/lib/overrides"));
        assert_eq!(config.storage_key, "session-a");
        assert_eq!(config.file_backend().dir(), Path::new("/var/lib/overrides"));
    }

    #[test]
    fn test_empty_key_rejected() {
        let err = StoreConfig::parse_yaml("storage_key: ''").unwrap_err();
        assert!(matches!(err, OverrideError::Config(_)));
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("overrides.yaml");
        std::fs::write(&path, "storage_key: from-file\n").unwrap();

        let config = StoreConfig::from_file(&path).unwrap();
        assert_eq!(config.storage_key, "from-file");
        assert_eq!(config.storage_dir, PathBuf::from(".node-overrides"));
    }

    #[test]
    fn test_missing_file_is_config_error() {
        let err = StoreConfig::from_file("/definitely/not/here.yaml").unwrap_err();
        assert!(matches!(err, OverrideError::Config(_)));
    }

    #[test]
    fn test_env_overrides() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        env::set_var(DIR_ENV, "/tmp/overrides-env");
        env::set_var(KEY_ENV, "env-key");

        let config = StoreConfig::parse_yaml("storage_key: from-yaml")
            .unwrap()
            .with_env();

        env::remove_var(DIR_ENV);
        env::remove_var(KEY_ENV);

        let config = config.unwrap();
        assert_eq!(config.storage_dir, PathBuf::from("/tmp/overrides-env"));
        assert_eq!(config.storage_key, "env-key");
    }

    #[test]
    fn test_empty_env_key_rejected() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        env::remove_var(DIR_ENV);
        env::set_var(KEY_ENV, "  ");

        let result = StoreConfig::load(None);
        env::remove_var(KEY_ENV);

        assert!(matches!(result, Err(OverrideError::Config(_))));
    }
}
