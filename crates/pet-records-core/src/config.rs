//! Store chain configuration, loadable from a TOML file.
//!
//! ```toml
//! # REST backend tried first (optional)
//! remote_url = "http://localhost:3000"
//! remote_timeout_secs = 10
//!
//! # SQLite file tried second (optional, ":memory:" for a scratch database)
//! embedded_db = "pet_records.db"
//!
//! # Directory holding the local collections and session
//! storage_dir = "data"
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::kv::KvError;

/// Value of `embedded_db` that selects an in-memory database.
pub const IN_MEMORY: &str = ":memory:";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("local storage unavailable: {0}")]
    Storage(#[from] KvError),
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AccessConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remote_url: Option<String>,

    /// Overall deadline for each remote request; none by default.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remote_timeout_secs: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub embedded_db: Option<String>,

    #[serde(default = "default_storage_dir")]
    pub storage_dir: PathBuf,
}

fn default_storage_dir() -> PathBuf {
    PathBuf::from("data")
}

impl Default for AccessConfig {
    fn default() -> Self {
        Self {
            remote_url: None,
            remote_timeout_secs: None,
            embedded_db: None,
            storage_dir: default_storage_dir(),
        }
    }
}

impl AccessConfig {
    /// Local storage only, rooted at `storage_dir`.
    pub fn local_only(storage_dir: impl Into<PathBuf>) -> Self {
        Self {
            storage_dir: storage_dir.into(),
            ..Self::default()
        }
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    pub fn remote_timeout(&self) -> Option<Duration> {
        self.remote_timeout_secs.map(Duration::from_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_empty_config_is_local_only() {
        let config = AccessConfig::from_toml_str("").unwrap();
        assert_eq!(config, AccessConfig::default());
        assert_eq!(config.storage_dir, PathBuf::from("data"));
        assert!(config.remote_timeout().is_none());
    }

    #[test]
    fn test_full_config() {
        let config = AccessConfig::from_toml_str(
            r#"
            remote_url = "http://localhost:3000"
            remote_timeout_secs = 5
            embedded_db = ":memory:"
            storage_dir = "/tmp/pets"
            "#,
        )
        .unwrap();

        assert_eq!(config.remote_url.as_deref(), Some("http://localhost:3000"));
        assert_eq!(config.remote_timeout(), Some(Duration::from_secs(5)));
        assert_eq!(config.embedded_db.as_deref(), Some(IN_MEMORY));
        assert_eq!(config.storage_dir, PathBuf::from("/tmp/pets"));
    }

    #[test]
    fn test_invalid_toml() {
        let result = AccessConfig::from_toml_str("remote_url = [");
        assert!(matches!(result, Err(ConfigError::Toml(_))));
    }

    #[test]
    fn test_from_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("pet-records.toml");
        std::fs::write(&path, "embedded_db = \"pets.db\"\n").unwrap();

        let config = AccessConfig::from_file(&path).unwrap();
        assert_eq!(config.embedded_db.as_deref(), Some("pets.db"));

        let missing = AccessConfig::from_file(&dir.path().join("nope.toml"));
        assert!(matches!(missing, Err(ConfigError::Io { .. })));
    }

    #[test]
    fn test_round_trip_through_toml() {
        let config = AccessConfig {
            remote_url: Some("http://example.test".into()),
            ..AccessConfig::local_only("store")
        };
        let text = toml::to_string(&config).unwrap();
        assert_eq!(AccessConfig::from_toml_str(&text).unwrap(), config);
    }
}
