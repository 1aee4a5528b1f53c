//! Application context: the data-access facade plus the login session.

use std::sync::Arc;

use tracing::{info, warn};

use crate::access::DataAccess;
use crate::config::{AccessConfig, ConfigError, IN_MEMORY};
use crate::kv::{FileStore, KeyValueStore, KvResult, MemoryStore};
use crate::session::Session;
use crate::store::{EmbeddedStore, LocalStore, RemoteStore};

/// Everything a page controller needs.
pub struct App {
    pub access: DataAccess,
    pub session: Session,
}

impl App {
    pub fn new(access: DataAccess, session: Session) -> Self {
        Self { access, session }
    }

    /// Local store and session over the same storage, no other tiers.
    pub fn with_storage(storage: Arc<dyn KeyValueStore>) -> KvResult<Self> {
        let local = Arc::new(LocalStore::load(Arc::clone(&storage))?);
        Ok(Self::new(DataAccess::new(local), Session::new(storage)))
    }

    /// Seeded app that keeps nothing on disk.
    pub fn in_memory() -> KvResult<Self> {
        Self::with_storage(Arc::new(MemoryStore::new()))
    }

    /// Build the store chain described by `config`.
    ///
    /// A tier that cannot be set up is logged and left out of the chain.
    /// Only the local storage directory is required.
    pub fn from_config(config: &AccessConfig) -> Result<Self, ConfigError> {
        let storage: Arc<dyn KeyValueStore> = Arc::new(FileStore::open(&config.storage_dir)?);
        let local = Arc::new(LocalStore::load(Arc::clone(&storage))?);
        let mut access = DataAccess::new(local);

        if let Some(url) = &config.remote_url {
            let remote = match config.remote_timeout() {
                Some(timeout) => RemoteStore::with_timeout(url.as_str(), timeout),
                None => Ok(RemoteStore::new(url.as_str())),
            };
            match remote {
                Ok(remote) => access = access.with_tier(Arc::new(remote)),
                Err(e) => warn!(url = %url, error = %e, "Remote store unavailable, skipping"),
            }
        }

        if let Some(path) = &config.embedded_db {
            let embedded = if path == IN_MEMORY {
                EmbeddedStore::in_memory()
            } else {
                EmbeddedStore::open(path)
            };
            match embedded {
                Ok(embedded) => access = access.with_tier(Arc::new(embedded)),
                Err(e) => warn!(path = %path, error = %e, "Embedded store unavailable, skipping"),
            }
        }

        info!(chain = ?access.chain(), "Data access ready");
        Ok(Self::new(access, Session::new(storage)))
    }
}
