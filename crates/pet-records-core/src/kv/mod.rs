//! Durable key-value storage.
//!
//! The local record store and the session both persist through the
//! [`KeyValueStore`] trait, so they can run against a directory on disk
//! ([`FileStore`]) or an in-memory map in tests ([`MemoryStore`]).
//!
//! Writes are synchronous and replace the whole value for a key.

mod fs;
mod memory;

pub use fs::FileStore;
pub use memory::MemoryStore;

use thiserror::Error;

/// Key-value storage errors.
#[derive(Error, Debug)]
pub enum KvError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Storage lock poisoned")]
    Poisoned,
}

pub type KvResult<T> = Result<T, KvError>;

/// String-to-string storage that survives restarts.
pub trait KeyValueStore: Send + Sync {
    /// Read a value.
    fn get(&self, key: &str) -> KvResult<Option<String>>;

    /// Write a value, replacing any previous one.
    fn set(&self, key: &str, value: &str) -> KvResult<()>;

    /// Remove a value; removing a missing key is not an error.
    fn remove(&self, key: &str) -> KvResult<()>;
}
