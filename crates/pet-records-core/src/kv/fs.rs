use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use super::{KeyValueStore, KvError, KvResult};

const DATA_FILE: &str = "storage.json";

/// File-backed storage: every key lives in one `storage.json` object.
///
/// The file is rewritten through a temporary file and a rename, so a crash
/// mid-write leaves the previous contents in place.
pub struct FileStore {
    root: PathBuf,
    lock: Mutex<()>,
}

impl FileStore {
    /// Use `root` as the storage directory, creating it if needed.
    pub fn open<P: AsRef<Path>>(root: P) -> KvResult<Self> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(&root)?;
        Ok(Self {
            root,
            lock: Mutex::new(()),
        })
    }

    pub fn path(&self) -> PathBuf {
        self.root.join(DATA_FILE)
    }

    fn load(&self) -> KvResult<BTreeMap<String, String>> {
        let path = self.path();
        if !path.exists() {
            return Ok(BTreeMap::new());
        }
        let content = fs::read_to_string(path)?;
        if content.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        Ok(serde_json::from_str(&content)?)
    }

    fn save(&self, entries: &BTreeMap<String, String>) -> KvResult<()> {
        let tmp = self.root.join(format!("{}.tmp", DATA_FILE));
        fs::write(&tmp, serde_json::to_string_pretty(entries)?)?;
        fs::rename(tmp, self.path())?;
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> KvResult<Option<String>> {
        let _guard = self.lock.lock().map_err(|_| KvError::Poisoned)?;
        Ok(self.load()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> KvResult<()> {
        let _guard = self.lock.lock().map_err(|_| KvError::Poisoned)?;
        let mut entries = self.load()?;
        entries.insert(key.to_string(), value.to_string());
        self.save(&entries)
    }

    fn remove(&self, key: &str) -> KvResult<()> {
        let _guard = self.lock.lock().map_err(|_| KvError::Poisoned)?;
        let mut entries = self.load()?;
        if entries.remove(key).is_some() {
            self.save(&entries)?;
        }
        Ok(())
    }
}
