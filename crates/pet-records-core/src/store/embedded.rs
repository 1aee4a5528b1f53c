use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;

use super::{RecordStore, StoreError, StoreResult};
use crate::db::{Database, DbResult};
use crate::models::{DashboardStats, MedicalRecord, NewMedicalRecord, NewPet, Pet, User};

/// In-process SQLite store.
#[derive(Clone)]
pub struct EmbeddedStore {
    db: Arc<Mutex<Database>>,
}

impl EmbeddedStore {
    /// Open or create a database file.
    pub fn open<P: AsRef<Path>>(path: P) -> DbResult<Self> {
        Ok(Self::from_database(Database::open(path)?))
    }

    /// Create a database that lives only as long as this store.
    pub fn in_memory() -> DbResult<Self> {
        Ok(Self::from_database(Database::open_in_memory()?))
    }

    pub fn from_database(db: Database) -> Self {
        Self {
            db: Arc::new(Mutex::new(db)),
        }
    }

    /// Shared handle to the underlying database.
    pub fn database(&self) -> Arc<Mutex<Database>> {
        Arc::clone(&self.db)
    }

    fn lock(&self) -> StoreResult<MutexGuard<'_, Database>> {
        self.db.lock().map_err(|_| StoreError::Poisoned)
    }
}

#[async_trait]
impl RecordStore for EmbeddedStore {
    fn name(&self) -> &str {
        "embedded"
    }

    async fn login(&self, username: &str, password: &str) -> StoreResult<Option<User>> {
        Ok(self.lock()?.authenticate(username, password)?)
    }

    async fn pets(&self) -> StoreResult<Vec<Pet>> {
        Ok(self.lock()?.list_pets()?)
    }

    async fn create_pet(&self, pet: &NewPet) -> StoreResult<i64> {
        Ok(self.lock()?.insert_pet(pet)?)
    }

    async fn delete_pet(&self, id: i64) -> StoreResult<bool> {
        Ok(self.lock()?.delete_pet(id)?)
    }

    async fn medical_records(&self) -> StoreResult<Vec<MedicalRecord>> {
        Ok(self.lock()?.list_medical_records()?)
    }

    async fn create_medical_record(&self, record: &NewMedicalRecord) -> StoreResult<i64> {
        Ok(self.lock()?.insert_medical_record(record)?)
    }

    async fn dashboard_stats(&self, month: &str) -> StoreResult<DashboardStats> {
        Ok(self.lock()?.dashboard_stats(month)?)
    }
}
