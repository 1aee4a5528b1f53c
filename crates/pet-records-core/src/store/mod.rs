//! Record stores behind the data-access facade.
//!
//! Tiers implement [`RecordStore`]:
//!
//! - [`RemoteStore`]: the REST backend over HTTP
//! - [`EmbeddedStore`]: an in-process SQLite database
//!
//! [`LocalStore`] keeps JSON collections in durable key-value storage. It is
//! the store of last resort and is called directly, since it cannot fail a
//! read.
//!
//! The facade in [`crate::access`] decides which store answers a call; the
//! stores themselves never fall back.

mod embedded;
mod local;
mod remote;

pub use embedded::EmbeddedStore;
pub use local::{LocalStore, LOCAL_PASSWORD, LOCAL_USERNAME, PETS_KEY, RECORDS_KEY};
pub use remote::RemoteStore;

use async_trait::async_trait;
use thiserror::Error;

use crate::db::DbError;
use crate::kv::KvError;
use crate::models::{DashboardStats, MedicalRecord, NewMedicalRecord, NewPet, Pet, User};

/// Errors raised by a single store.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("database error: {0}")]
    Db(#[from] DbError),

    #[error("storage error: {0}")]
    Kv(#[from] KvError),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("server responded with {status}: {body}")]
    Status { status: u16, body: String },

    #[error("store lock poisoned")]
    Poisoned,
}

pub type StoreResult<T> = Result<T, StoreError>;

/// One backing store for pets, visits and logins.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &str;

    /// Check credentials; `Ok(None)` means they were rejected.
    async fn login(&self, username: &str, password: &str) -> StoreResult<Option<User>>;

    async fn pets(&self) -> StoreResult<Vec<Pet>>;

    /// Persist a pet and return its id.
    async fn create_pet(&self, pet: &NewPet) -> StoreResult<i64>;

    /// Delete a pet and its visits.
    ///
    /// Returns whether a pet with that id existed; a missing id is not an
    /// error.
    async fn delete_pet(&self, id: i64) -> StoreResult<bool>;

    async fn medical_records(&self) -> StoreResult<Vec<MedicalRecord>>;

    /// Persist a visit and return its id.
    async fn create_medical_record(&self, record: &NewMedicalRecord) -> StoreResult<i64>;

    /// Dashboard counters for the `YYYY-MM` month.
    async fn dashboard_stats(&self, month: &str) -> StoreResult<DashboardStats>;
}
