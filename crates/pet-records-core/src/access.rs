//! Data-access facade.
//!
//! [`DataAccess`] is the only component with fallback logic. Each call walks
//! the configured tiers in priority order (remote, then embedded) and ends at
//! the [`LocalStore`], which always answers.
//!
//! - Reads accept the first tier that returns a non-empty result. An empty
//!   result is not authoritative and falls through, so the local collections
//!   stay visible while a fresh database has nothing in it.
//! - Writes go to the first tier that accepts them. Failures are logged and
//!   the next store is tried; only a failing local store surfaces an error.
//! - Deletes go to the first tier that actually holds the pet. Tiers and the
//!   local store assign ids independently, so the local store is only
//!   touched when no tier removed anything.

use std::fmt::Display;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::models::{
    current_month, Created, DashboardStats, Deleted, LoginOutcome, MedicalRecord,
    NewMedicalRecord, NewPet, Pet, UNKNOWN_OWNER, UNKNOWN_PET,
};
use crate::store::{LocalStore, RecordStore, StoreError};

/// Message returned for rejected credentials.
pub const INVALID_CREDENTIALS: &str = "Invalid username or password";

/// Errors surfaced once every store has failed.
#[derive(Error, Debug)]
pub enum AccessError {
    #[error("all stores failed: {0}")]
    Exhausted(#[from] StoreError),
}

/// `{success, data}` / `{success, error}` envelope for operation results.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Reply<T> {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T, E: Display> From<Result<T, E>> for Reply<T> {
    fn from(result: Result<T, E>) -> Self {
        match result {
            Ok(data) => Self {
                success: true,
                data: Some(data),
                error: None,
            },
            Err(e) => Self {
                success: false,
                data: None,
                error: Some(e.to_string()),
            },
        }
    }
}

/// Prioritized store chain ending in the local store.
pub struct DataAccess {
    tiers: Vec<Arc<dyn RecordStore>>,
    local: Arc<LocalStore>,
}

impl DataAccess {
    /// A facade backed only by the local store.
    pub fn new(local: Arc<LocalStore>) -> Self {
        Self {
            tiers: Vec::new(),
            local,
        }
    }

    /// Append a tier; tiers are tried in the order they were added.
    pub fn with_tier(mut self, tier: Arc<dyn RecordStore>) -> Self {
        self.tiers.push(tier);
        self
    }

    pub fn local(&self) -> &LocalStore {
        &self.local
    }

    /// Names of the stores in the order they are tried.
    pub fn chain(&self) -> Vec<&str> {
        self.tiers
            .iter()
            .map(|t| t.name())
            .chain(std::iter::once(LocalStore::NAME))
            .collect()
    }

    pub async fn login(&self, username: &str, password: &str) -> LoginOutcome {
        for tier in &self.tiers {
            match tier.login(username, password).await {
                Ok(Some(user)) => return LoginOutcome::granted(user),
                Ok(None) => debug!(store = tier.name(), "Credentials rejected, falling back"),
                Err(e) => warn!(store = tier.name(), error = %e, "Login failed, falling back"),
            }
        }

        match self.local.authenticate(username, password) {
            Some(user) => LoginOutcome::granted(user),
            None => LoginOutcome::denied(INVALID_CREDENTIALS),
        }
    }

    pub async fn get_pets(&self) -> Vec<Pet> {
        for tier in &self.tiers {
            match tier.pets().await {
                Ok(pets) if !pets.is_empty() => return pets,
                Ok(_) => debug!(store = tier.name(), "No pets, falling back"),
                Err(e) => warn!(store = tier.name(), error = %e, "Listing pets failed, falling back"),
            }
        }
        self.local.all_pets()
    }

    /// Register a pet. Accepts a [`NewPet`] or raw form fields.
    pub async fn create_pet(&self, pet: impl Into<NewPet>) -> Result<Created, AccessError> {
        let pet = pet.into();

        for tier in &self.tiers {
            match tier.create_pet(&pet).await {
                Ok(id) if id > 0 => return Ok(Created::pet(id)),
                Ok(id) => warn!(store = tier.name(), id, "Store returned no id, falling back"),
                Err(e) => warn!(store = tier.name(), error = %e, "Creating pet failed, falling back"),
            }
        }

        let id = self.local.insert_pet(pet).map_err(StoreError::from)?;
        Ok(Created::pet(id))
    }

    /// Delete a pet and all of its medical records.
    ///
    /// Deleting an unknown id succeeds without changing anything.
    pub async fn delete_pet(&self, id: i64) -> Result<Deleted, AccessError> {
        for tier in &self.tiers {
            match tier.delete_pet(id).await {
                Ok(true) => return Ok(Deleted::pet()),
                Ok(false) => debug!(store = tier.name(), id, "No such pet, falling back"),
                Err(e) => warn!(store = tier.name(), error = %e, "Deleting pet failed, falling back"),
            }
        }

        self.local.remove_pet(id).map_err(StoreError::from)?;
        Ok(Deleted::pet())
    }

    pub async fn get_medical_records(&self) -> Vec<MedicalRecord> {
        for tier in &self.tiers {
            match tier.medical_records().await {
                Ok(records) if !records.is_empty() => return records,
                Ok(_) => debug!(store = tier.name(), "No medical records, falling back"),
                Err(e) => {
                    warn!(store = tier.name(), error = %e, "Listing medical records failed, falling back")
                }
            }
        }
        self.local.all_medical_records()
    }

    /// Save a visit. Accepts a [`NewMedicalRecord`] or raw form fields.
    ///
    /// Pet and owner names are always taken from the local collection.
    pub async fn create_medical_record(
        &self,
        record: impl Into<NewMedicalRecord>,
    ) -> Result<Created, AccessError> {
        let mut record = record.into();
        match self.local.find_pet(record.pet_id) {
            Some(pet) => {
                record.pet_name = pet.pet_name;
                record.owner_name = pet.owner_name;
            }
            None => {
                record.pet_name = UNKNOWN_PET.to_string();
                record.owner_name = UNKNOWN_OWNER.to_string();
            }
        }

        for tier in &self.tiers {
            match tier.create_medical_record(&record).await {
                Ok(id) if id > 0 => return Ok(Created::medical_record(id)),
                Ok(id) => warn!(store = tier.name(), id, "Store returned no id, falling back"),
                Err(e) => {
                    warn!(store = tier.name(), error = %e, "Saving medical record failed, falling back")
                }
            }
        }

        let id = self
            .local
            .insert_medical_record(record)
            .map_err(StoreError::from)?;
        Ok(Created::medical_record(id))
    }

    /// Dashboard counters for the current month.
    pub async fn get_dashboard_stats(&self) -> DashboardStats {
        self.dashboard_stats_for(&current_month()).await
    }

    /// Dashboard counters for a given `YYYY-MM` month.
    pub async fn dashboard_stats_for(&self, month: &str) -> DashboardStats {
        for tier in &self.tiers {
            match tier.dashboard_stats(month).await {
                Ok(stats) if stats.has_data() => return stats,
                Ok(_) => debug!(store = tier.name(), "Empty stats, falling back"),
                Err(e) => warn!(store = tier.name(), error = %e, "Stats failed, falling back"),
            }
        }
        self.local.stats(month)
    }
}
