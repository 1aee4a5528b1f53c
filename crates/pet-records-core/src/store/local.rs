//! Record store over durable key-value storage.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::{debug, info};

use crate::kv::{KeyValueStore, KvResult};
use crate::models::{DashboardStats, MedicalRecord, NewMedicalRecord, NewPet, Pet, User};

/// Storage key for the serialized pets collection.
pub const PETS_KEY: &str = "petMedicalRecords_pets";

/// Storage key for the serialized medical records collection.
pub const RECORDS_KEY: &str = "petMedicalRecords_medicalRecords";

/// The one credential pair the local store accepts.
pub const LOCAL_USERNAME: &str = "admin";
pub const LOCAL_PASSWORD: &str = "password123";

#[derive(Debug, Clone, Default)]
struct Collections {
    pets: Vec<Pet>,
    medical_records: Vec<MedicalRecord>,
}

impl Collections {
    /// Starter data for a fresh installation.
    fn seed() -> Self {
        let pets = vec![
            Pet {
                id: 1,
                pet_name: "Buddy".into(),
                species: "Dog".into(),
                breed: "Golden Retriever".into(),
                age: 3,
                gender: "Male".into(),
                weight: 25.5,
                medical_history: "Healthy, no known issues".into(),
                owner_name: "John Doe".into(),
                owner_email: "john@example.com".into(),
                owner_phone: "555-0123".into(),
                owner_address: "123 Main St".into(),
                registration_date: "2024-01-15".into(),
            },
            Pet {
                id: 2,
                pet_name: "Whiskers".into(),
                species: "Cat".into(),
                breed: "Persian".into(),
                age: 2,
                gender: "Female".into(),
                weight: 4.2,
                medical_history: "Allergic to fish".into(),
                owner_name: "Jane Smith".into(),
                owner_email: "jane@example.com".into(),
                owner_phone: "555-0456".into(),
                owner_address: "456 Oak Ave".into(),
                registration_date: "2024-02-10".into(),
            },
        ];

        let medical_records = vec![
            MedicalRecord {
                id: 1,
                pet_id: 1,
                pet_name: "Buddy".into(),
                owner_name: "John Doe".into(),
                visit_date: "2024-01-20".into(),
                visit_type: "Routine Checkup".into(),
                veterinarian: "Dr. Mamay".into(),
                symptoms: "None".into(),
                diagnosis: "Healthy".into(),
                treatment: "Annual vaccination".into(),
                vaccines: "Rabies, DHPP".into(),
                notes: "Pet is in excellent health".into(),
                weight: 25.5,
                temperature: 101.2,
                created_at: "2024-01-20".into(),
            },
            MedicalRecord {
                id: 2,
                pet_id: 2,
                pet_name: "Whiskers".into(),
                owner_name: "Jane Smith".into(),
                visit_date: "2024-02-15".into(),
                visit_type: "Sick Visit".into(),
                veterinarian: "Dr. Mamay".into(),
                symptoms: "Sneezing, watery eyes".into(),
                diagnosis: "Allergic reaction".into(),
                treatment: "Antihistamine".into(),
                vaccines: "None".into(),
                notes: "Avoid fish-based foods".into(),
                weight: 4.2,
                temperature: 100.8,
                created_at: "2024-02-15".into(),
            },
        ];

        Self {
            pets,
            medical_records,
        }
    }
}

/// Next id under the max-plus-one rule.
fn next_id(ids: impl Iterator<Item = i64>) -> i64 {
    ids.max().unwrap_or(0).max(0) + 1
}

/// Pets and medical records held in memory and written back in full to
/// key-value storage after every mutation.
pub struct LocalStore {
    storage: Arc<dyn KeyValueStore>,
    data: Mutex<Collections>,
}

impl LocalStore {
    /// Name used in logs and in the store chain.
    pub const NAME: &'static str = "local";

    /// Load the persisted collections, seeding starter data when either
    /// collection has never been saved.
    pub fn load(storage: Arc<dyn KeyValueStore>) -> KvResult<Self> {
        let pets = storage.get(PETS_KEY)?.filter(|s| !s.is_empty());
        let records = storage.get(RECORDS_KEY)?.filter(|s| !s.is_empty());

        match (pets, records) {
            (Some(pets), Some(records)) => {
                let pets: Vec<Pet> = serde_json::from_str(&pets)?;
                let records: Vec<MedicalRecord> = serde_json::from_str(&records)?;
                debug!(pets = pets.len(), records = records.len(), "Loaded local collections");
                Ok(Self {
                    storage,
                    data: Mutex::new(Collections {
                        pets: pets.into_iter().map(Pet::normalized).collect(),
                        medical_records: records.into_iter().map(MedicalRecord::normalized).collect(),
                    }),
                })
            }
            _ => {
                info!("No saved collections found, seeding starter data");
                Self::with_data(storage, Collections::seed())
            }
        }
    }

    /// Replace whatever is stored with the given collections.
    pub fn with_collections(
        storage: Arc<dyn KeyValueStore>,
        pets: Vec<Pet>,
        medical_records: Vec<MedicalRecord>,
    ) -> KvResult<Self> {
        Self::with_data(
            storage,
            Collections {
                pets,
                medical_records,
            },
        )
    }

    fn with_data(storage: Arc<dyn KeyValueStore>, data: Collections) -> KvResult<Self> {
        let store = Self {
            storage,
            data: Mutex::new(data),
        };
        store.persist(&store.collections())?;
        Ok(store)
    }

    // Collections are only ever replaced whole, so a poisoned lock still
    // guards consistent data.
    fn collections(&self) -> MutexGuard<'_, Collections> {
        self.data.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Apply a change to a copy of the collections, persist the copy, and
    /// only then make it visible. A failed write leaves memory untouched.
    fn mutate<T>(&self, change: impl FnOnce(&mut Collections) -> T) -> KvResult<T> {
        let mut data = self.collections();
        let mut next = data.clone();
        let result = change(&mut next);
        self.persist(&next)?;
        *data = next;
        Ok(result)
    }

    fn persist(&self, data: &Collections) -> KvResult<()> {
        self.storage
            .set(PETS_KEY, &serde_json::to_string(&data.pets)?)?;
        self.storage
            .set(RECORDS_KEY, &serde_json::to_string(&data.medical_records)?)?;
        Ok(())
    }

    /// Check against the built-in credential pair.
    pub fn authenticate(&self, username: &str, password: &str) -> Option<User> {
        (username == LOCAL_USERNAME && password == LOCAL_PASSWORD).then(|| User {
            id: 1,
            username: LOCAL_USERNAME.to_string(),
            role: None,
        })
    }

    pub fn all_pets(&self) -> Vec<Pet> {
        self.collections().pets.clone()
    }

    pub fn find_pet(&self, id: i64) -> Option<Pet> {
        self.collections().pets.iter().find(|p| p.id == id).cloned()
    }

    pub fn all_medical_records(&self) -> Vec<MedicalRecord> {
        self.collections().medical_records.clone()
    }

    /// Append a pet under the next free id and persist.
    pub fn insert_pet(&self, pet: NewPet) -> KvResult<i64> {
        self.mutate(|data| {
            let id = next_id(data.pets.iter().map(|p| p.id));
            data.pets.push(Pet::from_new(id, pet));
            id
        })
    }

    /// Remove a pet and every record pointing at it, then persist.
    ///
    /// Returns whether a pet was removed.
    pub fn remove_pet(&self, id: i64) -> KvResult<bool> {
        self.mutate(|data| {
            let before = data.pets.len();
            data.pets.retain(|p| p.id != id);
            data.medical_records.retain(|r| r.pet_id != id);
            data.pets.len() != before
        })
    }

    /// Append a visit under the next free id and persist.
    pub fn insert_medical_record(&self, record: NewMedicalRecord) -> KvResult<i64> {
        self.mutate(|data| {
            let id = next_id(data.medical_records.iter().map(|r| r.id));
            data.medical_records.push(MedicalRecord::from_new(id, record));
            id
        })
    }

    pub fn stats(&self, month: &str) -> DashboardStats {
        let data = self.collections();
        DashboardStats::compute(&data.pets, &data.medical_records, month)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kv::{KvError, MemoryStore};
    use std::io;
    use std::sync::atomic::{AtomicBool, Ordering};

    fn memory() -> Arc<dyn KeyValueStore> {
        Arc::new(MemoryStore::new())
    }

    /// Memory storage whose writes can be switched off.
    #[derive(Default)]
    struct FlakyStore {
        inner: MemoryStore,
        read_only: AtomicBool,
    }

    impl KeyValueStore for FlakyStore {
        fn get(&self, key: &str) -> KvResult<Option<String>> {
            self.inner.get(key)
        }

        fn set(&self, key: &str, value: &str) -> KvResult<()> {
            if self.read_only.load(Ordering::SeqCst) {
                return Err(KvError::Io(io::Error::new(io::ErrorKind::Other, "disk full")));
            }
            self.inner.set(key, value)
        }

        fn remove(&self, key: &str) -> KvResult<()> {
            self.inner.remove(key)
        }
    }

    #[test]
    fn test_seeds_fresh_storage() {
        let storage = memory();
        let store = LocalStore::load(storage.clone()).unwrap();

        let pets = store.all_pets();
        assert_eq!(pets.len(), 2);
        assert_eq!(pets[0].pet_name, "Buddy");
        assert_eq!(store.all_medical_records().len(), 2);

        // Seed is persisted immediately.
        assert!(storage.get(PETS_KEY).unwrap().is_some());
        assert!(storage.get(RECORDS_KEY).unwrap().is_some());
    }

    #[test]
    fn test_persisted_empty_collections_are_kept() {
        let storage = memory();
        storage.set(PETS_KEY, "[]").unwrap();
        storage.set(RECORDS_KEY, "[]").unwrap();

        let store = LocalStore::load(storage).unwrap();
        assert!(store.all_pets().is_empty());
        assert!(store.all_medical_records().is_empty());
    }

    #[test]
    fn test_missing_one_collection_reseeds() {
        let storage = memory();
        storage.set(PETS_KEY, "[]").unwrap();

        let store = LocalStore::load(storage).unwrap();
        assert_eq!(store.all_pets().len(), 2);
    }

    #[test]
    fn test_loaded_entries_are_normalized() {
        let storage = memory();
        storage.set(PETS_KEY, r#"[{"id": 5, "species": "Dog"}]"#).unwrap();
        storage.set(RECORDS_KEY, r#"[{"id": 1, "pet_id": 5}]"#).unwrap();

        let store = LocalStore::load(storage).unwrap();
        let pet = store.find_pet(5).unwrap();
        assert_eq!(pet.pet_name, "Unknown Pet");
        assert_eq!(pet.owner_name, "Unknown Owner");

        let record = &store.all_medical_records()[0];
        assert_eq!(record.pet_name, "Unknown Pet");
        assert!(!record.visit_date.is_empty());
    }

    #[test]
    fn test_corrupt_collection_is_an_error() {
        let storage = memory();
        storage.set(PETS_KEY, "{oops").unwrap();
        storage.set(RECORDS_KEY, "[]").unwrap();
        assert!(LocalStore::load(storage).is_err());
    }

    #[test]
    fn test_mutations_survive_reload() {
        let storage = memory();
        let store = LocalStore::load(storage.clone()).unwrap();

        let id = store.insert_pet(NewPet::new("Rex", "Dog", "Ann")).unwrap();
        assert_eq!(id, 3);
        store.remove_pet(1).unwrap();

        let reloaded = LocalStore::load(storage).unwrap();
        let ids: Vec<_> = reloaded.all_pets().iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![2, 3]);
        assert!(reloaded.all_medical_records().iter().all(|r| r.pet_id != 1));
    }

    #[test]
    fn test_ids_not_recycled_below_max() {
        let store = LocalStore::with_collections(memory(), Vec::new(), Vec::new()).unwrap();
        let a = store.insert_pet(NewPet::new("A", "Dog", "X")).unwrap();
        let b = store.insert_pet(NewPet::new("B", "Dog", "X")).unwrap();
        store.remove_pet(a).unwrap();
        let c = store.insert_pet(NewPet::new("C", "Dog", "X")).unwrap();
        assert_eq!((a, b, c), (1, 2, 3));
    }

    #[test]
    fn test_authenticate() {
        let store = LocalStore::with_collections(memory(), Vec::new(), Vec::new()).unwrap();
        let user = store.authenticate("admin", "password123").unwrap();
        assert_eq!(user.id, 1);
        assert!(store.authenticate("admin", "wrong").is_none());
        assert!(store.authenticate("Admin", "password123").is_none());
    }

    #[test]
    fn test_failed_write_leaves_collections_unchanged() {
        let storage = Arc::new(FlakyStore::default());
        let store = LocalStore::load(storage.clone()).unwrap();
        storage.read_only.store(true, Ordering::SeqCst);

        assert!(store.insert_pet(NewPet::new("Rex", "Dog", "Ann")).is_err());
        assert!(store.insert_pet(NewPet::new("Rex", "Dog", "Ann")).is_err());
        assert!(store.remove_pet(1).is_err());
        assert!(store.insert_medical_record(NewMedicalRecord::new(1, "2024-03-01")).is_err());

        let ids: Vec<_> = store.all_pets().iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![1, 2]);
        assert_eq!(store.all_medical_records().len(), 2);

        storage.read_only.store(false, Ordering::SeqCst);
        assert_eq!(store.insert_pet(NewPet::new("Rex", "Dog", "Ann")).unwrap(), 3);
    }
}
