//! Property tests for id allocation and cascading deletes in the local store.

use std::sync::Arc;

use pet_records_core::{KeyValueStore, LocalStore, MemoryStore, NewMedicalRecord, NewPet};
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Op {
    AddPet,
    AddVisit(usize),
    DeletePet(usize),
}

fn arb_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => Just(Op::AddPet),
        3 => (0usize..8).prop_map(Op::AddVisit),
        1 => (0usize..8).prop_map(Op::DeletePet),
    ]
}

fn seeded() -> LocalStore {
    let storage: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
    LocalStore::load(storage).unwrap()
}

proptest! {
    #[test]
    fn prop_new_ids_exceed_every_live_id(ops in prop::collection::vec(arb_op(), 1..40)) {
        let store = seeded();

        for op in ops {
            let pets = store.all_pets();
            let records = store.all_medical_records();
            match op {
                Op::AddPet => {
                    let id = store.insert_pet(NewPet::new("P", "Dog", "O")).unwrap();
                    prop_assert!(pets.iter().all(|p| p.id < id));
                }
                Op::AddVisit(i) => {
                    let pet_id = pets.get(i).map(|p| p.id).unwrap_or(1);
                    let id = store
                        .insert_medical_record(NewMedicalRecord::new(pet_id, "2024-01-01"))
                        .unwrap();
                    prop_assert!(records.iter().all(|r| r.id < id));
                }
                Op::DeletePet(i) => {
                    if let Some(pet) = pets.get(i) {
                        store.remove_pet(pet.id).unwrap();
                    }
                }
            }
        }

        let mut ids: Vec<_> = store.all_pets().iter().map(|p| p.id).collect();
        let before = ids.len();
        ids.sort_unstable();
        ids.dedup();
        prop_assert_eq!(ids.len(), before);
    }

    #[test]
    fn prop_consecutive_creates_strictly_increase(count in 1usize..20) {
        let store = seeded();
        let mut last = 2;
        for _ in 0..count {
            let id = store.insert_pet(NewPet::new("P", "Dog", "O")).unwrap();
            prop_assert_eq!(id, last + 1);
            last = id;
        }
    }

    #[test]
    fn prop_delete_removes_only_matching(visits in prop::collection::vec(1i64..=4, 0..20), target in 1i64..=4) {
        let store = seeded();
        store.insert_pet(NewPet::new("C", "Cat", "O")).unwrap();
        store.insert_pet(NewPet::new("D", "Dog", "O")).unwrap();
        for pet_id in &visits {
            store
                .insert_medical_record(NewMedicalRecord::new(*pet_id, "2024-01-01"))
                .unwrap();
        }

        let pets_before = store.all_pets();
        let records_before = store.all_medical_records();
        store.remove_pet(target).unwrap();

        let pets_after = store.all_pets();
        let records_after = store.all_medical_records();

        prop_assert_eq!(pets_after.len(), pets_before.len() - 1);
        prop_assert!(pets_after.iter().all(|p| p.id != target));
        prop_assert!(records_after.iter().all(|r| r.pet_id != target));
        let expected = records_before.iter().filter(|r| r.pet_id != target).count();
        prop_assert_eq!(records_after.len(), expected);
    }
}
