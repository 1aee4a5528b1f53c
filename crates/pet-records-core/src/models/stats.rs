//! Dashboard aggregates and write acknowledgements.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::{MedicalRecord, Pet};

/// Dashboard counters.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_pets: u64,
    pub total_owners: u64,
    pub total_visits: u64,
    pub this_month_visits: u64,
}

impl DashboardStats {
    /// Compute the counters over in-memory collections.
    pub fn compute(pets: &[Pet], records: &[MedicalRecord], month: &str) -> Self {
        let owners: HashSet<String> = pets.iter().map(Pet::owner_key).collect();
        Self {
            total_pets: pets.len() as u64,
            total_owners: owners.len() as u64,
            total_visits: records.len() as u64,
            this_month_visits: records.iter().filter(|r| r.is_in_month(month)).count() as u64,
        }
    }

    /// Whether any pets or visits were counted.
    pub fn has_data(&self) -> bool {
        self.total_pets > 0 || self.total_visits > 0
    }
}

/// Acknowledgement for a created pet or visit.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Created {
    pub id: i64,
    pub message: String,
}

/// Acknowledgement for a deletion.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Deleted {
    pub message: String,
    /// Whether a row existed; reported by the REST backend only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub removed: Option<bool>,
}

pub const PET_CREATED: &str = "Pet registered successfully";
pub const PET_DELETED: &str = "Pet and related records deleted successfully";
pub const RECORD_CREATED: &str = "Medical record saved successfully";

impl Created {
    pub fn pet(id: i64) -> Self {
        Self {
            id,
            message: PET_CREATED.to_string(),
        }
    }

    pub fn medical_record(id: i64) -> Self {
        Self {
            id,
            message: RECORD_CREATED.to_string(),
        }
    }
}

impl Deleted {
    pub fn pet() -> Self {
        Self {
            message: PET_DELETED.to_string(),
            removed: None,
        }
    }

    pub fn with_removed(mut self, removed: bool) -> Self {
        self.removed = Some(removed);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{NewMedicalRecord, NewPet};

    #[test]
    fn test_compute_counts() {
        let pets = vec![
            Pet::from_new(1, NewPet::new("Rex", "Dog", "Ann").with_owner_email("ann@x.com")),
            Pet::from_new(2, NewPet::new("Tom", "Cat", "Ann").with_owner_email("ANN@x.com")),
            Pet::from_new(3, NewPet::new("Kiwi", "Bird", "Bob")),
            Pet::from_new(4, NewPet::new("Fin", "Fish", "Cy")),
        ];
        let records = vec![
            MedicalRecord::from_new(1, NewMedicalRecord::new(1, "2024-02-01")),
            MedicalRecord::from_new(2, NewMedicalRecord::new(2, "2024-02-28")),
            MedicalRecord::from_new(3, NewMedicalRecord::new(2, "2024-03-01")),
        ];

        let stats = DashboardStats::compute(&pets, &records, "2024-02");
        assert_eq!(stats.total_pets, 4);
        // ann@x.com, name:Bob, name:Cy
        assert_eq!(stats.total_owners, 3);
        assert_eq!(stats.total_visits, 3);
        assert_eq!(stats.this_month_visits, 2);
    }

    #[test]
    fn test_wire_format_is_camel_case() {
        let stats = DashboardStats {
            total_pets: 1,
            total_owners: 1,
            total_visits: 0,
            this_month_visits: 0,
        };
        let json = serde_json::to_value(stats).unwrap();
        assert_eq!(json["totalPets"], 1);
        assert_eq!(json["thisMonthVisits"], 0);
        assert!(stats.has_data());
    }
}
