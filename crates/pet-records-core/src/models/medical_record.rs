//! Visit (medical record) models.

use serde::{Deserialize, Serialize};

use super::{null_as_default, or_placeholder, today, UNKNOWN_OWNER, UNKNOWN_PET};

/// A single visit for a pet.
///
/// `pet_name` and `owner_name` are copied from the pet when the record is
/// written and are not kept in sync afterwards.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MedicalRecord {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub pet_id: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub pet_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub owner_name: String,
    /// Visit date (`YYYY-MM-DD`)
    #[serde(default, deserialize_with = "null_as_default")]
    pub visit_date: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub visit_type: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub veterinarian: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub symptoms: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub diagnosis: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub treatment: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub vaccines: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub notes: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub weight: f64,
    /// Body temperature (°F)
    #[serde(default, deserialize_with = "null_as_default")]
    pub temperature: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub created_at: String,
}

impl MedicalRecord {
    /// Build a stored record from normalized input.
    pub fn from_new(id: i64, new: NewMedicalRecord) -> Self {
        Self {
            id,
            pet_id: new.pet_id,
            pet_name: new.pet_name,
            owner_name: new.owner_name,
            visit_date: new.visit_date,
            visit_type: new.visit_type,
            veterinarian: new.veterinarian,
            symptoms: new.symptoms,
            diagnosis: new.diagnosis,
            treatment: new.treatment,
            vaccines: new.vaccines,
            notes: new.notes,
            weight: new.weight,
            temperature: new.temperature,
            created_at: chrono::Utc::now().to_rfc3339(),
        }
    }

    /// Fill placeholders for fields that were left empty.
    pub fn normalized(mut self) -> Self {
        or_placeholder(&mut self.pet_name, UNKNOWN_PET);
        or_placeholder(&mut self.owner_name, UNKNOWN_OWNER);
        if self.visit_date.is_empty() {
            self.visit_date = today();
        }
        if self.created_at.is_empty() {
            self.created_at = chrono::Utc::now().to_rfc3339();
        }
        self
    }

    /// Whether the visit happened in the given `YYYY-MM` month.
    pub fn is_in_month(&self, month: &str) -> bool {
        !self.visit_date.is_empty() && self.visit_date.starts_with(month)
    }
}

/// A visit about to be created, with every default already applied.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewMedicalRecord {
    pub pet_id: i64,
    /// Display name copied from the pet; relational stores join it instead
    #[serde(default)]
    pub pet_name: String,
    #[serde(default)]
    pub owner_name: String,
    pub visit_date: String,
    pub visit_type: String,
    pub veterinarian: String,
    pub symptoms: String,
    pub diagnosis: String,
    pub treatment: String,
    pub vaccines: String,
    pub notes: String,
    pub weight: f64,
    pub temperature: f64,
}

impl NewMedicalRecord {
    /// Create a visit for a pet on the given date.
    pub fn new(pet_id: i64, visit_date: impl Into<String>) -> Self {
        Self {
            pet_id,
            pet_name: UNKNOWN_PET.to_string(),
            owner_name: UNKNOWN_OWNER.to_string(),
            visit_date: visit_date.into(),
            visit_type: String::new(),
            veterinarian: String::new(),
            symptoms: String::new(),
            diagnosis: String::new(),
            treatment: String::new(),
            vaccines: String::new(),
            notes: String::new(),
            weight: 0.0,
            temperature: 0.0,
        }
    }

    /// Set who saw the pet and what they found.
    pub fn with_visit(mut self, veterinarian: impl Into<String>, diagnosis: impl Into<String>) -> Self {
        self.veterinarian = veterinarian.into();
        self.diagnosis = diagnosis.into();
        self
    }
}
