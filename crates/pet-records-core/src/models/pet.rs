//! Pet and owner models.

use serde::{Deserialize, Serialize};

use super::{null_as_default, or_placeholder, today, UNKNOWN_OWNER, UNKNOWN_PET, UNKNOWN_SPECIES};

/// A registered pet together with its owner's contact details.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Pet {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub pet_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub species: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub breed: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub age: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub gender: String,
    /// Weight in kilograms
    #[serde(default, deserialize_with = "null_as_default")]
    pub weight: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub medical_history: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub owner_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub owner_email: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub owner_phone: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub owner_address: String,
    /// Registration date (`YYYY-MM-DD`), fixed at creation
    #[serde(default, deserialize_with = "null_as_default")]
    pub registration_date: String,
}

impl Pet {
    /// Build a stored pet from normalized input.
    pub fn from_new(id: i64, new: NewPet) -> Self {
        Self {
            id,
            pet_name: new.pet_name,
            species: new.species,
            breed: new.breed,
            age: new.age,
            gender: new.gender,
            weight: new.weight,
            medical_history: new.medical_history,
            owner_name: new.owner_name,
            owner_email: new.owner_email,
            owner_phone: new.owner_phone,
            owner_address: new.owner_address,
            registration_date: new.registration_date.unwrap_or_else(today),
        }
    }

    /// Fill placeholders for required fields that were left empty.
    pub fn normalized(mut self) -> Self {
        or_placeholder(&mut self.pet_name, UNKNOWN_PET);
        or_placeholder(&mut self.species, UNKNOWN_SPECIES);
        or_placeholder(&mut self.owner_name, UNKNOWN_OWNER);
        if self.registration_date.is_empty() {
            self.registration_date = today();
        }
        self
    }

    /// Key used to count distinct owners.
    ///
    /// Owners are identified by email; pets without one fall back to the
    /// owner's name so unrelated owners without email are not merged.
    pub fn owner_key(&self) -> String {
        let email = self.owner_email.trim();
        if email.is_empty() {
            format!("name:{}", self.owner_name)
        } else {
            email.to_lowercase()
        }
    }
}

/// A pet about to be created, with every default already applied.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewPet {
    pub pet_name: String,
    pub species: String,
    pub breed: String,
    pub age: i64,
    pub gender: String,
    pub weight: f64,
    pub medical_history: String,
    pub owner_name: String,
    pub owner_email: String,
    pub owner_phone: String,
    pub owner_address: String,
    /// Explicit registration date; stores use today's date when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub registration_date: Option<String>,
}

impl NewPet {
    /// Create a pet with only the required fields set.
    pub fn new(pet_name: impl Into<String>, species: impl Into<String>, owner_name: impl Into<String>) -> Self {
        Self {
            pet_name: pet_name.into(),
            species: species.into(),
            breed: String::new(),
            age: 0,
            gender: String::new(),
            weight: 0.0,
            medical_history: String::new(),
            owner_name: owner_name.into(),
            owner_email: String::new(),
            owner_phone: String::new(),
            owner_address: String::new(),
            registration_date: None,
        }
    }

    /// Set the owner's email.
    pub fn with_owner_email(mut self, email: impl Into<String>) -> Self {
        self.owner_email = email.into();
        self
    }
}
