//! Pet database operations.

use rusqlite::{params, OptionalExtension, Row};

use super::{Database, DbResult};
use crate::models::{today, NewPet, Pet};

const PET_COLUMNS: &str = r#"
    id, pet_name, species, breed, age, gender, weight, medical_history,
    owner_name, owner_email, owner_phone, owner_address, registration_date
"#;

fn pet_from_row(row: &Row<'_>) -> rusqlite::Result<Pet> {
    Ok(Pet {
        id: row.get(0)?,
        pet_name: row.get(1)?,
        species: row.get(2)?,
        breed: row.get::<_, Option<String>>(3)?.unwrap_or_default(),
        age: row.get::<_, Option<i64>>(4)?.unwrap_or_default(),
        gender: row.get::<_, Option<String>>(5)?.unwrap_or_default(),
        weight: row.get::<_, Option<f64>>(6)?.unwrap_or_default(),
        medical_history: row.get::<_, Option<String>>(7)?.unwrap_or_default(),
        owner_name: row.get(8)?,
        owner_email: row.get::<_, Option<String>>(9)?.unwrap_or_default(),
        owner_phone: row.get::<_, Option<String>>(10)?.unwrap_or_default(),
        owner_address: row.get::<_, Option<String>>(11)?.unwrap_or_default(),
        registration_date: row.get::<_, Option<String>>(12)?.unwrap_or_default(),
    })
}

impl Database {
    /// Insert a new pet and return its id.
    pub fn insert_pet(&self, pet: &NewPet) -> DbResult<i64> {
        let registration_date = pet.registration_date.clone().unwrap_or_else(today);
        self.conn.execute(
            r#"
            INSERT INTO pets (
                pet_name, species, breed, age, gender, weight, medical_history,
                owner_name, owner_email, owner_phone, owner_address, registration_date
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)
            "#,
            params![
                pet.pet_name,
                pet.species,
                pet.breed,
                pet.age,
                pet.gender,
                pet.weight,
                pet.medical_history,
                pet.owner_name,
                pet.owner_email,
                pet.owner_phone,
                pet.owner_address,
                registration_date,
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Get a pet by ID.
    pub fn get_pet(&self, id: i64) -> DbResult<Option<Pet>> {
        self.conn
            .query_row(
                &format!("SELECT {} FROM pets WHERE id = ?", PET_COLUMNS),
                [id],
                pet_from_row,
            )
            .optional()
            .map_err(Into::into)
    }

    /// List all pets, most recently registered first.
    pub fn list_pets(&self) -> DbResult<Vec<Pet>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM pets ORDER BY registration_date DESC, id DESC",
            PET_COLUMNS
        ))?;

        let rows = stmt.query_map([], pet_from_row)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    /// Delete a pet and its medical records.
    ///
    /// Returns whether a pet was removed; a missing id is not an error.
    pub fn delete_pet(&self, id: i64) -> DbResult<bool> {
        self.conn
            .execute("DELETE FROM medical_records WHERE pet_id = ?", [id])?;
        let rows_affected = self.conn.execute("DELETE FROM pets WHERE id = ?", [id])?;
        Ok(rows_affected > 0)
    }
}
