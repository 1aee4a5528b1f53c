use serde::Serialize;
use tracing::debug;

use crate::app::App;
use crate::models::{parse_integer, Deleted, MedicalRecord, Pet};

use super::PageResult;

/// Search box and species selector of the records table.
#[derive(Debug, Clone, Default)]
pub struct PetFilter {
    /// Case-insensitive substring of the pet or owner name.
    pub search: String,
    /// Species to show; empty shows all. Compared ignoring ASCII case.
    pub species: String,
}

impl PetFilter {
    pub fn new(search: impl Into<String>, species: impl Into<String>) -> Self {
        Self {
            search: search.into(),
            species: species.into(),
        }
    }

    pub fn matches(&self, pet: &Pet) -> bool {
        let term = self.search.to_lowercase();
        let matches_search = pet.pet_name.to_lowercase().contains(&term)
            || pet.owner_name.to_lowercase().contains(&term);
        let matches_species =
            self.species.is_empty() || pet.species.eq_ignore_ascii_case(&self.species);
        matches_search && matches_species
    }
}

/// One row of the records table.
#[derive(Debug, Clone, Serialize)]
pub struct RecordRow {
    pub pet: Pet,
    /// Latest visit date, `None` when the pet has no visits.
    pub last_visit: Option<String>,
}

/// A pet with its full visit history.
#[derive(Debug, Clone, Serialize)]
pub struct PetDetail {
    pub pet: Pet,
    pub visits: Vec<MedicalRecord>,
}

/// The manage-records screen.
pub struct RecordsTable;

impl RecordsTable {
    pub async fn load(app: &App, filter: &PetFilter) -> PageResult<Vec<RecordRow>> {
        app.session.require_auth()?;
        let pets = app.access.get_pets().await;
        let records = app.access.get_medical_records().await;

        Ok(pets
            .into_iter()
            .filter(|pet| filter.matches(pet))
            .map(|pet| {
                let last_visit = records
                    .iter()
                    .filter(|r| r.pet_id == pet.id)
                    .map(|r| r.visit_date.clone())
                    .max();
                RecordRow { pet, last_visit }
            })
            .collect())
    }

    /// `None` when no pet has this id.
    pub async fn detail(app: &App, pet_id: i64) -> PageResult<Option<PetDetail>> {
        app.session.require_auth()?;
        let Some(pet) = app.access.get_pets().await.into_iter().find(|p| p.id == pet_id) else {
            return Ok(None);
        };
        let visits = app
            .access
            .get_medical_records()
            .await
            .into_iter()
            .filter(|r| r.pet_id == pet_id)
            .collect();
        Ok(Some(PetDetail { pet, visits }))
    }

    /// Delete the pet whose id was clicked; an unparseable id does nothing.
    pub async fn delete(app: &App, pet_id: &str) -> PageResult<Option<Deleted>> {
        app.session.require_auth()?;
        let Some(id) = parse_integer(pet_id) else {
            debug!(pet_id, "Ignoring delete of unparseable id");
            return Ok(None);
        };
        Ok(Some(app.access.delete_pet(id).await?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NewMedicalRecord;
    use crate::pages::testing::signed_in_app;

    #[tokio::test]
    async fn test_rows_with_last_visit() {
        let app = signed_in_app();
        app.access
            .create_medical_record(NewMedicalRecord::new(1, "2024-05-05"))
            .await
            .unwrap();

        let rows = RecordsTable::load(&app, &PetFilter::default()).await.unwrap();
        assert_eq!(rows.len(), 2);
        let buddy = rows.iter().find(|r| r.pet.id == 1).unwrap();
        assert_eq!(buddy.last_visit.as_deref(), Some("2024-05-05"));
    }

    #[tokio::test]
    async fn test_filters() {
        let app = signed_in_app();

        let rows = RecordsTable::load(&app, &PetFilter::new("JANE", "")).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].pet.pet_name, "Whiskers");

        let rows = RecordsTable::load(&app, &PetFilter::new("", "dog")).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].pet.pet_name, "Buddy");

        let rows = RecordsTable::load(&app, &PetFilter::new("bud", "cat")).await.unwrap();
        assert!(rows.is_empty());
    }

    #[tokio::test]
    async fn test_detail() {
        let app = signed_in_app();
        let detail = RecordsTable::detail(&app, 2).await.unwrap().unwrap();
        assert_eq!(detail.pet.pet_name, "Whiskers");
        assert_eq!(detail.visits.len(), 1);
        assert!(RecordsTable::detail(&app, 99).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_delete() {
        let app = signed_in_app();
        assert!(RecordsTable::delete(&app, "x1").await.unwrap().is_none());
        assert_eq!(app.access.get_pets().await.len(), 2);

        let deleted = RecordsTable::delete(&app, "1").await.unwrap().unwrap();
        assert_eq!(deleted.message, "Pet and related records deleted successfully");
        let rows = RecordsTable::load(&app, &PetFilter::default()).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert!(app.access.get_medical_records().await.iter().all(|r| r.pet_id != 1));
    }
}
