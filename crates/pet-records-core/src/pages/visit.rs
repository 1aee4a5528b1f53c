use crate::app::App;
use crate::models::{Created, FormFields, NewMedicalRecord, Pet};

use super::{require_fields, PageError, PageResult};

const PET_ID_KEYS: &[&str] = &["pet_id", "petId"];

const REQUIRED: &[(&str, &[&str])] = &[
    ("petId", PET_ID_KEYS),
    ("visitDate", &["visit_date", "visitDate"]),
    ("veterinarian", &["veterinarian"]),
    ("diagnosis", &["diagnosis"]),
];

/// The medical visit form.
pub struct VisitForm;

impl VisitForm {
    /// Pets offered in the pet selector.
    pub async fn pets(app: &App) -> PageResult<Vec<Pet>> {
        app.session.require_auth()?;
        Ok(app.access.get_pets().await)
    }

    /// The selected pet's last known weight, for pre-filling the form.
    pub async fn suggested_weight(app: &App, pet_id: i64) -> PageResult<Option<f64>> {
        app.session.require_auth()?;
        Ok(app
            .access
            .get_pets()
            .await
            .into_iter()
            .find(|p| p.id == pet_id)
            .map(|p| p.weight)
            .filter(|w| *w > 0.0))
    }

    /// Save a visit from submitted fields.
    pub async fn submit(app: &App, fields: FormFields) -> PageResult<Created> {
        app.session.require_auth()?;

        let fields = fields.without_blanks();
        require_fields(&fields, REQUIRED)?;
        if fields.integer(PET_ID_KEYS).is_none() {
            return Err(PageError::MissingFields(vec!["petId".to_string()]));
        }

        Ok(app
            .access
            .create_medical_record(NewMedicalRecord::from_fields(&fields))
            .await?)
    }
}
