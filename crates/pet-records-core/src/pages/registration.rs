use crate::app::App;
use crate::models::{Created, FormFields};

use super::{require_fields, PageResult};

const REQUIRED: &[(&str, &[&str])] = &[
    ("petName", &["pet_name", "petName"]),
    ("species", &["species"]),
    ("ownerName", &["owner_name", "ownerName"]),
    ("ownerEmail", &["owner_email", "ownerEmail"]),
];

/// The pet registration form.
pub struct RegistrationForm;

impl RegistrationForm {
    /// Register a pet from submitted fields. Blank fields count as absent.
    pub async fn submit(app: &App, fields: FormFields) -> PageResult<Created> {
        app.session.require_auth()?;

        let fields = fields.without_blanks();
        require_fields(&fields, REQUIRED)?;

        Ok(app.access.create_pet(&fields).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pages::testing::signed_in_app;
    use crate::pages::PageError;

    fn complete() -> FormFields {
        FormFields::from_pairs([
            ("petName", "Rex"),
            ("species", "Dog"),
            ("breed", ""),
            ("age", "4"),
            ("ownerName", "Ann"),
            ("ownerEmail", "ann@example.com"),
        ])
    }

    #[tokio::test]
    async fn test_registers_pet() {
        let app = signed_in_app();
        let created = RegistrationForm::submit(&app, complete()).await.unwrap();
        assert_eq!(created.id, 3);
        assert_eq!(created.message, "Pet registered successfully");

        let pet = app.access.local().find_pet(3).unwrap();
        assert_eq!(pet.pet_name, "Rex");
        assert_eq!(pet.age, 4);
        assert_eq!(pet.breed, "");
    }

    #[tokio::test]
    async fn test_missing_fields_listed() {
        let app = signed_in_app();
        let mut fields = complete();
        fields.insert("ownerEmail", "");
        fields.insert("species", "");

        let err = RegistrationForm::submit(&app, fields).await.unwrap_err();
        match err {
            PageError::MissingFields(missing) => assert_eq!(missing, vec!["species", "ownerEmail"]),
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(app.access.local().all_pets().len(), 2);
    }

    #[tokio::test]
    async fn test_requires_login() {
        let app = App::in_memory().unwrap();
        let err = RegistrationForm::submit(&app, complete()).await.unwrap_err();
        assert!(err.needs_login());
    }
}
