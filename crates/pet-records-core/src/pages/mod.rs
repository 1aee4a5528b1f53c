//! Page controllers.
//!
//! Each controller is what one screen of the application does, without the
//! markup: it checks the session, validates the submitted fields and calls the
//! data-access facade. Every page except login requires a signed-in session and
//! fails with [`SessionError::NotAuthenticated`] otherwise, which callers treat
//! as a redirect to the login page.

mod dashboard;
mod login;
mod records;
mod registration;
mod visit;

pub use dashboard::{DashboardPage, RECENT_VISITS};
pub use login::LoginPage;
pub use records::{PetDetail, PetFilter, RecordRow, RecordsTable};
pub use registration::RegistrationForm;
pub use visit::VisitForm;

use thiserror::Error;

use crate::access::AccessError;
use crate::models::FormFields;
use crate::session::SessionError;

/// Page-level failures. The `Display` text is what the user sees.
#[derive(Error, Debug)]
pub enum PageError {
    #[error("Please enter both username and password.")]
    MissingCredentials,

    /// Required form fields were blank; the names are kept for logging.
    #[error("Please fill in all required fields")]
    MissingFields(Vec<String>),

    #[error("{0}")]
    LoginRejected(String),

    #[error(transparent)]
    Session(#[from] SessionError),

    #[error(transparent)]
    Access(#[from] AccessError),
}

pub type PageResult<T> = Result<T, PageError>;

impl PageError {
    /// Whether the caller should send the user to the login page.
    pub fn needs_login(&self) -> bool {
        matches!(self, PageError::Session(SessionError::NotAuthenticated))
    }
}

/// Fail with [`PageError::MissingFields`] unless every required field has a value.
fn require_fields(fields: &FormFields, required: &[(&'static str, &[&str])]) -> PageResult<()> {
    let missing = fields.missing(required);
    if missing.is_empty() {
        return Ok(());
    }
    tracing::debug!(?missing, "Form rejected");
    Err(PageError::MissingFields(
        missing.into_iter().map(String::from).collect(),
    ))
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        assert_eq!(
            PageError::MissingFields(vec!["species".into()]).to_string(),
            "Please fill in all required fields"
        );
        assert_eq!(
            PageError::MissingCredentials.to_string(),
            "Please enter both username and password."
        );
        assert!(PageError::Session(SessionError::NotAuthenticated).needs_login());
        assert!(!PageError::MissingCredentials.needs_login());
    }
}
