use crate::access::INVALID_CREDENTIALS;
use crate::app::App;
use crate::models::{FormFields, User};

use super::{PageError, PageResult};

/// The login screen.
pub struct LoginPage;

impl LoginPage {
    /// Username to pre-fill, if the last login asked to be remembered.
    pub fn prefill(app: &App) -> PageResult<Option<String>> {
        Ok(app.session.remembered_username()?)
    }

    /// Whether an existing session lets the user skip the login form.
    pub fn already_signed_in(app: &App) -> PageResult<bool> {
        Ok(app.session.is_logged_in()?)
    }

    /// Check credentials and start a session.
    ///
    /// Reads `username`, `password` and the `rememberMe` checkbox.
    pub async fn submit(app: &App, fields: &FormFields) -> PageResult<User> {
        let (Some(username), Some(password)) =
            (fields.text(&["username"]), fields.text(&["password"]))
        else {
            return Err(PageError::MissingCredentials);
        };
        let remember = fields.flag(&["rememberMe", "remember_me"]);

        let outcome = app.access.login(&username, &password).await;
        match outcome.user {
            Some(user) if outcome.success => {
                app.session.sign_in(&user, remember)?;
                Ok(user)
            }
            _ => Err(PageError::LoginRejected(
                outcome
                    .error
                    .unwrap_or_else(|| INVALID_CREDENTIALS.to_string()),
            )),
        }
    }

    pub fn logout(app: &App) -> PageResult<()> {
        Ok(app.session.sign_out()?)
    }
}
