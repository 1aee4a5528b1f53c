//! Login session persisted in key-value storage.

use std::sync::Arc;

use thiserror::Error;
use tracing::info;

use crate::kv::{KeyValueStore, KvError};
use crate::models::User;

pub const LOGGED_IN_KEY: &str = "isLoggedIn";
pub const USERNAME_KEY: &str = "username";
pub const USER_ID_KEY: &str = "userId";
pub const REMEMBER_ME_KEY: &str = "rememberMe";
pub const SAVED_USERNAME_KEY: &str = "savedUsername";

#[derive(Error, Debug)]
pub enum SessionError {
    /// Nobody is logged in; callers redirect to the login page.
    #[error("not authenticated")]
    NotAuthenticated,

    #[error("session storage error: {0}")]
    Storage(#[from] KvError),
}

pub type SessionResult<T> = Result<T, SessionError>;

/// Who is logged in on this device.
///
/// Sessions never expire; they end only on [`Session::sign_out`].
#[derive(Clone)]
pub struct Session {
    storage: Arc<dyn KeyValueStore>,
}

impl Session {
    pub fn new(storage: Arc<dyn KeyValueStore>) -> Self {
        Self { storage }
    }

    fn flag(&self, key: &str) -> SessionResult<bool> {
        Ok(self.storage.get(key)?.as_deref() == Some("true"))
    }

    pub fn is_logged_in(&self) -> SessionResult<bool> {
        self.flag(LOGGED_IN_KEY)
    }

    pub fn username(&self) -> SessionResult<Option<String>> {
        Ok(self.storage.get(USERNAME_KEY)?)
    }

    pub fn user_id(&self) -> SessionResult<Option<i64>> {
        Ok(self
            .storage
            .get(USER_ID_KEY)?
            .and_then(|id| id.trim().parse().ok()))
    }

    /// Record a successful login.
    ///
    /// With `remember` set the username is kept for the next visit to the
    /// login form; without it any remembered username is forgotten.
    pub fn sign_in(&self, user: &User, remember: bool) -> SessionResult<()> {
        self.storage.set(LOGGED_IN_KEY, "true")?;
        self.storage.set(USERNAME_KEY, &user.username)?;
        self.storage.set(USER_ID_KEY, &user.id.to_string())?;

        if remember {
            self.storage.set(REMEMBER_ME_KEY, "true")?;
            self.storage.set(SAVED_USERNAME_KEY, &user.username)?;
        } else {
            self.storage.remove(REMEMBER_ME_KEY)?;
            self.storage.remove(SAVED_USERNAME_KEY)?;
        }

        info!(username = %user.username, remember, "Signed in");
        Ok(())
    }

    /// End the session. The remembered username survives.
    pub fn sign_out(&self) -> SessionResult<()> {
        self.storage.remove(LOGGED_IN_KEY)?;
        self.storage.remove(USERNAME_KEY)?;
        self.storage.remove(USER_ID_KEY)?;
        info!("Signed out");
        Ok(())
    }

    /// The logged-in username, or [`SessionError::NotAuthenticated`].
    pub fn require_auth(&self) -> SessionResult<String> {
        if !self.is_logged_in()? {
            return Err(SessionError::NotAuthenticated);
        }
        Ok(self.username()?.unwrap_or_default())
    }

    /// Username to pre-fill on the login form.
    pub fn remembered_username(&self) -> SessionResult<Option<String>> {
        if !self.flag(REMEMBER_ME_KEY)? {
            return Ok(None);
        }
        Ok(self.storage.get(SAVED_USERNAME_KEY)?)
    }
}
