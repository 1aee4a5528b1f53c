//! User database operations.

use rusqlite::{params, OptionalExtension};

use super::{Database, DbResult};
use crate::models::User;

impl Database {
    /// Look up a user by plaintext credentials.
    pub fn authenticate(&self, username: &str, password: &str) -> DbResult<Option<User>> {
        self.conn
            .query_row(
                "SELECT id, username, role FROM users WHERE username = ? AND password = ?",
                params![username, password],
                |row| {
                    Ok(User {
                        id: row.get(0)?,
                        username: row.get(1)?,
                        role: row.get(2)?,
                    })
                },
            )
            .optional()
            .map_err(Into::into)
    }

    /// Add a user account.
    pub fn insert_user(&self, username: &str, password: &str, role: &str) -> DbResult<i64> {
        self.conn.execute(
            "INSERT INTO users (username, password, role) VALUES (?1, ?2, ?3)",
            params![username, password, role],
        )?;
        Ok(self.conn.last_insert_rowid())
    }
}
