//! Database layer for pet records.

mod medical_records;
mod pets;
mod schema;
mod users;

pub use schema::*;

use rusqlite::Connection;
use std::path::Path;
use thiserror::Error;

/// Database errors.
#[derive(Error, Debug)]
pub enum DbError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Not a pet records database: {0}")]
    InvalidDatabase(String),
}

pub type DbResult<T> = Result<T, DbError>;

/// Tables every valid database must contain.
const REQUIRED_TABLES: [&str; 3] = ["users", "pets", "medical_records"];

/// Database connection wrapper.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open database at path, creating if needed.
    pub fn open<P: AsRef<Path>>(path: P) -> DbResult<Self> {
        let conn = Connection::open(path)?;
        let db = Self { conn };
        db.initialize()?;
        Ok(db)
    }

    /// Create in-memory database.
    pub fn open_in_memory() -> DbResult<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.initialize()?;
        Ok(db)
    }

    /// Initialize schema and the default admin account.
    fn initialize(&self) -> DbResult<()> {
        self.conn.execute_batch(SCHEMA)?;
        Ok(())
    }

    /// Get raw connection (for advanced queries).
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Write a consistent copy of the database to `path`.
    ///
    /// The target file must not exist yet.
    pub fn export_to<P: AsRef<Path>>(&self, path: P) -> DbResult<()> {
        let target = path.as_ref().to_string_lossy().into_owned();
        self.conn.execute("VACUUM INTO ?1", [target])?;
        Ok(())
    }

    /// Check that `path` holds an intact pet records database.
    pub fn validate_file<P: AsRef<Path>>(path: P) -> DbResult<()> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(DbError::InvalidDatabase(format!("{} does not exist", path.display())));
        }

        let conn = Connection::open_with_flags(path, rusqlite::OpenFlags::SQLITE_OPEN_READ_ONLY)?;
        let integrity: String = conn.query_row("PRAGMA integrity_check", [], |row| row.get(0))?;
        if integrity != "ok" {
            return Err(DbError::InvalidDatabase(integrity));
        }

        for table in REQUIRED_TABLES {
            let found: i64 = conn.query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?",
                [table],
                |row| row.get(0),
            )?;
            if found == 0 {
                return Err(DbError::InvalidDatabase(format!("missing table {}", table)));
            }
        }
        Ok(())
    }

    /// Replace the database at `target` with a previously exported file and open it.
    pub fn import_file<P: AsRef<Path>, Q: AsRef<Path>>(source: P, target: Q) -> DbResult<Self> {
        Self::validate_file(&source)?;
        std::fs::copy(source, &target)?;
        Self::open(target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NewPet;

    #[test]
    fn test_open_in_memory() {
        let db = Database::open_in_memory();
        assert!(db.is_ok());
    }

    #[test]
    fn test_schema_initialized() {
        let db = Database::open_in_memory().unwrap();

        let tables: Vec<String> = db
            .conn()
            .prepare("SELECT name FROM sqlite_master WHERE type='table' ORDER BY name")
            .unwrap()
            .query_map([], |row| row.get(0))
            .unwrap()
            .filter_map(|r| r.ok())
            .collect();

        for table in REQUIRED_TABLES {
            assert!(tables.contains(&table.to_string()), "missing {}", table);
        }
    }

    #[test]
    fn test_export_and_import() {
        let dir = tempfile::tempdir().unwrap();
        let backup = dir.path().join("backup.db");
        let restored = dir.path().join("restored.db");

        let db = Database::open_in_memory().unwrap();
        db.insert_pet(&NewPet::new("Rex", "Dog", "Ann")).unwrap();
        db.export_to(&backup).unwrap();

        let imported = Database::import_file(&backup, &restored).unwrap();
        let pets = imported.list_pets().unwrap();
        assert_eq!(pets.len(), 1);
        assert_eq!(pets[0].pet_name, "Rex");
    }

    #[test]
    fn test_validate_rejects_foreign_database() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("other.db");
        let conn = Connection::open(&path).unwrap();
        conn.execute_batch("CREATE TABLE notes (body TEXT);").unwrap();
        drop(conn);

        let result = Database::validate_file(&path);
        assert!(matches!(result, Err(DbError::InvalidDatabase(_))));
    }

    #[test]
    fn test_validate_rejects_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = Database::validate_file(dir.path().join("nope.db"));
        assert!(matches!(result, Err(DbError::InvalidDatabase(_))));
    }
}
