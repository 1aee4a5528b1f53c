//! SQLite schema definition.

/// Complete database schema for pet records.
pub const SCHEMA: &str = r#"
-- Enable foreign keys
PRAGMA foreign_keys = ON;

-- ============================================================================
-- Users
-- ============================================================================

CREATE TABLE IF NOT EXISTS users (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    username TEXT UNIQUE NOT NULL,
    password TEXT NOT NULL,
    role TEXT DEFAULT 'veterinarian',
    created_at DATETIME DEFAULT CURRENT_TIMESTAMP
);

-- Default administrator
INSERT OR IGNORE INTO users (username, password, role)
VALUES ('admin', 'password123', 'admin');

-- ============================================================================
-- Pets
-- ============================================================================

CREATE TABLE IF NOT EXISTS pets (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    pet_name TEXT NOT NULL,
    species TEXT NOT NULL,
    breed TEXT,
    age INTEGER,
    gender TEXT,
    weight REAL,
    medical_history TEXT,
    owner_name TEXT NOT NULL,
    owner_email TEXT,
    owner_phone TEXT,
    owner_address TEXT,
    registration_date DATE DEFAULT CURRENT_DATE
);

CREATE INDEX IF NOT EXISTS idx_pets_registration ON pets(registration_date);

-- ============================================================================
-- Medical Records
-- ============================================================================

CREATE TABLE IF NOT EXISTS medical_records (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    pet_id INTEGER NOT NULL,
    visit_date DATE NOT NULL,
    visit_type TEXT,
    veterinarian TEXT,
    symptoms TEXT,
    diagnosis TEXT,
    treatment TEXT,
    vaccines TEXT,
    notes TEXT,
    weight REAL,
    temperature REAL,
    created_at DATETIME DEFAULT CURRENT_TIMESTAMP,
    FOREIGN KEY (pet_id) REFERENCES pets (id) ON DELETE CASCADE
);

CREATE INDEX IF NOT EXISTS idx_records_pet ON medical_records(pet_id);
CREATE INDEX IF NOT EXISTS idx_records_visit_date ON medical_records(visit_date);
"#;
