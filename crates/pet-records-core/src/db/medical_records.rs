//! Medical record database operations and dashboard aggregates.

use rusqlite::{params, Row};

use super::{Database, DbResult};
use crate::models::{DashboardStats, MedicalRecord, NewMedicalRecord, UNKNOWN_OWNER, UNKNOWN_PET};

const RECORD_SELECT: &str = r#"
    SELECT mr.id, mr.pet_id, mr.visit_date, mr.visit_type, mr.veterinarian,
           mr.symptoms, mr.diagnosis, mr.treatment, mr.vaccines, mr.notes,
           mr.weight, mr.temperature, mr.created_at, p.pet_name, p.owner_name
    FROM medical_records mr
    LEFT JOIN pets p ON mr.pet_id = p.id
"#;

fn record_from_row(row: &Row<'_>) -> rusqlite::Result<MedicalRecord> {
    let text = |idx: usize| -> rusqlite::Result<String> {
        Ok(row.get::<_, Option<String>>(idx)?.unwrap_or_default())
    };
    Ok(MedicalRecord {
        id: row.get(0)?,
        pet_id: row.get(1)?,
        visit_date: text(2)?,
        visit_type: text(3)?,
        veterinarian: text(4)?,
        symptoms: text(5)?,
        diagnosis: text(6)?,
        treatment: text(7)?,
        vaccines: text(8)?,
        notes: text(9)?,
        weight: row.get::<_, Option<f64>>(10)?.unwrap_or_default(),
        temperature: row.get::<_, Option<f64>>(11)?.unwrap_or_default(),
        created_at: text(12)?,
        pet_name: row
            .get::<_, Option<String>>(13)?
            .unwrap_or_else(|| UNKNOWN_PET.to_string()),
        owner_name: row
            .get::<_, Option<String>>(14)?
            .unwrap_or_else(|| UNKNOWN_OWNER.to_string()),
    })
}

impl Database {
    /// Insert a new medical record and return its id.
    ///
    /// The denormalized pet and owner names are not stored; reads join them
    /// from the pets table.
    pub fn insert_medical_record(&self, record: &NewMedicalRecord) -> DbResult<i64> {
        self.conn.execute(
            r#"
            INSERT INTO medical_records (
                pet_id, visit_date, visit_type, veterinarian, symptoms,
                diagnosis, treatment, vaccines, notes, weight, temperature
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
            "#,
            params![
                record.pet_id,
                record.visit_date,
                record.visit_type,
                record.veterinarian,
                record.symptoms,
                record.diagnosis,
                record.treatment,
                record.vaccines,
                record.notes,
                record.weight,
                record.temperature,
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    /// List all medical records, most recent visit first.
    pub fn list_medical_records(&self) -> DbResult<Vec<MedicalRecord>> {
        let mut stmt = self.conn.prepare(&format!(
            "{} ORDER BY mr.visit_date DESC, mr.id DESC",
            RECORD_SELECT
        ))?;

        let rows = stmt.query_map([], record_from_row)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    /// List the medical records of one pet, most recent visit first.
    pub fn list_medical_records_for_pet(&self, pet_id: i64) -> DbResult<Vec<MedicalRecord>> {
        let mut stmt = self.conn.prepare(&format!(
            "{} WHERE mr.pet_id = ? ORDER BY mr.visit_date DESC, mr.id DESC",
            RECORD_SELECT
        ))?;

        let rows = stmt.query_map([pet_id], record_from_row)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    /// Dashboard counters; `month` is a `YYYY-MM` prefix.
    ///
    /// Owners are counted by email, or by name for pets without an email.
    pub fn dashboard_stats(&self, month: &str) -> DbResult<DashboardStats> {
        let count = |sql: &str| -> DbResult<u64> {
            let n: i64 = self.conn.query_row(sql, [], |row| row.get(0))?;
            Ok(n.max(0) as u64)
        };

        let total_pets = count("SELECT COUNT(*) FROM pets")?;
        let total_owners = count(
            r#"
            SELECT COUNT(DISTINCT CASE
                WHEN TRIM(COALESCE(owner_email, '')) = '' THEN 'name:' || owner_name
                ELSE LOWER(TRIM(owner_email))
            END) FROM pets
            "#,
        )?;
        let total_visits = count("SELECT COUNT(*) FROM medical_records")?;

        let this_month: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM medical_records WHERE substr(visit_date, 1, 7) = ?",
            [month],
            |row| row.get(0),
        )?;

        Ok(DashboardStats {
            total_pets,
            total_owners,
            total_visits,
            this_month_visits: this_month.max(0) as u64,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NewPet;

    fn setup_db() -> (Database, i64) {
        let db = Database::open_in_memory().unwrap();
        let pet_id = db
            .insert_pet(&NewPet::new("Buddy", "Dog", "John Doe").with_owner_email("john@example.com"))
            .unwrap();
        (db, pet_id)
    }

    #[test]
    fn test_insert_and_list_joins_names() {
        let (db, pet_id) = setup_db();

        let mut record = NewMedicalRecord::new(pet_id, "2024-01-20");
        record.veterinarian = "Dr. Mamay".into();
        record.diagnosis = "Healthy".into();
        record.temperature = 101.2;
        let id = db.insert_medical_record(&record).unwrap();

        let records = db.list_medical_records().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id, id);
        assert_eq!(records[0].pet_name, "Buddy");
        assert_eq!(records[0].owner_name, "John Doe");
        assert_eq!(records[0].diagnosis, "Healthy");
        assert_eq!(records[0].temperature, 101.2);
        assert!(!records[0].created_at.is_empty());
    }

    #[test]
    fn test_list_for_pet() {
        let (db, pet_id) = setup_db();
        let other = db.insert_pet(&NewPet::new("Tom", "Cat", "Ann")).unwrap();

        db.insert_medical_record(&NewMedicalRecord::new(pet_id, "2024-01-01")).unwrap();
        db.insert_medical_record(&NewMedicalRecord::new(other, "2024-01-02")).unwrap();
        db.insert_medical_record(&NewMedicalRecord::new(pet_id, "2024-03-01")).unwrap();

        let records = db.list_medical_records_for_pet(pet_id).unwrap();
        let dates: Vec<_> = records.iter().map(|r| r.visit_date.as_str()).collect();
        assert_eq!(dates, vec!["2024-03-01", "2024-01-01"]);
    }

    #[test]
    fn test_dashboard_stats() {
        let (db, pet_id) = setup_db();
        db.insert_pet(&NewPet::new("Rex", "Dog", "John Doe").with_owner_email("JOHN@example.com"))
            .unwrap();
        db.insert_pet(&NewPet::new("Kiwi", "Bird", "Bob")).unwrap();
        db.insert_pet(&NewPet::new("Fin", "Fish", "Cy")).unwrap();

        db.insert_medical_record(&NewMedicalRecord::new(pet_id, "2024-02-01")).unwrap();
        db.insert_medical_record(&NewMedicalRecord::new(pet_id, "2024-02-15")).unwrap();
        db.insert_medical_record(&NewMedicalRecord::new(pet_id, "2024-03-01")).unwrap();

        let stats = db.dashboard_stats("2024-02").unwrap();
        assert_eq!(stats.total_pets, 4);
        assert_eq!(stats.total_owners, 3);
        assert_eq!(stats.total_visits, 3);
        assert_eq!(stats.this_month_visits, 2);
    }

    #[test]
    fn test_empty_stats() {
        let db = Database::open_in_memory().unwrap();
        let stats = db.dashboard_stats("2024-02").unwrap();
        assert_eq!(stats, DashboardStats::default());
        assert!(!stats.has_data());
    }
}
