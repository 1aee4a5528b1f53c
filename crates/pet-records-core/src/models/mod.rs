//! Domain models for the pet records system.

mod input;
mod medical_record;
mod pet;
mod stats;
mod user;

pub use input::*;
pub use medical_record::*;
pub use pet::*;
pub use stats::*;
pub use user::*;

use serde::{Deserialize, Deserializer};

/// Placeholder used when a pet name is missing.
pub const UNKNOWN_PET: &str = "Unknown Pet";

/// Placeholder used when an owner name is missing.
pub const UNKNOWN_OWNER: &str = "Unknown Owner";

/// Placeholder used when a species is missing.
pub const UNKNOWN_SPECIES: &str = "Unknown";

/// Treat an explicit JSON `null` the same as a missing field.
///
/// SQLite rows and older persisted collections both carry nulls for optional
/// columns, while the models always hold a concrete value.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Today's date as `YYYY-MM-DD` (UTC).
pub fn today() -> String {
    chrono::Utc::now().format("%Y-%m-%d").to_string()
}

/// The current calendar month as `YYYY-MM` (UTC).
pub fn current_month() -> String {
    chrono::Utc::now().format("%Y-%m").to_string()
}

fn or_placeholder(value: &mut String, placeholder: &str) {
    if value.is_empty() {
        *value = placeholder.to_string();
    }
}
