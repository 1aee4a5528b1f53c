//! Normalization of loosely-typed form and request input.
//!
//! Form submissions arrive with camelCase keys (`petName`), API callers use
//! snake_case (`pet_name`), and numbers may come in as strings. Every lookup
//! takes a list of candidate keys and the first non-empty value wins.

use serde_json::{Map, Value};

use super::{today, NewMedicalRecord, NewPet, UNKNOWN_OWNER, UNKNOWN_PET, UNKNOWN_SPECIES};

/// A bag of submitted fields.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormFields(Map<String, Value>);

impl FormFields {
    pub fn new(map: Map<String, Value>) -> Self {
        Self(map)
    }

    /// Wrap a JSON value; anything but an object yields no fields.
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Object(map) => Self(map),
            _ => Self::default(),
        }
    }

    /// Build from string pairs, as posted by an HTML form.
    pub fn from_pairs<K, V, I>(pairs: I) -> Self
    where
        K: Into<String>,
        V: Into<String>,
        I: IntoIterator<Item = (K, V)>,
    {
        Self(
            pairs
                .into_iter()
                .map(|(k, v)| (k.into(), Value::String(v.into())))
                .collect(),
        )
    }

    /// Set a field, replacing any previous value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(key.into(), value.into());
    }

    /// Drop fields holding an empty string.
    pub fn without_blanks(mut self) -> Self {
        self.0
            .retain(|_, v| !matches!(v, Value::String(s) if s.is_empty()));
        self
    }

    /// First non-empty text value among `keys`.
    pub fn text(&self, keys: &[&str]) -> Option<String> {
        keys.iter().find_map(|key| match self.0.get(*key)? {
            Value::String(s) if !s.is_empty() => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        })
    }

    /// First non-zero integer among `keys`; numeric strings are accepted.
    pub fn integer(&self, keys: &[&str]) -> Option<i64> {
        keys.iter()
            .find_map(|key| self.0.get(*key).and_then(coerce_integer))
            .filter(|n| *n != 0)
    }

    /// First non-zero decimal among `keys`; numeric strings are accepted.
    pub fn decimal(&self, keys: &[&str]) -> Option<f64> {
        keys.iter()
            .find_map(|key| self.0.get(*key).and_then(coerce_decimal))
            .filter(|n| *n != 0.0)
    }

    /// Whether a checkbox among `keys` is ticked (`true`, `"on"`, `"true"` or `"1"`).
    pub fn flag(&self, keys: &[&str]) -> bool {
        keys.iter().any(|key| match self.0.get(*key) {
            Some(Value::Bool(b)) => *b,
            Some(Value::String(s)) => matches!(s.as_str(), "on" | "true" | "1"),
            Some(Value::Number(n)) => n.as_i64() == Some(1),
            _ => false,
        })
    }

    /// Names of required fields with no usable value.
    ///
    /// Each entry pairs the reported name with its candidate keys.
    pub fn missing<'a>(&self, required: &[(&'a str, &[&str])]) -> Vec<&'a str> {
        required
            .iter()
            .filter(|(_, keys)| self.text(keys).is_none())
            .map(|(name, _)| *name)
            .collect()
    }
}

impl From<Map<String, Value>> for FormFields {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

/// Coerce a JSON value to an integer id the way a form's `parseInt` would.
pub fn coerce_integer(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f.trunc() as i64)),
        Value::String(s) => parse_integer(s),
        _ => None,
    }
}

/// Parse an integer from text, ignoring surrounding whitespace and a fractional part.
pub fn parse_integer(text: &str) -> Option<i64> {
    let text = text.trim();
    text.parse::<i64>()
        .ok()
        .or_else(|| text.parse::<f64>().ok().filter(|f| f.is_finite()).map(|f| f.trunc() as i64))
}

fn coerce_decimal(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|f| f.is_finite()),
        _ => None,
    }
}

impl NewPet {
    /// Normalize submitted pet fields, applying defaults for anything missing.
    pub fn from_fields(fields: &FormFields) -> Self {
        Self {
            pet_name: fields
                .text(&["pet_name", "petName"])
                .unwrap_or_else(|| UNKNOWN_PET.to_string()),
            species: fields
                .text(&["species"])
                .unwrap_or_else(|| UNKNOWN_SPECIES.to_string()),
            breed: fields.text(&["breed"]).unwrap_or_default(),
            age: fields.integer(&["age"]).unwrap_or(0).max(0),
            gender: fields.text(&["gender"]).unwrap_or_default(),
            weight: fields.decimal(&["weight"]).unwrap_or(0.0).max(0.0),
            medical_history: fields
                .text(&["medical_history", "medicalHistory"])
                .unwrap_or_default(),
            owner_name: fields
                .text(&["owner_name", "ownerName"])
                .unwrap_or_else(|| UNKNOWN_OWNER.to_string()),
            owner_email: fields
                .text(&["owner_email", "ownerEmail"])
                .unwrap_or_default(),
            owner_phone: fields
                .text(&["owner_phone", "ownerPhone"])
                .unwrap_or_default(),
            owner_address: fields
                .text(&["owner_address", "ownerAddress"])
                .unwrap_or_default(),
            registration_date: fields.text(&["registration_date", "registrationDate"]),
        }
    }
}

impl NewMedicalRecord {
    /// Normalize submitted visit fields, applying defaults for anything missing.
    ///
    /// `pet_name` and `owner_name` start as placeholders; the caller fills them
    /// from the referenced pet.
    pub fn from_fields(fields: &FormFields) -> Self {
        Self {
            pet_id: fields.integer(&["pet_id", "petId"]).unwrap_or(0),
            pet_name: UNKNOWN_PET.to_string(),
            owner_name: UNKNOWN_OWNER.to_string(),
            visit_date: fields
                .text(&["visit_date", "visitDate"])
                .unwrap_or_else(today),
            visit_type: fields
                .text(&["visit_type", "visitType"])
                .unwrap_or_default(),
            veterinarian: fields.text(&["veterinarian"]).unwrap_or_default(),
            symptoms: fields.text(&["symptoms"]).unwrap_or_default(),
            diagnosis: fields.text(&["diagnosis"]).unwrap_or_default(),
            treatment: fields.text(&["treatment"]).unwrap_or_default(),
            vaccines: fields.text(&["vaccines"]).unwrap_or_default(),
            notes: fields.text(&["notes"]).unwrap_or_default(),
            weight: fields.decimal(&["weight"]).unwrap_or(0.0),
            temperature: fields.decimal(&["temperature"]).unwrap_or(0.0),
        }
    }
}

impl From<&FormFields> for NewPet {
    fn from(fields: &FormFields) -> Self {
        Self::from_fields(fields)
    }
}

impl From<FormFields> for NewPet {
    fn from(fields: FormFields) -> Self {
        Self::from_fields(&fields)
    }
}

impl From<&FormFields> for NewMedicalRecord {
    fn from(fields: &FormFields) -> Self {
        Self::from_fields(fields)
    }
}

impl From<FormFields> for NewMedicalRecord {
    fn from(fields: FormFields) -> Self {
        Self::from_fields(&fields)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_snake_case_wins_when_both_present() {
        let fields = FormFields::from_value(json!({
            "pet_name": "Rex",
            "petName": "Ignored",
            "species": "Dog",
        }));
        let pet = NewPet::from_fields(&fields);
        assert_eq!(pet.pet_name, "Rex");
    }

    #[test]
    fn test_empty_snake_case_falls_back_to_camel_case() {
        let fields = FormFields::from_value(json!({
            "pet_name": "",
            "petName": "Rex",
            "ownerEmail": "a@x.com",
        }));
        let pet = NewPet::from_fields(&fields);
        assert_eq!(pet.pet_name, "Rex");
        assert_eq!(pet.owner_email, "a@x.com");
    }

    #[test]
    fn test_defaults_for_missing_fields() {
        let pet = NewPet::from_fields(&FormFields::default());
        assert_eq!(pet.pet_name, UNKNOWN_PET);
        assert_eq!(pet.species, UNKNOWN_SPECIES);
        assert_eq!(pet.owner_name, UNKNOWN_OWNER);
        assert_eq!(pet.breed, "");
        assert_eq!(pet.age, 0);
        assert_eq!(pet.weight, 0.0);
        assert!(pet.registration_date.is_none());
    }

    #[test]
    fn test_numeric_strings_are_coerced() {
        let fields = FormFields::from_pairs([("age", "3"), ("weight", "25.5"), ("petId", " 2 ")]);
        let pet = NewPet::from_fields(&fields);
        assert_eq!(pet.age, 3);
        assert_eq!(pet.weight, 25.5);

        let record = NewMedicalRecord::from_fields(&fields);
        assert_eq!(record.pet_id, 2);
    }

    #[test]
    fn test_negative_age_and_weight_clamp_to_zero() {
        let fields = FormFields::from_value(json!({"age": -2, "weight": "-1.5"}));
        let pet = NewPet::from_fields(&fields);
        assert_eq!(pet.age, 0);
        assert_eq!(pet.weight, 0.0);
    }

    #[test]
    fn test_record_defaults() {
        let record = NewMedicalRecord::from_fields(&FormFields::default());
        assert_eq!(record.pet_id, 0);
        assert_eq!(record.visit_date.len(), 10);
        assert_eq!(record.pet_name, UNKNOWN_PET);
        assert_eq!(record.temperature, 0.0);
    }

    #[test]
    fn test_missing_required() {
        let fields = FormFields::from_pairs([("petName", "Rex"), ("species", "")]).without_blanks();
        let required: &[(&str, &[&str])] = &[
            ("petName", &["pet_name", "petName"]),
            ("species", &["species"]),
        ];
        let missing = fields.missing(required);
        assert_eq!(missing, vec!["species"]);
    }

    #[test]
    fn test_flag() {
        let fields = FormFields::from_value(json!({"rememberMe": true, "other": "off"}));
        assert!(fields.flag(&["remember_me", "rememberMe"]));
        assert!(!fields.flag(&["other"]));
        assert!(FormFields::from_pairs([("rememberMe", "on")]).flag(&["rememberMe"]));
        assert!(!FormFields::default().flag(&["rememberMe"]));
    }

    #[test]
    fn test_parse_integer() {
        assert_eq!(parse_integer("12"), Some(12));
        assert_eq!(parse_integer("12.9"), Some(12));
        assert_eq!(parse_integer("abc"), None);
        assert_eq!(coerce_integer(&json!(4.0)), Some(4));
        assert_eq!(coerce_integer(&json!(null)), None);
    }
}
