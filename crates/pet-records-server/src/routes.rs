//! HTTP routes.
//!
//! | Method & Path               | Response                                   |
//! |-----------------------------|--------------------------------------------|
//! | `POST /api/login`           | `{success, user}` or 401 `{error}`         |
//! | `GET /api/pets`             | `[Pet, ...]`                               |
//! | `POST /api/pets`            | `{id, message}`                            |
//! | `DELETE /api/pets/:id`      | `{message, removed}`                       |
//! | `GET /api/medical-records`  | `[MedicalRecord, ...]`                     |
//! | `POST /api/medical-records` | `{id, message}`                            |
//! | `GET /api/dashboard/stats`  | `{totalPets, totalOwners, totalVisits, thisMonthVisits}` |
//! | `GET /health`               | `{ok: true}`                               |

use std::sync::{Arc, Mutex};

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use serde_json::{json, Map, Value};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use pet_records_core::models::{current_month, FormFields, NewMedicalRecord, NewPet};
use pet_records_core::{Created, Database, DbResult, Deleted, LoginOutcome};

use crate::error::{ApiError, ApiResult};

const LOGIN_REQUIRED: &[(&str, &[&str])] = &[
    ("username", &["username"]),
    ("password", &["password"]),
];

const PET_REQUIRED: &[(&str, &[&str])] = &[
    ("pet_name", &["pet_name", "petName"]),
    ("species", &["species"]),
    ("owner_name", &["owner_name", "ownerName"]),
    ("owner_email", &["owner_email", "ownerEmail"]),
];

const RECORD_REQUIRED: &[(&str, &[&str])] = &[
    ("pet_id", &["pet_id", "petId"]),
    ("visit_date", &["visit_date", "visitDate"]),
    ("veterinarian", &["veterinarian"]),
    ("diagnosis", &["diagnosis"]),
];

/// Shared server state: one SQLite connection.
#[derive(Clone)]
pub struct AppState {
    db: Arc<Mutex<Database>>,
}

impl AppState {
    pub fn new(db: Database) -> Self {
        Self::shared(Arc::new(Mutex::new(db)))
    }

    pub fn shared(db: Arc<Mutex<Database>>) -> Self {
        Self { db }
    }

    /// Run `f` with the connection locked. Never held across an `.await`.
    fn with_db<T>(&self, f: impl FnOnce(&Database) -> DbResult<T>) -> ApiResult<T> {
        let db = self.db.lock().map_err(|_| ApiError::Poisoned)?;
        Ok(f(&db)?)
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/login", post(login))
        .route("/api/pets", get(list_pets).post(create_pet))
        .route("/api/pets/:id", delete(delete_pet))
        .route(
            "/api/medical-records",
            get(list_medical_records).post(create_medical_record),
        )
        .route("/api/dashboard/stats", get(dashboard_stats))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

fn require(fields: &FormFields, required: &[(&str, &[&str])]) -> ApiResult<()> {
    let missing = fields.missing(required);
    if missing.is_empty() {
        Ok(())
    } else {
        Err(ApiError::MissingFields(
            missing.into_iter().map(String::from).collect(),
        ))
    }
}

async fn health() -> impl IntoResponse {
    Json(json!({ "ok": true }))
}

async fn login(
    State(state): State<AppState>,
    Json(body): Json<Map<String, Value>>,
) -> ApiResult<Json<LoginOutcome>> {
    let fields = FormFields::new(body);
    require(&fields, LOGIN_REQUIRED)?;
    let username = fields.text(&["username"]).unwrap_or_default();
    let password = fields.text(&["password"]).unwrap_or_default();

    match state.with_db(|db| db.authenticate(&username, &password))? {
        Some(user) => {
            info!(username = %user.username, "Login accepted");
            Ok(Json(LoginOutcome::granted(user)))
        }
        None => Err(ApiError::InvalidCredentials),
    }
}

async fn list_pets(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    Ok(Json(state.with_db(|db| db.list_pets())?))
}

async fn create_pet(
    State(state): State<AppState>,
    Json(body): Json<Map<String, Value>>,
) -> ApiResult<Json<Created>> {
    let fields = FormFields::new(body);
    require(&fields, PET_REQUIRED)?;
    let pet = NewPet::from_fields(&fields);

    let id = state.with_db(|db| db.insert_pet(&pet))?;
    info!(id, pet_name = %pet.pet_name, "Pet registered");
    Ok(Json(Created::pet(id)))
}

async fn delete_pet(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<Deleted>> {
    let removed = state.with_db(|db| db.delete_pet(id))?;
    info!(id, removed, "Pet deleted");
    Ok(Json(Deleted::pet().with_removed(removed)))
}

async fn list_medical_records(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    Ok(Json(state.with_db(|db| db.list_medical_records())?))
}

async fn create_medical_record(
    State(state): State<AppState>,
    Json(body): Json<Map<String, Value>>,
) -> ApiResult<Json<Created>> {
    let fields = FormFields::new(body);
    require(&fields, RECORD_REQUIRED)?;
    let record = NewMedicalRecord::from_fields(&fields);

    let id = state.with_db(|db| db.insert_medical_record(&record))?;
    info!(id, pet_id = record.pet_id, "Medical record saved");
    Ok(Json(Created::medical_record(id)))
}

async fn dashboard_stats(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    let month = current_month();
    Ok(Json(state.with_db(|db| db.dashboard_stats(&month))?))
}
