//! API errors and their JSON responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;
use tracing::error;

use pet_records_core::DbError;

#[derive(Error, Debug)]
pub enum ApiError {
    /// Details are logged, never sent to the client.
    #[error("Database error")]
    Database(#[from] DbError),

    #[error("Database error")]
    Poisoned,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Missing required fields: {}", .0.join(", "))]
    MissingFields(Vec<String>),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Database(_) | ApiError::Poisoned => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            ApiError::MissingFields(_) => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            ApiError::Database(e) => error!(error = %e, "Database error"),
            ApiError::Poisoned => error!("Database lock poisoned"),
            _ => {}
        }
        (self.status(), Json(json!({ "error": self.to_string() }))).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
