//! Typed errors and HTTP mapping.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// One rejected input field with the reason it was rejected.
#[derive(Clone, Debug, Serialize)]
pub struct FieldFault {
    pub field: String,
    pub reason: String,
}

#[derive(Error, Debug)]
pub enum AppError {
    /// Resource name goes in the message, e.g. "Product not found".
    #[error("{0} not found")]
    NotFound(String),
    /// One or more body fields missing or mistyped. Faults are echoed in `details`.
    #[error("{message}")]
    Validation {
        message: String,
        faults: Vec<FieldFault>,
    },
    /// Unique-field label, e.g. "SKU already exists".
    #[error("{0} already exists")]
    Conflict(String),
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("database: {0}")]
    Db(#[from] sqlx::Error),
}

impl AppError {
    pub fn validation(faults: Vec<FieldFault>) -> Self {
        let message = format!(
            "invalid fields: {}",
            faults
                .iter()
                .map(|f| f.field.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        );
        AppError::Validation { message, faults }
    }
}

#[derive(Serialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

#[derive(Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            AppError::NotFound(_) => (StatusCode::NOT_FOUND, "not_found"),
            AppError::Validation { .. } => (StatusCode::BAD_REQUEST, "validation_error"),
            AppError::Conflict(_) => (StatusCode::BAD_REQUEST, "conflict"),
            AppError::BadRequest(_) => (StatusCode::BAD_REQUEST, "bad_request"),
            AppError::Db(e) => {
                if let sqlx::Error::RowNotFound = e {
                    (StatusCode::NOT_FOUND, "not_found")
                } else {
                    (StatusCode::INTERNAL_SERVER_ERROR, "database_error")
                }
            }
        };
        let details = match &self {
            AppError::Validation { faults, .. } => serde_json::to_value(faults).ok(),
            _ => None,
        };
        let body = ErrorBody {
            error: ErrorDetail {
                code: code.to_string(),
                message: self.to_string(),
                details,
            },
        };
        (status, Json(body)).into_response()
    }
}
