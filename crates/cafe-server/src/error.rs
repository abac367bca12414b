//! API error type
//!
//! Every handler returns `Result<_, ApiError>`; the error renders as
//! `{"error": {"<Reason>": "<message>"}}` with the matching status code.

use axum::{
    extract::rejection::{FormRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use cafe_types::ErrorResponse;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Sorry a cafe with that id was not found in the database.")]
    CafeNotFound,

    #[error("Sorry, we don't have a cafe at that location.")]
    LocationNotFound,

    #[error("Sorry, there are no cafes in the database.")]
    NoCafes,

    #[error("Sorry, that's not allowed. Make sure you have the correct api-key.")]
    Forbidden,

    #[error("Invalid value for '{field}': {reason}")]
    Validation { field: &'static str, reason: String },

    #[error("Malformed request: {0}")]
    Malformed(String),

    #[error("A cafe with that name already exists.")]
    DuplicateName,

    #[error("Database error: {0}")]
    Database(sqlx::Error),
}

impl ApiError {
    pub fn validation(field: &'static str, reason: impl Into<String>) -> Self {
        ApiError::Validation {
            field,
            reason: reason.into(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::CafeNotFound | ApiError::LocationNotFound | ApiError::NoCafes => {
                StatusCode::NOT_FOUND
            }
            ApiError::Forbidden => StatusCode::FORBIDDEN,
            ApiError::Validation { .. } | ApiError::Malformed(_) => StatusCode::BAD_REQUEST,
            ApiError::DuplicateName => StatusCode::CONFLICT,
            ApiError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn reason(&self) -> &'static str {
        match self {
            ApiError::CafeNotFound | ApiError::LocationNotFound | ApiError::NoCafes => "Not Found",
            ApiError::Forbidden => "Forbidden",
            ApiError::Validation { .. } | ApiError::Malformed(_) => "Bad Request",
            ApiError::DuplicateName => "Conflict",
            ApiError::Database(_) => "Internal Server Error",
        }
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(e: sqlx::Error) -> Self {
        let unique = e
            .as_database_error()
            .map(|db| db.is_unique_violation())
            .unwrap_or(false);
        if unique {
            ApiError::DuplicateName
        } else {
            ApiError::Database(e)
        }
    }
}

impl From<QueryRejection> for ApiError {
    fn from(e: QueryRejection) -> Self {
        ApiError::Malformed(e.body_text())
    }
}

impl From<FormRejection> for ApiError {
    fn from(e: FormRejection) -> Self {
        ApiError::Malformed(e.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let message = match &self {
            ApiError::Database(e) => {
                tracing::error!("Database error: {}", e);
                "Something went wrong on our side.".to_string()
            }
            other => other.to_string(),
        };
        let body = Json(ErrorResponse::new(self.reason(), message));
        (self.status(), body).into_response()
    }
}
