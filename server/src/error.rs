//! Error type shared by the store and the HTTP handlers.
//!
//! Every failure a client can trigger maps to one variant here and renders as
//! a JSON body of the form `{"error": <kind>, "detail": <message>}`. A missing
//! record is always `NotFound`, never a panic.

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

/// Result type alias using [`AppError`].
pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Error, Debug)]
pub enum AppError {
    /// No record is stored under the requested id.
    #[error("Todo not found: {id}")]
    NotFound { id: String },

    /// The body parsed but failed a schema rule (blank title, id mismatch).
    #[error("{0}")]
    Validation(String),

    /// The path segment is not a valid id for the active id scheme.
    #[error("invalid todo id: {0}")]
    InvalidId(String),

    /// The id scheme has no unused ids left.
    #[error("no todo ids left to assign")]
    IdsExhausted,

    /// The body could not be decoded into the request schema.
    #[error("{}", .0.body_text())]
    InvalidBody(#[from] JsonRejection),
}

impl AppError {
    pub fn not_found(id: impl ToString) -> Self {
        AppError::NotFound { id: id.to_string() }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::InvalidId(_) => StatusCode::BAD_REQUEST,
            AppError::IdsExhausted => StatusCode::SERVICE_UNAVAILABLE,
            AppError::InvalidBody(rejection) => rejection.status(),
        }
    }

    /// Stable machine-readable kind, used as the `error` field of the body.
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::NotFound { .. } => "not_found",
            AppError::Validation(_) | AppError::InvalidBody(_) => "validation_error",
            AppError::InvalidId(_) => "invalid_id",
            AppError::IdsExhausted => "ids_exhausted",
        }
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::InvalidId(rejection.body_text())
    }
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
    detail: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = ErrorBody {
            error: self.kind(),
            detail: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}
