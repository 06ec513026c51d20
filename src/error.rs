use axum::{
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::{error, warn};

pub type Result<T> = std::result::Result<T, Error>;

/// Every failure the API surfaces. Each kind maps to its own HTTP status.
#[derive(Error, Debug)]
pub enum Error {
    /// Filter name is not on the endpoint's allow-list.
    #[error("unknown filter `{name}`")]
    InvalidFilter { name: String },

    /// Filter value could not be coerced to the filter's type.
    #[error("invalid value `{value}` for filter `{name}`: expected {expected}")]
    InvalidFilterValue {
        name: String,
        value: String,
        expected: &'static str,
    },

    #[error("invalid payload: {0}")]
    InvalidPayload(String),

    /// A referenced entity is absent. Raised by pre-checks, before any write.
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: i64 },

    /// A step of a dependent write plan failed; the whole plan was rolled back.
    #[error("write step {step} ({table}) failed, nothing was persisted: {reason}")]
    WriteFailed {
        step: usize,
        table: &'static str,
        reason: String,
    },

    #[error("storage error: {0}")]
    Storage(#[from] sqlx::Error),
}

impl Error {
    pub fn status(&self) -> StatusCode {
        match self {
            Error::InvalidFilter { .. } => StatusCode::BAD_REQUEST,
            Error::InvalidFilterValue { .. } | Error::InvalidPayload(_) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            Error::NotFound { .. } => StatusCode::NOT_FOUND,
            Error::WriteFailed { .. } => StatusCode::CONFLICT,
            Error::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Error::InvalidFilter { .. } => "invalid_filter",
            Error::InvalidFilterValue { .. } => "invalid_filter_value",
            Error::InvalidPayload(_) => "invalid_payload",
            Error::NotFound { .. } => "not_found",
            Error::WriteFailed { .. } => "write_failed",
            Error::Storage(_) => "storage",
        }
    }
}

/// Bodies axum could not read (bad JSON, wrong content type, missing or mistyped
/// fields) are payload errors like any other.
impl From<JsonRejection> for Error {
    fn from(rejection: JsonRejection) -> Self {
        Error::InvalidPayload(rejection.body_text())
    }
}

impl From<PathRejection> for Error {
    fn from(rejection: PathRejection) -> Self {
        Error::InvalidPayload(rejection.body_text())
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(kind = self.kind(), "request failed: {}", self);
        } else {
            warn!(kind = self.kind(), "request rejected: {}", self);
        }
        (
            status,
            Json(json!({ "error": self.to_string(), "kind": self.kind() })),
        )
            .into_response()
    }
}
