//! Converts controller and storage failures into HTTP responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use log::error;
use serde_json::json;

use crate::{db::DatabaseUnavailable, timer::TimerError, validation::InvalidId};

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Timer(#[from] TimerError),

    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(String),

    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    #[error("Database operation failed: {0}")]
    StoreOperation(String),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Timer(err) if err.is_not_found() => StatusCode::NOT_FOUND,
            ApiError::Timer(TimerError::Validation(_)) => StatusCode::BAD_REQUEST,
            ApiError::Timer(TimerError::TimerAlreadyActive) => StatusCode::CONFLICT,
            ApiError::Timer(TimerError::StoreUnavailable(_)) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Timer(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::StoreOperation(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Repository calls return `anyhow` errors; a closed worker is unavailability,
/// anything else failed inside the store.
impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        if err.downcast_ref::<DatabaseUnavailable>().is_some() {
            ApiError::ServiceUnavailable(err.to_string())
        } else {
            ApiError::StoreOperation(format!("{err:#}"))
        }
    }
}

impl From<InvalidId> for ApiError {
    fn from(err: InvalidId) -> Self {
        ApiError::BadRequest(err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            error!("Request failed with {status}: {self}");
        }
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
