use axum::{extract::State, response::Json};
use serde::Serialize;

use crate::AppState;

use super::ApiError;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    status: String,
    version: String,
}

/// GET /health - 200 while the store answers, 503 otherwise.
pub async fn health_check(State(state): State<AppState>) -> Result<Json<HealthResponse>, ApiError> {
    state
        .db
        .ping()
        .await
        .map_err(|err| ApiError::ServiceUnavailable(format!("{err:#}")))?;

    Ok(Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    }))
}
