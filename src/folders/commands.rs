use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};

use crate::{
    api::ApiError,
    db::{Folder, NewFolder},
    AppState,
};

pub async fn create_folder(
    State(state): State<AppState>,
    payload: Result<Json<NewFolder>, JsonRejection>,
) -> Result<(StatusCode, Json<Folder>), ApiError> {
    let Json(mut input) =
        payload.map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;

    input.name = input.name.trim().to_string();
    if input.name.is_empty() {
        return Err(ApiError::BadRequest("name is required".into()));
    }

    let folder = state.db.create_folder(input).await?;
    Ok((StatusCode::CREATED, Json(folder)))
}
