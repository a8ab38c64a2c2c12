use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;

use crate::{
    api::ApiError,
    db::{NewTask, Task},
    validation::validate_id,
    AppState,
};

#[derive(Debug, Serialize)]
pub struct DeletedTask {
    pub deleted: String,
}

pub async fn create_task(
    State(state): State<AppState>,
    payload: Result<Json<NewTask>, JsonRejection>,
) -> Result<(StatusCode, Json<Task>), ApiError> {
    let Json(mut input) =
        payload.map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;

    input.name = input.name.trim().to_string();
    if input.name.is_empty() {
        return Err(ApiError::BadRequest("name is required".into()));
    }

    let task = state.db.create_task(input).await?;
    Ok((StatusCode::CREATED, Json(task)))
}

pub async fn get_task(
    State(state): State<AppState>,
    Path(task_id): Path<String>,
) -> Result<Json<Task>, ApiError> {
    let task_id = validate_id(&task_id, "task_id")?;
    state
        .db
        .get_task(task_id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound("Task not found".into()))
}

pub async fn delete_task(
    State(state): State<AppState>,
    Path(task_id): Path<String>,
) -> Result<Json<DeletedTask>, ApiError> {
    let task_id = validate_id(&task_id, "task_id")?;
    if !state.db.delete_task(task_id).await? {
        return Err(ApiError::NotFound("Task not found".into()));
    }
    Ok(Json(DeletedTask {
        deleted: task_id.to_string(),
    }))
}
