use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;

use crate::{api::ApiError, db::Timer, AppState};

use super::{StopSummary, TimerController, TimerSnapshot};

#[derive(Debug, Deserialize)]
pub struct TimerRequest {
    #[serde(default)]
    pub task_id: Option<String>,
}

fn controller_from_state(state: &AppState) -> &TimerController {
    &state.timer
}

fn task_id_from(payload: Result<Json<TimerRequest>, JsonRejection>) -> Result<String, ApiError> {
    let Json(request) = payload.map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;
    Ok(request.task_id.unwrap_or_default())
}

pub async fn start_timer(
    State(state): State<AppState>,
    payload: Result<Json<TimerRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Timer>), ApiError> {
    let task_id = task_id_from(payload)?;
    let timer = controller_from_state(&state).start(&task_id).await?;
    Ok((StatusCode::CREATED, Json(timer)))
}

pub async fn pause_timer(
    State(state): State<AppState>,
    payload: Result<Json<TimerRequest>, JsonRejection>,
) -> Result<Json<Timer>, ApiError> {
    let task_id = task_id_from(payload)?;
    let timer = controller_from_state(&state).pause(&task_id).await?;
    Ok(Json(timer))
}

pub async fn resume_timer(
    State(state): State<AppState>,
    payload: Result<Json<TimerRequest>, JsonRejection>,
) -> Result<Json<Timer>, ApiError> {
    let task_id = task_id_from(payload)?;
    let timer = controller_from_state(&state).resume(&task_id).await?;
    Ok(Json(timer))
}

pub async fn stop_timer(
    State(state): State<AppState>,
    payload: Result<Json<TimerRequest>, JsonRejection>,
) -> Result<Json<StopSummary>, ApiError> {
    let task_id = task_id_from(payload)?;
    let summary = controller_from_state(&state).stop(&task_id).await?;
    Ok(Json(summary))
}

pub async fn get_timer(
    State(state): State<AppState>,
    Path(task_id): Path<String>,
) -> Result<Json<TimerSnapshot>, ApiError> {
    let snapshot = controller_from_state(&state).snapshot(&task_id).await?;
    Ok(Json(snapshot))
}
