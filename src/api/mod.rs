//! HTTP surface.
//!
//! - `POST /task`, `GET /task/{task_id}`, `DELETE /task/{task_id}`
//! - `POST /folder`
//! - `POST /timer/start|pause|resume|stop` with body `{"task_id": ...}`
//! - `GET /timer/{task_id}` for a read-only snapshot
//! - `GET /health`

mod error;
pub mod health;

pub use error::ApiError;

use axum::{
    routing::{get, post},
    Router,
};

use crate::{
    folders::commands as folders, tasks::commands as tasks, timer::commands as timer, AppState,
};

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/task", post(tasks::create_task))
        .route(
            "/task/{task_id}",
            get(tasks::get_task).delete(tasks::delete_task),
        )
        .route("/folder", post(folders::create_folder))
        .route("/timer/start", post(timer::start_timer))
        .route("/timer/pause", post(timer::pause_timer))
        .route("/timer/resume", post(timer::resume_timer))
        .route("/timer/stop", post(timer::stop_timer))
        .route("/timer/{task_id}", get(timer::get_timer))
        .with_state(state)
}
