use thiserror::Error;

use crate::validation::InvalidId;

/// Failures surfaced by a [`TimerStore`](super::store::TimerStore).
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("record store is unavailable: {0}")]
    Unavailable(String),
    #[error("record store operation failed: {0}")]
    Operation(String),
}

#[derive(Debug, Error)]
pub enum TimerError {
    #[error("Invalid request: {0}")]
    Validation(String),

    #[error("Task not found")]
    TaskNotFound,

    #[error("Active timer not found")]
    ActiveTimerNotFound,

    #[error("Paused timer not found")]
    PausedTimerNotFound,

    #[error("Timer not found")]
    TimerNotFound,

    #[error("A timer is already active for this task")]
    TimerAlreadyActive,

    #[error("Service unavailable: {0}")]
    StoreUnavailable(String),

    #[error("Database operation failed: {0}")]
    StoreOperation(String),

    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
}

impl TimerError {
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            TimerError::TaskNotFound
                | TimerError::ActiveTimerNotFound
                | TimerError::PausedTimerNotFound
                | TimerError::TimerNotFound
        )
    }
}

impl From<StoreError> for TimerError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Unavailable(msg) => TimerError::StoreUnavailable(msg),
            StoreError::Operation(msg) => TimerError::StoreOperation(msg),
        }
    }
}

impl From<InvalidId> for TimerError {
    fn from(err: InvalidId) -> Self {
        TimerError::Validation(err.to_string())
    }
}
