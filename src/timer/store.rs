use async_trait::async_trait;

use crate::db::{Database, DatabaseUnavailable, NewTimer, Task, Timer, TimerFields, TimerId};

use super::error::StoreError;

pub type StoreResult<T> = Result<T, StoreError>;

/// Record store operations the timer controller depends on.
#[async_trait]
pub trait TimerStore: Send + Sync {
    /// Fails with [`StoreError::Unavailable`] when the store cannot serve requests.
    async fn ping(&self) -> StoreResult<()>;

    async fn find_task(&self, task_id: &str) -> StoreResult<Option<Task>>;

    async fn find_timer_by_task(&self, task_id: &str) -> StoreResult<Option<Timer>>;

    async fn find_running_timer_by_task(&self, task_id: &str) -> StoreResult<Option<Timer>>;

    async fn find_paused_timer_by_task(&self, task_id: &str) -> StoreResult<Option<Timer>>;

    async fn insert_timer(&self, timer: NewTimer) -> StoreResult<TimerId>;

    async fn update_timer_fields(&self, timer_id: &TimerId, fields: TimerFields) -> StoreResult<bool>;

    async fn delete_timer(&self, timer_id: &TimerId) -> StoreResult<bool>;
}

impl From<anyhow::Error> for StoreError {
    fn from(err: anyhow::Error) -> Self {
        if err.downcast_ref::<DatabaseUnavailable>().is_some() {
            StoreError::Unavailable(err.to_string())
        } else {
            StoreError::Operation(format!("{err:#}"))
        }
    }
}

#[async_trait]
impl TimerStore for Database {
    async fn ping(&self) -> StoreResult<()> {
        Database::ping(self)
            .await
            .map_err(|err| StoreError::Unavailable(format!("{err:#}")))
    }

    async fn find_task(&self, task_id: &str) -> StoreResult<Option<Task>> {
        Ok(self.get_task(task_id).await?)
    }

    async fn find_timer_by_task(&self, task_id: &str) -> StoreResult<Option<Timer>> {
        Ok(self.get_timer_by_task(task_id).await?)
    }

    async fn find_running_timer_by_task(&self, task_id: &str) -> StoreResult<Option<Timer>> {
        Ok(self.get_running_timer_by_task(task_id).await?)
    }

    async fn find_paused_timer_by_task(&self, task_id: &str) -> StoreResult<Option<Timer>> {
        Ok(self.get_paused_timer_by_task(task_id).await?)
    }

    async fn insert_timer(&self, timer: NewTimer) -> StoreResult<TimerId> {
        Ok(Database::insert_timer(self, timer).await?)
    }

    async fn update_timer_fields(&self, timer_id: &TimerId, fields: TimerFields) -> StoreResult<bool> {
        Ok(Database::update_timer_fields(self, timer_id, fields).await?)
    }

    async fn delete_timer(&self, timer_id: &TimerId) -> StoreResult<bool> {
        Ok(Database::delete_timer(self, timer_id).await?)
    }
}
