use std::sync::Arc;

use log::{debug, info};
use serde::Serialize;

use crate::{
    clock::Clock,
    db::{NewTimer, Timer, TimerFields},
    validation::validate_id,
};

use super::{
    accounting::{duration_to_secs, elapsed_active, format_elapsed, pause_interval_secs},
    error::TimerError,
    locks::TaskLocks,
    store::TimerStore,
    TimerStatus,
};

pub type TimerResult<T> = Result<T, TimerError>;

/// Result of stopping a timer.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct StopSummary {
    pub task_id: String,
    /// Elapsed time net of pauses, e.g. `0:25:03.120000`.
    pub total_time: String,
    pub total_seconds: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct TimerSnapshot {
    pub timer: Timer,
    pub status: TimerStatus,
    /// What `stop` would report at the time of the snapshot.
    pub elapsed_secs: f64,
}

/// Drives the per-task timer state machine against a [`TimerStore`].
///
/// Every mutation for a task runs under that task's lock, reads the clock once
/// and checks store availability before anything else.
#[derive(Clone)]
pub struct TimerController {
    store: Arc<dyn TimerStore>,
    clock: Arc<dyn Clock>,
    locks: TaskLocks,
}

impl TimerController {
    pub fn new(store: Arc<dyn TimerStore>, clock: Arc<dyn Clock>) -> Self {
        Self {
            store,
            clock,
            locks: TaskLocks::new(),
        }
    }

    async fn ensure_available(&self) -> TimerResult<()> {
        self.store.ping().await.map_err(TimerError::from)
    }

    pub async fn start(&self, task_id: &str) -> TimerResult<Timer> {
        self.ensure_available().await?;
        let task_id = validate_id(task_id, "task_id")?;
        let _guard = self.locks.acquire(task_id).await;

        if self.store.find_task(task_id).await?.is_none() {
            debug!("start rejected: task {task_id} does not exist");
            return Err(TimerError::TaskNotFound);
        }

        if let Some(existing) = self.store.find_timer_by_task(task_id).await? {
            debug!(
                "start rejected: timer {} already {} for task {task_id}",
                existing.id,
                TimerStatus::of(Some(&existing)).as_str()
            );
            return Err(TimerError::TimerAlreadyActive);
        }

        let now = self.clock.now();
        let id = self
            .store
            .insert_timer(NewTimer {
                task_id: task_id.to_string(),
                start_time: now,
            })
            .await?;

        info!("Started timer {id} for task {task_id}");

        Ok(Timer {
            id,
            task_id: task_id.to_string(),
            start_time: now,
            paused_time: None,
            total_pause_time: 0.0,
        })
    }

    pub async fn pause(&self, task_id: &str) -> TimerResult<Timer> {
        self.ensure_available().await?;
        let task_id = validate_id(task_id, "task_id")?;
        let _guard = self.locks.acquire(task_id).await;

        let timer = self
            .store
            .find_running_timer_by_task(task_id)
            .await?
            .ok_or(TimerError::ActiveTimerNotFound)?;

        // paused_time must never precede start_time, even if the clock steps back.
        let paused_at = self.clock.now().max(timer.start_time);
        let updated = self
            .store
            .update_timer_fields(&timer.id, TimerFields::pause_at(paused_at))
            .await?;
        if !updated {
            return Err(TimerError::ActiveTimerNotFound);
        }

        info!("Paused timer {} for task {task_id}", timer.id);

        Ok(Timer {
            paused_time: Some(paused_at),
            ..timer
        })
    }

    pub async fn resume(&self, task_id: &str) -> TimerResult<Timer> {
        self.ensure_available().await?;
        let task_id = validate_id(task_id, "task_id")?;
        let _guard = self.locks.acquire(task_id).await;

        let timer = self
            .store
            .find_paused_timer_by_task(task_id)
            .await?
            .ok_or(TimerError::PausedTimerNotFound)?;
        let paused_at = timer.paused_time.ok_or_else(|| {
            TimerError::Unexpected(format!("paused timer {} has no paused_time", timer.id))
        })?;

        let pause_secs = pause_interval_secs(paused_at, self.clock.now());
        let updated = self
            .store
            .update_timer_fields(&timer.id, TimerFields::resume_after(pause_secs))
            .await?;
        if !updated {
            return Err(TimerError::PausedTimerNotFound);
        }

        info!(
            "Resumed timer {} for task {task_id} after {pause_secs:.3}s paused",
            timer.id
        );

        Ok(Timer {
            paused_time: None,
            total_pause_time: timer.total_pause_time + pause_secs,
            ..timer
        })
    }

    /// Ends the timer and deletes its record. A pause that is still open at
    /// this point is not subtracted from the result.
    pub async fn stop(&self, task_id: &str) -> TimerResult<StopSummary> {
        self.ensure_available().await?;
        let task_id = validate_id(task_id, "task_id")?;
        let _guard = self.locks.acquire(task_id).await;

        let timer = self
            .store
            .find_timer_by_task(task_id)
            .await?
            .ok_or(TimerError::TimerNotFound)?;

        let elapsed = elapsed_active(&timer, self.clock.now());
        if !self.store.delete_timer(&timer.id).await? {
            return Err(TimerError::TimerNotFound);
        }

        let summary = StopSummary {
            task_id: task_id.to_string(),
            total_time: format_elapsed(elapsed),
            total_seconds: duration_to_secs(elapsed),
        };
        info!(
            "Stopped timer {} for task {task_id}: {}",
            timer.id, summary.total_time
        );

        Ok(summary)
    }

    pub async fn snapshot(&self, task_id: &str) -> TimerResult<TimerSnapshot> {
        self.ensure_available().await?;
        let task_id = validate_id(task_id, "task_id")?;

        let timer = self
            .store
            .find_timer_by_task(task_id)
            .await?
            .ok_or(TimerError::TimerNotFound)?;

        let elapsed = elapsed_active(&timer, self.clock.now());
        Ok(TimerSnapshot {
            status: TimerStatus::of(Some(&timer)),
            elapsed_secs: duration_to_secs(elapsed),
            timer,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        clock::ManualClock,
        db::{Database, NewTask},
    };
    use chrono::{Duration, TimeZone, Utc};
    use uuid::Uuid;

    struct Harness {
        db: Database,
        clock: Arc<ManualClock>,
        controller: TimerController,
    }

    impl Harness {
        fn new() -> Self {
            let db = Database::in_memory().unwrap();
            let clock = Arc::new(ManualClock::new(
                Utc.with_ymd_and_hms(2024, 9, 2, 14, 0, 0).unwrap(),
            ));
            let controller = TimerController::new(Arc::new(db.clone()), clock.clone());
            Self {
                db,
                clock,
                controller,
            }
        }

        async fn task(&self) -> String {
            self.db
                .create_task(NewTask {
                    name: "Study".into(),
                    folder_id: None,
                })
                .await
                .unwrap()
                .id
        }

        fn advance_secs(&self, secs: i64) {
            self.clock.advance(Duration::seconds(secs));
        }
    }

    #[tokio::test]
    async fn operations_without_a_timer_report_not_found() {
        let h = Harness::new();
        let task = h.task().await;

        assert!(matches!(
            h.controller.pause(&task).await,
            Err(TimerError::ActiveTimerNotFound)
        ));
        assert!(matches!(
            h.controller.resume(&task).await,
            Err(TimerError::PausedTimerNotFound)
        ));
        assert!(matches!(
            h.controller.stop(&task).await,
            Err(TimerError::TimerNotFound)
        ));
        assert!(matches!(
            h.controller.snapshot(&task).await,
            Err(TimerError::TimerNotFound)
        ));
    }

    #[tokio::test]
    async fn start_requires_an_existing_task() {
        let h = Harness::new();
        let unknown = Uuid::new_v4().to_string();
        assert!(matches!(
            h.controller.start(&unknown).await,
            Err(TimerError::TaskNotFound)
        ));
    }

    #[tokio::test]
    async fn start_creates_one_running_timer() {
        let h = Harness::new();
        let task = h.task().await;

        let timer = h.controller.start(&task).await.unwrap();
        assert_eq!(timer.task_id, task);
        assert_eq!(timer.start_time, h.clock.now());
        assert_eq!(timer.paused_time, None);
        assert_eq!(timer.total_pause_time, 0.0);

        let stored = h.db.get_timer_by_task(&task).await.unwrap().unwrap();
        assert_eq!(stored, timer);
    }

    #[tokio::test]
    async fn second_start_is_rejected() {
        let h = Harness::new();
        let task = h.task().await;

        h.controller.start(&task).await.unwrap();
        assert!(matches!(
            h.controller.start(&task).await,
            Err(TimerError::TimerAlreadyActive)
        ));

        h.controller.pause(&task).await.unwrap();
        assert!(matches!(
            h.controller.start(&task).await,
            Err(TimerError::TimerAlreadyActive)
        ));
    }

    #[tokio::test]
    async fn rejects_missing_or_malformed_task_ids() {
        let h = Harness::new();
        assert!(matches!(
            h.controller.start("").await,
            Err(TimerError::Validation(_))
        ));
        assert!(matches!(
            h.controller.pause("   ").await,
            Err(TimerError::Validation(_))
        ));
        assert!(matches!(
            h.controller.stop("not-an-id").await,
            Err(TimerError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn pause_then_resume_accumulates_exact_gap() {
        let h = Harness::new();
        let task = h.task().await;
        h.controller.start(&task).await.unwrap();

        h.advance_secs(2);
        let paused = h.controller.pause(&task).await.unwrap();
        assert_eq!(paused.paused_time, Some(h.clock.now()));

        h.clock.advance(Duration::milliseconds(1_250));
        let resumed = h.controller.resume(&task).await.unwrap();
        assert_eq!(resumed.paused_time, None);
        assert_eq!(resumed.total_pause_time, 1.25);

        let stored = h.db.get_timer_by_task(&task).await.unwrap().unwrap();
        assert_eq!(stored.total_pause_time, 1.25);
        assert_eq!(stored.paused_time, None);
    }

    #[tokio::test]
    async fn second_pause_without_resume_fails() {
        let h = Harness::new();
        let task = h.task().await;
        h.controller.start(&task).await.unwrap();

        h.controller.pause(&task).await.unwrap();
        assert!(matches!(
            h.controller.pause(&task).await,
            Err(TimerError::ActiveTimerNotFound)
        ));
    }

    #[tokio::test]
    async fn resume_while_running_fails() {
        let h = Harness::new();
        let task = h.task().await;
        h.controller.start(&task).await.unwrap();

        assert!(matches!(
            h.controller.resume(&task).await,
            Err(TimerError::PausedTimerNotFound)
        ));
    }

    #[tokio::test]
    async fn documented_scenario_reports_four_seconds() {
        let h = Harness::new();
        let task = h.task().await;

        h.controller.start(&task).await.unwrap();
        h.advance_secs(2);
        h.controller.pause(&task).await.unwrap();
        h.advance_secs(1);
        let resumed = h.controller.resume(&task).await.unwrap();
        assert_eq!(resumed.total_pause_time, 1.0);
        h.advance_secs(2);

        let summary = h.controller.stop(&task).await.unwrap();
        assert_eq!(summary.task_id, task);
        assert_eq!(summary.total_time, "0:00:04");
        assert_eq!(summary.total_seconds, 4.0);
    }

    #[tokio::test]
    async fn immediate_stop_reports_zero() {
        let h = Harness::new();
        let task = h.task().await;

        h.controller.start(&task).await.unwrap();
        let summary = h.controller.stop(&task).await.unwrap();
        assert_eq!(summary.total_time, "0:00:00");
        assert_eq!(summary.total_seconds, 0.0);
    }

    #[tokio::test]
    async fn stop_deletes_the_timer() {
        let h = Harness::new();
        let task = h.task().await;

        h.controller.start(&task).await.unwrap();
        h.controller.stop(&task).await.unwrap();

        assert!(h.db.get_timer_by_task(&task).await.unwrap().is_none());
        assert!(matches!(
            h.controller.stop(&task).await,
            Err(TimerError::TimerNotFound)
        ));
        // A stopped task can be timed again.
        h.controller.start(&task).await.unwrap();
    }

    #[tokio::test]
    async fn many_cycles_subtract_every_pause_and_never_shrink_total() {
        let h = Harness::new();
        let task = h.task().await;
        h.controller.start(&task).await.unwrap();

        let mut last_total = 0.0;
        let mut paused_secs = 0;
        for cycle in 1..=5 {
            h.advance_secs(10);
            h.controller.pause(&task).await.unwrap();
            h.advance_secs(cycle);
            paused_secs += cycle;
            let resumed = h.controller.resume(&task).await.unwrap();
            assert!(resumed.total_pause_time >= last_total);
            last_total = resumed.total_pause_time;
        }
        assert_eq!(last_total, paused_secs as f64);

        h.advance_secs(7);
        let summary = h.controller.stop(&task).await.unwrap();
        // 5 * 10s running + 7s running
        assert_eq!(summary.total_seconds, 57.0);
        assert_eq!(summary.total_time, "0:00:57");
    }

    #[tokio::test]
    async fn stop_while_paused_keeps_open_pause_in_elapsed() {
        let h = Harness::new();
        let task = h.task().await;

        h.controller.start(&task).await.unwrap();
        h.advance_secs(3);
        h.controller.pause(&task).await.unwrap();
        h.advance_secs(4);

        let summary = h.controller.stop(&task).await.unwrap();
        assert_eq!(summary.total_seconds, 7.0);
    }

    #[tokio::test]
    async fn backwards_clock_never_reduces_pause_total() {
        let h = Harness::new();
        let task = h.task().await;

        h.controller.start(&task).await.unwrap();
        h.advance_secs(5);
        h.controller.pause(&task).await.unwrap();
        h.advance_secs(-2);

        let resumed = h.controller.resume(&task).await.unwrap();
        assert_eq!(resumed.total_pause_time, 0.0);
    }

    #[tokio::test]
    async fn snapshot_reports_status_and_elapsed() {
        let h = Harness::new();
        let task = h.task().await;

        h.controller.start(&task).await.unwrap();
        h.advance_secs(6);
        let running = h.controller.snapshot(&task).await.unwrap();
        assert_eq!(running.status, TimerStatus::Running);
        assert_eq!(running.elapsed_secs, 6.0);

        h.controller.pause(&task).await.unwrap();
        let paused = h.controller.snapshot(&task).await.unwrap();
        assert_eq!(paused.status, TimerStatus::Paused);
    }

    #[tokio::test]
    async fn unavailable_store_fails_fast() {
        let h = Harness::new();
        let task = h.task().await;
        h.db.close();

        for result in [
            h.controller.start(&task).await.map(|_| ()),
            h.controller.pause(&task).await.map(|_| ()),
            h.controller.resume(&task).await.map(|_| ()),
            h.controller.stop(&task).await.map(|_| ()),
        ] {
            assert!(matches!(result, Err(TimerError::StoreUnavailable(_))));
        }
    }

    #[tokio::test]
    async fn concurrent_starts_create_exactly_one_timer() {
        let h = Harness::new();
        let task = h.task().await;

        let attempts: Vec<_> = (0..16)
            .map(|_| {
                let controller = h.controller.clone();
                let task = task.clone();
                tokio::spawn(async move { controller.start(&task).await })
            })
            .collect();

        let mut started = 0;
        for attempt in attempts {
            match attempt.await.unwrap() {
                Ok(_) => started += 1,
                Err(err) => assert!(matches!(err, TimerError::TimerAlreadyActive)),
            }
        }
        assert_eq!(started, 1);
    }

    #[tokio::test]
    async fn concurrent_pause_and_resume_transition_once() {
        let h = Harness::new();
        let task = h.task().await;
        h.controller.start(&task).await.unwrap();

        let pauses: Vec<_> = (0..8)
            .map(|_| {
                let controller = h.controller.clone();
                let task = task.clone();
                tokio::spawn(async move { controller.pause(&task).await })
            })
            .collect();
        let mut paused = 0;
        for pause in pauses {
            if pause.await.unwrap().is_ok() {
                paused += 1;
            }
        }
        assert_eq!(paused, 1);

        h.advance_secs(3);
        let resumes: Vec<_> = (0..8)
            .map(|_| {
                let controller = h.controller.clone();
                let task = task.clone();
                tokio::spawn(async move { controller.resume(&task).await })
            })
            .collect();
        let mut resumed = Vec::new();
        for resume in resumes {
            if let Ok(timer) = resume.await.unwrap() {
                resumed.push(timer);
            }
        }
        assert_eq!(resumed.len(), 1);

        let stored = h.db.get_timer_by_task(&task).await.unwrap().unwrap();
        assert_eq!(stored.total_pause_time, 3.0);
    }
}
