//! Timer records: one row per task with timing activity in progress.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Store-assigned identity of a timer row, distinct from the task id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TimerId(String);

impl TimerId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for TimerId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl fmt::Display for TimerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Timer {
    pub id: TimerId,
    pub task_id: String,
    pub start_time: DateTime<Utc>,
    /// `None` while running.
    pub paused_time: Option<DateTime<Utc>>,
    /// Accumulated paused seconds.
    pub total_pause_time: f64,
}

impl Timer {
    pub fn is_paused(&self) -> bool {
        self.paused_time.is_some()
    }
}

#[derive(Debug, Clone)]
pub struct NewTimer {
    pub task_id: String,
    pub start_time: DateTime<Utc>,
}

/// Field changes applied by `update_timer_fields`.
///
/// Setting `paused_time` to `Some(_)` only matches a running row and clearing it
/// only matches a paused row, so a stale read can never flip a timer twice.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TimerFields {
    pub paused_time: Option<Option<DateTime<Utc>>>,
    pub add_pause_secs: Option<f64>,
}

impl TimerFields {
    pub fn pause_at(at: DateTime<Utc>) -> Self {
        Self {
            paused_time: Some(Some(at)),
            add_pause_secs: None,
        }
    }

    pub fn resume_after(pause_secs: f64) -> Self {
        Self {
            paused_time: Some(None),
            add_pause_secs: Some(pause_secs),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.paused_time.is_none() && self.add_pause_secs.is_none()
    }
}
