use serde::{Deserialize, Serialize};

use crate::db::Timer;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum TimerStatus {
    Idle,
    Running,
    Paused,
}

impl Default for TimerStatus {
    fn default() -> Self {
        TimerStatus::Idle
    }
}

impl TimerStatus {
    /// Status is derived from the record's presence and shape, never stored.
    pub fn of(timer: Option<&Timer>) -> Self {
        match timer {
            None => TimerStatus::Idle,
            Some(timer) if timer.is_paused() => TimerStatus::Paused,
            Some(_) => TimerStatus::Running,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TimerStatus::Idle => "idle",
            TimerStatus::Running => "running",
            TimerStatus::Paused => "paused",
        }
    }
}
