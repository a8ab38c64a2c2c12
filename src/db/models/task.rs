//! Task records. Tasks are owned by the CRUD surface; timers only reference them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Task {
    pub id: String,
    pub name: String,
    pub folder_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Input data for creating a task
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewTask {
    pub name: String,
    #[serde(default)]
    pub folder_id: Option<String>,
}
