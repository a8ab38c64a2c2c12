use anyhow::Result;
use chrono::Utc;
use rusqlite::{params, OptionalExtension, Row};
use uuid::Uuid;

use crate::db::{
    connection::Database,
    helpers::parse_datetime,
    models::{NewTask, Task},
};

fn row_to_task(row: &Row) -> Result<Task> {
    let created_at: String = row.get("created_at")?;

    Ok(Task {
        id: row.get("id")?,
        name: row.get("name")?,
        folder_id: row.get("folder_id")?,
        created_at: parse_datetime(&created_at, "created_at")?,
    })
}

impl Database {
    pub async fn create_task(&self, input: NewTask) -> Result<Task> {
        let task = Task {
            id: Uuid::new_v4().to_string(),
            name: input.name,
            folder_id: input.folder_id,
            created_at: Utc::now(),
        };

        let record = task.clone();
        self.execute(move |conn| {
            conn.execute(
                "INSERT INTO tasks (id, name, folder_id, created_at)
                 VALUES (?1, ?2, ?3, ?4)",
                params![
                    record.id,
                    record.name,
                    record.folder_id,
                    record.created_at.to_rfc3339(),
                ],
            )?;
            Ok(())
        })
        .await?;

        Ok(task)
    }

    pub async fn get_task(&self, task_id: &str) -> Result<Option<Task>> {
        let task_id = task_id.to_string();
        self.execute(move |conn| {
            let task = conn
                .query_row(
                    "SELECT id, name, folder_id, created_at FROM tasks WHERE id = ?1",
                    params![task_id],
                    |row| Ok(row_to_task(row)),
                )
                .optional()?
                .transpose()?;
            Ok(task)
        })
        .await
    }

    /// Delete a task. Its timer, if any, goes with it through ON DELETE CASCADE.
    pub async fn delete_task(&self, task_id: &str) -> Result<bool> {
        let task_id = task_id.to_string();
        self.execute(move |conn| {
            let rows_affected = conn.execute("DELETE FROM tasks WHERE id = ?1", params![task_id])?;
            Ok(rows_affected > 0)
        })
        .await
    }
}
