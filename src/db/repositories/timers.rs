use anyhow::{bail, Result};
use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::db::{
    connection::Database,
    helpers::{read_required_timestamp, read_timestamp},
    models::{NewTimer, Timer, TimerFields, TimerId},
};

const TIMER_COLUMNS: &str = "id, task_id, start_time, paused_time, total_pause_time";

#[derive(Debug, Clone, Copy)]
enum PauseFilter {
    Any,
    Running,
    Paused,
}

impl PauseFilter {
    fn clause(self) -> &'static str {
        match self {
            PauseFilter::Any => "",
            PauseFilter::Running => " AND paused_time IS NULL",
            PauseFilter::Paused => " AND paused_time IS NOT NULL",
        }
    }
}

fn row_to_timer(row: &Row) -> Result<Timer> {
    let id: String = row.get("id")?;
    let total_pause_time: f64 = row.get("total_pause_time")?;

    Ok(Timer {
        id: TimerId::from(id),
        task_id: row.get("task_id")?,
        start_time: read_required_timestamp(row, "start_time")?,
        paused_time: read_timestamp(row, "paused_time")?,
        total_pause_time: total_pause_time.max(0.0),
    })
}

fn select_timer(conn: &Connection, task_id: &str, filter: PauseFilter) -> Result<Option<Timer>> {
    let sql = format!(
        "SELECT {TIMER_COLUMNS} FROM timers WHERE task_id = ?1{} LIMIT 1",
        filter.clause()
    );
    let timer = conn
        .query_row(&sql, params![task_id], |row| Ok(row_to_timer(row)))
        .optional()?
        .transpose()?;
    Ok(timer)
}

impl Database {
    async fn find_timer(&self, task_id: &str, filter: PauseFilter) -> Result<Option<Timer>> {
        let task_id = task_id.to_string();
        self.execute(move |conn| select_timer(conn, &task_id, filter))
            .await
    }

    pub async fn get_timer_by_task(&self, task_id: &str) -> Result<Option<Timer>> {
        self.find_timer(task_id, PauseFilter::Any).await
    }

    pub async fn get_running_timer_by_task(&self, task_id: &str) -> Result<Option<Timer>> {
        self.find_timer(task_id, PauseFilter::Running).await
    }

    pub async fn get_paused_timer_by_task(&self, task_id: &str) -> Result<Option<Timer>> {
        self.find_timer(task_id, PauseFilter::Paused).await
    }

    pub async fn insert_timer(&self, timer: NewTimer) -> Result<TimerId> {
        let id = TimerId::generate();
        let row_id = id.clone();
        self.execute(move |conn| {
            conn.execute(
                "INSERT INTO timers (id, task_id, start_time, paused_time, total_pause_time)
                 VALUES (?1, ?2, ?3, NULL, 0.0)",
                params![
                    row_id.as_str(),
                    timer.task_id,
                    timer.start_time.to_rfc3339(),
                ],
            )?;
            Ok(())
        })
        .await?;
        Ok(id)
    }

    /// Apply `fields` to one timer row. Returns `false` when no row matched,
    /// either because the id is gone or because the row was not in the state
    /// the change expects.
    pub async fn update_timer_fields(&self, timer_id: &TimerId, fields: TimerFields) -> Result<bool> {
        if fields.is_empty() {
            bail!("timer update for {timer_id} carries no fields");
        }

        let timer_id = timer_id.clone();
        self.execute(move |conn| {
            let mut assignments: Vec<&str> = Vec::new();
            let mut guard = "";
            let mut values: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

            match fields.paused_time {
                Some(Some(at)) => {
                    assignments.push("paused_time = ?");
                    values.push(Box::new(at.to_rfc3339()));
                    guard = PauseFilter::Running.clause();
                }
                Some(None) => {
                    assignments.push("paused_time = NULL");
                    guard = PauseFilter::Paused.clause();
                }
                None => {}
            }

            if let Some(secs) = fields.add_pause_secs {
                if !secs.is_finite() || secs < 0.0 {
                    bail!("pause increment {secs} must be a non-negative number of seconds");
                }
                assignments.push("total_pause_time = total_pause_time + ?");
                values.push(Box::new(secs));
            }

            values.push(Box::new(timer_id.as_str().to_string()));
            let sql = format!(
                "UPDATE timers SET {} WHERE id = ?{guard}",
                assignments.join(", ")
            );

            let params: Vec<&dyn rusqlite::ToSql> = values.iter().map(|v| v.as_ref()).collect();
            let rows_affected = conn.execute(&sql, params.as_slice())?;
            Ok(rows_affected > 0)
        })
        .await
    }

    pub async fn delete_timer(&self, timer_id: &TimerId) -> Result<bool> {
        let timer_id = timer_id.clone();
        self.execute(move |conn| {
            let rows_affected =
                conn.execute("DELETE FROM timers WHERE id = ?1", params![timer_id.as_str()])?;
            Ok(rows_affected > 0)
        })
        .await
    }
}
