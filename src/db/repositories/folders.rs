use anyhow::Result;
use chrono::Utc;
use rusqlite::params;
use uuid::Uuid;

use crate::db::{
    connection::Database,
    models::{Folder, NewFolder},
};

impl Database {
    pub async fn create_folder(&self, input: NewFolder) -> Result<Folder> {
        let folder = Folder {
            id: Uuid::new_v4().to_string(),
            name: input.name,
            created_at: Utc::now(),
        };

        let record = folder.clone();
        self.execute(move |conn| {
            conn.execute(
                "INSERT INTO folders (id, name, created_at) VALUES (?1, ?2, ?3)",
                params![record.id, record.name, record.created_at.to_rfc3339()],
            )?;
            Ok(())
        })
        .await?;

        Ok(folder)
    }
}
