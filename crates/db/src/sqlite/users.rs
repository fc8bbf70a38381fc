//! SQLite-Implementierung des UserRepository

use async_trait::async_trait;
use chrono::Utc;
use huddle_core::UserId;
use sqlx::Row;

use crate::error::DbResult;
use crate::models::{BenutzerRecord, NeuerBenutzer};
use crate::repository::UserRepository;
use crate::sqlite::chat::parse_zeitstempel;
use crate::sqlite::pool::SqliteDb;

#[async_trait]
impl UserRepository for SqliteDb {
    async fn get_by_id(&self, id: UserId) -> DbResult<Option<BenutzerRecord>> {
        let row = sqlx::query(
            "SELECT id, display_name, avatar, created_at FROM users WHERE id = ?",
        )
        .bind(id.inner())
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(r) => {
                let created_str: String = r.try_get("created_at")?;
                Ok(Some(BenutzerRecord {
                    id: UserId(r.try_get("id")?),
                    display_name: r.try_get("display_name")?,
                    avatar: r.try_get("avatar")?,
                    created_at: parse_zeitstempel(&created_str)?,
                }))
            }
            None => Ok(None),
        }
    }

    async fn create(&self, data: NeuerBenutzer<'_>) -> DbResult<BenutzerRecord> {
        let now = Utc::now();

        let result = sqlx::query(
            "INSERT INTO users (display_name, avatar, created_at) VALUES (?, ?, ?)",
        )
        .bind(data.display_name)
        .bind(data.avatar)
        .bind(now.to_rfc3339())
        .execute(&self.pool)
        .await?;

        Ok(BenutzerRecord {
            id: UserId(result.last_insert_rowid()),
            display_name: data.display_name.to_string(),
            avatar: data.avatar.map(str::to_string),
            created_at: now,
        })
    }
}
