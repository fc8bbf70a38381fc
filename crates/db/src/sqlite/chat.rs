//! SQLite-Implementierung des ChatMessageRepository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use huddle_core::{ChannelId, UserId};
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

use crate::error::{DbError, DbResult};
use crate::models::{NachrichtRecord, NachrichtenFilter, NeueNachricht};
use crate::repository::ChatMessageRepository;
use crate::sqlite::pool::SqliteDb;

#[async_trait]
impl ChatMessageRepository for SqliteDb {
    async fn create(&self, data: NeueNachricht<'_>) -> DbResult<NachrichtRecord> {
        if data.content.trim().is_empty() {
            return Err(DbError::UngueltigeDaten(
                "Nachrichteninhalt darf nicht leer sein".into(),
            ));
        }

        let now = Utc::now();
        let now_str = now.to_rfc3339();

        let result = sqlx::query(
            "INSERT INTO chat_messages (channel_id, author_id, content, created_at)
             VALUES (?, ?, ?, ?)",
        )
        .bind(data.channel_id.als_str())
        .bind(data.author_id.inner())
        .bind(data.content)
        .bind(&now_str)
        .execute(&self.pool)
        .await?;

        Ok(NachrichtRecord {
            id: result.last_insert_rowid(),
            channel_id: data.channel_id.clone(),
            author_id: data.author_id,
            content: data.content.to_string(),
            created_at: now,
        })
    }

    async fn get_history(&self, filter: NachrichtenFilter) -> DbResult<Vec<NachrichtRecord>> {
        let limit = filter.limit.unwrap_or(50);

        let rows = if let Some(before) = filter.before {
            sqlx::query(
                "SELECT id, channel_id, author_id, content, created_at
                 FROM chat_messages
                 WHERE channel_id = ? AND created_at < ?
                 ORDER BY created_at DESC
                 LIMIT ?",
            )
            .bind(filter.channel_id.als_str())
            .bind(before.to_rfc3339())
            .bind(limit)
            .fetch_all(&self.pool)
            .await?
        } else {
            sqlx::query(
                "SELECT id, channel_id, author_id, content, created_at
                 FROM chat_messages
                 WHERE channel_id = ?
                 ORDER BY created_at DESC
                 LIMIT ?",
            )
            .bind(filter.channel_id.als_str())
            .bind(limit)
            .fetch_all(&self.pool)
            .await?
        };

        rows.iter().map(row_to_nachricht).collect()
    }
}

/// Konvertiert eine SQLite-Zeile in einen NachrichtRecord
fn row_to_nachricht(row: &SqliteRow) -> DbResult<NachrichtRecord> {
    let created_str: String = row.try_get("created_at")?;
    let created_at = parse_zeitstempel(&created_str)?;

    Ok(NachrichtRecord {
        id: row.try_get("id")?,
        channel_id: ChannelId::neu(row.try_get::<String, _>("channel_id")?),
        author_id: UserId(row.try_get("author_id")?),
        content: row.try_get("content")?,
        created_at,
    })
}

/// Parst einen RFC3339-Zeitstempel aus der Datenbank
pub(crate) fn parse_zeitstempel(s: &str) -> DbResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| DbError::intern(format!("Ungueltiger Zeitstempel '{s}': {e}")))
}
