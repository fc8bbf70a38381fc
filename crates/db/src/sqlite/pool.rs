//! SQLite-Pool fuer den Realtime-Kern
//!
//! WAL-Modus haelt Leser und Schreiber auseinander; der Broadcast-Pfad
//! liest nie, waehrend er schreibt, aber History-Abfragen laufen parallel
//! zu eingehenden Nachrichten.

use std::str::FromStr;
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};

use crate::error::DbResult;
use crate::repository::DatabaseConfig;

/// Wrapper um den SQLite Connection Pool
#[derive(Debug, Clone)]
pub struct SqliteDb {
    pub(crate) pool: SqlitePool,
}

impl SqliteDb {
    /// Oeffnet die Datenbank aus der Konfiguration und migriert das Schema
    pub async fn oeffnen(config: &DatabaseConfig) -> DbResult<Self> {
        let journal = if config.sqlite_wal {
            SqliteJournalMode::Wal
        } else {
            SqliteJournalMode::Delete
        };
        let opts = SqliteConnectOptions::from_str(&config.url)?
            .create_if_missing(true)
            .journal_mode(journal)
            .busy_timeout(Duration::from_secs(5))
            .foreign_keys(true);

        let db = Self::aus_optionen(opts, config.max_verbindungen, 0).await?;
        tracing::info!(url = %config.url, journal = ?journal, "SQLite-Datenbank geoeffnet");
        Ok(db)
    }

    /// Erstellt eine In-Memory-Datenbank fuer Tests
    ///
    /// min_connections = 1, sonst schliesst der Pool die einzige Verbindung
    /// und der Inhalt ist weg.
    pub async fn in_memory() -> DbResult<Self> {
        let opts = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);
        Self::aus_optionen(opts, 1, 1).await
    }

    async fn aus_optionen(opts: SqliteConnectOptions, max: u32, min: u32) -> DbResult<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(max)
            .min_connections(min)
            .connect_with(opts)
            .await?;

        let db = Self { pool };
        db.migrationen_ausfuehren().await?;
        Ok(db)
    }

    /// Fuehrt ausstehende Schema-Migrationen aus
    pub async fn migrationen_ausfuehren(&self) -> DbResult<()> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        tracing::debug!("Schema-Migrationen angewendet");
        Ok(())
    }

    /// Direkter Pool-Zugriff (fuer Tests)
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}
