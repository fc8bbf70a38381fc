//! Repository-Trait-Definitionen
//!
//! Das Repository-Pattern entkoppelt die Realtime-Hubs von der konkreten
//! Datenbank-Implementierung. Die Hubs sind generisch ueber diese Traits,
//! in Tests koennen sie durch Mocks ersetzt werden.

use async_trait::async_trait;
use huddle_core::UserId;

use crate::error::DbResult;
use crate::models::{BenutzerRecord, NachrichtRecord, NachrichtenFilter, NeueNachricht, NeuerBenutzer};

/// Konfiguration fuer die Datenbankverbindung
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// Verbindungs-URL (z.B. "sqlite://huddle.db")
    pub url: String,
    /// Maximale Anzahl gleichzeitiger Verbindungen im Pool
    pub max_verbindungen: u32,
    /// Ob WAL-Modus bei SQLite aktiviert werden soll
    pub sqlite_wal: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite://huddle.db".into(),
            max_verbindungen: 5,
            sqlite_wal: true,
        }
    }
}

/// Repository fuer Chat-Nachrichten
///
/// `create` ist der einzige Schreibpfad des Realtime-Kerns: eine Nachricht
/// entsteht ausschliesslich als Seiteneffekt eines `message`-Ereignisses.
#[async_trait]
pub trait ChatMessageRepository: Send + Sync {
    /// Legt eine neue Nachricht an und gibt den persistierten Datensatz zurueck
    async fn create(&self, data: NeueNachricht<'_>) -> DbResult<NachrichtRecord>;

    /// Laedt die Nachrichten-History eines Kanals (neueste zuerst)
    async fn get_history(&self, filter: NachrichtenFilter) -> DbResult<Vec<NachrichtRecord>>;
}

/// Repository fuer Benutzer-Anzeige-Metadaten
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Laedt einen Benutzer anhand seiner ID
    async fn get_by_id(&self, id: UserId) -> DbResult<Option<BenutzerRecord>>;

    /// Legt einen neuen Benutzer an
    async fn create(&self, data: NeuerBenutzer<'_>) -> DbResult<BenutzerRecord>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn database_config_standard() {
        let cfg = DatabaseConfig::default();
        assert!(cfg.sqlite_wal);
        assert_eq!(cfg.max_verbindungen, 5);
        assert!(cfg.url.starts_with("sqlite://"));
    }
}
