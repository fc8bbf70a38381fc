//! Datenbankmodelle fuer Huddle
//!
//! Diese Typen repraesentieren Datensaetze aus der Datenbank. Sie sind von
//! den Wire-Typen der Hubs getrennt und dienen als reine
//! Datenuebertragungsobjekte.

use chrono::{DateTime, Utc};
use huddle_core::{ChannelId, UserId};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Benutzer
// ---------------------------------------------------------------------------

/// Benutzer-Datensatz aus der Datenbank
///
/// Nur die Anzeige-Metadaten, die der Realtime-Kern benoetigt. Passwoerter
/// und Sessions liegen ausserhalb dieses Crates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BenutzerRecord {
    pub id: UserId,
    pub display_name: String,
    pub avatar: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Daten zum Anlegen eines neuen Benutzers
#[derive(Debug, Clone)]
pub struct NeuerBenutzer<'a> {
    pub display_name: &'a str,
    pub avatar: Option<&'a str>,
}

// ---------------------------------------------------------------------------
// Chat-Nachrichten
// ---------------------------------------------------------------------------

/// Persistierte Chat-Nachricht
///
/// Unveraenderlich nach dem Anlegen – der Realtime-Kern kennt kein
/// Editieren oder Loeschen.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NachrichtRecord {
    pub id: i64,
    pub channel_id: ChannelId,
    pub author_id: UserId,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

/// Daten zum Anlegen einer neuen Nachricht
#[derive(Debug, Clone)]
pub struct NeueNachricht<'a> {
    pub channel_id: &'a ChannelId,
    pub author_id: UserId,
    pub content: &'a str,
}

/// Cursor-basierte Paginierung fuer die Nachrichten-History
#[derive(Debug, Clone)]
pub struct NachrichtenFilter {
    pub channel_id: ChannelId,
    /// Lade Nachrichten vor diesem Zeitstempel
    pub before: Option<DateTime<Utc>>,
    /// Maximale Anzahl (Default: 50)
    pub limit: Option<i64>,
}
