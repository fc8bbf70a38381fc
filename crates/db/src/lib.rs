//! huddle-db – Datenbank-Abstraktion
//!
//! Dieses Crate stellt das Repository-Pattern bereit, das die relationale
//! Ablage (SQLite) hinter einer einheitlichen Schnittstelle abstrahiert.
//! Die Realtime-Hubs konsumieren ausschliesslich die Traits
//! [`ChatMessageRepository`] und [`UserRepository`] – sie wissen nichts
//! von SQL oder Verbindungspools.

pub mod error;
pub mod models;
pub mod repository;
pub mod sqlite;

// Bequeme Re-Exporte
pub use error::{DbError, DbResult};
pub use models::{BenutzerRecord, NachrichtRecord, NachrichtenFilter, NeueNachricht, NeuerBenutzer};
pub use repository::{ChatMessageRepository, DatabaseConfig, UserRepository};
pub use sqlite::SqliteDb;
