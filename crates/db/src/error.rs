//! Fehlertypen des Persistenz-Gateways
//!
//! Die Hubs behandeln jeden dieser Fehler gleich: Ereignis verwerfen,
//! loggen, weitermachen. Die Unterscheidung dient dem Log, nicht der
//! Steuerung.

use thiserror::Error;

/// Result-Alias fuer alle Repository-Operationen
pub type DbResult<T> = Result<T, DbError>;

/// Fehler des Persistenz-Gateways
#[derive(Debug, Error)]
pub enum DbError {
    /// Eingabedaten verletzen eine Invariante des Schemas
    #[error("Ungueltige Daten: {0}")]
    UngueltigeDaten(String),

    /// Fehler der darunterliegenden SQL-Schicht
    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),

    /// Schema-Migration fehlgeschlagen
    #[error(transparent)]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// Inkonsistenz im gespeicherten Zustand (z.B. unparsebarer Zeitstempel)
    #[error("Interner Datenbankzustand inkonsistent: {0}")]
    Intern(String),
}

impl DbError {
    pub fn intern(msg: impl Into<String>) -> Self {
        Self::Intern(msg.into())
    }
}
