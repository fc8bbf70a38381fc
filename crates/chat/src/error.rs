//! Fehlertypen fuer das Chat-Crate

use huddle_core::ChannelId;
use thiserror::Error;

/// Chat-Fehlertypen
///
/// Alle Fehler bleiben auf das ausloesende Ereignis beschraenkt – der Hub
/// verwirft das Ereignis und macht weiter, nichts davon ist fatal.
#[derive(Debug, Error)]
pub enum ChatError {
    #[error("Nachrichteninhalt darf nicht leer sein")]
    LeererInhalt,

    #[error("Nachricht zu lang: {len} Zeichen (Maximum: {max})")]
    InhaltZuLang { len: usize, max: usize },

    #[error("Kanal-Konflikt: Ereignis fuer {gemeldet}, Verbindung gehoert zu {gebunden}")]
    KanalKonflikt {
        gemeldet: ChannelId,
        gebunden: ChannelId,
    },

    #[error("Unerwartetes Client-Ereignis: {0}")]
    UnerwartetesEreignis(&'static str),

    #[error("Datenbank-Fehler: {0}")]
    Datenbank(#[from] huddle_db::DbError),
}

pub type ChatResult<T> = Result<T, ChatError>;
