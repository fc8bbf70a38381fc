//! huddle-chat – Kanal-Registry und Chat-Broadcast-Hub
//!
//! Dieses Crate implementiert den Text-Chat-Kern:
//! - KanalRegistry: welche Verbindung gehoert zu welchem Kanal
//! - ChatHub: Ereignisse entgegennehmen, Nachrichten persistieren und an
//!   alle anderen Kanal-Mitglieder verteilen
//!
//! Die Persistenz laeuft ueber das `ChatMessageRepository`-Trait aus
//! huddle-db; der Hub kennt keine SQL-Details. Eine Verbindung gehoert
//! fuer ihre gesamte Lebensdauer zu genau einem Kanal – Kanalwechsel
//! bedeutet trennen und neu verbinden.

pub mod error;
pub mod hub;
pub mod registry;
pub mod types;

// Bequeme Re-Exporte
pub use error::{ChatError, ChatResult};
pub use hub::{ChatHub, ChatVerbindung};
pub use registry::KanalRegistry;
pub use types::{ChatEvent, ClientChatEvent};
