//! huddle-signaling – Raum-Registry und Signaling-Relay-Hub
//!
//! Dieses Crate implementiert die Anruf-Signalisierung: Raum-Beitritte,
//! Mitglieder-Benachrichtigungen und das gerichtete Weiterleiten von
//! Verbindungsaufbau-Daten (Offer/Answer/ICE-Kandidaten) zwischen zwei
//! Teilnehmern. Der eigentliche Medientransport laeuft peer-to-peer und
//! beruehrt diesen Server nie – hier fliessen nur die Aufbau-Metadaten,
//! und zwar unveraendert: der Hub inspiziert die Payloads nicht.
//!
//! ## Architektur
//!
//! ```text
//! WebSocket-Session (pro Client ein Task)
//!     |
//!     v
//! SignalingHub
//!     +-- SessionRegistry  (participant_id -> Send-Queue)
//!     +-- RaumRegistry     (room_id -> Mitglieder)
//!     +-- UserRepository   (Anzeige-Metadaten fuer user-joined)
//! ```
//!
//! Zentrale Korrektheitseigenschaft: stirbt ein Transport, verschwindet
//! der Teilnehmer aus saemtlichen Raeumen – kein Raum behaelt je ein
//! verwaistes Mitglied.

pub mod hub;
pub mod rooms;
pub mod session;
pub mod types;

// Bequeme Re-Exporte
pub use hub::{SignalSession, SignalingHub};
pub use rooms::RaumRegistry;
pub use session::SessionRegistry;
pub use types::{ClientSignal, ServerSignal, SignalTyp, SignalUmschlag};
