//! huddle-core – Gemeinsame Typen
//!
//! Dieses Crate stellt die fundamentalen Bausteine bereit, die von allen
//! anderen Huddle-Crates gemeinsam genutzt werden: die ID-Newtypes fuer
//! Teilnehmer, Kanaele und Anruf-Raeume. Fehlertypen leben dort, wo die
//! Fehler entstehen (huddle-db, huddle-chat).

pub mod types;

pub use types::{ChannelId, RoomId, UserId};
