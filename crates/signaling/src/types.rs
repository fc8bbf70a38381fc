//! Wire-Typen fuer die Signaling-Grenze
//!
//! Geschlossene Summentypen pro Richtung, Dispatch ueber das `kind`-Feld.
//! Der Umschlag-Payload (Session-Beschreibung bzw. ICE-Kandidat) bleibt
//! ein opakes JSON-Objekt und wird woertlich weitergereicht.

use huddle_core::{RoomId, UserId};
use serde::{Deserialize, Serialize};

/// Art eines Signal-Umschlags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SignalTyp {
    Offer,
    Answer,
    IceCandidate,
}

/// Gerichteter Signal-Umschlag zwischen zwei Teilnehmern
///
/// `originator_id` wird serverseitig mit der Session-Identitaet
/// gestempelt – ein vom Client mitgeschickter Wert wird ueberschrieben.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignalUmschlag {
    #[serde(rename = "type")]
    pub typ: SignalTyp,
    #[serde(default)]
    pub originator_id: Option<UserId>,
    pub target_participant_id: UserId,
    pub room_id: RoomId,
    /// Opaker Payload – wird nie inspiziert oder validiert
    pub payload: serde_json::Value,
}

/// Eingehende Nachricht einer Signaling-Session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum ClientSignal {
    #[serde(rename = "join-room", rename_all = "camelCase")]
    RaumBeitreten { room_id: RoomId },
    #[serde(rename = "leave-room", rename_all = "camelCase")]
    RaumVerlassen { room_id: RoomId },
    #[serde(rename = "signal")]
    Signal(SignalUmschlag),
}

/// Ausgehende Nachricht an eine Signaling-Session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum ServerSignal {
    /// Mitglieder-Schnappschuss fuer den Beitretenden (die anderen, er
    /// selbst steht nicht darin)
    #[serde(rename = "room-users", rename_all = "camelCase")]
    RaumMitglieder {
        room_id: RoomId,
        participant_ids: Vec<UserId>,
    },
    /// Ein Teilnehmer ist dem Raum beigetreten
    #[serde(rename = "user-joined", rename_all = "camelCase")]
    BenutzerBeigetreten {
        room_id: RoomId,
        participant_id: UserId,
        display_name: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        avatar: Option<String>,
    },
    /// Ein Teilnehmer hat den Raum verlassen
    #[serde(rename = "user-left", rename_all = "camelCase")]
    BenutzerGegangen {
        room_id: RoomId,
        participant_id: UserId,
    },
    /// Weitergeleiteter Umschlag eines anderen Teilnehmers
    #[serde(rename = "signal")]
    Signal(SignalUmschlag),
}
