//! Wire-Typen fuer die Chat-Grenze
//!
//! Zwei getrennte Summentypen pro Richtung: der Client schickt nur
//! `message`/`typing` (Identitaet kommt aus dem Handshake), der Server
//! verteilt die volle Ereignismenge inklusive `join`/`leave`. Beide
//! Richtungen dispatchen ueber das `kind`-Feld – neue Arten koennen nicht
//! unbemerkt durchrutschen.

use huddle_core::{ChannelId, UserId};
use serde::{Deserialize, Serialize};

/// Eingehendes Ereignis einer Client-Verbindung
///
/// `join`/`leave` werden nur vom Hub selbst erzeugt; schickt ein Client
/// sie trotzdem, ignoriert der Hub sie.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum ClientChatEvent {
    #[serde(rename = "message", rename_all = "camelCase")]
    Nachricht {
        channel_id: ChannelId,
        content: String,
    },
    #[serde(rename = "typing", rename_all = "camelCase")]
    Tippt { channel_id: ChannelId },
    #[serde(rename = "join")]
    Beigetreten {},
    #[serde(rename = "leave")]
    Verlassen {},
}

/// Ausgehendes Ereignis an die Kanal-Mitglieder
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum ChatEvent {
    #[serde(rename = "join", rename_all = "camelCase")]
    Beigetreten {
        channel_id: ChannelId,
        participant_id: UserId,
        display_name: String,
    },
    #[serde(rename = "leave", rename_all = "camelCase")]
    Verlassen {
        channel_id: ChannelId,
        participant_id: UserId,
        display_name: String,
    },
    #[serde(rename = "typing", rename_all = "camelCase")]
    Tippt {
        channel_id: ChannelId,
        participant_id: UserId,
        display_name: String,
    },
    #[serde(rename = "message", rename_all = "camelCase")]
    Nachricht {
        channel_id: ChannelId,
        participant_id: UserId,
        display_name: String,
        content: String,
    },
}

impl ChatEvent {
    /// Gibt die Teilnehmer-ID des Ereignisses zurueck
    pub fn participant_id(&self) -> UserId {
        match self {
            Self::Beigetreten { participant_id, .. }
            | Self::Verlassen { participant_id, .. }
            | Self::Tippt { participant_id, .. }
            | Self::Nachricht { participant_id, .. } => *participant_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_nachricht_parsen() {
        let json = r#"{"kind":"message","channelId":"general","content":"hello"}"#;
        let event: ClientChatEvent = serde_json::from_str(json).unwrap();
        assert_eq!(
            event,
            ClientChatEvent::Nachricht {
                channel_id: "general".into(),
                content: "hello".into(),
            }
        );
    }

    #[test]
    fn client_join_wird_geparst_aber_traegt_nichts() {
        // Wohlverhaltene Clients schicken kein join – es muss trotzdem
        // parsebar bleiben, damit der Hub es gezielt ignorieren kann
        let json = r#"{"kind":"join","channelId":"general"}"#;
        let event: ClientChatEvent = serde_json::from_str(json).unwrap();
        assert_eq!(event, ClientChatEvent::Beigetreten {});
    }

    #[test]
    fn ausgehende_nachricht_hat_wire_feldnamen() {
        let event = ChatEvent::Nachricht {
            channel_id: "general".into(),
            participant_id: UserId(1),
            display_name: "Alice".into(),
            content: "hello".into(),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["kind"], "message");
        assert_eq!(json["channelId"], "general");
        assert_eq!(json["participantId"], 1);
        assert_eq!(json["displayName"], "Alice");
        assert_eq!(json["content"], "hello");
    }

    #[test]
    fn unbekannter_kind_tag_ist_fehler() {
        let json = r#"{"kind":"shout","channelId":"general"}"#;
        assert!(serde_json::from_str::<ClientChatEvent>(json).is_err());
    }
}
