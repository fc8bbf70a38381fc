//! Gemeinsame Identifikationstypen fuer Huddle
//!
//! Alle IDs verwenden das Newtype-Pattern um Verwechslungen zwischen
//! verschiedenen ID-Arten zur Compilezeit auszuschliessen. Benutzer-IDs
//! sind numerisch (relationale Rowids), Kanal- und Raum-IDs sind
//! Freitext-Namen wie sie der Client mitbringt.

use serde::{Deserialize, Serialize};

/// Eindeutige Benutzer-ID (Teilnehmer-Identitaet)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub i64);

impl UserId {
    /// Gibt den inneren Wert zurueck
    pub fn inner(&self) -> i64 {
        self.0
    }
}

impl From<i64> for UserId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "user:{}", self.0)
    }
}

/// Eindeutige Kanal-ID (Text-Chat-Kanal)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChannelId(pub String);

impl ChannelId {
    /// Erstellt eine ChannelId aus einem Namen
    pub fn neu(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Gibt den inneren Namen zurueck
    pub fn als_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ChannelId {
    fn from(name: &str) -> Self {
        Self(name.to_string())
    }
}

impl std::fmt::Display for ChannelId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "channel:{}", self.0)
    }
}

/// Eindeutige Raum-ID (Anruf-Raum fuer Signaling)
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoomId(pub String);

impl RoomId {
    /// Erstellt eine RoomId aus einem Namen
    pub fn neu(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Gibt den inneren Namen zurueck
    pub fn als_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for RoomId {
    fn from(name: &str) -> Self {
        Self(name.to_string())
    }
}

impl std::fmt::Display for RoomId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "room:{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_id_display() {
        let id = UserId(7);
        assert_eq!(id.to_string(), "user:7");
    }

    #[test]
    fn channel_id_aus_str() {
        let a: ChannelId = "general".into();
        let b = ChannelId::neu("general");
        assert_eq!(a, b);
        assert_eq!(a.als_str(), "general");
    }

    #[test]
    fn room_id_verschieden_von_gleichem_namen() {
        // Newtypes verhindern Verwechslung nur zur Compilezeit,
        // gleiche Namen bleiben gleichwertig
        let a = RoomId::neu("42");
        let b = RoomId::neu("42");
        assert_eq!(a, b);
    }

    #[test]
    fn ids_sind_serde_kompatibel() {
        let uid = UserId(99);
        let json = serde_json::to_string(&uid).unwrap();
        assert_eq!(json, "99", "UserId serialisiert transparent");
        let uid2: UserId = serde_json::from_str(&json).unwrap();
        assert_eq!(uid, uid2);

        let kanal = ChannelId::neu("general");
        let json = serde_json::to_string(&kanal).unwrap();
        assert_eq!(json, "\"general\"");
    }
}
