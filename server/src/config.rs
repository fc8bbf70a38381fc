//! Server-Konfiguration
//!
//! TOML-Datei, sektionsweise mit Standardwerten hinterlegt – ohne Datei
//! startet der Server mit SQLite neben dem Binary und Port 8080.

use anyhow::Context;
use serde::{Deserialize, Serialize};

/// Vollstaendige Server-Konfiguration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ServerConfig {
    /// Allgemeine Server-Einstellungen
    pub server: ServerEinstellungen,
    /// Netzwerk-Einstellungen
    pub netzwerk: NetzwerkEinstellungen,
    /// Datenbank-Einstellungen
    pub datenbank: DatenbankEinstellungen,
    /// Logging-Einstellungen
    pub logging: LoggingEinstellungen,
}

impl ServerConfig {
    /// Laedt die Konfiguration aus einer TOML-Datei
    ///
    /// Eine fehlende Datei ist kein Fehler (Standardwerte gelten); eine
    /// vorhandene aber unlesbare oder ungueltige Datei bricht den Start ab.
    pub fn laden(pfad: &str) -> anyhow::Result<Self> {
        let inhalt = match std::fs::read_to_string(pfad) {
            Ok(inhalt) => inhalt,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(pfad, "Keine Konfigurationsdatei, Standardwerte aktiv");
                return Ok(Self::default());
            }
            Err(e) => {
                return Err(e)
                    .with_context(|| format!("Konfigurationsdatei '{pfad}' nicht lesbar"))
            }
        };

        toml::from_str(&inhalt)
            .with_context(|| format!("Konfigurationsdatei '{pfad}' ist kein gueltiges TOML"))
    }
}

/// Allgemeine Server-Einstellungen
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerEinstellungen {
    /// Anzeigename des Servers
    pub name: String,
    /// Maximale Anzahl gleichzeitiger Clients
    pub max_clients: u32,
}

impl Default for ServerEinstellungen {
    fn default() -> Self {
        Self {
            name: "Huddle Server".into(),
            max_clients: 512,
        }
    }
}

/// Netzwerk-Einstellungen
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NetzwerkEinstellungen {
    /// Bind-Adresse fuer HTTP/WebSocket
    pub bind_adresse: String,
    /// Port fuer HTTP/WebSocket
    pub port: u16,
}

impl Default for NetzwerkEinstellungen {
    fn default() -> Self {
        Self {
            bind_adresse: "0.0.0.0".into(),
            port: 8080,
        }
    }
}

/// Datenbank-Einstellungen
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatenbankEinstellungen {
    /// Verbindungs-URL
    pub url: String,
    /// Maximale Verbindungspool-Groesse
    pub max_verbindungen: u32,
    /// WAL-Modus fuer SQLite
    pub wal: bool,
}

impl Default for DatenbankEinstellungen {
    fn default() -> Self {
        Self {
            url: "sqlite://huddle.db".into(),
            max_verbindungen: 5,
            wal: true,
        }
    }
}

/// Logging-Einstellungen
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingEinstellungen {
    /// Log-Level: "trace", "debug", "info", "warn", "error"
    pub level: String,
    /// Format: "json" oder "text"
    pub format: String,
}

impl Default for LoggingEinstellungen {
    fn default() -> Self {
        Self {
            level: "info".into(),
            format: "text".into(),
        }
    }
}
