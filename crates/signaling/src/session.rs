//! Session-Registry – Teilnehmer-ID -> Send-Queue der Signaling-Session
//!
//! Gerichtetes Relay braucht einen Weg von der Ziel-ID zur lebenden
//! Session. Diese Registry haelt genau diese Zuordnung; pro Teilnehmer
//! existiert hoechstens eine Signaling-Session.

use dashmap::DashMap;
use huddle_core::UserId;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc;

use crate::types::ServerSignal;

/// Groesse der Send-Queue pro Session
const SEND_QUEUE_GROESSE: usize = 64;

/// Handle auf die Send-Queue einer Signaling-Session
///
/// `session_nr` unterscheidet aufeinanderfolgende Sessions desselben
/// Teilnehmers: der verspaetete Teardown eines ersetzten Transports darf
/// den Nachfolger nicht treffen.
#[derive(Clone, Debug)]
pub struct SessionSender {
    pub user_id: UserId,
    pub display_name: String,
    pub session_nr: u64,
    tx: mpsc::Sender<ServerSignal>,
}

impl SessionSender {
    /// Sendet eine Nachricht nicht-blockierend an die Session
    ///
    /// Gibt `false` zurueck wenn die Queue voll oder geschlossen ist.
    pub fn senden(&self, nachricht: ServerSignal) -> bool {
        match self.tx.try_send(nachricht) {
            Ok(()) => true,
            Err(mpsc::error::TrySendError::Full(_)) => {
                tracing::warn!(user_id = %self.user_id, "Send-Queue voll – Signal verworfen");
                false
            }
            Err(mpsc::error::TrySendError::Closed(_)) => {
                tracing::debug!(user_id = %self.user_id, "Send-Queue geschlossen (Session getrennt)");
                false
            }
        }
    }
}

/// Prozessweite Tabelle aller offenen Signaling-Sessions
///
/// Thread-safe via Arc + DashMap. Clone teilt den inneren Zustand.
#[derive(Clone)]
pub struct SessionRegistry {
    inner: Arc<SessionRegistryInner>,
}

struct SessionRegistryInner {
    sessions: DashMap<UserId, SessionSender>,
    /// Laufende Nummer fuer die naechste Registrierung
    naechste_nr: AtomicU64,
}

impl SessionRegistry {
    /// Erstellt eine neue, leere Registry
    pub fn neu() -> Self {
        Self {
            inner: Arc::new(SessionRegistryInner {
                sessions: DashMap::new(),
                naechste_nr: AtomicU64::new(0),
            }),
        }
    }

    /// Registriert eine Session
    ///
    /// Gibt die laufende Session-Nummer und die Empfangs-Queue zurueck.
    /// Eine bestehende Session desselben Teilnehmers wird ersetzt.
    pub fn registrieren(
        &self,
        user_id: UserId,
        display_name: &str,
    ) -> (u64, mpsc::Receiver<ServerSignal>) {
        let session_nr = self.inner.naechste_nr.fetch_add(1, Ordering::Relaxed);
        let (tx, rx) = mpsc::channel(SEND_QUEUE_GROESSE);
        let sender = SessionSender {
            user_id,
            display_name: display_name.to_string(),
            session_nr,
            tx,
        };
        self.inner.sessions.insert(user_id, sender);
        tracing::debug!(user_id = %user_id, session_nr, "Signaling-Session registriert");
        (session_nr, rx)
    }

    /// Entfernt eine Session, sofern sie noch die registrierte ist
    ///
    /// Gibt `true` zurueck wenn der Eintrag entfernt wurde. Traegt die
    /// Registry inzwischen eine Nachfolger-Session desselben Teilnehmers
    /// (Reconnect vor dem Schliessen des alten Transports), bleibt diese
    /// unangetastet.
    pub fn entfernen(&self, user_id: &UserId, session_nr: u64) -> bool {
        let entfernt = self
            .inner
            .sessions
            .remove_if(user_id, |_, s| s.session_nr == session_nr)
            .is_some();
        if entfernt {
            tracing::debug!(user_id = %user_id, "Signaling-Session entfernt");
        }
        entfernt
    }

    /// Sendet eine Nachricht an genau eine Session
    ///
    /// Gibt `true` zurueck wenn die Session existiert und die Nachricht
    /// eingereiht wurde. Ein fehlendes Ziel ist kein Fehler – Signaling
    /// ist gegenueber Verbindungsabbau inhaerent racy.
    pub fn an_session_senden(&self, user_id: &UserId, nachricht: ServerSignal) -> bool {
        match self.inner.sessions.get(user_id) {
            Some(sender) => sender.senden(nachricht),
            None => {
                tracing::debug!(user_id = %user_id, "Ziel-Session nicht verbunden – Signal verworfen");
                false
            }
        }
    }

    /// Prueft ob eine Session registriert ist
    pub fn ist_registriert(&self, user_id: &UserId) -> bool {
        self.inner.sessions.contains_key(user_id)
    }

    /// Gibt die Anzahl der offenen Sessions zurueck
    pub fn session_anzahl(&self) -> usize {
        self.inner.sessions.len()
    }
}

impl Default for SessionRegistry {
    fn default() -> Self {
        Self::neu()
    }
}
