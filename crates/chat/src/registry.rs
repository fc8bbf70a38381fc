//! Kanal-Registry – Welche Verbindung gehoert zu welchem Kanal
//!
//! Die Registry verwaltet die Send-Queues aller offenen Chat-Verbindungen,
//! gruppiert nach Kanal, und stellt Methoden fuer selektives Broadcasting
//! bereit. Sie ist das einzige geteilte mutierbare Objekt des Chat-Kerns;
//! ausserhalb des Hubs fasst sie niemand an.
//!
//! Leere Kanal-Eintraege werden entfernt – fehlender Schluessel und leere
//! Menge sind fuer alle Leser gleichwertig.

use dashmap::DashMap;
use huddle_core::{ChannelId, UserId};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc;

use crate::types::ChatEvent;

/// Groesse der Send-Queue pro Verbindung
const SEND_QUEUE_GROESSE: usize = 64;

// ---------------------------------------------------------------------------
// VerbindungsSender
// ---------------------------------------------------------------------------

/// Handle auf die Send-Queue einer offenen Chat-Verbindung
///
/// `verbindungs_nr` unterscheidet aufeinanderfolgende Verbindungen
/// desselben Teilnehmers: bei einem Reconnect darf der verspaetete
/// Teardown des alten Transports den Nachfolger nicht treffen.
#[derive(Clone, Debug)]
pub struct VerbindungsSender {
    pub user_id: UserId,
    pub display_name: String,
    pub verbindungs_nr: u64,
    tx: mpsc::Sender<ChatEvent>,
}

impl VerbindungsSender {
    /// Sendet ein Ereignis nicht-blockierend an die Verbindung
    ///
    /// Gibt `false` zurueck wenn die Queue voll oder geschlossen ist –
    /// der Fan-out ueberspringt diese Verbindung dann einfach.
    pub fn senden(&self, ereignis: ChatEvent) -> bool {
        match self.tx.try_send(ereignis) {
            Ok(()) => true,
            Err(mpsc::error::TrySendError::Full(_)) => {
                tracing::warn!(user_id = %self.user_id, "Send-Queue voll – Ereignis verworfen");
                false
            }
            Err(mpsc::error::TrySendError::Closed(_)) => {
                tracing::debug!(user_id = %self.user_id, "Send-Queue geschlossen (Client getrennt)");
                false
            }
        }
    }
}

// ---------------------------------------------------------------------------
// KanalRegistry
// ---------------------------------------------------------------------------

/// Prozessweite Tabelle: Kanal -> offene Verbindungen
///
/// Thread-safe via Arc + DashMap. Clone teilt den inneren Zustand. Der
/// Zustand ist rein ephemer – nach einem Neustart ist die Registry leer
/// und alle Clients verbinden sich neu.
#[derive(Clone)]
pub struct KanalRegistry {
    inner: Arc<KanalRegistryInner>,
}

struct KanalRegistryInner {
    /// Kanal-Mitgliedschaft: channel_id -> Verbindungen in Beitrittsreihenfolge
    kanal_verbindungen: DashMap<ChannelId, Vec<VerbindungsSender>>,
    /// Laufende Nummer fuer die naechste Registrierung
    naechste_nr: AtomicU64,
}

impl KanalRegistry {
    /// Erstellt eine neue, leere Registry
    pub fn neu() -> Self {
        Self {
            inner: Arc::new(KanalRegistryInner {
                kanal_verbindungen: DashMap::new(),
                naechste_nr: AtomicU64::new(0),
            }),
        }
    }

    /// Registriert eine Verbindung in ihrem Kanal
    ///
    /// Gibt die laufende Verbindungsnummer und die Empfangs-Queue zurueck.
    /// Eine bereits registrierte Verbindung desselben Teilnehmers im selben
    /// Kanal wird ersetzt (alte Queue schliesst, Client muss neu verbinden).
    pub fn registrieren(
        &self,
        kanal: &ChannelId,
        user_id: UserId,
        display_name: &str,
    ) -> (u64, mpsc::Receiver<ChatEvent>) {
        let verbindungs_nr = self.inner.naechste_nr.fetch_add(1, Ordering::Relaxed);
        let (tx, rx) = mpsc::channel(SEND_QUEUE_GROESSE);
        let sender = VerbindungsSender {
            user_id,
            display_name: display_name.to_string(),
            verbindungs_nr,
            tx,
        };

        let mut eintrag = self
            .inner
            .kanal_verbindungen
            .entry(kanal.clone())
            .or_default();
        eintrag.retain(|v| v.user_id != user_id);
        eintrag.push(sender);
        drop(eintrag);

        tracing::debug!(user_id = %user_id, kanal = %kanal, verbindungs_nr, "Verbindung registriert");
        (verbindungs_nr, rx)
    }

    /// Entfernt eine Verbindung aus ihrem Kanal
    ///
    /// Entfernt nur den Eintrag mit der passenden Verbindungsnummer: der
    /// verspaetete Teardown eines ersetzten Transports darf die lebende
    /// Nachfolger-Verbindung nicht austragen. Gibt `true` zurueck wenn
    /// tatsaechlich ein Eintrag entfernt wurde; doppeltes Entfernen ist
    /// ein No-op – Teardown-Cleanup muss bedingungslos aufrufbar sein.
    pub fn entfernen(&self, kanal: &ChannelId, user_id: &UserId, verbindungs_nr: u64) -> bool {
        let mut entfernt = false;
        if let Some(mut verbindungen) = self.inner.kanal_verbindungen.get_mut(kanal) {
            let vorher = verbindungen.len();
            verbindungen
                .retain(|v| !(&v.user_id == user_id && v.verbindungs_nr == verbindungs_nr));
            entfernt = verbindungen.len() < vorher;
            let ist_leer = verbindungen.is_empty();
            drop(verbindungen);
            if ist_leer {
                self.inner.kanal_verbindungen.remove(kanal);
            }
        }
        if entfernt {
            tracing::debug!(user_id = %user_id, kanal = %kanal, "Verbindung entfernt");
        }
        entfernt
    }

    /// Sendet ein Ereignis an alle Verbindungen eines Kanals
    ///
    /// Gibt die Anzahl der erfolgreichen Sendungen zurueck. Nicht
    /// beschreibbare Verbindungen werden uebersprungen, der Fan-out
    /// bricht nie ab.
    pub fn an_kanal_senden(&self, kanal: &ChannelId, ereignis: ChatEvent) -> usize {
        let verbindungen = match self.inner.kanal_verbindungen.get(kanal) {
            Some(v) => v.clone(),
            None => return 0,
        };

        let mut gesendet = 0;
        for verbindung in &verbindungen {
            if verbindung.senden(ereignis.clone()) {
                gesendet += 1;
            }
        }
        gesendet
    }

    /// Sendet ein Ereignis an alle Verbindungen eines Kanals ausser einer
    ///
    /// Der Ausloeser bekommt kein Echo seines eigenen Ereignisses.
    pub fn an_kanal_ausser_senden(
        &self,
        kanal: &ChannelId,
        ausgeschlossen: &UserId,
        ereignis: ChatEvent,
    ) -> usize {
        let verbindungen = match self.inner.kanal_verbindungen.get(kanal) {
            Some(v) => v.clone(),
            None => return 0,
        };

        let mut gesendet = 0;
        for verbindung in &verbindungen {
            if &verbindung.user_id == ausgeschlossen {
                continue;
            }
            if verbindung.senden(ereignis.clone()) {
                gesendet += 1;
            }
        }
        gesendet
    }

    /// Gibt alle Teilnehmer-IDs in einem Kanal zurueck
    pub fn mitglieder(&self, kanal: &ChannelId) -> Vec<UserId> {
        self.inner
            .kanal_verbindungen
            .get(kanal)
            .map(|v| v.iter().map(|s| s.user_id).collect())
            .unwrap_or_default()
    }

    /// Prueft ob ein Teilnehmer in einem Kanal registriert ist
    pub fn ist_registriert(&self, kanal: &ChannelId, user_id: &UserId) -> bool {
        self.inner
            .kanal_verbindungen
            .get(kanal)
            .map(|v| v.iter().any(|s| &s.user_id == user_id))
            .unwrap_or(false)
    }

    /// Gibt die Anzahl der Kanaele mit mindestens einer Verbindung zurueck
    pub fn kanal_anzahl(&self) -> usize {
        self.inner.kanal_verbindungen.len()
    }
}

impl Default for KanalRegistry {
    fn default() -> Self {
        Self::neu()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
