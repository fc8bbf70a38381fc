//! Chat-Broadcast-Hub – Ereignisse entgegennehmen, persistieren, verteilen
//!
//! Der Hub ist die einzige Stelle, die die KanalRegistry mutiert oder
//! liest. Pro Verbindung laeuft ein eigener Task, der eingehende
//! Ereignisse strikt sequenziell durch `ereignis_verarbeiten` schickt –
//! dadurch gilt persist-vor-broadcast und FIFO pro Absender, ohne dass
//! Kanaele sich gegenseitig blockieren.
//!
//! Fehlerpolitik: nichts wird wiederholt, nichts ist fatal. Eine
//! Protokollverletzung oder ein Persistenz-Fehler verwirft genau das
//! betroffene Ereignis; der Absender bekommt keine Rueckmeldung
//! (Fire-and-forget-Transport).

use std::sync::Arc;

use huddle_core::{ChannelId, UserId};
use huddle_db::{ChatMessageRepository, NeueNachricht};
use tokio::sync::mpsc;

use crate::error::{ChatError, ChatResult};
use crate::registry::KanalRegistry;
use crate::types::{ChatEvent, ClientChatEvent};

/// Maximale Nachrichtenlaenge in Zeichen
const MAX_INHALT_LAENGE: usize = 4096;

/// Handle einer offenen Chat-Verbindung
///
/// Traegt die beim Handshake mitgegebene Identitaet und den gebundenen
/// Kanal. Der Kanal aendert sich fuer die Lebensdauer der Verbindung
/// nicht mehr. `verbindungs_nr` identifiziert genau diese Registrierung,
/// damit der Teardown nach einem Reconnect nicht den Nachfolger trifft.
#[derive(Debug, Clone)]
pub struct ChatVerbindung {
    pub user_id: UserId,
    pub display_name: String,
    pub channel_id: ChannelId,
    verbindungs_nr: u64,
}

/// Chat-Broadcast-Hub
///
/// Generisch ueber das Persistenz-Gateway, damit Tests den Speicher
/// austauschen koennen. Die Registry wird injiziert gehalten statt als
/// globaler Zustand – mehrere Hub-Instanzen teilen nichts.
pub struct ChatHub<R: ChatMessageRepository> {
    registry: KanalRegistry,
    repo: Arc<R>,
}

impl<R: ChatMessageRepository> ChatHub<R> {
    /// Erstellt einen neuen ChatHub mit leerer Registry
    pub fn neu(repo: Arc<R>) -> Arc<Self> {
        Arc::new(Self {
            registry: KanalRegistry::neu(),
            repo,
        })
    }

    /// Gibt die Kanal-Registry zurueck
    pub fn registry(&self) -> &KanalRegistry {
        &self.registry
    }

    /// Registriert eine neue Verbindung in ihrem Kanal
    ///
    /// Alle *anderen* Kanal-Mitglieder bekommen sofort ein `join`-Ereignis;
    /// die beitretende Verbindung selbst wird nicht benachrichtigt.
    /// Schlaegt nie fehl.
    pub fn verbinden(
        &self,
        user_id: UserId,
        display_name: &str,
        kanal: ChannelId,
    ) -> (ChatVerbindung, mpsc::Receiver<ChatEvent>) {
        let (verbindungs_nr, rx) = self.registry.registrieren(&kanal, user_id, display_name);

        self.registry.an_kanal_ausser_senden(
            &kanal,
            &user_id,
            ChatEvent::Beigetreten {
                channel_id: kanal.clone(),
                participant_id: user_id,
                display_name: display_name.to_string(),
            },
        );

        tracing::info!(user_id = %user_id, kanal = %kanal, "Chat-Verbindung aufgebaut");

        let verbindung = ChatVerbindung {
            user_id,
            display_name: display_name.to_string(),
            channel_id: kanal,
            verbindungs_nr,
        };
        (verbindung, rx)
    }

    /// Verarbeitet ein eingehendes Client-Ereignis
    ///
    /// Fehler werden hier geloggt und verschluckt – das Ereignis ist dann
    /// einfach weg, genau wie der Vertrag es vorsieht.
    pub async fn ereignis_verarbeiten(&self, verbindung: &ChatVerbindung, ereignis: ClientChatEvent) {
        let ergebnis = match ereignis {
            ClientChatEvent::Nachricht { channel_id, content } => {
                self.nachricht_verarbeiten(verbindung, channel_id, content).await
            }
            ClientChatEvent::Tippt { channel_id } => {
                self.tippt_verarbeiten(verbindung, channel_id)
            }
            // Hub-erzeugte Arten vom Client sind Protokollrauschen
            ClientChatEvent::Beigetreten {} => Err(ChatError::UnerwartetesEreignis("join")),
            ClientChatEvent::Verlassen {} => Err(ChatError::UnerwartetesEreignis("leave")),
        };

        match ergebnis {
            Ok(()) => {}
            Err(e @ ChatError::Datenbank(_)) => {
                tracing::warn!(
                    user_id = %verbindung.user_id,
                    kanal = %verbindung.channel_id,
                    fehler = %e,
                    "Nachricht nicht persistiert – Broadcast entfaellt"
                );
            }
            Err(e) => {
                tracing::debug!(
                    user_id = %verbindung.user_id,
                    kanal = %verbindung.channel_id,
                    fehler = %e,
                    "Client-Ereignis verworfen"
                );
            }
        }
    }

    /// Entfernt eine Verbindung und benachrichtigt die verbleibenden Mitglieder
    ///
    /// Wird beim Transport-Ende bedingungslos aufgerufen; doppelte Aufrufe
    /// sind harmlos. Gehoert der Registry-Eintrag inzwischen einer
    /// Nachfolger-Verbindung desselben Teilnehmers (Reconnect vor dem
    /// Schliessen des alten Transports), bleibt er stehen und es gibt
    /// kein `leave`.
    pub fn trennen(&self, verbindung: &ChatVerbindung) {
        if !self.registry.entfernen(
            &verbindung.channel_id,
            &verbindung.user_id,
            verbindung.verbindungs_nr,
        ) {
            return;
        }

        self.registry.an_kanal_senden(
            &verbindung.channel_id,
            ChatEvent::Verlassen {
                channel_id: verbindung.channel_id.clone(),
                participant_id: verbindung.user_id,
                display_name: verbindung.display_name.clone(),
            },
        );

        tracing::info!(
            user_id = %verbindung.user_id,
            kanal = %verbindung.channel_id,
            "Chat-Verbindung getrennt"
        );
    }

    // -----------------------------------------------------------------------
    // Interne Ereignis-Handler
    // -----------------------------------------------------------------------

    /// `message`: erst persistieren, dann an alle anderen verteilen
    async fn nachricht_verarbeiten(
        &self,
        verbindung: &ChatVerbindung,
        gemeldeter_kanal: ChannelId,
        content: String,
    ) -> ChatResult<()> {
        if content.trim().is_empty() {
            return Err(ChatError::LeererInhalt);
        }
        if content.chars().count() > MAX_INHALT_LAENGE {
            return Err(ChatError::InhaltZuLang {
                len: content.chars().count(),
                max: MAX_INHALT_LAENGE,
            });
        }
        // Der gemeldete Kanal muss dem gebundenen entsprechen, sonst ist
        // das Ereignis eine Protokollverletzung
        if gemeldeter_kanal != verbindung.channel_id {
            return Err(ChatError::KanalKonflikt {
                gemeldet: gemeldeter_kanal,
                gebunden: verbindung.channel_id.clone(),
            });
        }

        let record = self
            .repo
            .create(NeueNachricht {
                channel_id: &verbindung.channel_id,
                author_id: verbindung.user_id,
                content: &content,
            })
            .await?;

        // Erst nach erfolgreicher Persistenz sieht irgendein Peer die Nachricht
        self.registry.an_kanal_ausser_senden(
            &verbindung.channel_id,
            &verbindung.user_id,
            ChatEvent::Nachricht {
                channel_id: verbindung.channel_id.clone(),
                participant_id: verbindung.user_id,
                display_name: verbindung.display_name.clone(),
                content: record.content,
            },
        );

        tracing::debug!(
            user_id = %verbindung.user_id,
            kanal = %verbindung.channel_id,
            message_id = record.id,
            "Chat-Nachricht verteilt"
        );
        Ok(())
    }

    /// `typing`: sofort verteilen, nie persistieren
    fn tippt_verarbeiten(
        &self,
        verbindung: &ChatVerbindung,
        gemeldeter_kanal: ChannelId,
    ) -> ChatResult<()> {
        if gemeldeter_kanal != verbindung.channel_id {
            return Err(ChatError::KanalKonflikt {
                gemeldet: gemeldeter_kanal,
                gebunden: verbindung.channel_id.clone(),
            });
        }

        self.registry.an_kanal_ausser_senden(
            &verbindung.channel_id,
            &verbindung.user_id,
            ChatEvent::Tippt {
                channel_id: verbindung.channel_id.clone(),
                participant_id: verbindung.user_id,
                display_name: verbindung.display_name.clone(),
            },
        );
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
