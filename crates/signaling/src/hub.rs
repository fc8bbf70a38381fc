//! Signaling-Relay-Hub – Raum-Beitritte und gerichtetes Weiterleiten
//!
//! Der Hub ist die einzige Stelle, die Session- und Raum-Registry anfasst.
//! Jede Operation bleibt auf das ausloesende Ereignis beschraenkt: ein
//! fehlendes Relay-Ziel, ein Wieder-Beitritt oder ein Verlassen aus
//! abwesend sind stille No-ops, nie Fehler.

use std::sync::Arc;

use huddle_core::{RoomId, UserId};
use huddle_db::UserRepository;
use tokio::sync::mpsc;

use crate::rooms::RaumRegistry;
use crate::session::SessionRegistry;
use crate::types::{ServerSignal, SignalUmschlag};

/// Handle einer offenen Signaling-Session
///
/// Eine Session pro Client; sie kann ueber ihre Lebensdauer mehreren
/// Raeumen beitreten und sie wieder verlassen. `session_nr` identifiziert
/// genau diese Registrierung, damit der Teardown nach einem Reconnect
/// nicht den Nachfolger trifft.
#[derive(Debug, Clone)]
pub struct SignalSession {
    pub user_id: UserId,
    pub display_name: String,
    session_nr: u64,
}

/// Signaling-Relay-Hub
///
/// Generisch ueber das Benutzer-Gateway (Anzeige-Metadaten fuer
/// `user-joined`). Beide Registries sind injizierter Zustand des Hubs –
/// keine Modul-Globalen, mehrere Instanzen teilen nichts.
pub struct SignalingHub<R: UserRepository> {
    sessions: SessionRegistry,
    raeume: RaumRegistry,
    repo: Arc<R>,
}

impl<R: UserRepository> SignalingHub<R> {
    /// Erstellt einen neuen SignalingHub mit leeren Registries
    pub fn neu(repo: Arc<R>) -> Arc<Self> {
        Arc::new(Self {
            sessions: SessionRegistry::neu(),
            raeume: RaumRegistry::neu(),
            repo,
        })
    }

    /// Gibt die Raum-Registry zurueck
    pub fn raeume(&self) -> &RaumRegistry {
        &self.raeume
    }

    /// Gibt die Session-Registry zurueck
    pub fn sessions(&self) -> &SessionRegistry {
        &self.sessions
    }

    /// Oeffnet eine Signaling-Session und gibt ihre Empfangs-Queue zurueck
    pub fn session_oeffnen(
        &self,
        user_id: UserId,
        display_name: &str,
    ) -> (SignalSession, mpsc::Receiver<ServerSignal>) {
        let (session_nr, rx) = self.sessions.registrieren(user_id, display_name);
        tracing::info!(user_id = %user_id, "Signaling-Session geoeffnet");
        (
            SignalSession {
                user_id,
                display_name: display_name.to_string(),
                session_nr,
            },
            rx,
        )
    }

    /// Tritt einem Raum bei
    ///
    /// Bestehende Mitglieder bekommen `user-joined` mit den
    /// Anzeige-Metadaten aus dem Benutzer-Gateway; der Beitretende bekommt
    /// den `room-users`-Schnappschuss der *anderen* Mitglieder (er selbst
    /// steht nicht darin). Wieder-Beitritt ist idempotent.
    pub async fn raum_beitreten(&self, session: &SignalSession, raum: RoomId) {
        self.raeume.beitreten(&raum, session.user_id);
        let andere: Vec<UserId> = self
            .raeume
            .mitglieder(&raum)
            .into_iter()
            .filter(|id| id != &session.user_id)
            .collect();

        // Anzeige-Metadaten sind I/O – nur dieser Beitritt wartet darauf,
        // andere Raeume und Sessions laufen weiter
        let (display_name, avatar) = match self.repo.get_by_id(session.user_id).await {
            Ok(Some(benutzer)) => (benutzer.display_name, benutzer.avatar),
            Ok(None) => (session.display_name.clone(), None),
            Err(e) => {
                tracing::warn!(
                    user_id = %session.user_id,
                    fehler = %e,
                    "Benutzer-Metadaten nicht ladbar – Handshake-Name wird verwendet"
                );
                (session.display_name.clone(), None)
            }
        };

        for mitglied in &andere {
            self.sessions.an_session_senden(
                mitglied,
                ServerSignal::BenutzerBeigetreten {
                    room_id: raum.clone(),
                    participant_id: session.user_id,
                    display_name: display_name.clone(),
                    avatar: avatar.clone(),
                },
            );
        }

        self.sessions.an_session_senden(
            &session.user_id,
            ServerSignal::RaumMitglieder {
                room_id: raum.clone(),
                participant_ids: andere,
            },
        );

        tracing::info!(user_id = %session.user_id, raum = %raum, "Raum-Beitritt verarbeitet");
    }

    /// Leitet einen Umschlag an genau die Ziel-Session weiter
    ///
    /// Der Originator wird mit der Session-Identitaet gestempelt – ein vom
    /// Client behaupteter Wert zaehlt nicht. Ist das Ziel nicht (mehr)
    /// verbunden, verschwindet der Umschlag kommentarlos.
    pub fn weiterleiten(&self, session: &SignalSession, mut umschlag: SignalUmschlag) {
        umschlag.originator_id = Some(session.user_id);
        let ziel = umschlag.target_participant_id;

        let zugestellt = self
            .sessions
            .an_session_senden(&ziel, ServerSignal::Signal(umschlag));

        if !zugestellt {
            tracing::debug!(
                von = %session.user_id,
                ziel = %ziel,
                "Relay-Ziel nicht verbunden – Umschlag verworfen"
            );
        }
    }

    /// Verlaesst einen Raum und benachrichtigt die verbleibenden Mitglieder
    pub fn raum_verlassen(&self, session: &SignalSession, raum: &RoomId) {
        if !self.raeume.verlassen(raum, &session.user_id) {
            return;
        }

        for mitglied in self.raeume.mitglieder(raum) {
            self.sessions.an_session_senden(
                &mitglied,
                ServerSignal::BenutzerGegangen {
                    room_id: raum.clone(),
                    participant_id: session.user_id,
                },
            );
        }

        tracing::info!(user_id = %session.user_id, raum = %raum, "Raum verlassen");
    }

    /// Behandelt das Transport-Ende einer Session
    ///
    /// Jeder Raum, in dem der Teilnehmer steht, wird wie ein explizites
    /// Verlassen behandelt; danach faellt die Session aus der Registry.
    /// Unbedingt und idempotent – nach diesem Aufruf existiert garantiert
    /// kein verwaistes Mitglied mehr. Wurde die Session bereits durch
    /// einen Reconnect ersetzt, gehoeren Registry-Eintrag und
    /// Raum-Mitgliedschaften dem Nachfolger und bleiben unangetastet.
    pub fn trennen(&self, session: &SignalSession) {
        if !self.sessions.entfernen(&session.user_id, session.session_nr) {
            return;
        }
        for raum in self.raeume.raeume_von_teilnehmer(&session.user_id) {
            self.raum_verlassen(session, &raum);
        }
        tracing::info!(user_id = %session.user_id, "Signaling-Session getrennt");
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use huddle_db::{NeuerBenutzer, SqliteDb};
    use serde_json::json;

    async fn test_hub() -> Arc<SignalingHub<SqliteDb>> {
        let db = SqliteDb::in_memory()
            .await
            .expect("In-Memory-DB konnte nicht geoeffnet werden");
        SignalingHub::neu(Arc::new(db))
    }

    fn offer_an(ziel: UserId, raum: &str) -> SignalUmschlag {
        SignalUmschlag {
            typ: crate::types::SignalTyp::Offer,
            originator_id: None,
            target_participant_id: ziel,
            room_id: raum.into(),
            payload: json!({"sdp": "v=0"}),
        }
    }

    #[tokio::test]
    async fn szenario_raum_42() {
        let hub = test_hub().await;
        let (x, mut rx_x) = hub.session_oeffnen(UserId(1), "X");
        let (y, mut rx_y) = hub.session_oeffnen(UserId(2), "Y");

        // X tritt dem leeren Raum bei -> leerer Schnappschuss
        hub.raum_beitreten(&x, "42".into()).await;
        match rx_x.try_recv().unwrap() {
            ServerSignal::RaumMitglieder { participant_ids, .. } => {
                assert!(participant_ids.is_empty());
            }
            andere => panic!("Unerwartete Nachricht: {andere:?}"),
        }

        // Y tritt bei -> X sieht user-joined, Y bekommt Schnappschuss mit X
        hub.raum_beitreten(&y, "42".into()).await;
        assert!(matches!(
            rx_x.try_recv().unwrap(),
            ServerSignal::BenutzerBeigetreten { participant_id: UserId(2), .. }
        ));
        match rx_y.try_recv().unwrap() {
            ServerSignal::RaumMitglieder { participant_ids, .. } => {
                assert_eq!(participant_ids, vec![UserId(1)]);
            }
            andere => panic!("Unerwartete Nachricht: {andere:?}"),
        }

        // X trennt -> Y sieht user-left, Raum enthaelt nur noch Y
        hub.trennen(&x);
        assert!(matches!(
            rx_y.try_recv().unwrap(),
            ServerSignal::BenutzerGegangen { participant_id: UserId(1), .. }
        ));
        assert_eq!(hub.raeume().mitglieder(&"42".into()), vec![UserId(2)]);
    }

    #[tokio::test]
    async fn relay_erreicht_nur_das_ziel() {
        let hub = test_hub().await;
        let (x, _rx_x) = hub.session_oeffnen(UserId(1), "X");
        let (y, mut rx_y) = hub.session_oeffnen(UserId(2), "Y");
        let (z, mut rx_z) = hub.session_oeffnen(UserId(3), "Z");

        hub.raum_beitreten(&x, "42".into()).await;
        hub.raum_beitreten(&y, "42".into()).await;
        hub.raum_beitreten(&z, "42".into()).await;
        while rx_y.try_recv().is_ok() {}
        while rx_z.try_recv().is_ok() {}

        hub.weiterleiten(&x, offer_an(UserId(2), "42"));

        match rx_y.try_recv().unwrap() {
            ServerSignal::Signal(umschlag) => {
                assert_eq!(umschlag.originator_id, Some(UserId(1)));
                assert_eq!(umschlag.target_participant_id, UserId(2));
            }
            andere => panic!("Unerwartete Nachricht: {andere:?}"),
        }
        assert!(rx_z.try_recv().is_err(), "Z darf das Signal nie sehen");
    }

    #[tokio::test]
    async fn originator_wird_ueberschrieben() {
        let hub = test_hub().await;
        let (x, _rx_x) = hub.session_oeffnen(UserId(1), "X");
        let (_y, mut rx_y) = hub.session_oeffnen(UserId(2), "Y");

        // Client behauptet eine fremde Identitaet
        let mut umschlag = offer_an(UserId(2), "42");
        umschlag.originator_id = Some(UserId(999));
        hub.weiterleiten(&x, umschlag);

        match rx_y.try_recv().unwrap() {
            ServerSignal::Signal(u) => assert_eq!(u.originator_id, Some(UserId(1))),
            andere => panic!("Unerwartete Nachricht: {andere:?}"),
        }
    }

    #[tokio::test]
    async fn relay_an_getrenntes_ziel_verfaellt_still() {
        let hub = test_hub().await;
        let (x, mut rx_x) = hub.session_oeffnen(UserId(1), "X");

        // Ziel war nie verbunden – kein Fehler, keine Rueckmeldung
        hub.weiterleiten(&x, offer_an(UserId(2), "42"));
        assert!(rx_x.try_recv().is_err());
    }

    #[tokio::test]
    async fn wieder_beitritt_aendert_mitgliederzahl_nicht() {
        let hub = test_hub().await;
        let (x, _rx_x) = hub.session_oeffnen(UserId(1), "X");

        hub.raum_beitreten(&x, "42".into()).await;
        let nach_erstem = hub.raeume().mitglieder(&"42".into()).len();
        hub.raum_beitreten(&x, "42".into()).await;
        let nach_zweitem = hub.raeume().mitglieder(&"42".into()).len();

        assert_eq!(nach_erstem, nach_zweitem);
    }

    #[tokio::test]
    async fn trennen_raeumt_alle_raeume_auf() {
        let hub = test_hub().await;
        let (x, _rx_x) = hub.session_oeffnen(UserId(1), "X");
        let (y, mut rx_y) = hub.session_oeffnen(UserId(2), "Y");

        hub.raum_beitreten(&x, "a".into()).await;
        hub.raum_beitreten(&x, "b".into()).await;
        hub.raum_beitreten(&y, "b".into()).await;
        while rx_y.try_recv().is_ok() {}

        hub.trennen(&x);

        assert!(hub.raeume().mitglieder(&"a".into()).is_empty());
        assert_eq!(hub.raeume().mitglieder(&"b".into()), vec![UserId(2)]);
        assert!(!hub.sessions().ist_registriert(&UserId(1)));
        assert!(matches!(
            rx_y.try_recv().unwrap(),
            ServerSignal::BenutzerGegangen { participant_id: UserId(1), .. }
        ));
    }

    #[tokio::test]
    async fn reconnect_ueberlebt_teardown_der_alten_session() {
        let hub = test_hub().await;
        let (x_alt, _rx_alt) = hub.session_oeffnen(UserId(1), "X");
        let (x_neu, mut rx_neu) = hub.session_oeffnen(UserId(1), "X");
        let (y, _rx_y) = hub.session_oeffnen(UserId(2), "Y");

        hub.raum_beitreten(&x_neu, "42".into()).await;
        while rx_neu.try_recv().is_ok() {}

        // Der alte Transport schliesst erst nach dem Reconnect
        hub.trennen(&x_alt);

        assert!(
            hub.sessions().ist_registriert(&UserId(1)),
            "Nachfolger-Session bleibt registriert"
        );
        assert_eq!(
            hub.raeume().mitglieder(&"42".into()),
            vec![UserId(1)],
            "Raum-Mitgliedschaft gehoert dem Nachfolger"
        );

        hub.weiterleiten(&y, offer_an(UserId(1), "42"));
        assert!(
            matches!(rx_neu.try_recv().unwrap(), ServerSignal::Signal(_)),
            "Nachfolger empfaengt weiter"
        );
    }

    #[tokio::test]
    async fn doppeltes_trennen_ist_harmlos() {
        let hub = test_hub().await;
        let (x, _rx_x) = hub.session_oeffnen(UserId(1), "X");
        hub.raum_beitreten(&x, "42".into()).await;

        hub.trennen(&x);
        hub.trennen(&x);

        assert_eq!(hub.raeume().raum_anzahl(), 0);
    }

    #[tokio::test]
    async fn user_joined_traegt_metadaten_aus_dem_gateway() {
        let db = Arc::new(SqliteDb::in_memory().await.unwrap());
        let angelegt = huddle_db::UserRepository::create(
            db.as_ref(),
            NeuerBenutzer {
                display_name: "Alice Admin",
                avatar: Some("alice.png"),
            },
        )
        .await
        .unwrap();
        let hub = SignalingHub::neu(db);

        let (x, _rx_x) = hub.session_oeffnen(angelegt.id, "alice-handshake");
        let (y, mut rx_y) = hub.session_oeffnen(UserId(777), "Y");
        hub.raum_beitreten(&y, "42".into()).await;
        while rx_y.try_recv().is_ok() {}

        hub.raum_beitreten(&x, "42".into()).await;

        match rx_y.try_recv().unwrap() {
            ServerSignal::BenutzerBeigetreten {
                display_name,
                avatar,
                ..
            } => {
                assert_eq!(display_name, "Alice Admin");
                assert_eq!(avatar.as_deref(), Some("alice.png"));
            }
            andere => panic!("Unerwartete Nachricht: {andere:?}"),
        }
    }

    #[tokio::test]
    async fn unbekannter_benutzer_faellt_auf_handshake_namen_zurueck() {
        let hub = test_hub().await;
        let (x, _rx_x) = hub.session_oeffnen(UserId(1), "X-Handshake");
        let (y, mut rx_y) = hub.session_oeffnen(UserId(2), "Y");
        hub.raum_beitreten(&y, "42".into()).await;
        while rx_y.try_recv().is_ok() {}

        hub.raum_beitreten(&x, "42".into()).await;

        match rx_y.try_recv().unwrap() {
            ServerSignal::BenutzerBeigetreten { display_name, .. } => {
                assert_eq!(display_name, "X-Handshake");
            }
            andere => panic!("Unerwartete Nachricht: {andere:?}"),
        }
    }
}
