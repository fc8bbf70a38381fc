//! Raum-Registry – Mitgliedschafts-Buchfuehrung fuer Anruf-Raeume
//!
//! Raeume entstehen implizit beim ersten Beitritt und verschwinden
//! implizit wenn das letzte Mitglied geht. Pro (Teilnehmer, Raum) gibt es
//! genau zwei Zustaende: abwesend oder beigetreten. Wiederholter Beitritt
//! bleibt beigetreten (idempotent), Verlassen aus abwesend ist ein No-op.

use dashmap::DashMap;
use huddle_core::{RoomId, UserId};
use std::sync::Arc;

/// Prozessweite Tabelle: Raum -> Mitglieder
///
/// Thread-safe via Arc + DashMap. Clone teilt den inneren Zustand. Rein
/// ephemer – nach einem Neustart sind alle Raeume leer.
#[derive(Clone)]
pub struct RaumRegistry {
    inner: Arc<RaumRegistryInner>,
}

struct RaumRegistryInner {
    mitglieder: DashMap<RoomId, Vec<UserId>>,
}

impl RaumRegistry {
    /// Erstellt eine neue, leere Registry
    pub fn neu() -> Self {
        Self {
            inner: Arc::new(RaumRegistryInner {
                mitglieder: DashMap::new(),
            }),
        }
    }

    /// Fuegt einen Teilnehmer einem Raum hinzu
    ///
    /// Gibt `true` zurueck wenn der Teilnehmer neu ist, `false` bei
    /// idempotentem Wieder-Beitritt (Mitgliederzahl bleibt gleich).
    pub fn beitreten(&self, raum: &RoomId, user_id: UserId) -> bool {
        let mut eintrag = self.inner.mitglieder.entry(raum.clone()).or_default();
        if eintrag.contains(&user_id) {
            return false;
        }
        eintrag.push(user_id);
        tracing::debug!(user_id = %user_id, raum = %raum, "Raum beigetreten");
        true
    }

    /// Entfernt einen Teilnehmer aus einem Raum
    ///
    /// Gibt `true` zurueck wenn er Mitglied war. Leer gewordene Raeume
    /// werden entfernt.
    pub fn verlassen(&self, raum: &RoomId, user_id: &UserId) -> bool {
        let war_mitglied = match self.inner.mitglieder.get_mut(raum) {
            Some(mut eintrag) => {
                let vorher = eintrag.len();
                eintrag.retain(|uid| uid != user_id);
                let ist_leer = eintrag.is_empty();
                let entfernt = eintrag.len() < vorher;
                drop(eintrag);
                if ist_leer {
                    self.inner.mitglieder.remove(raum);
                }
                entfernt
            }
            None => false,
        };

        if war_mitglied {
            tracing::debug!(user_id = %user_id, raum = %raum, "Raum verlassen");
        }
        war_mitglied
    }

    /// Gibt die Mitglieder eines Raums zurueck
    pub fn mitglieder(&self, raum: &RoomId) -> Vec<UserId> {
        self.inner
            .mitglieder
            .get(raum)
            .map(|m| m.clone())
            .unwrap_or_default()
    }

    /// Gibt alle Raeume zurueck in denen ein Teilnehmer Mitglied ist
    ///
    /// Grundlage des Disconnect-Sweeps: beim Transport-Ende wird jeder
    /// dieser Raeume wie ein explizites Verlassen behandelt.
    pub fn raeume_von_teilnehmer(&self, user_id: &UserId) -> Vec<RoomId> {
        self.inner
            .mitglieder
            .iter()
            .filter(|eintrag| eintrag.value().contains(user_id))
            .map(|eintrag| eintrag.key().clone())
            .collect()
    }

    /// Gibt die Anzahl der nicht-leeren Raeume zurueck
    pub fn raum_anzahl(&self) -> usize {
        self.inner.mitglieder.len()
    }
}

impl Default for RaumRegistry {
    fn default() -> Self {
        Self::neu()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn beitreten_und_verlassen() {
        let registry = RaumRegistry::neu();
        let raum: RoomId = "42".into();

        assert!(registry.beitreten(&raum, UserId(1)));
        assert_eq!(registry.mitglieder(&raum), vec![UserId(1)]);

        assert!(registry.verlassen(&raum, &UserId(1)));
        assert!(registry.mitglieder(&raum).is_empty());
    }

    #[test]
    fn wieder_beitritt_ist_idempotent() {
        let registry = RaumRegistry::neu();
        let raum: RoomId = "42".into();

        assert!(registry.beitreten(&raum, UserId(1)));
        assert!(!registry.beitreten(&raum, UserId(1)));
        assert_eq!(registry.mitglieder(&raum).len(), 1);
    }

    #[test]
    fn leerer_raum_wird_entfernt() {
        let registry = RaumRegistry::neu();
        let raum: RoomId = "42".into();

        registry.beitreten(&raum, UserId(1));
        assert_eq!(registry.raum_anzahl(), 1);

        registry.verlassen(&raum, &UserId(1));
        assert_eq!(registry.raum_anzahl(), 0);
    }

    #[test]
    fn verlassen_aus_abwesend_ist_noop() {
        let registry = RaumRegistry::neu();
        let raum: RoomId = "42".into();

        assert!(!registry.verlassen(&raum, &UserId(1)));

        registry.beitreten(&raum, UserId(2));
        assert!(!registry.verlassen(&raum, &UserId(1)));
        assert_eq!(registry.mitglieder(&raum), vec![UserId(2)]);
    }

    #[test]
    fn raeume_von_teilnehmer_findet_alle() {
        let registry = RaumRegistry::neu();

        registry.beitreten(&"a".into(), UserId(1));
        registry.beitreten(&"b".into(), UserId(1));
        registry.beitreten(&"c".into(), UserId(2));

        let mut raeume = registry.raeume_von_teilnehmer(&UserId(1));
        raeume.sort();
        assert_eq!(raeume, vec![RoomId::neu("a"), RoomId::neu("b")]);
    }

    #[test]
    fn clone_teilt_inneren_state() {
        let r1 = RaumRegistry::neu();
        let r2 = r1.clone();

        r1.beitreten(&"42".into(), UserId(1));
        assert_eq!(r2.mitglieder(&"42".into()), vec![UserId(1)]);
    }
}
