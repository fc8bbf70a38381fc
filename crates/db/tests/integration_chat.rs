//! Integrationstests fuer das ChatMessageRepository (In-Memory-SQLite)

use huddle_core::{ChannelId, UserId};
use huddle_db::{ChatMessageRepository, NachrichtenFilter, NeueNachricht, SqliteDb};

async fn test_db() -> SqliteDb {
    SqliteDb::in_memory()
        .await
        .expect("In-Memory-DB konnte nicht geoeffnet werden")
}

#[tokio::test]
async fn nachricht_anlegen_und_lesen() {
    let db = test_db().await;
    let kanal = ChannelId::neu("general");

    let record = db
        .create(NeueNachricht {
            channel_id: &kanal,
            author_id: UserId(1),
            content: "hello",
        })
        .await
        .expect("Nachricht anlegen fehlgeschlagen");

    assert_eq!(record.content, "hello");
    assert_eq!(record.channel_id, kanal);
    assert_eq!(record.author_id, UserId(1));
    assert!(record.id > 0);

    let history = db
        .get_history(NachrichtenFilter {
            channel_id: kanal,
            before: None,
            limit: None,
        })
        .await
        .expect("History laden fehlgeschlagen");

    assert_eq!(history.len(), 1);
    assert_eq!(history[0].id, record.id);
    assert_eq!(history[0].content, "hello");
}

#[tokio::test]
async fn leerer_inhalt_wird_abgelehnt() {
    let db = test_db().await;
    let kanal = ChannelId::neu("general");

    let ergebnis = db
        .create(NeueNachricht {
            channel_id: &kanal,
            author_id: UserId(1),
            content: "   ",
        })
        .await;

    assert!(ergebnis.is_err(), "Leerer Inhalt darf nicht persistiert werden");
}

#[tokio::test]
async fn history_ist_kanal_getrennt() {
    let db = test_db().await;
    let general = ChannelId::neu("general");
    let random = ChannelId::neu("random");

    for inhalt in ["eins", "zwei"] {
        db.create(NeueNachricht {
            channel_id: &general,
            author_id: UserId(1),
            content: inhalt,
        })
        .await
        .unwrap();
    }
    db.create(NeueNachricht {
        channel_id: &random,
        author_id: UserId(2),
        content: "drei",
    })
    .await
    .unwrap();

    let history = db
        .get_history(NachrichtenFilter {
            channel_id: general,
            before: None,
            limit: None,
        })
        .await
        .unwrap();

    assert_eq!(history.len(), 2);
    assert!(history.iter().all(|n| n.author_id == UserId(1)));
}

#[tokio::test]
async fn history_limit_wird_beachtet() {
    let db = test_db().await;
    let kanal = ChannelId::neu("general");

    for i in 0..5 {
        db.create(NeueNachricht {
            channel_id: &kanal,
            author_id: UserId(1),
            content: &format!("nachricht {i}"),
        })
        .await
        .unwrap();
    }

    let history = db
        .get_history(NachrichtenFilter {
            channel_id: kanal,
            before: None,
            limit: Some(3),
        })
        .await
        .unwrap();

    assert_eq!(history.len(), 3);
}
