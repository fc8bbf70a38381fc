//! Chat-Grenze – eine WebSocket-Verbindung pro Client und Kanal
//!
//! Der Handshake traegt die Identitaet als Query-Parameter; danach
//! fliessen JSON-Ereignisse in beide Richtungen. Eine Verbindung bleibt
//! fuer ihre gesamte Lebensdauer an einen Kanal gebunden – Kanalwechsel
//! heisst trennen und neu verbinden.

use axum::{
    extract::{
        ws::{Message, WebSocket},
        Query, State, WebSocketUpgrade,
    },
    response::IntoResponse,
};
use futures_util::{SinkExt, StreamExt};
use huddle_chat::ClientChatEvent;
use huddle_core::{ChannelId, UserId};
use serde::Deserialize;

use crate::AppState;

/// Handshake-Identifikation der Chat-Grenze (client-behauptet)
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatAnmeldung {
    pub participant_id: i64,
    pub display_name: String,
    pub channel_id: String,
}

/// `GET /ws/chat?participantId=..&displayName=..&channelId=..`
pub async fn chat_ws(
    State(state): State<AppState>,
    Query(anmeldung): Query<ChatAnmeldung>,
    ws: WebSocketUpgrade,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| chat_verbindung(socket, state, anmeldung))
}

/// Verarbeitet eine Chat-Verbindung bis zum Transport-Ende
async fn chat_verbindung(socket: WebSocket, state: AppState, anmeldung: ChatAnmeldung) {
    let (verbindung, mut ereignis_rx) = state.chat_hub.verbinden(
        UserId(anmeldung.participant_id),
        &anmeldung.display_name,
        ChannelId::neu(anmeldung.channel_id),
    );

    let (mut sender, mut receiver) = socket.split();

    // Hub-Queue -> Socket
    let sende_task = tokio::spawn(async move {
        while let Some(ereignis) = ereignis_rx.recv().await {
            let Ok(text) = serde_json::to_string(&ereignis) else {
                continue;
            };
            if sender.send(Message::Text(text)).await.is_err() {
                break;
            }
        }
    });

    // Socket -> Hub, strikt sequenziell pro Verbindung (FIFO pro Absender)
    while let Some(Ok(nachricht)) = receiver.next().await {
        let Message::Text(text) = nachricht else {
            continue;
        };
        let ereignis: ClientChatEvent = match serde_json::from_str(&text) {
            Ok(e) => e,
            Err(e) => {
                tracing::debug!(
                    user_id = %verbindung.user_id,
                    fehler = %e,
                    "Unparsebares Chat-Ereignis verworfen"
                );
                continue;
            }
        };
        state.chat_hub.ereignis_verarbeiten(&verbindung, ereignis).await;
    }

    // Teardown: Cleanup ist bedingungslos, kein Registry-Eintrag ueberlebt
    // die Verbindung
    state.chat_hub.trennen(&verbindung);
    sende_task.abort();
}
