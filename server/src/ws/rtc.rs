//! Signaling-Grenze – eine WebSocket-Session pro Client
//!
//! Eine Session kann ueber ihre Lebensdauer mehreren Anruf-Raeumen
//! beitreten. Stirbt der Transport ohne explizites leave-room, raeumt
//! `trennen` jeden dieser Raeume auf.

use axum::{
    extract::{
        ws::{Message, WebSocket},
        Query, State, WebSocketUpgrade,
    },
    response::IntoResponse,
};
use futures_util::{SinkExt, StreamExt};
use huddle_core::UserId;
use huddle_signaling::ClientSignal;
use serde::Deserialize;

use crate::AppState;

/// Handshake-Identifikation der Signaling-Grenze (client-behauptet)
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RtcAnmeldung {
    pub participant_id: i64,
    pub display_name: String,
}

/// `GET /ws/rtc?participantId=..&displayName=..`
pub async fn rtc_ws(
    State(state): State<AppState>,
    Query(anmeldung): Query<RtcAnmeldung>,
    ws: WebSocketUpgrade,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| rtc_session(socket, state, anmeldung))
}

/// Verarbeitet eine Signaling-Session bis zum Transport-Ende
async fn rtc_session(socket: WebSocket, state: AppState, anmeldung: RtcAnmeldung) {
    let (session, mut signal_rx) = state
        .signaling_hub
        .session_oeffnen(UserId(anmeldung.participant_id), &anmeldung.display_name);

    let (mut sender, mut receiver) = socket.split();

    // Hub-Queue -> Socket
    let sende_task = tokio::spawn(async move {
        while let Some(signal) = signal_rx.recv().await {
            let Ok(text) = serde_json::to_string(&signal) else {
                continue;
            };
            if sender.send(Message::Text(text)).await.is_err() {
                break;
            }
        }
    });

    // Socket -> Hub
    while let Some(Ok(nachricht)) = receiver.next().await {
        let Message::Text(text) = nachricht else {
            continue;
        };
        let signal: ClientSignal = match serde_json::from_str(&text) {
            Ok(s) => s,
            Err(e) => {
                tracing::debug!(
                    user_id = %session.user_id,
                    fehler = %e,
                    "Unparsebares Signal verworfen"
                );
                continue;
            }
        };

        match signal {
            ClientSignal::RaumBeitreten { room_id } => {
                state.signaling_hub.raum_beitreten(&session, room_id).await;
            }
            ClientSignal::RaumVerlassen { room_id } => {
                state.signaling_hub.raum_verlassen(&session, &room_id);
            }
            ClientSignal::Signal(umschlag) => {
                state.signaling_hub.weiterleiten(&session, umschlag);
            }
        }
    }

    // Impliziter Disconnect wirkt wie leave-room fuer jeden Raum
    state.signaling_hub.trennen(&session);
    sende_task.abort();
}
