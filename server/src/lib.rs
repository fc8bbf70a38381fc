//! huddle-server – HTTP/WebSocket-Schicht ueber den Realtime-Hubs
//!
//! Zwei unabhaengige verbindungsorientierte Grenzen:
//! - `GET /ws/chat` – eine Chat-Verbindung pro Client und Kanal
//! - `GET /ws/rtc`  – eine Signaling-Session pro Client
//!
//! Die Identitaet (`participantId`, `displayName`) kommt als
//! Query-Parameter vom Client – unverifiziert, wie im Vertrag vermerkt.
//! Pro Verbindung laeuft ein eigener tokio-Task; der Registry-Cleanup am
//! Task-Ende ist bedingungslos.

pub mod config;
pub mod ws;

use std::sync::Arc;

use axum::{routing::get, Router};
use huddle_chat::ChatHub;
use huddle_db::{DatabaseConfig, SqliteDb};
use huddle_signaling::SignalingHub;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::config::ServerConfig;

/// Geteilter Anwendungszustand fuer alle Handler
#[derive(Clone)]
pub struct AppState {
    pub chat_hub: Arc<ChatHub<SqliteDb>>,
    pub signaling_hub: Arc<SignalingHub<SqliteDb>>,
}

/// Der Huddle Realtime-Server
pub struct Server {
    config: ServerConfig,
}

impl Server {
    /// Erstellt einen neuen Server mit der gegebenen Konfiguration
    pub fn neu(config: ServerConfig) -> Self {
        Self { config }
    }

    /// Startet den Server und laeuft bis zum Shutdown-Signal
    pub async fn starten(self) -> anyhow::Result<()> {
        let db = Arc::new(
            SqliteDb::oeffnen(&DatabaseConfig {
                url: self.config.datenbank.url.clone(),
                max_verbindungen: self.config.datenbank.max_verbindungen,
                sqlite_wal: self.config.datenbank.wal,
            })
            .await?,
        );

        let state = AppState {
            chat_hub: ChatHub::neu(db.clone()),
            signaling_hub: SignalingHub::neu(db),
        };

        let app = router(state);

        let adresse = format!(
            "{}:{}",
            self.config.netzwerk.bind_adresse, self.config.netzwerk.port
        );
        let listener = tokio::net::TcpListener::bind(&adresse).await?;
        tracing::info!(adresse = %adresse, name = %self.config.server.name, "Huddle Server lauscht");

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Huddle Server beendet");
        Ok(())
    }
}

/// Baut den axum-Router mit beiden WebSocket-Grenzen
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/ws/chat", get(ws::chat::chat_ws))
        .route("/ws/rtc", get(ws::rtc::rtc_ws))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Health-Check fuer Deployment-Probes
async fn health() -> &'static str {
    "ok"
}

/// Wartet auf Ctrl-C
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(fehler = %e, "Shutdown-Signal nicht verfuegbar");
    } else {
        tracing::info!("Shutdown-Signal empfangen");
    }
}
