//! Huddle Server – Einstiegspunkt

use huddle_server::{config::ServerConfig, Server};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config_pfad = std::env::var("HUDDLE_CONFIG").unwrap_or_else(|_| "config.toml".into());
    let config = ServerConfig::laden(&config_pfad)?;

    // RUST_LOG gewinnt gegen das konfigurierte Level
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.level));
    let fmt = tracing_subscriber::fmt().with_env_filter(filter).with_target(true);
    if config.logging.format == "json" {
        fmt.json().with_thread_ids(true).init();
    } else {
        fmt.init();
    }

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        config = %config_pfad,
        "Huddle Server startet"
    );

    Server::neu(config).starten().await
}
