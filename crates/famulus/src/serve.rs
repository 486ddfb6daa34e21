// SPDX-FileCopyrightText: 2026 Famulus Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `famulus serve` command implementation.
//!
//! Starts the full agent: SQLite store, WhatsApp bridge channel, the
//! weather/TTS/exec/mail service adapters, the axum gateway, and the
//! event router. Supports graceful shutdown via signal handlers.

use std::sync::Arc;
use std::time::Instant;

use tracing::{error, info};

use famulus_agent::{bootstrap, shutdown, AgentContext, AgentRouter, Services};
use famulus_config::FamulusConfig;
use famulus_core::{FamulusError, StoreAdapter};
use famulus_exec::Piston;
use famulus_gateway::GatewayState;
use famulus_mail::SmtpMailer;
use famulus_store::SqliteStore;
use famulus_tts::VoiceRss;
use famulus_weather::OpenWeather;
use famulus_whatsapp::WhatsAppChannel;

/// Runs the `famulus serve` command.
///
/// Initializes storage and adapters, establishes the channel session
/// (credential resume or fresh QR pairing), spawns the HTTP gateway, and
/// enters the event router loop until a shutdown signal arrives or the
/// transport rejects re-authentication.
pub async fn run_serve(config: FamulusConfig) -> Result<(), FamulusError> {
    init_tracing(&config.agent.log_level);

    info!("starting famulus serve");

    let started_at = Instant::now();

    // Initialize storage.
    let store = {
        let store = SqliteStore::new(config.storage.clone());
        store.initialize().await?;
        Arc::new(store)
    };

    // Establish the channel session before anything may send through it.
    let mut channel = WhatsAppChannel::new(config.whatsapp.clone());
    bootstrap::establish(
        &mut channel,
        store.as_ref(),
        config.agent.owner.as_deref(),
        started_at,
    )
    .await?;

    // Service adapters. A missing weather/TTS/mail credential leaves the
    // adapter constructable but degraded; failures surface per call.
    let services = Services {
        weather: Arc::new(OpenWeather::new(&config.weather)?),
        speech: Arc::new(VoiceRss::new(&config.tts)?),
        exec: Arc::new(Piston::new(&config.exec)?),
        mail: Arc::new(SmtpMailer::new(&config.mail)?),
    };

    let ctx = Arc::new(AgentContext::new(
        Arc::new(channel),
        store,
        services,
        config,
        started_at,
    ));

    // Install signal handler.
    let cancel = shutdown::install_signal_handler();

    // Spawn the HTTP gateway.
    {
        let state = GatewayState { ctx: ctx.clone() };
        tokio::spawn(async move {
            if let Err(e) = famulus_gateway::start_server(state).await {
                error!(error = %e, "gateway server stopped");
            }
        });
    }

    // Run the event router until cancellation or a fatal channel error.
    let mut router = AgentRouter::new(ctx);
    router.run(cancel).await?;

    info!("famulus serve shutdown complete");
    Ok(())
}

/// Initializes the tracing subscriber with the given log level.
///
/// `RUST_LOG` wins when set; otherwise the configured level applies to
/// every crate in the process.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .init();
}
