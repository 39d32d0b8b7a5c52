//! Bot initialization.

use crate::app::BotState;
use card_command_dispatch::LaneRouter;
use cardbot_config_and_utils::{Config, Paths};
use chat_session_gateway::GatewayServer;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{error, info, warn};

/// Run the bot until Ctrl-C or until the gateway stops.
pub async fn run_bot(config: Config, paths: Paths) -> Result<(), Box<dyn std::error::Error>> {
    // Singleton enforcement: a live gateway socket means another bot owns it
    let socket_path = paths.gateway_socket_file();
    if GatewayServer::is_listening(&socket_path).await {
        return Err(format!(
            "Bot is already running (gateway socket {} is accepting connections)",
            socket_path.display()
        )
        .into());
    }
    if socket_path.exists() {
        warn!(path = %socket_path.display(), "Removing stale gateway socket");
        let _ = std::fs::remove_file(&socket_path);
    }

    info!("Starting cardbot");
    info!(
        bot_identity = ?config.bot_identity,
        lane_idle_timeout_secs = config.lane_idle_timeout_secs,
        reply_queue_capacity = config.reply_queue_capacity,
        "Configuration loaded"
    );

    let state = BotState::open(config, paths).await?;

    let pid = std::process::id();
    std::fs::write(state.paths.pid_file(), pid.to_string())?;
    info!(pid = pid, "Bot started");

    let gateway = Arc::new(GatewayServer::new(
        &socket_path.to_string_lossy(),
        state.config.reply_queue_capacity,
    ));
    let (events_tx, events_rx) = mpsc::channel(state.config.reply_queue_capacity);

    let router = LaneRouter::new(
        Arc::new(state.dispatcher()),
        state.config.lane_idle_timeout(),
    );
    let dispatcher_task = tokio::spawn(router.run(events_rx));

    let shutdown_tx = gateway.shutdown_sender();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => info!("Received Ctrl-C, shutting down"),
            Err(e) => error!(error = %e, "Failed to listen for Ctrl-C, shutting down"),
        }
        let _ = shutdown_tx.send(());
    });

    let result = gateway.run(events_tx).await;

    // Bridge connections close on shutdown, which ends the router's event stream.
    let _ = dispatcher_task.await;
    if let Err(e) = state.catalog.database().clone().close().await {
        warn!(error = %e, "Failed to close card database");
    }
    cleanup(&state);

    result.map_err(|e| format!("Gateway failed: {}", e))?;
    info!("Cardbot stopped");
    Ok(())
}

fn cleanup(state: &BotState) {
    let _ = std::fs::remove_file(state.paths.pid_file());
    let _ = std::fs::remove_file(state.paths.gateway_socket_file());
}
