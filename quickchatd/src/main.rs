//! Quickchat Daemon - Main Entry Point
//!
//! Listens for D-pad combos on connected game controllers and types the
//! matching quickchat message into the game through a virtual keyboard.
//! The PS button toggles macros on and off.

use quickchat_common::{tracing, unix_now};
use quickchatd::{chat, config, device, macro_engine, picker, variations};
use std::sync::Arc;
use tokio::time::Duration;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration before logging so the configured level applies
    let mut config_manager = config::ConfigManager::new();
    if let Err(e) = config_manager.load_config().await {
        eprintln!("Failed to load configuration, using defaults: {}", e);
    }
    let config = config_manager.config().clone();

    // Initialize logging
    let level: tracing::Level = config
        .daemon
        .log_level
        .parse()
        .unwrap_or(tracing::Level::INFO);
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .init();

    info!("Starting Quickchat Daemon v0.2.0");

    // The uinput keyboard and raw input devices normally need root
    if !config.chat.dry_run && unsafe { libc::geteuid() } != 0 {
        warn!("Not running as root; /dev/uinput and /dev/input access may fail");
    }

    // Select the chat sink
    let sink: Arc<dyn chat::ChatSink> = if config.chat.dry_run {
        info!("Dry-run mode: messages are logged, not typed");
        Arc::new(chat::DryRunSink)
    } else {
        let sink = chat::UinputChatSink::new(Duration::from_millis(config.chat.typing_delay_ms));
        sink.initialize().await?;
        info!("Uinput chat sink initialized");
        Arc::new(sink)
    };

    // Build the macro engine with the built-in catalog
    let picker = picker::VariationPicker::new(variations::builtin_variations());
    let mut engine = macro_engine::MacroEngine::new(
        picker,
        variations::builtin_macros(),
        config.chat.clone(),
        &config.combo,
        &config.messages,
        sink,
    );

    // Restore cross-session cooldown state
    let history = config_manager.load_history().await;
    if !history.recent_messages.is_empty() || !history.last_sent_message.is_empty() {
        info!("Restored {} recent message(s) from history", history.recent_messages.len());
    }
    engine.restore_history(&history);

    // Discover controllers and start their readers
    let mut controller_manager = device::ControllerManager::new(config.device.name_patterns.clone());
    let mut events = controller_manager.get_event_receiver();
    if let Err(e) = controller_manager.start_discovery() {
        error!("Controller discovery failed: {}", e);
    }
    let controllers = controller_manager.get_devices();
    if controllers.is_empty() {
        warn!("No controllers detected; connect one and restart the daemon");
    }
    for controller in &controllers {
        info!("Using controller: {}", controller);
    }
    controller_manager.start_readers();

    info!("Quickchat macros are active; press the PS button to toggle");

    // Set up signal handlers for graceful shutdown
    let mut sigterm = tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())?;
    let mut sigint = tokio::signal::unix::signal(tokio::signal::unix::SignalKind::interrupt())?;

    // Single event-loop task: every engine mutation happens here, so
    // handle_action invocations are serialized by construction.
    loop {
        tokio::select! {
            action = events.recv() => {
                match action {
                    Some(action) => {
                        // Macro errors are local to one resolution; only
                        // signals terminate the loop.
                        if let Err(e) = engine.handle_action(action, unix_now()).await {
                            warn!("Macro dispatch failed: {}", e);
                        }
                    }
                    None => {
                        error!("All controller readers stopped");
                        break;
                    }
                }
            }
            _ = sigterm.recv() => {
                info!("Received SIGTERM, shutting down gracefully");
                break;
            }
            _ = sigint.recv() => {
                info!("Received SIGINT, shutting down gracefully");
                break;
            }
        }
    }

    // Save state for the next session
    if let Err(e) = config_manager.save_history(&engine.history()).await {
        warn!("Failed to save history: {}", e);
    }

    info!("Quickchat Daemon shutdown complete");
    Ok(())
}
