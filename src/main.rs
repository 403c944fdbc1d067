//! live-client - a headless live-reload client for development servers.
//!
//! Attaches to a page served by a live-reload dev server, keeps the reload
//! WebSocket open, and mirrors every reload into an in-memory copy of the
//! document - proving end to end that changes reach a connected client.

#![allow(dead_code)]

mod cli;
mod config;
mod connect;
mod core;
mod dom;
mod logger;
mod page;
mod reload;

use std::sync::Arc;

use anyhow::Result;
use clap::{ColorChoice, Parser};
use tokio::sync::mpsc;

use cli::Cli;
use config::ClientConfig;
use connect::{ConnectionManager, ReloadTrigger, WsTransport};
use page::LivePage;
use reload::ReloadCoordinator;

fn main() -> Result<()> {
    // Setup global Ctrl+C handler (before any blocking operations)
    core::setup_shutdown_handler()?;

    let cli = Cli::parse();

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }
    logger::set_verbose(cli.verbose);

    let config = ClientConfig::load(&cli)?;
    run_client(config)
}

// =============================================================================
// Client Loop
// =============================================================================

/// Attach to the page and service reload signals until Ctrl+C.
///
/// All coordination runs on one cooperative thread; only the WebSocket
/// pump and the HTTP stack use helper threads internally.
#[tokio::main(flavor = "current_thread")]
async fn run_client(config: ClientConfig) -> Result<()> {
    let http = reqwest::Client::new();

    log!("connect"; "attaching to {}", config.page);
    let page = LivePage::load(&http, config.page.clone()).await?;
    let coordinator = ReloadCoordinator::new(http, page, config.hard);

    // Relay connection signals into the coordinator
    let (trigger_tx, mut trigger_rx) = mpsc::channel(16);
    let relay = Arc::clone(&coordinator);
    tokio::spawn(async move {
        while let Some(trigger) = trigger_rx.recv().await {
            match trigger {
                ReloadTrigger::Message => debug!("reload"; "server signal received"),
                ReloadTrigger::Reconnected => debug!("reload"; "refreshing after reconnect"),
            }
            relay.trigger();
        }
    });

    ConnectionManager::new(WsTransport)
        .run(&config.address, trigger_tx)
        .await;
    Ok(())
}
