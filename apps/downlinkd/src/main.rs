//! downlinkd - secure download issuance service
//!
//! Serves the HTTP API for issuing signed download links and streaming
//! verified artifacts. Configuration precedence: defaults, then
//! `downlink.toml`, then `DOWNLINK_*` environment variables, then CLI flags.

mod cli;
mod events;
mod logging;

use std::process;
use std::sync::Arc;

use actix_web::{web, App, HttpServer};
use clap::Parser;
use tracing::{error, info};

use downlink_api::{configure_routes, AppContext};
use downlink_config::Config;
use downlink_errors::Error;
use downlink_notify::LogMailer;

use crate::cli::Cli;
use crate::logging::init_tracing;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.debug);

    if let Err(e) = run(cli).await {
        error!("startup failed: {e}");
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Error> {
    info!("starting downlinkd v{}", env!("CARGO_PKG_VERSION"));

    let mut config = Config::load_or_default(cli.config.as_deref()).await?;
    config.merge_env()?;
    apply_cli_config(&mut config, &cli);

    let (event_tx, event_rx) = downlink_events::channel();
    let drain = tokio::spawn(events::drain(event_rx));

    let context = web::Data::new(Arc::new(AppContext::from_config(
        &config,
        event_tx,
        Arc::new(LogMailer),
    )?));

    let host = config.server.host.clone();
    let port = config.server.port;
    info!(host = %host, port = port, "listening");

    HttpServer::new(move || {
        App::new()
            .app_data(context.clone())
            .configure(configure_routes)
    })
    .bind((host, port))?
    .run()
    .await?;

    // All senders are gone once the server stops; let the drain finish so
    // the last audit records are written.
    let _ = drain.await;
    Ok(())
}

/// Apply CLI flags on top of file and environment configuration.
fn apply_cli_config(config: &mut Config, cli: &Cli) {
    if let Some(host) = &cli.host {
        config.server.host.clone_from(host);
    }
    if let Some(port) = cli.port {
        config.server.port = port;
    }
    if let Some(url) = &cli.public_url {
        config.urls.public_url.clone_from(url);
    }
    if let Some(dir) = &cli.artifact_dir {
        config.storage.artifact_dir.clone_from(dir);
    }
}
