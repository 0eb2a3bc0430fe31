//! # pulsed
//!
//! Pulse server daemon — binds the WebSocket listener on its fixed
//! loopback address and serves until terminated.
//!
//! Standard output is reserved for inbound messages; all diagnostics go
//! to stderr through the tracing subscriber (`RUST_LOG` controls the
//! filter, default `info`).

#![deny(unsafe_code)]

use std::sync::Arc;

use anyhow::{Context, Result};
use pulse_core::sink::StdoutSink;
use pulse_server::config::ServerConfig;
use pulse_server::server::PulseServer;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = ServerConfig::default();
    let server = PulseServer::new(config, Arc::new(StdoutSink));

    let (addr, handle) = server
        .listen()
        .await
        .context("failed to start server")?;
    tracing::info!("pulsed listening on ws://{addr}");

    tokio::signal::ctrl_c()
        .await
        .context("failed to listen for ctrl-c")?;

    tracing::info!("shutting down");
    server.shutdown().graceful(handle, None).await;
    tracing::info!("shutdown complete");
    Ok(())
}
