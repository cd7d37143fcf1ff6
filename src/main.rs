//! bypass-cors
//!
//! A single-host forwarding proxy that lets browser clients bypass
//! same-origin restrictions, built with Tokio and Axum.
//!
//! # Architecture Overview
//!
//! ```text
//!                    ┌────────────────────────────────────────────────┐
//!                    │                  BYPASS-CORS                   │
//!                    │                                                │
//!  Client Request    │  ┌──────────┐   ┌─────────┐   ┌───────────┐   │
//!  ──────────────────┼─▶│decorators│──▶│  cors   │──▶│  target   │   │
//!  /<target-url>     │  │(id, lic.)│   │negotiate│   │ resolver  │   │
//!                    │  └──────────┘   └────┬────┘   └─────┬─────┘   │
//!                    │                      │ pre-flight   │         │
//!                    │                      ▼              ▼         │
//!  Client Response   │  ┌──────────┐   ┌─────────┐   ┌───────────┐   │     Target
//!  ◀─────────────────┼──│  reply   │◀──│ reply   │◀──│ forwarder │◀──┼──── Server
//!  + CORS headers    │  │ (writer) │   │ (writer)│   │  (client) │   │
//!                    │  └──────────┘   └─────────┘   └───────────┘   │
//!                    └────────────────────────────────────────────────┘
//! ```
//!
//! Each request is handled independently; the proxy is fully stateless.

use clap::Parser;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use bypass_cors::config::Args;
use bypass_cors::http::HttpServer;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing subscriber
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "bypass_cors=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("bypass-cors v0.1.0 starting");

    let config = Args::parse().into_config();

    tracing::info!(
        bind_address = %config.listener.bind_address,
        upstream_timeout_secs = config.timeouts.upstream_secs,
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );

    // A listener that cannot bind is fatal; exit instead of lingering.
    let listener = match TcpListener::bind(&config.listener.bind_address).await {
        Ok(listener) => listener,
        Err(err) => {
            tracing::error!(
                address = %config.listener.bind_address,
                error = %err,
                "Failed to bind listener"
            );
            return Err(err.into());
        }
    };

    tracing::info!(
        address = %listener.local_addr()?,
        "Listening for connections"
    );

    let server = HttpServer::new(config);
    server.run(listener).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
