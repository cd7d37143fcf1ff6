//! Command line and environment configuration.
//!
//! Precedence: the `--port` flag wins over the `PORT` environment
//! variable, which wins over the default.

use clap::Parser;

use crate::config::schema::ProxyConfig;

pub const PORT_ENV: &str = "PORT";
pub const DEFAULT_PORT: u16 = 8080;

/// CORS-bypassing forwarding proxy.
#[derive(Debug, Parser)]
#[command(name = "bypass-cors", about = "Forwarding proxy that injects CORS headers", long_about = None)]
pub struct Args {
    /// Port at which the server will run.
    #[arg(short = 'p', long = "port")]
    pub port: Option<u16>,
}

impl Args {
    /// Merge CLI flags and environment into a full configuration.
    pub fn into_config(self) -> ProxyConfig {
        let port = self
            .port
            .or_else(|| std::env::var(PORT_ENV).ok().and_then(|v| v.parse().ok()))
            .unwrap_or(DEFAULT_PORT);

        let mut config = ProxyConfig::default();
        config.listener.bind_address = format!("0.0.0.0:{port}");
        config
    }
}
