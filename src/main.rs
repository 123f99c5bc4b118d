//! Line chat server - Entry Point
//!
//! Parses the command line, binds the TCP listener and hands it to the
//! chat server.

use std::net::{IpAddr, SocketAddr};

use anyhow::Context;
use clap::Parser;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

use line_chat::config::{DEFAULT_MAX_LINE_LENGTH, DEFAULT_OUTBOX_CAPACITY};
use line_chat::{serve, ServerConfig};

/// Multi-client line-based chat server.
///
/// Clients connect over plain TCP, send their alias as the first line, then
/// chat line by line. Lines starting with `/` are commands:
/// `/list`, `/private <alias> <message>`, `/alias <name>`, `/quit`.
#[derive(Debug, Parser)]
#[command(name = "line_chat", version)]
struct Cli {
    /// TCP port to listen on.
    port: u16,

    /// IP address to bind to.
    #[arg(long, default_value = "0.0.0.0", env = "LINE_CHAT_BIND")]
    bind: IpAddr,

    /// Lines queued per client before further lines to it are dropped.
    #[arg(long, default_value_t = DEFAULT_OUTBOX_CAPACITY, env = "LINE_CHAT_OUTBOX_CAPACITY")]
    outbox_capacity: usize,

    /// Longest accepted line in bytes; longer lines disconnect the client.
    #[arg(long, default_value_t = DEFAULT_MAX_LINE_LENGTH, env = "LINE_CHAT_MAX_LINE_LENGTH")]
    max_line_length: usize,
}

impl Cli {
    fn into_config(self) -> ServerConfig {
        ServerConfig {
            outbox_capacity: self.outbox_capacity,
            max_line_length: self.max_line_length,
            ..ServerConfig::new(SocketAddr::new(self.bind, self.port))
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging with environment filter
    // Use RUST_LOG env var to control log level
    // e.g., RUST_LOG=debug or RUST_LOG=line_chat=trace
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("line_chat=info")),
        )
        .init();

    // Missing or invalid arguments print usage to stderr and exit non-zero
    let config = Cli::parse().into_config();

    let listener = TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;
    info!("Chat server listening on {}", config.bind_addr);

    serve(listener, config).await;

    Ok(())
}
