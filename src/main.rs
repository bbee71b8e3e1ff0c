//! Session gate for the task management API.
//!
//! # Architecture Overview
//!
//! ```text
//!                        ┌──────────────────────────────────────────────┐
//!                        │                 SESSION GATE                 │
//!     Client Request     │  ┌─────────┐   ┌───────────┐   ┌──────────┐  │
//!     ───────────────────┼─▶│  http   │──▶│ auth gate │──▶│   task   │  │
//!                        │  │ server  │   │           │   │  routes  │  │
//!                        │  └─────────┘   └─────┬─────┘   └──────────┘  │
//!                        │                      │ GET + session_token   │
//!                        │                      ▼                       │
//!                        │              ┌──────────────┐                │
//!                        │              │ auth backend │ (external)     │
//!                        │              └──────────────┘                │
//!                        │  config · observability · lifecycle          │
//!                        └──────────────────────────────────────────────┘
//! ```

use std::net::SocketAddr;
use std::path::PathBuf;

use axum::Router;
use clap::Parser;
use tokio::net::TcpListener;

use session_gate::config::load_config;
use session_gate::http::HttpServer;
use session_gate::lifecycle::Shutdown;
use session_gate::observability::{logging, metrics};

#[derive(Parser)]
#[command(name = "session-gate")]
#[command(about = "Session-token authentication gate for the task API", long_about = None)]
struct Cli {
    /// Optional TOML config file; environment variables override it.
    #[arg(short, long, env = "GATE_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Logging is not up yet, so config errors go straight to stderr.
    let config = match load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("session-gate: {e}");
            std::process::exit(2);
        }
    };

    logging::init_logging(&config.observability)?;
    tracing::info!("session-gate v{} starting", env!("CARGO_PKG_VERSION"));

    tracing::info!(
        bind_address = %config.listener.bind_address,
        auth_backend = config.auth.backend_url.as_deref().unwrap_or_default(),
        auth_timeout_ms = config.auth.timeout_ms,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        let addr: SocketAddr = config.observability.metrics_address.parse()?;
        metrics::init_metrics(addr)?;
    }

    // Task routes are mounted by the embedding service; standalone, every
    // authenticated request lands on the router fallback.
    let server = HttpServer::new(config.clone(), Router::new())?;

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new().trigger_on_os_signal();
    server.run(listener, shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
