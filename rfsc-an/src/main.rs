//! rfsc-an (RF Spectrum Analysis) - HTTP service entry point
//!
//! Accepts analyzer exports, keeps each one as an in-memory session and
//! serves per-instant characterization for it.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::Parser;
use rfsc_common::config::{load_config, LoggingConfig};
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use rfsc_an::{build_router, AppState};

/// Command-line arguments for rfsc-an
#[derive(Parser, Debug)]
#[command(name = "rfsc-an")]
#[command(about = "RF spectrum characterization service")]
#[command(version)]
struct Args {
    /// Port to listen on (overrides config file)
    #[arg(short, long, env = "RFSC_AN_PORT")]
    port: Option<u16>,

    /// Address to bind (overrides config file)
    #[arg(short, long, env = "RFSC_AN_BIND")]
    bind: Option<String>,

    /// Config file path (default: RFSC_CONFIG, then <config dir>/rfsc/rfsc-an.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log level (overrides config file; RUST_LOG takes precedence over both)
    #[arg(long, env = "RFSC_LOG_LEVEL")]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Configuration first: it decides the log level and destination
    let mut config = load_config(args.config.as_deref()).context("Failed to load configuration")?;
    if let Some(level) = args.log_level {
        config.logging.level = level;
    }
    init_tracing(&config.logging)?;

    info!(
        "Starting RF Spectrum Analysis (rfsc-an) v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    let port = args.port.unwrap_or(config.port);
    let bind = args.bind.unwrap_or_else(|| config.bind_address.clone());
    info!(
        max_sessions = config.max_sessions,
        max_upload_bytes = config.max_upload_bytes,
        peak_height = ?config.peak_detection.height,
        peak_distance = ?config.peak_detection.distance,
        "Configuration loaded"
    );

    let state = AppState::from_config(&config).context("Invalid configuration")?;
    let app = build_router(state);

    let addr: SocketAddr = format!("{}:{}", bind, port)
        .parse()
        .with_context(|| format!("Invalid bind address {}:{}", bind, port))?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;
    info!("rfsc-an listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Install the tracing subscriber (stderr, or a log file when configured)
fn init_tracing(logging: &LoggingConfig) -> Result<()> {
    let directives = format!(
        "rfsc_an={0},rfsc_common={0},tower_http={0}",
        logging.level
    );
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&directives))
        .context("Invalid log level")?;

    match &logging.file {
        Some(path) => {
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file {}", path.display()))?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .init();
        }
        None => {
            tracing_subscriber::fmt().with_env_filter(filter).init();
        }
    }

    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                warn!("Failed to install terminate handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        },
    }
}
